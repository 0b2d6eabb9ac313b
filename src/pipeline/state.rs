//! Forward-only run state machine

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RunStage {
	Ingested,
	Grouped,
	Segmented,
	Embedded,
	Clustered,
	Partitioned,
	Summarized,
	Reported,
}

impl RunStage {
	pub const ALL: [RunStage; 8] = [
		RunStage::Ingested,
		RunStage::Grouped,
		RunStage::Segmented,
		RunStage::Embedded,
		RunStage::Clustered,
		RunStage::Partitioned,
		RunStage::Summarized,
		RunStage::Reported,
	];

	pub fn name(self) -> &'static str {
		match self {
			RunStage::Ingested => "INGESTED",
			RunStage::Grouped => "GROUPED",
			RunStage::Segmented => "SEGMENTED",
			RunStage::Embedded => "EMBEDDED",
			RunStage::Clustered => "CLUSTERED",
			RunStage::Partitioned => "PARTITIONED",
			RunStage::Summarized => "SUMMARIZED",
			RunStage::Reported => "REPORTED",
		}
	}
}

impl fmt::Display for RunStage {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

/// Stage a run is currently working towards. A failure is reported at this stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunState {
	stage: RunStage,
}

impl Default for RunState {
	fn default() -> Self {
		Self { stage: RunStage::Ingested }
	}
}

impl RunState {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn stage(&self) -> RunStage {
		self.stage
	}

	/// Move to `next`. Returns false and stays put if `next` is not ahead.
	pub fn advance(&mut self, next: RunStage) -> bool {
		if next <= self.stage {
			return false;
		}
		self.stage = next;
		true
	}
}
