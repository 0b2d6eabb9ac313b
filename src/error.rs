//! Pipeline error kinds

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::pipeline::RunStage;

/// Failures surfaced by the clustering pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
	/// Input location missing or without any eligible file.
	#[error("Input not found or has no eligible files: {}", .0.display())]
	InputNotFound(PathBuf),
	/// One document could not be converted to text. Isolated per document.
	#[error("Failed to extract {}: {reason}", path.display())]
	ExtractionFailure { path: PathBuf, reason: String },
	/// No paragraph survived segmentation in any document.
	#[error("No paragraphs survived segmentation")]
	EmptyCorpus,
	#[error("Embedding failed: {0}")]
	EmbeddingFailure(String),
	#[error("Clustering failed: {0}")]
	ClusteringFailure(String),
	#[error("Summarization failed: {0}")]
	SummarizationFailure(String),
	#[error("Another run is already in progress")]
	RunInProgress,
	#[error("Topic group not found: {0}")]
	GroupNotFound(String),
	#[error("Workspace error: {0}")]
	Workspace(String),
	#[error("Invalid configuration: {0}")]
	InvalidConfig(String),
}

impl From<std::io::Error> for PipelineError {
	fn from(e: std::io::Error) -> Self {
		Self::Workspace(e.to_string())
	}
}

/// A run that aborted, with the stage it was in.
#[derive(Debug)]
pub struct RunFailure {
	pub stage: RunStage,
	pub error: PipelineError,
}

impl fmt::Display for RunFailure {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "run aborted at {}: {}", self.stage, self.error)
	}
}

impl std::error::Error for RunFailure {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		Some(&self.error)
	}
}
