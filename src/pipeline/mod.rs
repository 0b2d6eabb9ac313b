//! # Run orchestration
//!
//! Drives one corpus through ingest, grouping, segmentation, clustering,
//! partitioning, summarization and reporting, one run at a time.

pub mod coordinator;
pub mod runner;
pub mod state;

pub use coordinator::{RunCoordinator, RunGuard};
pub use runner::{GroupReport, Pipeline, RunReport, SkippedDocument};
pub use state::{RunStage, RunState};
