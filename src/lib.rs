//! # docsift
//!
//! Groups a document corpus into topics, clusters each topic's paragraphs by
//! meaning and reports what the documents share and where they diverge.

pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod processing;
pub mod runtime;
pub mod storage;
pub mod ui;

pub use config::{PipelineConfig, SummaryMode};
pub use error::{PipelineError, RunFailure};
pub use models::Models;
pub use pipeline::{Pipeline, RunStage};
pub use storage::Workspace;
