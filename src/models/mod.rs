//! # Model Capabilities
//!
//! Embedding and summarization handles, loaded once and passed into the pipeline.

pub mod manager;
pub mod summarizer;
pub mod text;

pub use manager::Models;
pub use summarizer::{HuggingFaceSummarizer, OllamaSummarizer, SummaryRequest, Summarizer};
pub use text::OnnxEmbedder;

use anyhow::Result;

use crate::core::Embedding;

/// Maps an ordered list of texts to one vector per text, same order.
pub trait Embedder: Send + Sync {
	fn embed(&self, texts: &[String]) -> Result<Vec<Embedding>>;
}
