//! Capability handles loaded once at startup

use anyhow::{Context, Result};

use crate::config::SummarizerSettings;
use crate::processing::{DensityClusterer, HdbscanClusterer};
use crate::ui;

use super::{summarizer, Embedder, OnnxEmbedder, Summarizer};

/// Embedder, summarizer and density clusterer used by every run of a pipeline
pub struct Models {
	pub embedder: Box<dyn Embedder>,
	pub summarizer: Box<dyn Summarizer>,
	pub clusterer: Box<dyn DensityClusterer>,
}

impl Models {
	/// Bundle explicit handles, clustering with HDBSCAN
	pub fn new(embedder: Box<dyn Embedder>, summarizer: Box<dyn Summarizer>) -> Self {
		Self {
			embedder,
			summarizer,
			clusterer: Box::new(HdbscanClusterer),
		}
	}

	pub fn with_clusterer(mut self, clusterer: Box<dyn DensityClusterer>) -> Self {
		self.clusterer = clusterer;
		self
	}

	/// Load the ONNX embedder from the models directory and connect the configured summarizer
	pub fn load(settings: &SummarizerSettings) -> Result<Self> {
		ui::debug("Loading embedding model...");
		let embedder = OnnxEmbedder::from_models_dir().context("Embedding model unavailable")?;
		ui::success("Embedding model loaded");

		ui::debug(&format!("Summarizer: {:?} at {}", settings.backend, settings.url));
		let summarizer = summarizer::from_settings(settings)?;

		Ok(Self::new(Box::new(embedder), summarizer))
	}
}
