//! Paragraph cluster assignments

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::document::Paragraph;

pub type ClusterId = i32;

/// Reserved label for points outside every dense region
pub const NOISE: ClusterId = -1;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ClusterParams {
	pub min_cluster_size: usize,
	pub min_samples: Option<usize>,
	pub allow_single_cluster: bool,
}

/// Paragraphs of one topic group together with one label per paragraph
#[derive(Debug, Clone)]
pub struct ParagraphClusters {
	pub paragraphs: Vec<Paragraph>,
	pub labels: Vec<ClusterId>,
}

impl ParagraphClusters {
	pub fn empty() -> Self {
		Self { paragraphs: Vec::new(), labels: Vec::new() }
	}

	pub fn len(&self) -> usize {
		self.paragraphs.len()
	}

	pub fn is_empty(&self) -> bool {
		self.paragraphs.is_empty()
	}

	pub fn noise_count(&self) -> usize {
		self.labels.iter().filter(|&&l| l == NOISE).count()
	}

	/// Number of real (non-noise) clusters
	pub fn cluster_count(&self) -> usize {
		self.sizes().len()
	}

	/// Member count per real cluster id
	pub fn sizes(&self) -> BTreeMap<ClusterId, usize> {
		let mut sizes = BTreeMap::new();
		for &label in self.labels.iter().filter(|&&l| l != NOISE) {
			*sizes.entry(label).or_insert(0) += 1;
		}
		sizes
	}

	/// Every paragraph is noise (corpus too small or too homogeneous)
	pub fn is_degenerate(&self) -> bool {
		!self.is_empty() && self.cluster_count() == 0
	}

	pub fn noise_percent(&self) -> f32 {
		if self.labels.is_empty() {
			0.0
		} else {
			(self.noise_count() as f32 / self.labels.len() as f32) * 100.0
		}
	}
}
