//! HDBSCAN clustering of paragraph embeddings

use anyhow::{Context, Result};
use hdbscan::{DistanceMetric, Hdbscan, HdbscanHyperParams};

use crate::core::{ClusterId, ClusterParams, Embedding, Paragraph, ParagraphClusters, NOISE};
use crate::error::PipelineError;
use crate::models::Embedder;
use crate::ui;

use super::distance::DistanceMatrix;

/// Density-based clustering over a precomputed distance matrix.
///
/// Returns one label per row; `NOISE` marks points outside every dense region.
pub trait DensityClusterer: Send + Sync {
	fn cluster(&self, distances: &DistanceMatrix, params: &ClusterParams) -> Result<Vec<ClusterId>>;
}

/// HDBSCAN with the precalculated distance metric
#[derive(Debug, Default, Clone, Copy)]
pub struct HdbscanClusterer;

impl DensityClusterer for HdbscanClusterer {
	fn cluster(&self, distances: &DistanceMatrix, params: &ClusterParams) -> Result<Vec<ClusterId>> {
		let n = distances.len();
		if n == 0 {
			return Ok(Vec::new());
		}
		if n < params.min_cluster_size {
			ui::debug(&format!(
				"{} points below min cluster size {}, all noise",
				n, params.min_cluster_size
			));
			return Ok(vec![NOISE; n]);
		}

		let min_samples = params.min_samples.unwrap_or(params.min_cluster_size).clamp(1, n - 1);
		let hyper_params = HdbscanHyperParams::builder()
			.min_cluster_size(params.min_cluster_size)
			.min_samples(min_samples)
			.allow_single_cluster(params.allow_single_cluster)
			.dist_metric(DistanceMetric::Precalculated)
			.build();

		let rows = distances.to_rows();
		let clusterer = Hdbscan::new(&rows, hyper_params);
		let labels = clusterer.cluster().context("HDBSCAN clustering failed")?;

		Ok(labels)
	}
}

/// Embed, measure and cluster the paragraphs of one topic group.
///
/// The embedder is called once for the whole list. An empty list yields no
/// clusters without calling anything.
pub fn cluster_paragraphs(
	paragraphs: Vec<Paragraph>,
	embedder: &dyn Embedder,
	clusterer: &dyn DensityClusterer,
	params: &ClusterParams,
) -> Result<ParagraphClusters, PipelineError> {
	let embeddings = embed_paragraphs(&paragraphs, embedder)?;
	cluster_embeddings(paragraphs, &embeddings, clusterer, params)
}

/// One vector per paragraph, in paragraph order, from a single embedder call.
pub fn embed_paragraphs(paragraphs: &[Paragraph], embedder: &dyn Embedder) -> Result<Vec<Embedding>, PipelineError> {
	if paragraphs.is_empty() {
		return Ok(Vec::new());
	}

	let texts: Vec<String> = paragraphs.iter().map(|p| p.text.clone()).collect();
	let embeddings = embedder
		.embed(&texts)
		.map_err(|e| PipelineError::EmbeddingFailure(format!("{:#}", e)))?;

	if embeddings.len() != paragraphs.len() {
		return Err(PipelineError::EmbeddingFailure(format!(
			"expected {} vectors, got {}",
			paragraphs.len(),
			embeddings.len()
		)));
	}
	if let Some(first) = embeddings.first() {
		ui::debug(&format!("Embedding dimension: {}D", first.dim()));
		if first.dim() == 0 || embeddings.iter().any(|e| e.dim() != first.dim()) {
			return Err(PipelineError::EmbeddingFailure("vectors have empty or mixed dimensions".into()));
		}
	}

	Ok(embeddings)
}

/// Cluster already embedded paragraphs over their cosine distances.
pub fn cluster_embeddings(
	paragraphs: Vec<Paragraph>,
	embeddings: &[Embedding],
	clusterer: &dyn DensityClusterer,
	params: &ClusterParams,
) -> Result<ParagraphClusters, PipelineError> {
	if paragraphs.is_empty() {
		return Ok(ParagraphClusters::empty());
	}
	if embeddings.len() != paragraphs.len() {
		return Err(PipelineError::ClusteringFailure(format!(
			"{} paragraphs but {} vectors",
			paragraphs.len(),
			embeddings.len()
		)));
	}

	let distances = DistanceMatrix::cosine(embeddings);
	ui::debug(&format!("Distance matrix: {}x{}", distances.len(), distances.len()));

	let labels = clusterer
		.cluster(&distances, params)
		.map_err(|e| PipelineError::ClusteringFailure(format!("{:#}", e)))?;

	if labels.len() != paragraphs.len() {
		return Err(PipelineError::ClusteringFailure(format!(
			"expected {} labels, got {}",
			paragraphs.len(),
			labels.len()
		)));
	}

	let clusters = ParagraphClusters { paragraphs, labels };
	if clusters.is_degenerate() {
		ui::warn("No dense cluster found, every paragraph is noise");
	} else {
		let sizes = clusters.sizes();
		let max_size = sizes.values().max().copied().unwrap_or(0);
		let min_size = sizes.values().min().copied().unwrap_or(0);
		ui::debug(&format!("Cluster sizes: min={}, max={}", min_size, max_size));
	}

	Ok(clusters)
}
