//! Test doubles and corpus fixtures shared by the integration tests

#![allow(dead_code)]

use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use anyhow::Result;
use docsift::core::{ClusterId, ClusterParams, Embedding, NOISE};
use docsift::models::{Embedder, Models, SummaryRequest, Summarizer};
use docsift::processing::{DensityClusterer, DistanceMatrix};

/// Words the keyword embedder treats as dimensions
pub const KEYWORDS: &[&str] = &[
	"solar", "wind", "battery", "grid", "protein", "enzyme", "cell", "membrane", "harbor", "violin",
];

/// Counts keyword occurrences; one dimension per keyword plus a constant tail
pub struct KeywordEmbedder {
	pub calls: AtomicUsize,
}

impl KeywordEmbedder {
	pub fn new() -> Self {
		Self { calls: AtomicUsize::new(0) }
	}
}

impl Embedder for KeywordEmbedder {
	fn embed(&self, texts: &[String]) -> Result<Vec<Embedding>> {
		self.calls.fetch_add(1, Ordering::SeqCst);
		Ok(texts
			.iter()
			.map(|text| {
				let lower = text.to_lowercase();
				let mut v: Vec<f32> = KEYWORDS.iter().map(|k| lower.matches(k).count() as f32).collect();
				v.push(0.1);
				Embedding::new(v)
			})
			.collect())
	}
}

/// Returns fixed vectors in order, regardless of the texts
pub struct FixedEmbedder(pub Vec<Vec<f32>>);

impl Embedder for FixedEmbedder {
	fn embed(&self, texts: &[String]) -> Result<Vec<Embedding>> {
		Ok(self.0.iter().take(texts.len()).cloned().map(Embedding::new).collect())
	}
}

pub struct FailingEmbedder;

impl Embedder for FailingEmbedder {
	fn embed(&self, _texts: &[String]) -> Result<Vec<Embedding>> {
		anyhow::bail!("model exploded")
	}
}

/// Records every request and answers with a canned summary
#[derive(Default)]
pub struct RecordingSummarizer {
	pub requests: Mutex<Vec<String>>,
}

impl RecordingSummarizer {
	pub fn calls(&self) -> usize {
		self.requests.lock().unwrap().len()
	}
}

impl Summarizer for RecordingSummarizer {
	fn summarize(&self, request: &SummaryRequest<'_>) -> Result<String> {
		self.requests.lock().unwrap().push(request.text.to_string());
		Ok(format!("summary of {} chars", request.text.chars().count()))
	}
}

/// Same as `RecordingSummarizer`, shareable through `Models`
pub struct CountingSummarizer(pub std::sync::Arc<AtomicUsize>);

impl Summarizer for CountingSummarizer {
	fn summarize(&self, request: &SummaryRequest<'_>) -> Result<String> {
		self.0.fetch_add(1, Ordering::SeqCst);
		Ok(format!("summary of {} chars", request.text.chars().count()))
	}
}

/// Cluster 0 for every point with a neighbour closer than `radius`, noise otherwise
pub struct RadiusClusterer {
	pub radius: f32,
}

impl DensityClusterer for RadiusClusterer {
	fn cluster(&self, distances: &DistanceMatrix, _params: &ClusterParams) -> Result<Vec<ClusterId>> {
		let n = distances.len();
		Ok((0..n)
			.map(|i| {
				let dense = (0..n).any(|j| j != i && distances.get(i, j) < self.radius);
				if dense { 0 } else { NOISE }
			})
			.collect())
	}
}

pub fn keyword_models() -> Models {
	Models::new(Box::new(KeywordEmbedder::new()), Box::new(RecordingSummarizer::default()))
		.with_clusterer(Box::new(RadiusClusterer { radius: 0.6 }))
}

pub fn write(dir: &Path, name: &str, contents: &str) {
	let path = dir.join(name);
	if let Some(parent) = path.parent() {
		fs::create_dir_all(parent).unwrap();
	}
	fs::write(path, contents).unwrap();
}

/// Two energy documents and two biology documents, several long paragraphs each
pub fn write_corpus(dir: &Path) {
	write(
		dir,
		"energy/solar.txt",
		"Solar power feeds the renewable grid and battery storage during sunny afternoons.\n\n\
		 Battery storage smooths solar output when clouds pass over the renewable grid.\n\n\
		 A lone violin played in the harbor while the ferries were docking.",
	);
	write(
		dir,
		"energy/wind.txt",
		"Wind turbines feed the renewable grid and battery storage on breezy nights.\n\n\
		 Battery storage banks hold surplus wind power for the renewable grid.\n\n\
		 Page 2",
	);
	write(
		dir,
		"biology/enzyme.txt",
		"Each enzyme is a protein that speeds reactions inside the living cell membrane.\n\n\
		 The cell membrane controls which protein and enzyme molecules enter the cell.",
	);
	write(
		dir,
		"biology/membrane.txt",
		"The cell membrane is a lipid layer studded with protein and enzyme channels.\n\n\
		 Enzyme and protein activity inside the cell membrane depends on temperature.\n\n\
		 Contact lab@example.org or visit https://example.org/protocols for details.",
	);
}

pub const VIOLIN: &str = "A lone violin played in the harbor while the ferries were docking.";
