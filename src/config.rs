//! Application configuration and constants

use std::path::PathBuf;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::core::ClusterParams;
use crate::error::PipelineError;
use crate::processing::CleanMode;

static CUSTOM_MODEL_DIR: OnceLock<PathBuf> = OnceLock::new();

// === Model Files ===
pub const EMBED_MODEL: &str = "model.onnx";
pub const EMBED_TOKENIZER: &str = "tokenizer.json";
pub const EMBED_DIR: &str = "all-MiniLM-L6-v2";

// === Model Parameters ===
pub const EMBEDDING_DIM: usize = 384;
pub const MAX_EMBED_TOKENS: usize = 256;

// === Segmentation ===
pub const MIN_PARAGRAPH_CHARS: usize = 30;

// === Document Grouping ===
pub const DEFAULT_TOPIC_COUNT: usize = 2;
pub const MAX_VOCABULARY: usize = 1000;
pub const LABEL_TERMS: usize = 5;
pub const KMEANS_RESTARTS: usize = 10;
pub const KMEANS_MAX_ITER: u64 = 300;
pub const KMEANS_TOLERANCE: f64 = 1e-4;
pub const DEFAULT_SEED: u64 = 42;

// === Paragraph Clustering ===
pub const DEFAULT_MIN_CLUSTER_SIZE: usize = 5;

// === Summarization ===
pub const MIN_SUMMARY_CHARS: usize = 50;
pub const MAX_SUMMARY_INPUT_CHARS: usize = 4096;
pub const SUMMARY_MIN_TOKENS: usize = 300;
pub const SUMMARY_MAX_TOKENS: usize = 700;
pub const SUMMARY_BEAMS: usize = 4;
pub const NO_SUMMARY_MARKER: &str = "No summary available.";
pub const TOO_SHORT_MARKER: &str = "Text too short to summarize.";
pub const DEFAULT_OLLAMA_URL: &str = "http://127.0.0.1:11434";
pub const DEFAULT_OLLAMA_MODEL: &str = "llama3.2";
pub const DEFAULT_HF_URL: &str = "https://api-inference.huggingface.co/models/facebook/bart-large-cnn";

// === Storage ===
pub const OUTPUT_DIR: &str = "output";
pub const STAGING_DIR: &str = ".staging";
pub const LOCK_FILE: &str = ".docsift.lock";
pub const REGISTRY_FILE: &str = "registry.msgpack";
pub const TEXTS_DIR: &str = "texts";
pub const REPORTS_DIR: &str = "reports";
pub const SIMILARITIES_FILE: &str = "similarities.txt";
pub const DIFFERENCES_FILE: &str = "differences.txt";

// === File Extensions ===
pub const TEXT_EXTENSIONS: &[&str] = &["txt"];
pub const PDF_EXTENSIONS: &[&str] = &["pdf"];
pub const DOCX_EXTENSIONS: &[&str] = &["docx"];

/// How similarity/difference paragraphs are condensed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
pub enum SummaryMode {
	/// One summary per document and side
	PerDocument,
	/// One summary per side across the whole topic group
	#[default]
	Corpus,
}

/// Tunable parameters for one pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
	pub topic_count: usize,
	pub min_cluster_size: usize,
	pub allow_single_cluster: bool,
	pub summary_mode: SummaryMode,
	pub strict_cleaning: bool,
	pub seed: u64,
}

impl Default for PipelineConfig {
	fn default() -> Self {
		Self {
			topic_count: DEFAULT_TOPIC_COUNT,
			min_cluster_size: DEFAULT_MIN_CLUSTER_SIZE,
			allow_single_cluster: true,
			summary_mode: SummaryMode::default(),
			strict_cleaning: false,
			seed: DEFAULT_SEED,
		}
	}
}

impl PipelineConfig {
	pub fn cluster_params(&self) -> ClusterParams {
		ClusterParams {
			min_cluster_size: self.min_cluster_size,
			min_samples: None,
			allow_single_cluster: self.allow_single_cluster,
		}
	}

	pub fn clean_mode(&self) -> CleanMode {
		if self.strict_cleaning {
			CleanMode::Strict
		} else {
			CleanMode::Standard
		}
	}

	pub fn validate(&self) -> Result<(), PipelineError> {
		if self.topic_count == 0 {
			return Err(PipelineError::InvalidConfig("topic count must be at least 1".into()));
		}
		if self.min_cluster_size < 2 {
			return Err(PipelineError::InvalidConfig(format!(
				"min cluster size must be at least 2, got {}",
				self.min_cluster_size
			)));
		}
		Ok(())
	}
}

/// Which HTTP summarization backend to talk to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummarizerBackend {
	Ollama,
	HuggingFace,
}

#[derive(Debug, Clone)]
pub struct SummarizerSettings {
	pub backend: SummarizerBackend,
	pub url: String,
	pub model: String,
	pub api_token: Option<String>,
}

impl SummarizerSettings {
	/// Read from DOCSIFT_SUMMARIZER, DOCSIFT_SUMMARIZER_URL, DOCSIFT_SUMMARIZER_MODEL, DOCSIFT_HF_TOKEN
	pub fn from_env() -> Self {
		let backend = match std::env::var("DOCSIFT_SUMMARIZER").map(|v| v.to_lowercase()) {
			Ok(v) if v == "huggingface" || v == "hf" => SummarizerBackend::HuggingFace,
			_ => SummarizerBackend::Ollama,
		};

		let url = std::env::var("DOCSIFT_SUMMARIZER_URL").unwrap_or_else(|_| match backend {
			SummarizerBackend::Ollama => DEFAULT_OLLAMA_URL.to_string(),
			SummarizerBackend::HuggingFace => DEFAULT_HF_URL.to_string(),
		});

		let model = std::env::var("DOCSIFT_SUMMARIZER_MODEL").unwrap_or_else(|_| DEFAULT_OLLAMA_MODEL.to_string());

		Self {
			backend,
			url,
			model,
			api_token: std::env::var("DOCSIFT_HF_TOKEN").ok(),
		}
	}
}

pub fn set_model_dir(path: PathBuf) {
	let _ = CUSTOM_MODEL_DIR.set(path);
}

/// Get models directory (--models-dir, DOCSIFT_MODELS_DIR, or next to executable)
pub fn models_dir() -> Option<PathBuf> {
	if let Some(custom) = CUSTOM_MODEL_DIR.get() {
		crate::ui::debug(&format!("Using custom model dir: {}", custom.display()));
		return Some(custom.clone());
	}

	if let Ok(env_path) = std::env::var("DOCSIFT_MODELS_DIR") {
		let path = PathBuf::from(&env_path);
		if path.is_dir() {
			crate::ui::debug(&format!("Using DOCSIFT_MODELS_DIR: {}", env_path));
			return Some(path);
		}
	}

	if let Ok(exe) = std::env::current_exe() {
		if let Some(dir) = exe.parent() {
			let models = dir.join("models");
			if models.is_dir() {
				crate::ui::debug(&format!("Found models at: {}", models.display()));
				return Some(models);
			}
		}
	}

	None
}

pub fn get_embed_model_path() -> Option<PathBuf> {
	models_dir().map(|d| d.join(EMBED_DIR).join(EMBED_MODEL))
}

pub fn get_tokenizer_path() -> Option<PathBuf> {
	models_dir().map(|d| d.join(EMBED_DIR).join(EMBED_TOKENIZER))
}
