//! TF-IDF document vectors over a bounded vocabulary

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use linfa_preprocessing::tf_idf_vectorization::{TfIdfMethod, TfIdfVectorizer};
use ndarray::{Array1, Array2};
use regex::Regex;
use stop_words::{get, LANGUAGE};

use crate::error::PipelineError;

static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\w\w+\b").unwrap());

static STOP_WORDS: LazyLock<HashSet<String>> =
	LazyLock::new(|| get(LANGUAGE::English).iter().map(|w| w.to_string()).collect());

/// Lower-case word tokens with stopwords and bare numbers removed
pub fn tokenize(text: &str) -> Vec<String> {
	let lower = text.to_lowercase();
	WORD.find_iter(&lower)
		.map(|m| m.as_str())
		.filter(|t| !STOP_WORDS.contains(*t))
		.filter(|t| !t.chars().all(|c| c.is_ascii_digit() || c == '_'))
		.map(str::to_string)
		.collect()
}

/// Row-normalized TF-IDF matrix, one row per document
#[derive(Debug, Clone)]
pub struct TfIdf {
	/// Column terms, alphabetical
	pub vocabulary: Vec<String>,
	pub matrix: Array2<f64>,
}

impl TfIdf {
	/// Build smooth-idf features for `documents`, keeping the `max_features`
	/// most frequent terms.
	pub fn fit(documents: &[String], max_features: usize) -> Result<Self, PipelineError> {
		// The vectorizer splits on the same word pattern, so pre-filtered
		// tokens pass through unchanged
		let cleaned: Array1<String> = documents.iter().map(|d| tokenize(d).join(" ")).collect();

		if cleaned.iter().all(String::is_empty) {
			return Ok(Self {
				vocabulary: Vec::new(),
				matrix: Array2::zeros((documents.len(), 0)),
			});
		}

		let vectorizer = TfIdfVectorizer::default()
			.convert_to_lowercase(false)
			.max_features(Some(max_features))
			.method(TfIdfMethod::Smooth)
			.fit(&cleaned)
			.map_err(|e| PipelineError::ClusteringFailure(format!("TF-IDF fit failed: {}", e)))?;
		let sparse = vectorizer
			.transform(&cleaned)
			.map_err(|e| PipelineError::ClusteringFailure(format!("TF-IDF transform failed: {}", e)))?;

		// Fitted column order follows a hash map; pin it alphabetically
		let fitted = vectorizer.vocabulary();
		let mut vocabulary = fitted.clone();
		vocabulary.sort();
		let position: HashMap<&str, usize> = vocabulary.iter().enumerate().map(|(i, t)| (t.as_str(), i)).collect();
		let columns: Vec<usize> = fitted.iter().map(|t| position[t.as_str()]).collect();

		let mut matrix = Array2::<f64>::zeros((documents.len(), vocabulary.len()));
		for (value, (row, col)) in sparse.iter() {
			matrix[[row, columns[col]]] = *value;
		}

		for mut row in matrix.rows_mut() {
			let norm = row.iter().map(|v| v * v).sum::<f64>().sqrt();
			if norm > 0.0 {
				row.mapv_inplace(|v| v / norm);
			}
		}

		Ok(Self { vocabulary, matrix })
	}

	pub fn n_documents(&self) -> usize {
		self.matrix.nrows()
	}

	/// Highest-weighted terms of a feature-space vector, strongest first
	pub fn top_terms(&self, weights: &[f64], count: usize) -> Vec<&str> {
		let mut indexed: Vec<(usize, f64)> = weights
			.iter()
			.copied()
			.enumerate()
			.filter(|(_, w)| *w > 0.0)
			.collect();
		indexed.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
		indexed
			.into_iter()
			.take(count)
			.map(|(i, _)| self.vocabulary[i].as_str())
			.collect()
	}
}
