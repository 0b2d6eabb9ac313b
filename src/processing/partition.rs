//! Similarity/difference partition of clustered paragraphs

use std::collections::BTreeMap;

use crate::core::{DocumentId, Paragraph, ParagraphClusters, NOISE};

/// Paragraphs per document, in their original relative order
pub type DocumentParagraphs = BTreeMap<DocumentId, Vec<Paragraph>>;

#[derive(Debug, Clone, Default)]
pub struct Partition {
	/// Paragraphs that landed in a real cluster
	pub similarities: DocumentParagraphs,
	/// Noise paragraphs
	pub differences: DocumentParagraphs,
}

/// Route every paragraph to exactly one side by its cluster label.
pub fn partition(clusters: &ParagraphClusters) -> Partition {
	let mut result = Partition::default();

	for (paragraph, &label) in clusters.paragraphs.iter().zip(&clusters.labels) {
		let side = if label == NOISE {
			&mut result.differences
		} else {
			&mut result.similarities
		};
		side.entry(paragraph.document.clone()).or_default().push(paragraph.clone());
	}

	result
}

impl Partition {
	pub fn similarity_count(&self) -> usize {
		self.similarities.values().map(Vec::len).sum()
	}

	pub fn difference_count(&self) -> usize {
		self.differences.values().map(Vec::len).sum()
	}
}

/// All paragraph texts of one side, documents in key order
pub fn aggregate(side: &DocumentParagraphs) -> String {
	side.values()
		.flatten()
		.map(|p| p.text.as_str())
		.collect::<Vec<_>>()
		.join("\n\n")
}
