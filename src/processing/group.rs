//! Document-level topical grouping (TF-IDF + k-means)

use std::collections::HashSet;

use crate::config::{LABEL_TERMS, MAX_VOCABULARY};
use crate::core::DocumentId;
use crate::error::PipelineError;
use crate::ui;

use super::kmeans;
use super::tfidf::TfIdf;

/// One topical bucket of documents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicBucket {
	pub id: usize,
	pub label: String,
	pub members: Vec<DocumentId>,
}

#[derive(Debug, Clone, Default)]
pub struct DocumentGroups {
	pub buckets: Vec<TopicBucket>,
}

impl DocumentGroups {
	pub fn bucket_of(&self, document: &DocumentId) -> Option<&TopicBucket> {
		self.buckets.iter().find(|b| b.members.contains(document))
	}
}

/// Partition documents into at most `k` topical buckets.
///
/// Documents keep their input order inside a bucket. Buckets left empty by
/// k-means are dropped and ids are renumbered densely. Identical labels get a
/// `-2`, `-3`, ... suffix in bucket order. A corpus without any usable term
/// lands in a single bucket.
pub fn group_documents(
	documents: &[(DocumentId, String)],
	k: usize,
	seed: u64,
) -> Result<DocumentGroups, PipelineError> {
	if documents.is_empty() {
		return Ok(DocumentGroups::default());
	}

	if k > documents.len() {
		ui::warn(&format!(
			"Requested {} topic groups for {} documents, using {}",
			k,
			documents.len(),
			documents.len()
		));
	}

	let texts: Vec<String> = documents.iter().map(|(_, text)| text.clone()).collect();
	let tfidf = TfIdf::fit(&texts, MAX_VOCABULARY)?;
	ui::debug(&format!(
		"TF-IDF: {} documents x {} terms",
		tfidf.n_documents(),
		tfidf.vocabulary.len()
	));

	if tfidf.vocabulary.is_empty() {
		ui::warn("No topic terms left after stopword removal, using a single group");
		let members = documents.iter().map(|(id, _)| id.clone()).collect();
		return Ok(DocumentGroups {
			buckets: vec![TopicBucket { id: 0, label: "topic_0".to_string(), members }],
		});
	}

	let fit = kmeans::fit(&tfidf.matrix, k, seed)?;

	let mut buckets = Vec::new();
	let mut used_labels = HashSet::new();

	for cluster in 0..fit.centroids.nrows() {
		let members: Vec<DocumentId> = fit
			.labels
			.iter()
			.zip(documents)
			.filter(|&(&label, _)| label == cluster)
			.map(|(_, (id, _))| id.clone())
			.collect();

		if members.is_empty() {
			continue;
		}

		let id = buckets.len();
		let centroid: Vec<f64> = fit.centroids.row(cluster).to_vec();
		let terms = tfidf.top_terms(&centroid, LABEL_TERMS);
		let base = if terms.is_empty() {
			format!("topic_{}", id)
		} else {
			terms.join("_")
		};

		let label = unique_label(&base, &mut used_labels);
		buckets.push(TopicBucket { id, label, members });
	}

	Ok(DocumentGroups { buckets })
}

fn unique_label(base: &str, used: &mut HashSet<String>) -> String {
	let mut candidate = base.to_string();
	let mut suffix = 2;
	while !used.insert(candidate.clone()) {
		candidate = format!("{}-{}", base, suffix);
		suffix += 1;
	}
	candidate
}
