mod common;

use std::collections::BTreeMap;

use common::RecordingSummarizer;
use docsift::config::{SummaryMode, MAX_SUMMARY_INPUT_CHARS, NO_SUMMARY_MARKER, TOO_SHORT_MARKER};
use docsift::core::{DocumentId, Paragraph};
use docsift::processing::{summarize_block, summarize_partition, Partition};

/// Build one side from (document, text) pairs, ordinals counted per document
fn side(entries: &[(&str, &str)]) -> BTreeMap<DocumentId, Vec<Paragraph>> {
	let mut side: BTreeMap<DocumentId, Vec<Paragraph>> = BTreeMap::new();
	for (doc, text) in entries {
		let list = side.entry(DocumentId::new(doc)).or_default();
		list.push(Paragraph {
			document: DocumentId::new(doc),
			ordinal: list.len(),
			text: text.to_string(),
		});
	}
	side
}

const LONG_A: &str = "The harbour authority expanded the northern pier to handle larger cargo vessels.";
const LONG_B: &str = "Container traffic through the port doubled within three years of the expansion.";

#[test]
fn empty_text_returns_marker_without_calling_summarizer() {
	let summarizer = RecordingSummarizer::default();
	assert_eq!(summarize_block("", &summarizer).unwrap(), NO_SUMMARY_MARKER);
	assert_eq!(summarize_block("   \n\n ", &summarizer).unwrap(), NO_SUMMARY_MARKER);
	assert_eq!(summarizer.calls(), 0);
}

#[test]
fn short_text_returns_marker_without_calling_summarizer() {
	let summarizer = RecordingSummarizer::default();
	assert_eq!(summarize_block("A short note about ports.", &summarizer).unwrap(), TOO_SHORT_MARKER);
	assert_eq!(summarizer.calls(), 0);
}

#[test]
fn long_input_is_truncated_before_summarizing() {
	let summarizer = RecordingSummarizer::default();
	let text = "ä".repeat(MAX_SUMMARY_INPUT_CHARS + 500);

	let summary = summarize_block(&text, &summarizer).unwrap();
	assert_eq!(summary, format!("summary of {} chars", MAX_SUMMARY_INPUT_CHARS));
	assert_eq!(summarizer.calls(), 1);
}

#[test]
fn corpus_mode_produces_exactly_two_summaries() {
	let summarizer = RecordingSummarizer::default();
	let partition = Partition {
		similarities: side(&[("a.txt", LONG_A), ("b.txt", LONG_B)]),
		differences: side(&[("c.txt", LONG_B), ("c.txt", LONG_A)]),
	};

	let result = summarize_partition(partition, &summarizer, SummaryMode::Corpus).unwrap();

	assert_eq!(summarizer.calls(), 2);
	assert!(result.similarities.overall.is_some());
	assert!(result.differences.overall.is_some());
	assert!(result.similarities.per_document.is_empty());

	let requests = summarizer.requests.lock().unwrap();
	assert_eq!(requests[0], format!("{}\n\n{}", LONG_A, LONG_B));
	assert_eq!(requests[1], format!("{}\n\n{}", LONG_B, LONG_A));
}

#[test]
fn corpus_mode_with_no_differences_uses_marker() {
	let summarizer = RecordingSummarizer::default();
	let partition = Partition {
		similarities: side(&[("a.txt", LONG_A)]),
		differences: BTreeMap::new(),
	};

	let result = summarize_partition(partition, &summarizer, SummaryMode::Corpus).unwrap();

	assert_eq!(summarizer.calls(), 1);
	assert_eq!(result.differences.overall.as_deref(), Some(NO_SUMMARY_MARKER));
}

#[test]
fn per_document_mode_summarizes_each_document() {
	let summarizer = RecordingSummarizer::default();
	let partition = Partition {
		similarities: side(&[("a.txt", LONG_A), ("b.txt", "Too short to matter here.")]),
		differences: side(&[("a.txt", LONG_B)]),
	};

	let result = summarize_partition(partition, &summarizer, SummaryMode::PerDocument).unwrap();

	assert_eq!(summarizer.calls(), 2);
	assert!(result.similarities.overall.is_none());
	assert_eq!(result.similarities.per_document.len(), 2);
	assert_eq!(
		result.similarities.per_document[&DocumentId::new("b.txt")],
		TOO_SHORT_MARKER
	);
	assert_eq!(result.differences.per_document.len(), 1);
}
