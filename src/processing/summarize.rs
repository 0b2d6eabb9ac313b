//! Summaries for the similarity and difference sides of a partition

use std::collections::BTreeMap;

use crate::config::{
	SummaryMode, MAX_SUMMARY_INPUT_CHARS, MIN_SUMMARY_CHARS, NO_SUMMARY_MARKER, SUMMARY_BEAMS,
	SUMMARY_MAX_TOKENS, SUMMARY_MIN_TOKENS, TOO_SHORT_MARKER,
};
use crate::core::DocumentId;
use crate::error::PipelineError;
use crate::models::{SummaryRequest, Summarizer};
use crate::ui;

use super::partition::{aggregate, DocumentParagraphs, Partition};

/// Summaries for one side (similarities or differences)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SideSummary {
	/// Single summary over the whole side (corpus mode)
	pub overall: Option<String>,
	/// One summary per document (per-document mode)
	pub per_document: BTreeMap<DocumentId, String>,
}

#[derive(Debug, Clone)]
pub struct SummarizedPartition {
	pub mode: SummaryMode,
	pub partition: Partition,
	pub similarities: SideSummary,
	pub differences: SideSummary,
}

/// Summarize one block of text.
///
/// Empty input yields `NO_SUMMARY_MARKER` and input shorter than
/// `MIN_SUMMARY_CHARS` yields `TOO_SHORT_MARKER`; the summarizer is not called
/// in either case. Longer input is cut to `MAX_SUMMARY_INPUT_CHARS` characters.
pub fn summarize_block(text: &str, summarizer: &dyn Summarizer) -> Result<String, PipelineError> {
	let text = text.trim();
	if text.is_empty() {
		return Ok(NO_SUMMARY_MARKER.to_string());
	}
	if text.chars().count() < MIN_SUMMARY_CHARS {
		return Ok(TOO_SHORT_MARKER.to_string());
	}

	let request = SummaryRequest {
		text: truncate_chars(text, MAX_SUMMARY_INPUT_CHARS),
		min_tokens: SUMMARY_MIN_TOKENS,
		max_tokens: SUMMARY_MAX_TOKENS,
		num_beams: SUMMARY_BEAMS,
	};

	summarizer
		.summarize(&request)
		.map_err(|e| PipelineError::SummarizationFailure(format!("{:#}", e)))
}

fn truncate_chars(text: &str, max_chars: usize) -> &str {
	match text.char_indices().nth(max_chars) {
		Some((byte_index, _)) => &text[..byte_index],
		None => text,
	}
}

/// Summarize both sides of a partition with the requested granularity.
///
/// Corpus mode always produces exactly two summaries, one per side.
pub fn summarize_partition(
	partition: Partition,
	summarizer: &dyn Summarizer,
	mode: SummaryMode,
) -> Result<SummarizedPartition, PipelineError> {
	let (similarities, differences) = match mode {
		SummaryMode::Corpus => {
			ui::debug("Summarizing similarities across documents");
			let sim = summarize_block(&aggregate(&partition.similarities), summarizer)?;
			ui::debug("Summarizing differences across documents");
			let diff = summarize_block(&aggregate(&partition.differences), summarizer)?;
			(
				SideSummary { overall: Some(sim), ..Default::default() },
				SideSummary { overall: Some(diff), ..Default::default() },
			)
		}
		SummaryMode::PerDocument => (
			summarize_each(&partition.similarities, summarizer)?,
			summarize_each(&partition.differences, summarizer)?,
		),
	};

	Ok(SummarizedPartition {
		mode,
		partition,
		similarities,
		differences,
	})
}

fn summarize_each(side: &DocumentParagraphs, summarizer: &dyn Summarizer) -> Result<SideSummary, PipelineError> {
	let mut per_document = BTreeMap::new();
	for (document, paragraphs) in side {
		ui::debug(&format!("Summarizing {} paragraphs of {}", paragraphs.len(), document));
		let text = paragraphs.iter().map(|p| p.text.as_str()).collect::<Vec<_>>().join("\n\n");
		per_document.insert(document.clone(), summarize_block(&text, summarizer)?);
	}
	Ok(SideSummary { overall: None, per_document })
}
