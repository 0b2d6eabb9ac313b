//! Paragraph segmentation and noise cleaning

use std::cmp::Ordering;
use std::sync::LazyLock;

use regex::Regex;

use crate::config::MIN_PARAGRAPH_CHARS;
use crate::core::{Document, ExtractedText, Paragraph, TextBlock};

static BLANK_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\r?\n[ \t]*\r?\n").unwrap());
static URL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\b(?:https?://|www\.)\S+").unwrap());
static EMAIL: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").unwrap());
static DOI: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"(?i)\b(?:doi:\s*)?10\.\d{4,9}/[-._;()/:A-Z0-9]+").unwrap());
static DIGIT_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\d+\b").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CleanMode {
	#[default]
	Standard,
	/// Also drops every standalone digit run
	Strict,
}

/// Split a document into cleaned paragraphs in reading order.
///
/// Paragraphs whose cleaned text is not longer than `MIN_PARAGRAPH_CHARS`
/// characters are dropped. Ordinals count retained paragraphs only.
pub fn segment(document: &Document, mode: CleanMode) -> Vec<Paragraph> {
	let text = reading_text(&document.content);

	BLANK_LINE
		.split(&text)
		.map(|raw| clean_text(raw, mode))
		.filter(|cleaned| cleaned.chars().count() > MIN_PARAGRAPH_CHARS)
		.enumerate()
		.map(|(ordinal, text)| Paragraph {
			document: document.id.clone(),
			ordinal,
			text,
		})
		.collect()
}

/// Block texts in reading order, separated by blank lines
pub fn reading_text(content: &ExtractedText) -> String {
	reading_order(&content.blocks)
		.iter()
		.map(|b| b.text.trim())
		.filter(|t| !t.is_empty())
		.collect::<Vec<_>>()
		.join("\n\n")
}

/// Order blocks by page, then top-to-bottom and left-to-right.
///
/// A page is only re-sorted when every block on it carries a position;
/// otherwise the extractor's order is kept for that page.
pub fn reading_order(blocks: &[TextBlock]) -> Vec<&TextBlock> {
	let mut ordered: Vec<&TextBlock> = blocks.iter().collect();
	ordered.sort_by_key(|b| b.page);

	let mut start = 0;
	while start < ordered.len() {
		let page = ordered[start].page;
		let end = ordered[start..]
			.iter()
			.position(|b| b.page != page)
			.map_or(ordered.len(), |offset| start + offset);

		let slice = &mut ordered[start..end];
		if slice.iter().all(|b| b.position.is_some()) {
			slice.sort_by(|a, b| compare_position(a, b));
		}
		start = end;
	}

	ordered
}

fn compare_position(a: &TextBlock, b: &TextBlock) -> Ordering {
	let (ax, ay) = a.position.unwrap_or_default();
	let (bx, by) = b.position.unwrap_or_default();
	ay.total_cmp(&by).then(ax.total_cmp(&bx))
}

/// Strip non-content noise from one paragraph.
///
/// Never produces text longer than its input.
pub fn clean_text(text: &str, mode: CleanMode) -> String {
	// Page numbers and lines of bare punctuation/digits carry no letters
	let kept: Vec<&str> = text
		.trim()
		.lines()
		.filter(|line| line.chars().any(char::is_alphabetic))
		.collect();
	let joined = kept.join("\n");

	let without_urls = URL.replace_all(&joined, "");
	let without_emails = EMAIL.replace_all(&without_urls, "");
	let without_dois = DOI.replace_all(&without_emails, "");
	let cleaned = match mode {
		CleanMode::Standard => without_dois.into_owned(),
		CleanMode::Strict => DIGIT_RUN.replace_all(&without_dois, "").into_owned(),
	};

	cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}
