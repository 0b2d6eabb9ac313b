//! Plain-text rendering of similarity and difference reports

use std::fmt::Write;

use crate::processing::partition::DocumentParagraphs;
use crate::processing::summarize::{SideSummary, SummarizedPartition};

pub const SIMILARITIES_TITLE: &str = "Similarities Across Documents";
pub const DIFFERENCES_TITLE: &str = "Differences Across Documents";

pub fn render_similarities(result: &SummarizedPartition) -> String {
	render_side(SIMILARITIES_TITLE, &result.partition.similarities, &result.similarities)
}

pub fn render_differences(result: &SummarizedPartition) -> String {
	render_side(DIFFERENCES_TITLE, &result.partition.differences, &result.differences)
}

/// Header, optional corpus summary, then one section per document.
pub fn render_side(title: &str, side: &DocumentParagraphs, summary: &SideSummary) -> String {
	let mut out = String::new();
	let _ = writeln!(out, "{}", title);
	let _ = writeln!(out, "{}", "=".repeat(title.chars().count()));
	let _ = writeln!(out);

	if let Some(overall) = &summary.overall {
		let _ = writeln!(out, "Summary:");
		let _ = writeln!(out, "{}", overall);
		let _ = writeln!(out);
	}

	if side.is_empty() {
		let _ = writeln!(out, "(no paragraphs)");
		return out;
	}

	for (document, paragraphs) in side {
		let heading = document.as_str();
		let _ = writeln!(out, "{}", heading);
		let _ = writeln!(out, "{}", "-".repeat(heading.chars().count().max(3)));

		if let Some(text) = summary.per_document.get(document) {
			let _ = writeln!(out, "Summary: {}", text);
			let _ = writeln!(out);
		}

		for paragraph in paragraphs {
			let _ = writeln!(out, "[{}] {}", paragraph.ordinal, paragraph.text);
		}
		let _ = writeln!(out);
	}

	out
}
