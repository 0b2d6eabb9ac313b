//! Text extraction for plain text, PDF and DOCX files

use std::fs::{self, File};
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use quick_xml::events::Event;
use quick_xml::Reader;

use crate::core::{DocumentKind, ExtractedText, TextBlock};

/// Extract text blocks from a file. `Ok(None)` means the kind is unsupported.
pub fn extract(path: &Path) -> Result<Option<ExtractedText>> {
	let Some(kind) = DocumentKind::detect(path) else {
		return Ok(None);
	};

	let text = match kind {
		DocumentKind::PlainText => read_plain(path)?,
		DocumentKind::Pdf => read_pdf(path)?,
		DocumentKind::Docx => read_docx(path)?,
	};

	Ok(Some(text))
}

fn read_plain(path: &Path) -> Result<ExtractedText> {
	let bytes = fs::read(path).context("Failed to read text file")?;
	Ok(ExtractedText::plain(String::from_utf8_lossy(&bytes).trim()))
}

/// One unpositioned block per blank-line chunk of each page.
///
/// pdf-extract reports no coordinates, so PDF pages keep the extractor's
/// order and never go through positional reading-order sorting.
fn read_pdf(path: &Path) -> Result<ExtractedText> {
	// pdf-extract panics on some malformed files
	let text = std::panic::catch_unwind(|| pdf_extract::extract_text(path))
		.map_err(|_| anyhow::anyhow!("PDF parser panicked"))?
		.map_err(|e| anyhow::anyhow!("PDF extraction failed: {}", e))?;

	// Pages come back separated by form feeds
	let blocks = text
		.split('\u{c}')
		.enumerate()
		.flat_map(|(page, page_text)| {
			page_text
				.split("\n\n")
				.map(str::trim)
				.filter(|t| !t.is_empty())
				.map(move |t| TextBlock::new(page, t))
				.collect::<Vec<_>>()
		})
		.collect();

	Ok(ExtractedText { blocks })
}

fn read_docx(path: &Path) -> Result<ExtractedText> {
	let file = File::open(path).context("Failed to open docx")?;
	let mut archive = zip::ZipArchive::new(file).context("Not a docx archive")?;

	let mut xml = String::new();
	archive
		.by_name("word/document.xml")
		.context("Missing word/document.xml")?
		.read_to_string(&mut xml)
		.context("Failed to read word/document.xml")?;

	parse_document_xml(&xml)
}

/// One block per `w:p` element, in document order
pub(crate) fn parse_document_xml(xml: &str) -> Result<ExtractedText> {
	let mut reader = Reader::from_str(xml);
	let mut blocks = Vec::new();
	let mut current = String::new();
	let mut in_text = false;

	loop {
		match reader.read_event().context("Malformed document.xml")? {
			Event::Start(e) if e.name().as_ref() == b"w:t" => in_text = true,
			Event::Empty(e) => match e.name().as_ref() {
				b"w:tab" => current.push('\t'),
				b"w:br" => current.push('\n'),
				_ => {}
			},
			Event::Text(t) if in_text => current.push_str(&t.unescape()?),
			Event::End(e) => match e.name().as_ref() {
				b"w:t" => in_text = false,
				b"w:p" => {
					let text = current.trim();
					if !text.is_empty() {
						blocks.push(TextBlock::new(0, text));
					}
					current.clear();
				}
				_ => {}
			},
			Event::Eof => break,
			_ => {}
		}
	}

	Ok(ExtractedText { blocks })
}
