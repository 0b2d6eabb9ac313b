//! Documents, extracted text blocks and paragraphs

use std::fmt;

use serde::{Deserialize, Serialize};

/// Document identity: path relative to the input root, `/`-separated
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DocumentId(String);

impl DocumentId {
	pub fn new(id: impl AsRef<str>) -> Self {
		Self(id.as_ref().to_string())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for DocumentId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// One positioned run of text as produced by a text extractor
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
	pub page: usize,
	/// (x, y) of the block's top-left corner, when the format exposes it
	pub position: Option<(f32, f32)>,
	pub text: String,
}

impl TextBlock {
	pub fn new(page: usize, text: impl Into<String>) -> Self {
		Self { page, position: None, text: text.into() }
	}

	pub fn positioned(page: usize, x: f32, y: f32, text: impl Into<String>) -> Self {
		Self { page, position: Some((x, y)), text: text.into() }
	}
}

/// Normalizer output for one file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedText {
	pub blocks: Vec<TextBlock>,
}

impl ExtractedText {
	/// Single unpositioned block
	pub fn plain(text: impl Into<String>) -> Self {
		Self { blocks: vec![TextBlock::new(0, text)] }
	}

	pub fn is_blank(&self) -> bool {
		self.blocks.iter().all(|b| b.text.trim().is_empty())
	}
}

/// An ingested document. Immutable for the rest of the run.
#[derive(Debug, Clone)]
pub struct Document {
	pub id: DocumentId,
	pub content: ExtractedText,
}

impl Document {
	pub fn new(id: DocumentId, content: ExtractedText) -> Self {
		Self { id, content }
	}
}

/// Paragraph identity within a run
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ParagraphKey {
	pub document: DocumentId,
	pub ordinal: usize,
}

/// Cleaned paragraph with a back-reference to its document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paragraph {
	pub document: DocumentId,
	/// Position among the document's retained paragraphs
	pub ordinal: usize,
	pub text: String,
}

impl Paragraph {
	pub fn key(&self) -> ParagraphKey {
		ParagraphKey { document: self.document.clone(), ordinal: self.ordinal }
	}
}
