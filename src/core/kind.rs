//! Document kind detection

use std::path::Path;

use crate::config::{DOCX_EXTENSIONS, PDF_EXTENSIONS, TEXT_EXTENSIONS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
	PlainText,
	Pdf,
	Docx,
}

impl DocumentKind {
	/// Detect document kind from file extension
	pub fn detect(path: &Path) -> Option<Self> {
		let ext = path.extension()?.to_str()?;

		if TEXT_EXTENSIONS.iter().any(|e| e.eq_ignore_ascii_case(ext)) {
			Some(DocumentKind::PlainText)
		} else if PDF_EXTENSIONS.iter().any(|e| e.eq_ignore_ascii_case(ext)) {
			Some(DocumentKind::Pdf)
		} else if DOCX_EXTENSIONS.iter().any(|e| e.eq_ignore_ascii_case(ext)) {
			Some(DocumentKind::Docx)
		} else {
			None
		}
	}
}
