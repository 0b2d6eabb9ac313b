//! Input discovery for eligible documents

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::core::{DocumentId, DocumentKind};
use crate::error::PipelineError;
use crate::ui;

const IGNORE_FILE: &str = ".docsiftignore";

fn load_ignore_patterns(dir: &Path) -> Vec<String> {
	let Ok(file) = File::open(dir.join(IGNORE_FILE)) else {
		return Vec::new();
	};

	BufReader::new(file)
		.lines()
		.map_while(|line| line.ok())
		.map(|line| line.trim().to_string())
		.filter(|line| !line.is_empty() && !line.starts_with('#'))
		.collect()
}

fn is_ignored(relative: &str, patterns: &[String]) -> bool {
	let lower = relative.to_lowercase();
	patterns.iter().any(|pattern| lower.contains(&pattern.to_lowercase()))
}

/// A file the normalizer knows how to read
#[derive(Debug, Clone)]
pub struct InputFile {
	pub id: DocumentId,
	pub path: PathBuf,
	pub kind: DocumentKind,
}

/// Walk `root` recursively and collect supported files, sorted by path.
///
/// Fails with `InputNotFound` when the root is missing or holds no eligible file.
pub fn scan_directory(root: &Path) -> Result<Vec<InputFile>, PipelineError> {
	if !root.is_dir() {
		return Err(PipelineError::InputNotFound(root.to_path_buf()));
	}

	let patterns = load_ignore_patterns(root);
	let mut files = Vec::new();
	let mut skipped = 0;

	for entry in WalkDir::new(root).sort_by_file_name().into_iter().filter_map(|e| e.ok()) {
		if !entry.file_type().is_file() {
			continue;
		}

		let path = entry.path();
		let Some(kind) = DocumentKind::detect(path) else {
			skipped += 1;
			continue;
		};

		let relative = relative_id(root, path);
		if is_ignored(&relative, &patterns) {
			ui::debug(&format!("Ignored: {}", relative));
			continue;
		}

		files.push(InputFile {
			id: DocumentId::new(relative),
			path: path.to_path_buf(),
			kind,
		});
	}

	if skipped > 0 {
		ui::debug(&format!("Skipped {} unsupported files", skipped));
	}

	if files.is_empty() {
		return Err(PipelineError::InputNotFound(root.to_path_buf()));
	}

	files.sort_by(|a, b| a.id.cmp(&b.id));
	Ok(files)
}

fn relative_id(root: &Path, path: &Path) -> String {
	let relative = path.strip_prefix(root).unwrap_or(path);
	relative
		.components()
		.map(|c| c.as_os_str().to_string_lossy())
		.collect::<Vec<_>>()
		.join("/")
}
