//! Workspace layout and staged, all-or-nothing writes
//!
//! ```text
//! <root>/output/registry.msgpack
//! <root>/output/texts/<hash>.txt
//! <root>/output/reports/<group id>/{similarities,differences}.txt
//! <root>/.staging/...            (in-flight run, moved into place on commit)
//! <root>/.docsift.lock           (held while a run is active)
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::config::{
	DIFFERENCES_FILE, LOCK_FILE, OUTPUT_DIR, REGISTRY_FILE, REPORTS_DIR, SIMILARITIES_FILE, STAGING_DIR, TEXTS_DIR,
};
use crate::core::ContentHash;

use super::registry::TopicRegistry;

#[derive(Debug, Clone)]
pub struct Workspace {
	root: PathBuf,
}

impl Workspace {
	pub fn new(root: impl Into<PathBuf>) -> Self {
		Self { root: root.into() }
	}

	pub fn root(&self) -> &Path {
		&self.root
	}

	pub fn output_dir(&self) -> PathBuf {
		self.root.join(OUTPUT_DIR)
	}

	pub fn registry_path(&self) -> PathBuf {
		self.output_dir().join(REGISTRY_FILE)
	}

	pub fn text_path(&self, hash: &ContentHash) -> PathBuf {
		self.output_dir().join(TEXTS_DIR).join(format!("{}.txt", hash.as_str()))
	}

	/// Reports are keyed by group id; labels only live in the registry
	pub fn report_dir(&self, group: usize) -> PathBuf {
		self.output_dir().join(report_relative(group))
	}

	pub fn lock_path(&self) -> PathBuf {
		self.root.join(LOCK_FILE)
	}

	fn staging_dir(&self) -> PathBuf {
		self.root.join(STAGING_DIR)
	}

	/// Clear previous output and any abandoned staging area
	pub fn reset(&self) -> Result<()> {
		for dir in [self.output_dir(), self.staging_dir()] {
			if dir.exists() {
				fs::remove_dir_all(&dir).with_context(|| format!("Failed to clear {}", dir.display()))?;
			}
		}
		fs::create_dir_all(&self.root).context("Failed to create workspace")?;
		Ok(())
	}

	/// Staging area that replaces the whole output directory on commit
	pub fn stage_output(&self) -> Result<Staging> {
		Staging::create(self.staging_dir(), self.output_dir())
	}

	/// Staging area that replaces one group's report directory on commit
	pub fn stage_report(&self, group: usize) -> Result<Staging> {
		Staging::create(self.staging_dir(), self.report_dir(group))
	}

	pub fn load_registry(&self) -> Result<TopicRegistry> {
		TopicRegistry::load(&self.registry_path())
	}

	pub fn load_text(&self, hash: &ContentHash) -> Result<String> {
		let path = self.text_path(hash);
		fs::read_to_string(&path).with_context(|| format!("Failed to read stored text {}", path.display()))
	}
}

/// Directory written during a run and moved onto `target` only by `commit`.
/// Dropped without commit, it is removed.
pub struct Staging {
	dir: PathBuf,
	target: PathBuf,
	committed: bool,
}

impl Staging {
	fn create(dir: PathBuf, target: PathBuf) -> Result<Self> {
		if dir.exists() {
			fs::remove_dir_all(&dir).context("Failed to clear staging area")?;
		}
		fs::create_dir_all(&dir).context("Failed to create staging area")?;
		Ok(Self { dir, target, committed: false })
	}

	pub fn write_text(&self, hash: &ContentHash, text: &str) -> Result<()> {
		let dir = self.dir.join(TEXTS_DIR);
		fs::create_dir_all(&dir)?;
		fs::write(dir.join(format!("{}.txt", hash.as_str())), text).context("Failed to write document text")
	}

	pub fn write_registry(&self, registry: &TopicRegistry) -> Result<()> {
		registry.save(&self.dir.join(REGISTRY_FILE))
	}

	/// Write both report files under `relative` (empty for a report-only stage)
	pub fn write_report(&self, relative: &Path, similarities: &str, differences: &str) -> Result<()> {
		let dir = self.dir.join(relative);
		fs::create_dir_all(&dir)?;
		fs::write(dir.join(SIMILARITIES_FILE), similarities).context("Failed to write similarities")?;
		fs::write(dir.join(DIFFERENCES_FILE), differences).context("Failed to write differences")?;
		Ok(())
	}

	pub fn commit(mut self) -> Result<()> {
		if self.target.exists() {
			fs::remove_dir_all(&self.target).context("Failed to replace previous output")?;
		}
		if let Some(parent) = self.target.parent() {
			fs::create_dir_all(parent)?;
		}
		fs::rename(&self.dir, &self.target).context("Failed to move staged output into place")?;
		self.committed = true;
		Ok(())
	}
}

impl Drop for Staging {
	fn drop(&mut self) {
		if !self.committed {
			let _ = fs::remove_dir_all(&self.dir);
		}
	}
}

/// Relative location of a group's reports inside a full-output stage
pub fn report_relative(group: usize) -> PathBuf {
	Path::new(REPORTS_DIR).join(group.to_string())
}
