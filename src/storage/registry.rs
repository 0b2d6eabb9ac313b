//! Topic registry: group id -> label and member documents

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::{ContentHash, DocumentId};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// A member document and the key of its stored text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
	pub id: DocumentId,
	pub hash: ContentHash,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicGroup {
	pub id: usize,
	/// Unique across the registry
	pub label: String,
	pub members: Vec<DocumentRecord>,
}

/// Result of document-level grouping for one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicRegistry {
	pub version: String,
	pub created_at: String,
	pub topic_count: usize,
	pub seed: u64,
	pub groups: Vec<TopicGroup>,
}

impl TopicRegistry {
	pub fn new(groups: Vec<TopicGroup>, topic_count: usize, seed: u64) -> Self {
		Self {
			version: VERSION.to_string(),
			created_at: chrono::Utc::now().to_rfc3339(),
			topic_count,
			seed,
			groups,
		}
	}

	/// Look up a group by numeric id or by label
	pub fn find(&self, key: &str) -> Option<&TopicGroup> {
		let key = key.trim();
		if let Ok(id) = key.parse::<usize>() {
			if let Some(group) = self.groups.iter().find(|g| g.id == id) {
				return Some(group);
			}
		}
		self.groups.iter().find(|g| g.label == key)
	}

	pub fn list(&self) -> &[TopicGroup] {
		&self.groups
	}

	pub fn document_count(&self) -> usize {
		self.groups.iter().map(|g| g.members.len()).sum()
	}

	pub fn save(&self, path: &Path) -> Result<()> {
		if let Some(parent) = path.parent() {
			fs::create_dir_all(parent).context("Failed to create registry directory")?;
		}
		let bytes = rmp_serde::to_vec(self).context("Failed to serialize registry")?;
		fs::write(path, bytes).context("Failed to write registry")?;
		Ok(())
	}

	pub fn load(path: &Path) -> Result<Self> {
		let bytes = fs::read(path).context("Failed to read registry")?;
		rmp_serde::from_slice(&bytes).context("Failed to deserialize registry")
	}
}
