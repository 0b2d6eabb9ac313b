//! Groups command - list topic groups of the last run

use std::path::Path;

use anyhow::{Context, Result};
use colored::*;

use crate::storage::Workspace;
use crate::ui;

pub fn run(workspace: &Path) -> Result<()> {
	let workspace = Workspace::new(workspace);
	let registry_path = workspace.registry_path();

	if !registry_path.exists() {
		ui::warn("No topic groups found. Run 'docsift run' first");
		return Ok(());
	}

	let registry = workspace.load_registry().context("Failed to load topic registry")?;
	ui::success(&format!(
		"{} groups, {} documents",
		registry.list().len(),
		registry.document_count()
	));
	ui::debug(&format!(
		"Created {} by v{} (k={}, seed={})",
		registry.created_at, registry.version, registry.topic_count, registry.seed
	));

	for group in registry.list() {
		eprintln!(
			"\n{} {} ({} documents)",
			group.id.to_string().bright_cyan(),
			group.label.bright_white().bold(),
			group.members.len()
		);
		for member in &group.members {
			eprintln!("  {} {}", member.id, member.hash.short().dimmed());
		}
	}

	Ok(())
}
