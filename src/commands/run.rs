//! Run command - full pipeline over an input directory

use std::path::Path;

use anyhow::{Context, Result};
use colored::*;

use crate::config::{PipelineConfig, SummarizerSettings, DIFFERENCES_FILE, SIMILARITIES_FILE};
use crate::models::Models;
use crate::pipeline::{GroupReport, Pipeline};
use crate::storage::Workspace;
use crate::ui;

pub fn run(input: &Path, workspace: &Path, config: PipelineConfig) -> Result<()> {
	ui::info(&format!("Input: {}", input.display()));
	ui::debug(&format!(
		"topics={}, min_cluster_size={}, mode={:?}, strict={}, seed={}",
		config.topic_count, config.min_cluster_size, config.summary_mode, config.strict_cleaning, config.seed
	));

	let settings = SummarizerSettings::from_env();
	let models = Models::load(&settings).context("Failed to load models")?;

	let workspace = Workspace::new(workspace);
	let pipeline = Pipeline::new(&models, workspace, config)?;
	let report = pipeline.run(input)?;

	if !report.skipped.is_empty() {
		eprintln!("\n{} ({} files)", "Skipped".bright_yellow(), report.skipped.len());
		for skipped in &report.skipped {
			eprintln!("  {} {}", ui::path_link(&skipped.path, 60), skipped.reason.dimmed());
		}
	}

	for group in &report.groups {
		print_group(group, pipeline.workspace());
	}

	Ok(())
}

/// Group outcome with links to its report files
pub(crate) fn print_group(group: &GroupReport, workspace: &Workspace) {
	eprintln!(
		"\n{} {} {} ({} documents)",
		"Group".bright_white(),
		group.id.to_string().bright_cyan(),
		group.label.bright_white().bold(),
		group.documents.len()
	);
	eprintln!(
		"  {}",
		format!(
			"{} paragraphs, {} clusters, {} noise",
			group.paragraphs, group.clusters, group.noise
		)
		.dimmed()
	);

	if let Some(summary) = &group.result.similarities.overall {
		eprintln!("  {}: {}", "Similarities".dimmed(), summary);
	}
	if let Some(summary) = &group.result.differences.overall {
		eprintln!("  {}: {}", "Differences".dimmed(), summary);
	}

	let dir = workspace.report_dir(group.id);
	for file in [SIMILARITIES_FILE, DIFFERENCES_FILE] {
		ui::file_written(&dir.join(file));
	}
}
