//! Recluster command - redo paragraph analysis for one topic group

use std::path::Path;

use anyhow::{Context, Result};

use crate::config::{PipelineConfig, SummarizerSettings};
use crate::models::Models;
use crate::pipeline::Pipeline;
use crate::storage::Workspace;
use crate::ui;

use super::run::print_group;

pub fn run(group: &str, workspace: &Path, config: PipelineConfig) -> Result<()> {
	ui::info(&format!("Workspace: {}", ui::path_link(workspace, 40)));

	let settings = SummarizerSettings::from_env();
	let models = Models::load(&settings).context("Failed to load models")?;

	let pipeline = Pipeline::new(&models, Workspace::new(workspace), config)?;
	let report = pipeline.recluster(group)?;

	print_group(&report, pipeline.workspace());
	Ok(())
}
