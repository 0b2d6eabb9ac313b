use clap::{builder::Styles, Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

use crate::config::{PipelineConfig, SummaryMode, DEFAULT_MIN_CLUSTER_SIZE, DEFAULT_SEED, DEFAULT_TOPIC_COUNT};
use crate::runtime::Provider;

fn parse_min_cluster_size(s: &str) -> Result<usize, String> {
	let val: usize = s.parse().map_err(|_| format!("'{}' is not a valid number", s))?;
	if val < 2 {
		Err(format!("min cluster size must be at least 2, got {}", val))
	} else {
		Ok(val)
	}
}

fn parse_topic_count(s: &str) -> Result<usize, String> {
	let val: usize = s.parse().map_err(|_| format!("'{}' is not a valid number", s))?;
	if val == 0 {
		Err("topic count must be at least 1".to_string())
	} else {
		Ok(val)
	}
}

fn styles() -> Styles {
	Styles::styled()
		.header(anstyle::Style::new().bold().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Blue))))
		.usage(anstyle::Style::new().bold().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Blue))))
		.literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Blue))))
		.placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))))
		.valid(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Blue))))
		.invalid(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))))
}

#[derive(Parser, Debug)]
#[command(
	name = "docsift",
	author,
	version,
	about = "Find what a set of documents agrees on and where it differs",
	styles = styles(),
	disable_help_subcommand = true,
	after_help = format!(
		"{title}
  {docsift} {run}        {run_args}   {run_desc}
  {docsift} {run}        {run_mode_args}     {run_mode_desc}
  {docsift} {groups}     {groups_args}                    {groups_desc}
  {docsift} {recluster}  {recluster_args}  {recluster_desc}",
		title = "Examples:".bright_blue().bold(),
		docsift = "docsift".bright_blue(),
		run = "run".yellow(),
		run_args = "-i ./papers/ -w ./ws -k 3",
		run_desc = "Group, cluster and summarize".dimmed(),
		run_mode_args = "-i ./papers/ -w ./ws --mode per-document",
		run_mode_desc = "One summary per document".dimmed(),
		groups = "groups".yellow(),
		groups_args = "-w ./ws",
		groups_desc = "List topic groups".dimmed(),
		recluster = "recluster".yellow(),
		recluster_args = "0 -w ./ws --min-cluster-size 3",
		recluster_desc = "Redo one group".dimmed(),
	),
)]
pub struct Cli {
	/// Enable verbose debug output
	#[arg(short = 'v', long = "verbose", global = true)]
	pub verbose: bool,

	/// Execution provider for the embedding model: auto, cpu, cuda
	#[arg(short = 'p', long = "provider", global = true, default_value = "auto")]
	pub provider: Provider,

	/// Directory holding the embedding model (overrides DOCSIFT_MODELS_DIR)
	#[arg(long = "models-dir", global = true, value_name = "DIR")]
	pub models_dir: Option<PathBuf>,

	#[command(subcommand)]
	pub command: Command,
}

/// Paragraph clustering and summary options shared by `run` and `recluster`
#[derive(clap::Args, Debug, Clone)]
pub struct AnalysisArgs {
	/// Minimum paragraphs per cluster
	#[arg(short = 'm', long = "min-cluster-size", default_value_t = DEFAULT_MIN_CLUSTER_SIZE, value_parser = parse_min_cluster_size)]
	pub min_cluster_size: usize,

	/// Summary granularity
	#[arg(long = "mode", value_enum, default_value_t = SummaryMode::Corpus)]
	pub mode: SummaryMode,

	/// Also strip every standalone number while cleaning
	#[arg(long = "strict")]
	pub strict: bool,

	/// Never collapse a group into a single cluster
	#[arg(long = "no-single-cluster")]
	pub no_single_cluster: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
	/// Run the full pipeline over a directory of documents
	Run {
		/// Directory with .txt, .pdf and .docx files
		#[arg(short = 'i', long = "input", value_name = "DIR")]
		input: PathBuf,

		/// Workspace directory (cleared and rewritten)
		#[arg(short = 'w', long = "workspace", value_name = "DIR")]
		workspace: PathBuf,

		/// Number of topic groups
		#[arg(short = 'k', long = "topics", default_value_t = DEFAULT_TOPIC_COUNT, value_parser = parse_topic_count)]
		topics: usize,

		/// Seed for topic grouping
		#[arg(long = "seed", default_value_t = DEFAULT_SEED)]
		seed: u64,

		#[command(flatten)]
		analysis: AnalysisArgs,
	},

	/// Re-cluster and re-summarize one topic group of a previous run
	Recluster {
		/// Group id or label
		#[arg(value_name = "GROUP")]
		group: String,

		/// Workspace directory of the previous run
		#[arg(short = 'w', long = "workspace", value_name = "DIR")]
		workspace: PathBuf,

		#[command(flatten)]
		analysis: AnalysisArgs,
	},

	/// List topic groups and their documents
	Groups {
		/// Workspace directory of a previous run
		#[arg(short = 'w', long = "workspace", value_name = "DIR")]
		workspace: PathBuf,
	},

	/// Show help for a subcommand
	Help {
		/// Subcommand name
		subcommand: Option<String>,
	},
}

impl AnalysisArgs {
	/// Pipeline parameters with grouping left at its defaults
	pub fn to_config(&self) -> PipelineConfig {
		PipelineConfig {
			min_cluster_size: self.min_cluster_size,
			allow_single_cluster: !self.no_single_cluster,
			summary_mode: self.mode,
			strict_cleaning: self.strict,
			..PipelineConfig::default()
		}
	}
}
