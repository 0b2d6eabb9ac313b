use anyhow::Result;
use clap::{CommandFactory, Parser};

use docsift::cli::{Cli, Command};
use docsift::commands;
use docsift::config;
use docsift::runtime::set_provider;
use docsift::ui::{self, Log};

fn main() -> Result<()> {
	let cli = Cli::parse();

	Log::set_verbose(cli.verbose);
	set_provider(cli.provider);
	if let Some(dir) = cli.models_dir {
		config::set_model_dir(dir);
	}

	match cli.command {
		Command::Run {
			input,
			workspace,
			topics,
			seed,
			analysis,
		} => {
			ui::print_banner();
			let config = config::PipelineConfig {
				topic_count: topics,
				seed,
				..analysis.to_config()
			};
			commands::run::run(&input, &workspace, config)
		}
		Command::Recluster {
			group,
			workspace,
			analysis,
		} => {
			ui::print_banner();
			commands::recluster::run(&group, &workspace, analysis.to_config())
		}
		Command::Groups { workspace } => commands::groups::run(&workspace),
		Command::Help { subcommand } => {
			let mut cmd = Cli::command();
			if let Some(sub) = subcommand {
				if let Some(sub_cmd) = cmd.find_subcommand_mut(&sub) {
					sub_cmd.print_help()?;
				} else {
					ui::error(&format!("Unknown subcommand: {}", sub));
					cmd.print_help()?;
				}
			} else {
				cmd.print_help()?;
			}
			Ok(())
		}
	}
}
