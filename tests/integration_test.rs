// Command-line tests for docsift

use std::process::Command;

use clap::Parser;
use docsift::cli::{Cli, Command as CliCommand};
use docsift::config::{SummaryMode, DEFAULT_MIN_CLUSTER_SIZE, DEFAULT_TOPIC_COUNT};
use tempfile::TempDir;

fn docsift() -> Command {
	Command::new(env!("CARGO_BIN_EXE_docsift"))
}

#[test]
fn test_version_display() {
	let output = docsift().arg("--version").output().expect("Failed to run docsift --version");

	assert!(output.status.success(), "Version command failed");
	let stdout = String::from_utf8_lossy(&output.stdout);
	assert!(stdout.contains("docsift"), "Expected 'docsift' in version output");
}

#[test]
fn test_help_display() {
	let output = docsift().arg("--help").output().expect("Failed to run docsift --help");

	assert!(output.status.success(), "Help command failed");
	let stdout = String::from_utf8_lossy(&output.stdout);
	for command in ["run", "recluster", "groups"] {
		assert!(stdout.contains(command), "Expected '{}' in help output", command);
	}
}

#[test]
fn test_groups_on_empty_workspace() {
	let workspace = TempDir::new().unwrap();
	let output = docsift()
		.args(["groups", "-w"])
		.arg(workspace.path())
		.output()
		.expect("Failed to run docsift groups");

	assert!(output.status.success(), "Groups command failed");
	let stdout = String::from_utf8_lossy(&output.stdout);
	assert!(stdout.contains("No topic groups found"));
}

#[test]
fn test_run_defaults() {
	let cli = Cli::try_parse_from(["docsift", "run", "-i", "papers", "-w", "ws"]).unwrap();
	let CliCommand::Run { input, workspace, topics, seed, analysis } = cli.command else {
		panic!("expected run command");
	};

	assert_eq!(input.to_str(), Some("papers"));
	assert_eq!(workspace.to_str(), Some("ws"));
	assert_eq!(topics, DEFAULT_TOPIC_COUNT);
	assert_eq!(seed, 42);
	assert_eq!(analysis.min_cluster_size, DEFAULT_MIN_CLUSTER_SIZE);
	assert_eq!(analysis.mode, SummaryMode::Corpus);
	assert!(!analysis.strict);

	let config = analysis.to_config();
	assert!(config.allow_single_cluster);
	assert!(config.validate().is_ok());
}

#[test]
fn test_run_options() {
	let cli = Cli::try_parse_from([
		"docsift",
		"--verbose",
		"run",
		"-i",
		"papers",
		"-w",
		"ws",
		"-k",
		"4",
		"--min-cluster-size",
		"3",
		"--mode",
		"per-document",
		"--strict",
	])
	.unwrap();

	assert!(cli.verbose);
	let CliCommand::Run { topics, analysis, .. } = cli.command else {
		panic!("expected run command");
	};
	assert_eq!(topics, 4);
	assert_eq!(analysis.min_cluster_size, 3);
	assert_eq!(analysis.mode, SummaryMode::PerDocument);
	assert!(analysis.to_config().strict_cleaning);
}

#[test]
fn test_invalid_values_are_rejected() {
	assert!(Cli::try_parse_from(["docsift", "run", "-i", "a", "-w", "b", "--min-cluster-size", "1"]).is_err());
	assert!(Cli::try_parse_from(["docsift", "run", "-i", "a", "-w", "b", "-k", "0"]).is_err());
	assert!(Cli::try_parse_from(["docsift", "run", "-w", "b"]).is_err());
}

#[test]
fn test_recluster_takes_group_key() {
	let cli = Cli::try_parse_from(["docsift", "recluster", "galaxy_redshift", "-w", "ws", "-p", "cpu"]).unwrap();
	let CliCommand::Recluster { group, .. } = cli.command else {
		panic!("expected recluster command");
	};
	assert_eq!(group, "galaxy_redshift");
}
