mod common;

use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use common::*;
use docsift::config::{PipelineConfig, SummaryMode, NO_SUMMARY_MARKER};
use docsift::models::Models;
use docsift::pipeline::{Pipeline, RunStage};
use docsift::storage::Workspace;
use docsift::PipelineError;
use tempfile::TempDir;

fn config() -> PipelineConfig {
	PipelineConfig {
		topic_count: 2,
		min_cluster_size: 2,
		..PipelineConfig::default()
	}
}

fn counting_models(calls: &Arc<AtomicUsize>) -> Models {
	Models::new(Box::new(KeywordEmbedder::new()), Box::new(CountingSummarizer(Arc::clone(calls))))
		.with_clusterer(Box::new(RadiusClusterer { radius: 0.6 }))
}

#[test]
fn empty_input_aborts_at_ingest_without_reports() {
	let input = TempDir::new().unwrap();
	write(input.path(), "photo.png", "not a document");
	let ws = TempDir::new().unwrap();

	let models = keyword_models();
	let pipeline = Pipeline::new(&models, Workspace::new(ws.path()), config()).unwrap();
	let failure = pipeline.run(input.path()).unwrap_err();

	assert_eq!(failure.stage, RunStage::Ingested);
	assert!(matches!(failure.error, PipelineError::InputNotFound(_)));
	assert!(!pipeline.workspace().output_dir().exists());
	assert!(!pipeline.coordinator().is_running());
}

#[test]
fn missing_input_directory_is_input_not_found() {
	let ws = TempDir::new().unwrap();
	let models = keyword_models();
	let pipeline = Pipeline::new(&models, Workspace::new(ws.path()), config()).unwrap();

	let failure = pipeline.run(&ws.path().join("does-not-exist")).unwrap_err();
	assert_eq!(failure.stage, RunStage::Ingested);
	assert!(matches!(failure.error, PipelineError::InputNotFound(_)));
}

#[test]
fn full_run_groups_by_topic_and_writes_reports() {
	let input = TempDir::new().unwrap();
	write_corpus(input.path());
	let ws = TempDir::new().unwrap();

	let calls = Arc::new(AtomicUsize::new(0));
	let models = counting_models(&calls);
	let pipeline = Pipeline::new(&models, Workspace::new(ws.path()), config()).unwrap();
	let report = pipeline.run(input.path()).unwrap();

	assert_eq!(report.stage, RunStage::Reported);
	assert_eq!(report.documents, 4);
	assert!(report.skipped.is_empty());
	assert_eq!(report.groups.len(), 2);

	for group in &report.groups {
		let topics: Vec<&str> = group
			.documents
			.iter()
			.map(|id| id.as_str().split('/').next().unwrap())
			.collect();
		assert_eq!(topics.len(), 2, "group {} should hold two documents", group.label);
		assert!(topics.iter().all(|t| *t == topics[0]), "mixed topics in {}", group.label);
	}

	let energy = report
		.groups
		.iter()
		.find(|g| g.documents.iter().any(|d| d.as_str() == "energy/solar.txt"))
		.unwrap();
	assert_eq!(energy.paragraphs, 5);
	assert_eq!(energy.noise, 1);
	let differences: Vec<&str> = energy
		.result
		.partition
		.differences
		.values()
		.flatten()
		.map(|p| p.text.as_str())
		.collect();
	assert_eq!(differences, vec![VIOLIN]);

	let biology = report
		.groups
		.iter()
		.find(|g| g.documents.iter().any(|d| d.as_str() == "biology/enzyme.txt"))
		.unwrap();
	assert_eq!(biology.paragraphs, 4);
	assert_eq!(biology.noise, 0);
	assert_eq!(biology.result.differences.overall.as_deref(), Some(NO_SUMMARY_MARKER));

	// energy: both sides, biology: similarities only
	assert_eq!(calls.load(Ordering::SeqCst), 3);

	for group in &report.groups {
		let dir = pipeline.workspace().report_dir(group.id);
		let similarities = fs::read_to_string(dir.join("similarities.txt")).unwrap();
		let differences = fs::read_to_string(dir.join("differences.txt")).unwrap();
		assert!(similarities.starts_with("Similarities Across Documents"));
		assert!(differences.starts_with("Differences Across Documents"));
	}

	assert!(pipeline.workspace().registry_path().exists());
	assert!(!ws.path().join(".staging").exists());
}

#[test]
fn listed_groups_match_the_run() {
	let input = TempDir::new().unwrap();
	write_corpus(input.path());
	let ws = TempDir::new().unwrap();

	let models = keyword_models();
	let pipeline = Pipeline::new(&models, Workspace::new(ws.path()), config()).unwrap();
	let report = pipeline.run(input.path()).unwrap();
	let groups = pipeline.list_groups().unwrap();

	assert_eq!(groups.len(), report.groups.len());
	for (listed, ran) in groups.iter().zip(&report.groups) {
		assert_eq!(listed.label, ran.label);
		let ids: Vec<_> = listed.members.iter().map(|m| m.id.clone()).collect();
		assert_eq!(ids, ran.documents);
		for member in &listed.members {
			assert!(pipeline.workspace().text_path(&member.hash).exists());
		}
	}
}

#[test]
fn list_groups_without_a_run_is_a_workspace_error() {
	let ws = TempDir::new().unwrap();
	let models = keyword_models();
	let pipeline = Pipeline::new(&models, Workspace::new(ws.path()), config()).unwrap();

	assert!(matches!(pipeline.list_groups(), Err(PipelineError::Workspace(_))));
}

#[test]
fn unreadable_documents_are_skipped() {
	let input = TempDir::new().unwrap();
	write_corpus(input.path());
	write(input.path(), "broken.docx", "this is not a zip archive");
	let ws = TempDir::new().unwrap();

	let models = keyword_models();
	let pipeline = Pipeline::new(&models, Workspace::new(ws.path()), config()).unwrap();
	let report = pipeline.run(input.path()).unwrap();

	assert_eq!(report.documents, 4);
	assert_eq!(report.skipped.len(), 1);
	assert!(report.skipped[0].path.ends_with("broken.docx"));
}

#[test]
fn corpus_without_long_paragraphs_is_empty() {
	let input = TempDir::new().unwrap();
	write(input.path(), "a.txt", "Too short.\n\n12\n\nStill short here.");
	write(input.path(), "b.txt", "Tiny.\n\nhttps://example.org/a/very/long/link/that/is/removed");
	let ws = TempDir::new().unwrap();

	let models = keyword_models();
	let pipeline = Pipeline::new(&models, Workspace::new(ws.path()), config()).unwrap();
	let failure = pipeline.run(input.path()).unwrap_err();

	assert_eq!(failure.stage, RunStage::Segmented);
	assert!(matches!(failure.error, PipelineError::EmptyCorpus));
	assert!(!pipeline.workspace().output_dir().exists());
}

#[test]
fn embedding_failure_persists_nothing() {
	let input = TempDir::new().unwrap();
	write_corpus(input.path());
	let ws = TempDir::new().unwrap();

	let models = Models::new(Box::new(FailingEmbedder), Box::new(RecordingSummarizer::default()));
	let pipeline = Pipeline::new(&models, Workspace::new(ws.path()), config()).unwrap();
	let failure = pipeline.run(input.path()).unwrap_err();

	assert_eq!(failure.stage, RunStage::Embedded);
	assert!(matches!(failure.error, PipelineError::EmbeddingFailure(ref m) if m.contains("model exploded")));
	assert!(!pipeline.workspace().output_dir().exists());
	assert!(!ws.path().join(".staging").exists());
	assert!(!pipeline.coordinator().is_running());
}

#[test]
fn pipelines_on_one_workspace_exclude_each_other() {
	let input = TempDir::new().unwrap();
	write_corpus(input.path());
	let ws = TempDir::new().unwrap();

	let models = keyword_models();
	let first = Pipeline::new(&models, Workspace::new(ws.path()), config()).unwrap();
	let second = Pipeline::new(&models, Workspace::new(ws.path()), config()).unwrap();

	let guard = first.coordinator().try_begin().unwrap();
	let failure = second.run(input.path()).unwrap_err();
	assert!(matches!(failure.error, PipelineError::RunInProgress));
	assert_eq!(failure.stage, RunStage::Ingested);
	assert!(matches!(
		second.recluster("0").unwrap_err().error,
		PipelineError::RunInProgress
	));

	drop(guard);
	assert!(second.run(input.path()).is_ok());
	assert!(!first.coordinator().is_running());
	assert!(!second.workspace().lock_path().exists());
}

#[test]
fn long_topic_labels_do_not_become_paths() {
	let input = TempDir::new().unwrap();
	let tokens: Vec<String> = (0..5).map(|i| format!("{}{}", "q".repeat(70), i)).collect();
	write(input.path(), "ids.txt", &tokens.join(" "));
	write(
		input.path(),
		"energy.txt",
		"Solar panels and wind turbines feed the grid through a battery bank.",
	);
	let ws = TempDir::new().unwrap();

	let models = keyword_models();
	let pipeline = Pipeline::new(&models, Workspace::new(ws.path()), config()).unwrap();
	let report = pipeline.run(input.path()).unwrap();

	assert!(report.groups.iter().any(|g| g.label.len() > 255));
	for group in &report.groups {
		let dir = pipeline.workspace().report_dir(group.id);
		assert!(dir.ends_with(group.id.to_string()));
		assert!(dir.join("similarities.txt").exists());
	}

	let listed = pipeline.list_groups().unwrap();
	assert!(listed.iter().any(|g| g.label.len() > 255));
}

#[test]
fn recluster_rewrites_one_group() {
	let input = TempDir::new().unwrap();
	write_corpus(input.path());
	let ws = TempDir::new().unwrap();

	let models = keyword_models();
	let pipeline = Pipeline::new(&models, Workspace::new(ws.path()), config()).unwrap();
	let report = pipeline.run(input.path()).unwrap();
	let first = &report.groups[0];

	let per_document = PipelineConfig {
		summary_mode: SummaryMode::PerDocument,
		..config()
	};
	let again = Pipeline::new(&models, Workspace::new(ws.path()), per_document).unwrap();

	let by_label = again.recluster(&first.label).unwrap();
	assert_eq!(by_label.id, first.id);
	assert_eq!(by_label.documents, first.documents);
	assert_eq!(by_label.paragraphs, first.paragraphs);
	assert!(by_label.result.similarities.overall.is_none());

	let by_id = again.recluster(&first.id.to_string()).unwrap();
	assert_eq!(by_id.label, first.label);

	let similarities =
		fs::read_to_string(again.workspace().report_dir(first.id).join("similarities.txt")).unwrap();
	assert!(similarities.contains("Summary: summary of"));
}

#[test]
fn recluster_unknown_group_fails() {
	let input = TempDir::new().unwrap();
	write_corpus(input.path());
	let ws = TempDir::new().unwrap();

	let models = keyword_models();
	let pipeline = Pipeline::new(&models, Workspace::new(ws.path()), config()).unwrap();
	pipeline.run(input.path()).unwrap();

	let failure = pipeline.recluster("no-such-group").unwrap_err();
	assert!(matches!(failure.error, PipelineError::GroupNotFound(ref g) if g == "no-such-group"));
}

#[test]
fn invalid_config_is_rejected() {
	let ws = TempDir::new().unwrap();
	let models = keyword_models();
	let bad = PipelineConfig {
		min_cluster_size: 1,
		..PipelineConfig::default()
	};

	assert!(matches!(
		Pipeline::new(&models, Workspace::new(ws.path()), bad),
		Err(PipelineError::InvalidConfig(_))
	));
}
