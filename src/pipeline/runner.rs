//! Full runs, single-group reclustering and group listing

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::config::PipelineConfig;
use crate::core::{ContentHash, Document, DocumentId, Embedding, ExtractedText, Paragraph, ParagraphClusters};
use crate::error::{PipelineError, RunFailure};
use crate::models::Models;
use crate::processing::extract::extract;
use crate::processing::segment::reading_text;
use crate::processing::{
	cluster_embeddings, embed_paragraphs, group_documents, partition, scan_directory, segment, summarize_partition,
	Partition, SummarizedPartition,
};
use crate::storage::workspace::report_relative;
use crate::storage::{render_differences, render_similarities, DocumentRecord, TopicGroup, TopicRegistry, Workspace};
use crate::ui;

use super::coordinator::RunCoordinator;
use super::state::{RunStage, RunState};

/// A file left out of the corpus, with the reason
#[derive(Debug, Clone)]
pub struct SkippedDocument {
	pub path: PathBuf,
	pub reason: String,
}

/// Outcome for one topic group
#[derive(Debug, Clone)]
pub struct GroupReport {
	pub id: usize,
	pub label: String,
	pub documents: Vec<DocumentId>,
	pub paragraphs: usize,
	pub clusters: usize,
	pub noise: usize,
	pub result: SummarizedPartition,
}

#[derive(Debug, Clone)]
pub struct RunReport {
	pub documents: usize,
	pub skipped: Vec<SkippedDocument>,
	pub groups: Vec<GroupReport>,
	pub stage: RunStage,
}

/// Runs the clustering pipeline against one workspace.
///
/// Model handles are borrowed; they are loaded once by the caller and shared
/// across runs.
pub struct Pipeline<'m> {
	models: &'m Models,
	config: PipelineConfig,
	workspace: Workspace,
	coordinator: RunCoordinator,
}

impl<'m> Pipeline<'m> {
	pub fn new(models: &'m Models, workspace: Workspace, config: PipelineConfig) -> Result<Self, PipelineError> {
		config.validate()?;
		let coordinator = RunCoordinator::for_workspace(&workspace);
		Ok(Self {
			models,
			config,
			workspace,
			coordinator,
		})
	}

	pub fn coordinator(&self) -> &RunCoordinator {
		&self.coordinator
	}

	pub fn workspace(&self) -> &Workspace {
		&self.workspace
	}

	pub fn config(&self) -> &PipelineConfig {
		&self.config
	}

	/// Full run over every eligible file under `input`.
	///
	/// Resets the workspace, then persists the registry, document texts and
	/// one report pair per topic group. Nothing is persisted unless the run
	/// reaches `REPORTED`.
	pub fn run(&self, input: &Path) -> Result<RunReport, RunFailure> {
		let mut state = RunState::new();
		let _guard = self
			.coordinator
			.try_begin()
			.map_err(|error| RunFailure { stage: state.stage(), error })?;

		let start = Instant::now();
		match self.execute(input, &mut state) {
			Ok(report) => {
				ui::success(&format!(
					"Run finished in {:.1}s: {} documents in {} groups",
					start.elapsed().as_secs_f32(),
					report.documents,
					report.groups.len()
				));
				Ok(report)
			}
			Err(error) => {
				ui::error(&format!("Run aborted at {}: {}", state.stage(), error));
				Err(RunFailure { stage: state.stage(), error })
			}
		}
	}

	fn execute(&self, input: &Path, state: &mut RunState) -> Result<RunReport, PipelineError> {
		self.workspace.reset().map_err(workspace_error)?;

		ui::header("Ingesting documents");
		let (documents, skipped) = ingest(input)?;
		ui::success(&format!("Ingested {} documents ({} skipped)", documents.len(), skipped.len()));

		state.advance(RunStage::Grouped);
		let texts: Vec<(DocumentId, String)> = documents
			.iter()
			.map(|d| (d.id.clone(), reading_text(&d.content)))
			.collect();
		let groups = group_documents(&texts, self.config.topic_count, self.config.seed)?;
		for bucket in &groups.buckets {
			ui::info(&format!("Group {} {} ({} documents)", bucket.id, bucket.label, bucket.members.len()));
		}

		state.advance(RunStage::Segmented);
		let by_id: BTreeMap<&DocumentId, &Document> = documents.iter().map(|d| (&d.id, d)).collect();
		let segmented: Vec<Vec<Paragraph>> = groups
			.buckets
			.iter()
			.map(|bucket| {
				let members: Vec<&Document> = bucket.members.iter().filter_map(|id| by_id.get(id).copied()).collect();
				self.segment_documents(&members)
			})
			.collect();
		let total: usize = segmented.iter().map(Vec::len).sum();
		if total == 0 {
			return Err(PipelineError::EmptyCorpus);
		}
		ui::success(&format!("Segmented {} paragraphs", total));

		let results = self.analyze(segmented, state)?;

		state.advance(RunStage::Reported);
		let staging = self.workspace.stage_output().map_err(workspace_error)?;

		let mut records: BTreeMap<DocumentId, DocumentRecord> = BTreeMap::new();
		for (id, text) in &texts {
			let hash = ContentHash::of_text(text);
			staging.write_text(&hash, text).map_err(workspace_error)?;
			records.insert(id.clone(), DocumentRecord { id: id.clone(), hash });
		}

		let mut reports = Vec::with_capacity(results.len());
		let mut registry_groups = Vec::with_capacity(results.len());
		for (bucket, (clusters, result)) in groups.buckets.iter().zip(results) {
			staging
				.write_report(
					&report_relative(bucket.id),
					&render_similarities(&result),
					&render_differences(&result),
				)
				.map_err(workspace_error)?;

			registry_groups.push(TopicGroup {
				id: bucket.id,
				label: bucket.label.clone(),
				members: bucket.members.iter().filter_map(|id| records.get(id).cloned()).collect(),
			});
			reports.push(GroupReport {
				id: bucket.id,
				label: bucket.label.clone(),
				documents: bucket.members.clone(),
				paragraphs: clusters.len(),
				clusters: clusters.cluster_count(),
				noise: clusters.noise_count(),
				result,
			});
		}

		let registry = TopicRegistry::new(registry_groups, self.config.topic_count, self.config.seed);
		staging.write_registry(&registry).map_err(workspace_error)?;
		staging.commit().map_err(workspace_error)?;
		ui::success(&format!("Reports written to {}", self.workspace.output_dir().display()));

		Ok(RunReport {
			documents: documents.len(),
			skipped,
			groups: reports,
			stage: state.stage(),
		})
	}

	/// Re-run paragraph clustering and summarization for one stored group.
	///
	/// `group` is a numeric group id or a label. Only that group's report
	/// directory is replaced.
	pub fn recluster(&self, group: &str) -> Result<GroupReport, RunFailure> {
		let mut state = RunState::new();
		let _guard = self
			.coordinator
			.try_begin()
			.map_err(|error| RunFailure { stage: state.stage(), error })?;

		self.recluster_group(group, &mut state).map_err(|error| {
			ui::error(&format!("Recluster aborted at {}: {}", state.stage(), error));
			RunFailure { stage: state.stage(), error }
		})
	}

	fn recluster_group(&self, key: &str, state: &mut RunState) -> Result<GroupReport, PipelineError> {
		let registry = self.load_registry()?;
		let group = registry
			.find(key)
			.ok_or_else(|| PipelineError::GroupNotFound(key.to_string()))?;
		ui::header(&format!("Reclustering {}", group.label));

		let mut documents = Vec::with_capacity(group.members.len());
		for member in &group.members {
			let text = self.workspace.load_text(&member.hash).map_err(workspace_error)?;
			documents.push(Document::new(member.id.clone(), ExtractedText::plain(text)));
		}

		// Group membership is already fixed
		state.advance(RunStage::Segmented);
		let members: Vec<&Document> = documents.iter().collect();
		let paragraphs = self.segment_documents(&members);
		if paragraphs.is_empty() {
			return Err(PipelineError::EmptyCorpus);
		}

		let (clusters, result) = self
			.analyze(vec![paragraphs], state)?
			.pop()
			.ok_or(PipelineError::EmptyCorpus)?;

		state.advance(RunStage::Reported);
		let staging = self.workspace.stage_report(group.id).map_err(workspace_error)?;
		staging
			.write_report(Path::new(""), &render_similarities(&result), &render_differences(&result))
			.map_err(workspace_error)?;
		staging.commit().map_err(workspace_error)?;
		ui::success(&format!("Report updated: {}", self.workspace.report_dir(group.id).display()));

		Ok(GroupReport {
			id: group.id,
			label: group.label.clone(),
			documents: group.members.iter().map(|m| m.id.clone()).collect(),
			paragraphs: clusters.len(),
			clusters: clusters.cluster_count(),
			noise: clusters.noise_count(),
			result,
		})
	}

	/// Topic groups of the last completed run
	pub fn list_groups(&self) -> Result<Vec<TopicGroup>, PipelineError> {
		Ok(self.load_registry()?.groups)
	}

	fn load_registry(&self) -> Result<TopicRegistry, PipelineError> {
		let path = self.workspace.registry_path();
		if !path.exists() {
			return Err(PipelineError::Workspace(format!(
				"no topic registry at {}, run the pipeline first",
				path.display()
			)));
		}
		self.workspace.load_registry().map_err(workspace_error)
	}

	fn segment_documents(&self, documents: &[&Document]) -> Vec<Paragraph> {
		let mode = self.config.clean_mode();
		documents
			.iter()
			.flat_map(|document| {
				let paragraphs = segment(document, mode);
				ui::debug(&format!("{}: {} paragraphs", document.id, paragraphs.len()));
				paragraphs
			})
			.collect()
	}

	/// Embed, cluster, partition and summarize each group's paragraphs,
	/// stage by stage across all groups.
	fn analyze(
		&self,
		groups: Vec<Vec<Paragraph>>,
		state: &mut RunState,
	) -> Result<Vec<(ParagraphClusters, SummarizedPartition)>, PipelineError> {
		state.advance(RunStage::Embedded);
		ui::header("Embedding paragraphs");
		let embedder = self.models.embedder.as_ref();
		let embeddings: Vec<Vec<Embedding>> = groups
			.iter()
			.map(|paragraphs| embed_paragraphs(paragraphs, embedder))
			.collect::<Result<_, _>>()?;

		state.advance(RunStage::Clustered);
		ui::header("Clustering paragraphs");
		let params = self.config.cluster_params();
		let clusterer = self.models.clusterer.as_ref();
		let clustered: Vec<ParagraphClusters> = groups
			.into_iter()
			.zip(&embeddings)
			.map(|(paragraphs, vectors)| cluster_embeddings(paragraphs, vectors, clusterer, &params))
			.collect::<Result<_, _>>()?;
		for clusters in &clustered {
			ui::info(&format!(
				"{} paragraphs, {} clusters, {} noise ({:.0}%)",
				clusters.len(),
				clusters.cluster_count(),
				clusters.noise_count(),
				clusters.noise_percent()
			));
		}

		state.advance(RunStage::Partitioned);
		let partitions: Vec<Partition> = clustered.iter().map(partition).collect();
		for split in &partitions {
			ui::debug(&format!(
				"{} similar, {} different paragraphs",
				split.similarity_count(),
				split.difference_count()
			));
		}

		state.advance(RunStage::Summarized);
		ui::header("Summarizing");
		let summarizer = self.models.summarizer.as_ref();
		let mut results = Vec::with_capacity(clustered.len());
		for (clusters, split) in clustered.into_iter().zip(partitions) {
			let summarized = summarize_partition(split, summarizer, self.config.summary_mode)?;
			results.push((clusters, summarized));
		}

		Ok(results)
	}
}

/// Scan and extract. Per-file failures are logged and skipped.
fn ingest(input: &Path) -> Result<(Vec<Document>, Vec<SkippedDocument>), PipelineError> {
	let files = scan_directory(input)?;
	ui::info(&format!("Found {} eligible files", files.len()));

	let mut documents = Vec::with_capacity(files.len());
	let mut skipped = Vec::new();

	for file in files {
		let reason = match extract(&file.path) {
			Ok(Some(content)) if !content.is_blank() => {
				ui::debug(&format!("{}: {} blocks", file.id, content.blocks.len()));
				documents.push(Document::new(file.id, content));
				continue;
			}
			Ok(Some(_)) => "no extractable text".to_string(),
			Ok(None) => "unsupported format".to_string(),
			Err(e) => format!("{:#}", e),
		};

		let error = PipelineError::ExtractionFailure {
			path: file.path.clone(),
			reason: reason.clone(),
		};
		ui::warn(&error.to_string());
		skipped.push(SkippedDocument { path: file.path, reason });
	}

	if documents.is_empty() {
		return Err(PipelineError::EmptyCorpus);
	}

	Ok((documents, skipped))
}

fn workspace_error(e: anyhow::Error) -> PipelineError {
	PipelineError::Workspace(format!("{:#}", e))
}
