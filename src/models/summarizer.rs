//! Abstractive summarization over HTTP
//!
//! Two wire formats are supported: Ollama's `/api/generate` and the Hugging
//! Face summarization task (`{"inputs", "parameters"}` in, `[{"summary_text"}]`
//! out). Both clients are blocking; the pipeline waits on them.

use anyhow::Result;
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

use crate::config::{SummarizerBackend, SummarizerSettings};

/// Errors surfaced by a summarization provider.
#[derive(Debug, Error)]
pub enum SummarizerError {
	#[error("Summarization provider unavailable: {0}")]
	ProviderUnavailable(String),
	#[error("Failed to generate summary: {0}")]
	GenerationFailed(String),
	#[error("Malformed provider response: {0}")]
	InvalidResponse(String),
}

/// Text to condense plus the decoding budget
#[derive(Debug, Clone)]
pub struct SummaryRequest<'a> {
	pub text: &'a str,
	pub min_tokens: usize,
	pub max_tokens: usize,
	pub num_beams: usize,
}

/// Condenses text into an abstractive summary. The result is opaque.
pub trait Summarizer: Send + Sync {
	fn summarize(&self, request: &SummaryRequest<'_>) -> Result<String>;
}

/// Build the configured HTTP summarizer
pub fn from_settings(settings: &SummarizerSettings) -> Result<Box<dyn Summarizer>> {
	Ok(match settings.backend {
		SummarizerBackend::Ollama => Box::new(OllamaSummarizer::new(&settings.url, &settings.model)?),
		SummarizerBackend::HuggingFace => {
			Box::new(HuggingFaceSummarizer::new(&settings.url, settings.api_token.clone())?)
		}
	})
}

fn http_client() -> Result<Client> {
	Client::builder()
		.user_agent(concat!("docsift/", env!("CARGO_PKG_VERSION")))
		.build()
		.map_err(|e| anyhow::anyhow!("Failed to construct HTTP client: {}", e))
}

fn unavailable(url: &str, error: reqwest::Error) -> SummarizerError {
	SummarizerError::ProviderUnavailable(format!("failed to reach {}: {}", url, error))
}

pub struct OllamaSummarizer {
	http: Client,
	base_url: String,
	model: String,
}

#[derive(Debug, Deserialize)]
struct OllamaResponse {
	response: String,
	done: bool,
}

impl OllamaSummarizer {
	pub fn new(base_url: &str, model: &str) -> Result<Self> {
		Ok(Self {
			http: http_client()?,
			base_url: base_url.to_string(),
			model: model.to_string(),
		})
	}

	fn endpoint(&self) -> String {
		format!("{}/api/generate", self.base_url.trim_end_matches('/'))
	}
}

fn ollama_prompt(request: &SummaryRequest<'_>) -> String {
	// Roughly three words per four tokens
	let min_words = request.min_tokens * 3 / 4;
	let max_words = request.max_tokens * 3 / 4;
	format!(
		"Write a detailed, coherent summary of the following text in {} to {} words. \
		 Reply with the summary only.\n\n{}",
		min_words, max_words, request.text
	)
}

impl Summarizer for OllamaSummarizer {
	fn summarize(&self, request: &SummaryRequest<'_>) -> Result<String> {
		// Ollama has no beam search; greedy decoding keeps output stable
		let payload = json!({
			"model": self.model,
			"prompt": ollama_prompt(request),
			"stream": false,
			"options": {
				"temperature": 0.0,
				"top_k": 1,
				"num_predict": request.max_tokens,
			}
		});

		let response = self
			.http
			.post(self.endpoint())
			.json(&payload)
			.send()
			.map_err(|e| unavailable(&self.base_url, e))?;

		if response.status() == StatusCode::NOT_FOUND {
			return Err(SummarizerError::ProviderUnavailable(format!(
				"Ollama endpoint {} returned 404",
				self.endpoint()
			))
			.into());
		}

		if !response.status().is_success() {
			let status = response.status();
			let body = response.text().unwrap_or_default();
			return Err(SummarizerError::GenerationFailed(format!("Ollama returned {}: {}", status, body)).into());
		}

		let body: OllamaResponse = response
			.json()
			.map_err(|e| SummarizerError::InvalidResponse(format!("failed to decode Ollama response: {}", e)))?;

		if !body.done {
			return Err(SummarizerError::InvalidResponse("Ollama response incomplete".into()).into());
		}

		Ok(body.response.trim().to_string())
	}
}

pub struct HuggingFaceSummarizer {
	http: Client,
	url: String,
	token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct HfSummary {
	summary_text: String,
}

impl HuggingFaceSummarizer {
	pub fn new(url: &str, token: Option<String>) -> Result<Self> {
		Ok(Self {
			http: http_client()?,
			url: url.to_string(),
			token,
		})
	}
}

impl Summarizer for HuggingFaceSummarizer {
	fn summarize(&self, request: &SummaryRequest<'_>) -> Result<String> {
		let payload = json!({
			"inputs": request.text,
			"parameters": {
				"min_length": request.min_tokens,
				"max_length": request.max_tokens,
				"num_beams": request.num_beams,
				"early_stopping": true,
				"no_repeat_ngram_size": 3,
				"do_sample": false,
			},
			"options": { "wait_for_model": true }
		});

		let mut call = self.http.post(&self.url).json(&payload);
		if let Some(token) = &self.token {
			call = call.bearer_auth(token);
		}

		let response = call.send().map_err(|e| unavailable(&self.url, e))?;

		if !response.status().is_success() {
			let status = response.status();
			let body = response.text().unwrap_or_default();
			return Err(SummarizerError::GenerationFailed(format!("endpoint returned {}: {}", status, body)).into());
		}

		let body: Vec<HfSummary> = response
			.json()
			.map_err(|e| SummarizerError::InvalidResponse(format!("failed to decode summary: {}", e)))?;

		body.into_iter()
			.next()
			.map(|s| s.summary_text.trim().to_string())
			.ok_or_else(|| SummarizerError::InvalidResponse("empty summary list".into()).into())
	}
}
