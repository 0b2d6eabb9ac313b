//! Sentence embedding model (MiniLM) on ONNX Runtime

use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use ort::session::Session;
use ort::value::Value;
use tokenizers::{Tokenizer, TruncationParams};

use crate::config::{self, EMBEDDING_DIM, EMBED_MODEL, EMBED_TOKENIZER, MAX_EMBED_TOKENS};
use crate::core::Embedding;

use super::Embedder;

pub struct OnnxEmbedder {
	session: Mutex<Session>,
	tokenizer: Tokenizer,
}

impl OnnxEmbedder {
	pub fn load(model_path: &Path, tokenizer_path: &Path) -> Result<Self> {
		let session = crate::runtime::create_session(model_path).context("Failed to load embedding model")?;

		let mut tokenizer = Tokenizer::from_file(tokenizer_path)
			.map_err(|e| anyhow::anyhow!("Failed to load tokenizer: {}", e))?;
		tokenizer
			.with_truncation(Some(TruncationParams {
				max_length: MAX_EMBED_TOKENS,
				..Default::default()
			}))
			.map_err(|e| anyhow::anyhow!("Failed to configure truncation: {}", e))?;

		Ok(Self {
			session: Mutex::new(session),
			tokenizer,
		})
	}

	/// Load from the resolved models directory
	pub fn from_models_dir() -> Result<Self> {
		let model_path = config::get_embed_model_path().context(format!(
			"Embedding model not found. Ensure {} exists",
			EMBED_MODEL
		))?;
		let tokenizer_path = config::get_tokenizer_path().context(format!(
			"Tokenizer not found. Ensure {} exists",
			EMBED_TOKENIZER
		))?;

		if !model_path.exists() {
			anyhow::bail!("Embedding model file does not exist: {}", model_path.display());
		}
		if !tokenizer_path.exists() {
			anyhow::bail!("Tokenizer file does not exist: {}", tokenizer_path.display());
		}

		Self::load(&model_path, &tokenizer_path)
	}

	fn embed_one(&self, text: &str) -> Result<Embedding> {
		let encoding = self.tokenizer.encode(text, true)
			.map_err(|e| anyhow::anyhow!("Tokenization failed: {}", e))?;

		let input_ids: Vec<i64> = encoding.get_ids().iter().map(|&x| x as i64).collect();
		let attention_mask: Vec<i64> = encoding.get_attention_mask().iter().map(|&x| x as i64).collect();
		let token_type_ids: Vec<i64> = vec![0i64; input_ids.len()];
		let seq_len = input_ids.len();

		let input_ids_val = Value::from_array((vec![1, seq_len], input_ids))?;
		let attention_mask_val = Value::from_array((vec![1, seq_len], attention_mask.clone()))?;
		let token_type_ids_val = Value::from_array((vec![1, seq_len], token_type_ids))?;

		let mut session = self.session.lock().map_err(|e| anyhow::anyhow!("Session lock: {}", e))?;

		let outputs = session.run(ort::inputs![
			"input_ids" => input_ids_val,
			"attention_mask" => attention_mask_val,
			"token_type_ids" => token_type_ids_val,
		])?;

		let output = outputs
			.get("last_hidden_state")
			.or_else(|| outputs.get("sentence_embedding"))
			.context("Model output not found")?;

		let (shape, data) = output.try_extract_tensor::<f32>()?;
		let dims: Vec<usize> = shape.iter().map(|&x| x as usize).collect();

		let pooled = match dims.as_slice() {
			[1, seq, hidden] => mean_pool(data, *seq, *hidden, &attention_mask),
			[1, _hidden] => data.to_vec(),
			_ => anyhow::bail!("Unexpected output shape: {:?}", dims),
		};
		check_dimension(&pooled)?;

		Ok(Embedding::new(pooled))
	}
}

impl Embedder for OnnxEmbedder {
	fn embed(&self, texts: &[String]) -> Result<Vec<Embedding>> {
		texts
			.iter()
			.enumerate()
			.map(|(i, text)| self.embed_one(text).with_context(|| format!("paragraph {}", i)))
			.collect()
	}
}

/// Mean pooling over tokens the attention mask keeps
fn mean_pool(data: &[f32], seq_len: usize, hidden_size: usize, attention_mask: &[i64]) -> Vec<f32> {
	let mut sum = vec![0.0f32; hidden_size];
	let mut count = 0.0f32;

	for i in 0..seq_len {
		if attention_mask.get(i).copied().unwrap_or(0) == 1 {
			let offset = i * hidden_size;
			for (acc, value) in sum.iter_mut().zip(&data[offset..offset + hidden_size]) {
				*acc += value;
			}
			count += 1.0;
		}
	}

	if count > 0.0 {
		sum.iter_mut().for_each(|x| *x /= count);
	}

	sum
}

/// The paragraph clusterer compares vectors from one model only
fn check_dimension(pooled: &[f32]) -> Result<()> {
	if pooled.len() != EMBEDDING_DIM {
		anyhow::bail!("Model produced {}-dimensional vectors, expected {}", pooled.len(), EMBEDDING_DIM);
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn pooling_skips_masked_tokens() {
		let data = [1.0, 2.0, 3.0, 4.0, 100.0, 100.0];
		assert_eq!(mean_pool(&data, 3, 2, &[1, 1, 0]), vec![2.0, 3.0]);
	}

	#[test]
	fn wrong_dimension_is_rejected() {
		assert!(check_dimension(&vec![0.0; EMBEDDING_DIM]).is_ok());
		assert!(check_dimension(&[0.5; 768]).is_err());
	}
}
