//! Execution provider selection

use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

use anyhow::{Context, Result};
use ort::session::{builder::GraphOptimizationLevel, Session};

use crate::ui;

/// Execution provider for ONNX Runtime
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Provider {
	/// CUDA when available, CPU otherwise
	#[default]
	Auto,
	/// CPU only
	Cpu,
	/// NVIDIA CUDA GPU
	Cuda,
}

static SELECTED_PROVIDER: AtomicU8 = AtomicU8::new(0);
static PROVIDER_LOGGED: AtomicBool = AtomicBool::new(false);

pub fn set_provider(p: Provider) {
	let code = match p {
		Provider::Auto => 0,
		Provider::Cpu => 1,
		Provider::Cuda => 2,
	};
	SELECTED_PROVIDER.store(code, Ordering::Relaxed);
}

fn get_provider() -> Provider {
	match SELECTED_PROVIDER.load(Ordering::Relaxed) {
		1 => Provider::Cpu,
		2 => Provider::Cuda,
		_ => Provider::Auto,
	}
}

fn log_once(message: &str) {
	if !PROVIDER_LOGGED.swap(true, Ordering::Relaxed) {
		ui::info(message);
	}
}

pub fn create_session(model_path: &Path) -> Result<Session> {
	let mut builder = Session::builder().context("Failed to create session builder")?;

	match get_provider() {
		Provider::Auto => {
			if !try_cuda(&mut builder) {
				log_once("Using CPU execution provider");
			}
		}
		Provider::Cpu => log_once("Using CPU execution provider (forced)"),
		Provider::Cuda => {
			if !try_cuda(&mut builder) {
				ui::error("CUDA requested but unavailable, falling back to CPU");
			}
		}
	}

	builder
		.with_optimization_level(GraphOptimizationLevel::Level3)?
		.with_intra_threads(4)?
		.commit_from_file(model_path)
		.context("Failed to load model")
}

fn try_cuda(builder: &mut ort::session::builder::SessionBuilder) -> bool {
	use ort::ep::{ExecutionProvider, CUDA};

	ui::debug("Trying provider: CUDA");

	let provider = CUDA::default();
	if !provider.is_available().unwrap_or(false) {
		ui::debug("CUDA not available");
		return false;
	}

	match provider.register(builder) {
		Ok(_) => {
			log_once("Using CUDA execution provider");
			true
		}
		Err(e) => {
			ui::debug(&format!("CUDA registration failed: {}", e));
			false
		}
	}
}
