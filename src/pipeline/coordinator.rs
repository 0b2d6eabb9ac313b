//! Single-slot guard: at most one run touches a workspace at a time
//!
//! The slot is a lock file at the workspace root, created exclusively. Every
//! pipeline and every process pointed at the same directory contends for the
//! same file.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::PathBuf;

use crate::error::PipelineError;
use crate::storage::Workspace;
use crate::ui;

/// Run slot of one workspace. Coordinators built for the same workspace
/// exclude each other.
#[derive(Debug, Clone)]
pub struct RunCoordinator {
	lock: PathBuf,
}

impl RunCoordinator {
	pub fn for_workspace(workspace: &Workspace) -> Self {
		Self { lock: workspace.lock_path() }
	}

	/// Claim the slot or fail with `RunInProgress`.
	pub fn try_begin(&self) -> Result<RunGuard, PipelineError> {
		if let Some(root) = self.lock.parent() {
			fs::create_dir_all(root)?;
		}

		let mut file = match OpenOptions::new().write(true).create_new(true).open(&self.lock) {
			Ok(file) => file,
			Err(e) if e.kind() == ErrorKind::AlreadyExists => {
				ui::debug(&format!(
					"Lock held: {} (remove it if no docsift process is running)",
					self.lock.display()
				));
				return Err(PipelineError::RunInProgress);
			}
			Err(e) => return Err(e.into()),
		};

		// Owner pid, for whoever finds a stale lock
		let guard = RunGuard { lock: self.lock.clone() };
		writeln!(file, "{}", std::process::id())?;
		Ok(guard)
	}

	pub fn is_running(&self) -> bool {
		self.lock.exists()
	}
}

/// Releases the slot when dropped, on every exit path.
#[derive(Debug)]
pub struct RunGuard {
	lock: PathBuf,
}

impl Drop for RunGuard {
	fn drop(&mut self) {
		let _ = fs::remove_file(&self.lock);
	}
}
