//! # Command Implementations
//!
//! Each submodule handles one CLI command (run, recluster, groups).

pub mod groups;
pub mod recluster;
pub mod run;
