//! # User Interface
//!
//! Colored terminal output with clickable file links.

pub mod log;

pub use log::{debug, error, file_written, header, info, path_link, print_banner, success, warn, Log};
