//! Workspace persistence: topic registry, text store and reports

pub mod registry;
pub mod report;
pub mod workspace;

pub use registry::{DocumentRecord, TopicGroup, TopicRegistry};
pub use report::{render_differences, render_similarities};
pub use workspace::{Staging, Workspace};
