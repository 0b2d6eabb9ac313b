//! Core domain types

pub mod cluster;
pub mod document;
pub mod embedding;
pub mod hash;
pub mod kind;

pub use cluster::{ClusterId, ClusterParams, ParagraphClusters, NOISE};
pub use document::{Document, DocumentId, ExtractedText, Paragraph, ParagraphKey, TextBlock};
pub use embedding::Embedding;
pub use hash::ContentHash;
pub use kind::DocumentKind;
