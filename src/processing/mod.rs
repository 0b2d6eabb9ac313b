//! Document processing stages

pub mod cluster;
pub mod distance;
pub mod extract;
pub mod group;
pub mod kmeans;
pub mod partition;
pub mod scan;
pub mod segment;
pub mod summarize;
pub mod tfidf;

pub use cluster::{cluster_embeddings, cluster_paragraphs, embed_paragraphs, DensityClusterer, HdbscanClusterer};
pub use distance::DistanceMatrix;
pub use group::{group_documents, DocumentGroups};
pub use partition::{partition, Partition};
pub use scan::scan_directory;
pub use segment::{segment, CleanMode};
pub use summarize::{summarize_block, summarize_partition, SummarizedPartition};
