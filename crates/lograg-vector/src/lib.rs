//! Session-scoped vector storage and the batched embedding pipeline that fills it.

pub mod ingest;
pub mod store;

pub use ingest::{lossy_lines, BatchIngestor, IngestReport, LossyLines};
pub use store::{cosine_similarity, Match, VectorStore};
