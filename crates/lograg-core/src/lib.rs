//! Shared building blocks for log retrieval: domain types, the rule-driven
//! field extractor, collaborator traits, errors and configuration.

pub mod config;
pub mod error;
pub mod extract;
pub mod traits;
pub mod types;

pub use error::{Error, Result};
pub use extract::{FieldExtractor, FieldRule};
pub use types::{Embedding, Metadata, Record, VectorEntry};
