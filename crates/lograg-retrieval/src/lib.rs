//! Question answering over an ingested log.
//!
//! [`RetrievalService`] embeds a question, pulls the closest line out of a
//! [`lograg_vector::VectorStore`] and hands it to an answer generator.
//! [`Session`] bundles a store with its collaborators for the CLI.

pub mod chat;
pub mod prompt;
pub mod service;
pub mod session;
pub mod summary;

pub use chat::{LazyOpenAiChat, OpenAiChat};
pub use prompt::{answer_prompt, PromptAnswerGenerator};
pub use service::{Answer, AnswerContext, RetrievalService};
pub use session::Session;
pub use summary::{split_into_chunks, LogSummarizer, DEFAULT_CHUNK_SIZE};
