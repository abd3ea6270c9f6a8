use crate::types::Metadata;

/// Maps texts to fixed-length vectors, one per input, in input order.
pub trait Embedder: Send + Sync {
    /// Stable identifier for the provider/model (e.g. `openai:text-embedding-3-small`).
    fn embedder_id(&self) -> &str;
    /// Output dimensionality when known up front; `None` lets the first
    /// returned vector decide.
    fn dim(&self) -> Option<usize>;
    fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>>;
}

/// A single prompt-in, text-out language model call.
pub trait Completion: Send + Sync {
    fn complete(&self, prompt: &str) -> anyhow::Result<String>;
}

/// Turns retrieved log context plus a question into a natural-language answer.
pub trait AnswerGenerator: Send + Sync {
    fn generate(&self, context: &Metadata, question: &str) -> anyhow::Result<String>;
}
