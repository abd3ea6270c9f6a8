use lograg_core::traits::{AnswerGenerator, Embedder};
use lograg_core::{Embedding, Error, Metadata, Result};
use lograg_vector::{Match, VectorStore};
use serde::Serialize;

/// The retrieved context for one question.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnswerContext {
    pub question: String,
    pub metadata: Metadata,
    /// Cosine similarity between the question and the retrieved line.
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Answer {
    pub context: AnswerContext,
    pub text: String,
}

/// Answers questions against one populated store.
///
/// Borrows the store immutably, so a service cannot coexist with an
/// ingestion pass over the same store.
pub struct RetrievalService<'a> {
    embedder: &'a dyn Embedder,
    store: &'a VectorStore,
    generator: &'a dyn AnswerGenerator,
}

impl<'a> RetrievalService<'a> {
    pub fn new(embedder: &'a dyn Embedder, store: &'a VectorStore, generator: &'a dyn AnswerGenerator) -> Self {
        Self { embedder, store, generator }
    }

    /// Best-matching line for `question`. Fails with [`Error::NoData`] before
    /// anything has been ingested; the question is embedded once per call.
    pub fn answer(&self, question: &str) -> Result<AnswerContext> {
        if self.store.is_empty() { return Err(Error::NoData); }
        let query = self.embed_query(question)?;
        let best = self.store.search(&query)?.ok_or(Error::NoData)?;
        tracing::debug!(line = best.entry.metadata.line_number, score = best.score, "retrieved context");
        Ok(AnswerContext { question: question.to_string(), metadata: best.entry.metadata.clone(), score: best.score })
    }

    /// [`RetrievalService::answer`], then one call to the answer generator.
    pub fn ask(&self, question: &str) -> Result<Answer> {
        let context = self.answer(question)?;
        let text = self.generator.generate(&context.metadata, &context.question).map_err(Error::Generation)?;
        Ok(Answer { context, text })
    }

    pub fn search(&self, query_text: &str, k: usize) -> Result<Vec<Match<'a>>> {
        if self.store.is_empty() { return Err(Error::NoData); }
        let query = self.embed_query(query_text)?;
        self.store.top_k(&query, k)
    }

    fn embed_query(&self, text: &str) -> Result<Embedding> {
        let embedding_error = |source| Error::Embedding { processed: 0, source };
        let mut vectors = self.embedder.embed_batch(&[text.to_string()]).map_err(embedding_error)?;
        if vectors.len() != 1 {
            return Err(embedding_error(anyhow::anyhow!("embedder returned {} vectors for one question", vectors.len())));
        }
        Ok(vectors.remove(0))
    }
}
