//! Chunked log summarization.

use std::num::NonZeroUsize;

use lograg_core::traits::Completion;
use lograg_core::{Error, Result};

pub const DEFAULT_CHUNK_SIZE: usize = 2000;

/// Consecutive slices of at most `chunk_size` characters.
pub fn split_into_chunks(text: &str, chunk_size: NonZeroUsize) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut start = 0;
    let mut count = 0;
    for (idx, _) in text.char_indices() {
        if count == chunk_size.get() {
            chunks.push(&text[start..idx]);
            start = idx;
            count = 0;
        }
        count += 1;
    }
    if start < text.len() { chunks.push(&text[start..]); }
    chunks
}

pub struct LogSummarizer<'a> {
    completion: &'a dyn Completion,
    chunk_size: NonZeroUsize,
}

impl<'a> LogSummarizer<'a> {
    pub fn new(completion: &'a dyn Completion, chunk_size: usize) -> Result<Self> {
        let chunk_size = NonZeroUsize::new(chunk_size)
            .ok_or_else(|| Error::InvalidConfig("summary chunk size must be greater than zero".into()))?;
        Ok(Self { completion, chunk_size })
    }

    /// Summarize each chunk in order; the first failure aborts.
    pub fn summarize(&self, text: &str) -> Result<String> {
        let chunks = split_into_chunks(text, self.chunk_size);
        tracing::info!(chunks = chunks.len(), chunk_size = self.chunk_size.get(), "summarizing log");
        let mut analysis = String::new();
        for (i, chunk) in chunks.iter().enumerate() {
            let prompt = format!("Summarize the following log file and identify anomalies, errors, and warnings:\n\n{chunk}");
            let summary = self.completion.complete(&prompt).map_err(Error::Generation)?;
            tracing::debug!(chunk = i + 1, "chunk summarized");
            analysis.push_str(summary.trim());
            analysis.push('\n');
        }
        Ok(analysis)
    }
}
