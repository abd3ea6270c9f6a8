//! Streaming ingestion: extract fields line by line, embed in fixed-size
//! batches, append to a [`VectorStore`] in source order.
//!
//! One embedding call is in flight at a time and a batch is appended only
//! after its call returns, so memory stays bounded by `batch_size` lines and
//! entries keep the order of the source. A failed call loses its batch and
//! aborts the pass; batches committed before it stay queryable.

use std::io::{self, BufRead};

use anyhow::anyhow;
use indicatif::ProgressBar;
use lograg_core::traits::Embedder;
use lograg_core::{Error, FieldExtractor, Metadata, Result, VectorEntry};

use crate::store::VectorStore;

/// Counters for one ingestion pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestReport {
    /// Physical lines pulled from the source, blank ones included.
    pub lines_read: usize,
    pub blank_lines_skipped: usize,
    /// Entries appended to the store by this pass.
    pub records_ingested: usize,
    /// Embedding calls issued.
    pub batches: usize,
}

pub struct BatchIngestor<'a> {
    embedder: &'a dyn Embedder,
    extractor: &'a FieldExtractor,
    batch_size: usize,
    skip_blank_lines: bool,
    progress: ProgressBar,
}

impl<'a> BatchIngestor<'a> {
    pub fn new(embedder: &'a dyn Embedder, extractor: &'a FieldExtractor, batch_size: usize) -> Result<Self> {
        if batch_size == 0 {
            return Err(Error::InvalidConfig("batch size must be greater than zero".into()));
        }
        Ok(Self { embedder, extractor, batch_size, skip_blank_lines: true, progress: ProgressBar::hidden() })
    }

    pub fn skip_blank_lines(mut self, skip: bool) -> Self {
        self.skip_blank_lines = skip;
        self
    }

    /// Report progress on `progress` (its position counts ingested lines).
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    pub fn ingest<I, S>(&self, store: &mut VectorStore, lines: I) -> Result<IngestReport>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ingest_results(store, lines.into_iter().map(|l| Ok(l.into())))
    }

    /// Ingest from a reader. Invalid UTF-8 is replaced rather than rejected.
    pub fn ingest_reader<R: BufRead>(&self, store: &mut VectorStore, reader: R) -> Result<IngestReport> {
        self.ingest_results(store, lossy_lines(reader))
    }

    pub fn ingest_results<I>(&self, store: &mut VectorStore, lines: I) -> Result<IngestReport>
    where
        I: IntoIterator<Item = io::Result<String>>,
    {
        let mut report = IngestReport::default();
        if let Err(e) = self.run(store, lines, &mut report) {
            self.progress.abandon_with_message(format!("failed after {} lines", report.records_ingested));
            return Err(e);
        }
        self.progress.finish_with_message(format!("ingested {} lines", report.records_ingested));
        tracing::info!(
            lines = report.lines_read,
            records = report.records_ingested,
            batches = report.batches,
            skipped = report.blank_lines_skipped,
            embedder = self.embedder.embedder_id(),
            "ingestion complete"
        );
        Ok(report)
    }

    fn run<I>(&self, store: &mut VectorStore, lines: I, report: &mut IngestReport) -> Result<()>
    where
        I: IntoIterator<Item = io::Result<String>>,
    {
        let mut batch: Vec<Metadata> = Vec::with_capacity(self.batch_size);
        for line in lines {
            let text = line?;
            report.lines_read += 1;
            if self.skip_blank_lines && text.trim().is_empty() {
                report.blank_lines_skipped += 1;
                continue;
            }
            let fields = self.extractor.extract(&text);
            batch.push(Metadata { line_number: report.lines_read, text, fields });
            if batch.len() >= self.batch_size { self.flush(store, &mut batch, report)?; }
        }
        if !batch.is_empty() { self.flush(store, &mut batch, report)?; }
        Ok(())
    }

    fn flush(&self, store: &mut VectorStore, batch: &mut Vec<Metadata>, report: &mut IngestReport) -> Result<()> {
        let texts: Vec<String> = batch.iter().map(|m| m.text.clone()).collect();
        report.batches += 1;
        tracing::debug!(batch = report.batches, size = texts.len(), "embedding batch");
        let embedding_error = |source| Error::Embedding { processed: report.records_ingested, source };
        let vectors = match self.embedder.embed_batch(&texts) {
            Ok(v) if v.len() == texts.len() => v,
            Ok(v) => return Err(embedding_error(anyhow!("embedder returned {} vectors for {} texts", v.len(), texts.len()))),
            Err(e) => {
                tracing::warn!(batch = report.batches, error = %e, "embedding batch failed");
                return Err(embedding_error(e));
            }
        };
        let entries: Vec<VectorEntry> = batch.drain(..).zip(vectors).map(|(metadata, vector)| VectorEntry { vector, metadata }).collect();
        let count = entries.len();
        store.append_batch(entries)?;
        report.records_ingested += count;
        self.progress.inc(count as u64);
        Ok(())
    }
}

/// Lines of `reader` with invalid UTF-8 replaced by U+FFFD; strips `\n` and `\r\n`.
pub fn lossy_lines<R: BufRead>(reader: R) -> LossyLines<R> { LossyLines { reader } }

/// `BufRead::lines` with lossy UTF-8 decoding. See [`lossy_lines`].
pub struct LossyLines<R> {
    reader: R,
}

impl<R: BufRead> Iterator for LossyLines<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut buf = Vec::new();
        match self.reader.read_until(b'\n', &mut buf) {
            Ok(0) => None,
            Ok(_) => {
                if buf.last() == Some(&b'\n') { buf.pop(); }
                if buf.last() == Some(&b'\r') { buf.pop(); }
                Some(Ok(String::from_utf8_lossy(&buf).into_owned()))
            }
            Err(e) => Some(Err(e)),
        }
    }
}
