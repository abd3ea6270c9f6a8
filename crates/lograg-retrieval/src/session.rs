use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use indicatif::ProgressBar;
use lograg_core::config::Settings;
use lograg_core::traits::{AnswerGenerator, Embedder};
use lograg_core::{Error, FieldExtractor, Result};
use lograg_vector::{BatchIngestor, IngestReport, Match, VectorStore};

use crate::chat::LazyOpenAiChat;
use crate::prompt::PromptAnswerGenerator;
use crate::service::{Answer, AnswerContext, RetrievalService};

/// One log session: owns the store and the collaborators that fill and
/// query it. Ingestion takes `&mut self`, queries take `&self`.
pub struct Session {
    embedder: Box<dyn Embedder>,
    generator: Box<dyn AnswerGenerator>,
    extractor: FieldExtractor,
    store: VectorStore,
    batch_size: usize,
    skip_blank_lines: bool,
}

impl Session {
    pub fn new(
        embedder: Box<dyn Embedder>,
        generator: Box<dyn AnswerGenerator>,
        extractor: FieldExtractor,
        batch_size: usize,
    ) -> Result<Self> {
        if batch_size == 0 {
            return Err(Error::InvalidConfig("batch size must be greater than zero".into()));
        }
        let store = match embedder.dim() {
            Some(dim) => VectorStore::with_dimension(dim),
            None => VectorStore::new(),
        };
        Ok(Self { embedder, generator, extractor, store, batch_size, skip_blank_lines: true })
    }

    /// Embedding provider, chat model and rule table all come from `settings`.
    /// The chat client is built on the first `ask`, so sessions used only for
    /// search need no LLM credentials.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let embedder = lograg_embed::get_default_embedder(&settings.embedding)?;
        let generator = PromptAnswerGenerator::new(LazyOpenAiChat::new(settings.llm.clone()));
        let extractor = FieldExtractor::new(&settings.rules)?;
        tracing::info!(embedder = embedder.embedder_id(), model = %settings.llm.model, "session ready");
        Ok(Self::new(embedder, Box::new(generator), extractor, settings.ingest.batch_size)?
            .skip_blank_lines(settings.ingest.skip_blank_lines))
    }

    pub fn skip_blank_lines(mut self, skip: bool) -> Self {
        self.skip_blank_lines = skip;
        self
    }

    pub fn ingest_lines<I, S>(&mut self, lines: I) -> Result<IngestReport>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with_ingestor(ProgressBar::hidden(), |ingestor, store| ingestor.ingest(store, lines))
    }

    pub fn ingest_reader<R: BufRead>(&mut self, reader: R, progress: ProgressBar) -> Result<IngestReport> {
        self.with_ingestor(progress, |ingestor, store| ingestor.ingest_reader(store, reader))
    }

    pub fn ingest_file(&mut self, path: &Path, progress: ProgressBar) -> Result<IngestReport> {
        let file = File::open(path)?;
        tracing::info!(path = %path.display(), "ingesting log file");
        self.ingest_reader(BufReader::new(file), progress)
    }

    pub fn answer(&self, question: &str) -> Result<AnswerContext> { self.retrieval().answer(question) }

    pub fn ask(&self, question: &str) -> Result<Answer> { self.retrieval().ask(question) }

    pub fn search(&self, query_text: &str, k: usize) -> Result<Vec<Match<'_>>> { self.retrieval().search(query_text, k) }

    pub fn store(&self) -> &VectorStore { &self.store }

    pub fn extractor(&self) -> &FieldExtractor { &self.extractor }

    fn with_ingestor<F>(&mut self, progress: ProgressBar, run: F) -> Result<IngestReport>
    where
        F: FnOnce(&BatchIngestor<'_>, &mut VectorStore) -> Result<IngestReport>,
    {
        let Self { embedder, extractor, store, batch_size, skip_blank_lines, .. } = self;
        let ingestor = BatchIngestor::new(embedder.as_ref(), extractor, *batch_size)?
            .skip_blank_lines(*skip_blank_lines)
            .with_progress(progress);
        run(&ingestor, store)
    }

    fn retrieval(&self) -> RetrievalService<'_> {
        RetrievalService::new(self.embedder.as_ref(), &self.store, self.generator.as_ref())
    }
}
