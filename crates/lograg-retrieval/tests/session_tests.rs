use std::io::Write;

use anyhow::Result;
use indicatif::ProgressBar;
use lograg_core::config::Config;
use lograg_core::traits::AnswerGenerator;
use lograg_core::{Error, FieldExtractor, Metadata};
use lograg_embed::HashEmbedder;
use lograg_retrieval::Session;

struct LineNumberGenerator;

impl AnswerGenerator for LineNumberGenerator {
    fn generate(&self, context: &Metadata, question: &str) -> Result<String> {
        Ok(format!("{question} -> line {}", context.line_number))
    }
}

fn session(batch_size: usize) -> lograg_core::Result<Session> {
    Session::new(
        Box::new(HashEmbedder::new(128)),
        Box::new(LineNumberGenerator),
        FieldExtractor::with_default_rules()?,
        batch_size,
    )
}

#[test]
fn store_takes_embedder_dimension() {
    let session = session(2).expect("session");
    assert_eq!(session.store().dimension(), Some(128));
    assert!(session.store().is_empty());
}

#[test]
fn zero_batch_size_is_rejected() {
    assert!(matches!(session(0), Err(Error::InvalidConfig(_))));
}

#[test]
fn questions_before_ingestion_have_no_data() {
    let session = session(2).expect("session");
    assert!(matches!(session.ask("what happened?"), Err(Error::NoData)));
}

#[test]
fn ingest_then_ask() {
    let mut session = session(2).expect("session");
    let report = session
        .ingest_lines([
            "2024-05-02 08:00:00,000 INFO service started",
            "2024-05-02 08:01:00,000 ERROR payment gateway timeout",
            "2024-05-02 08:02:00,000 INFO heartbeat",
        ])
        .expect("ingest");
    assert_eq!(report.records_ingested, 3);
    assert_eq!(report.batches, 2);

    let answer = session.ask("payment gateway timeout").expect("ask");
    assert_eq!(answer.context.metadata.line_number, 2);
    assert_eq!(answer.text, "payment gateway timeout -> line 2");
}

#[test]
fn ingest_file_reads_every_line() {
    let mut file = tempfile::NamedTempFile::new().expect("tempfile");
    writeln!(file, "2024-05-02 08:00:00,000 INFO boot").expect("write");
    writeln!(file).expect("write");
    writeln!(file, "2024-05-02 08:00:02,000 WARN low memory 1234567890").expect("write");

    let mut session = session(10).expect("session");
    let report = session.ingest_file(file.path(), ProgressBar::hidden()).expect("ingest");
    assert_eq!(report.lines_read, 3);
    assert_eq!(report.blank_lines_skipped, 1);
    assert_eq!(session.store().len(), 2);

    let last = &session.store().entries()[1].metadata;
    assert_eq!(last.line_number, 3);
    assert_eq!(last.fields.get("otherData"), Some("1234567890"));
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut session = session(2).expect("session");
    let err = session.ingest_file(&dir.path().join("absent.log"), ProgressBar::hidden()).expect_err("missing");
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn session_from_settings_with_hash_embedder() {
    let settings = Config::from_toml_str(
        r#"
        [ingest]
        batch_size = 4

        [embedding]
        provider = "hash"
        dimensions = 32

        [llm]
        api_key = "sk-test"
        "#,
    )
    .settings()
    .expect("settings");

    let mut session = Session::from_settings(&settings).expect("session");
    assert_eq!(session.store().dimension(), Some(32));
    assert_eq!(session.extractor().rules().len(), 6);
    session.ingest_lines(["INFO one", "ERROR two"]).expect("ingest");
    assert_eq!(session.search("ERROR two", 1).expect("search")[0].entry.metadata.line_number, 2);
}

#[test]
fn search_needs_no_llm_credentials() {
    let settings = Config::from_toml_str(
        r#"
        [embedding]
        provider = "hash"
        dimensions = 64
        "#,
    )
    .settings()
    .expect("settings");
    assert!(settings.llm.api_key.is_none());

    let mut session = Session::from_settings(&settings).expect("session without llm key");
    session.ingest_lines(["INFO cache warmed", "ERROR queue overflow"]).expect("ingest");
    let hits = session.search("ERROR queue overflow", 2).expect("search");
    assert_eq!(hits[0].entry.metadata.line_number, 2);
}
