use std::fs::{self, File};
use std::io::BufReader;

use lograg_core::traits::Embedder;
use lograg_core::FieldExtractor;
use lograg_embed::HashEmbedder;
use lograg_vector::{BatchIngestor, VectorStore};
use tempfile::TempDir;

#[test]
fn hash_embedded_log_finds_matching_line() {
    let tmp = TempDir::new().expect("tmp");
    let path = tmp.path().join("app.log");
    fs::write(
        &path,
        "2024-01-01 00:00:00,000 INFO service started on port 8080\n\
         2024-01-01 00:00:05,120 WARN cache miss ratio high\n\
         2024-01-01 00:00:09,999 ERROR database connection refused for user admin@example.com\n\
         2024-01-01 00:00:10,000 INFO request served in 12ms\n",
    )
    .expect("write log");

    let embedder = HashEmbedder::new(256);
    let extractor = FieldExtractor::with_default_rules().expect("rules");
    let mut store = VectorStore::with_dimension(256);
    let report = BatchIngestor::new(&embedder, &extractor, 3).expect("ingestor")
        .ingest_reader(&mut store, BufReader::new(File::open(&path).expect("open")))
        .expect("ingest");
    assert_eq!(report.records_ingested, 4);
    assert_eq!(report.batches, 2);

    let query = embedder.embed_batch(&["database connection refused".to_string()]).expect("embed").remove(0);
    let best = store.search(&query).expect("search").expect("match");
    assert_eq!(best.entry.metadata.line_number, 3);
    assert_eq!(best.entry.metadata.fields.get("logLevel"), Some("ERROR"));
    assert_eq!(best.entry.metadata.fields.get("email"), Some("admin@example.com"));
}
