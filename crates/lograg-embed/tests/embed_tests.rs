use lograg_core::config::EmbeddingSettings;
use lograg_core::Error;
use lograg_embed::{get_default_embedder, HashEmbedder};
use lograg_core::traits::Embedder;

#[test]
fn hash_embedder_shapes_and_determinism() {
    let embedder = HashEmbedder::default();
    let texts = vec!["hello world".to_string(), "hello world".to_string()];
    let embs = embedder.embed_batch(&texts).expect("embed_batch");
    let v1 = &embs[0];
    let v2 = &embs[1];

    assert_eq!(v1.len(), 1024, "embedding dim is 1024");

    // Norm approximately 1.0
    let norm: f32 = v1.iter().map(|x| x * x).sum::<f32>().sqrt();
    assert!((norm - 1.0).abs() <= 1e-3, "vector is L2-normalized (norm={norm})");

    // Deterministic for same input
    for (a, b) in v1.iter().zip(v2.iter()) { assert!((a - b).abs() <= 1e-6); }
}

#[test]
fn hash_embedder_preserves_batch_order_and_size() {
    let embedder = HashEmbedder::new(64);
    let texts: Vec<String> = ["ERROR db failure", "INFO started", "", "WARN disk"].iter().map(|s| s.to_string()).collect();
    let batch = embedder.embed_batch(&texts).expect("batch");
    assert_eq!(batch.len(), texts.len());
    for (text, vector) in texts.iter().zip(&batch) {
        let single = embedder.embed_batch(std::slice::from_ref(text)).expect("single");
        assert_eq!(&single[0], vector);
        assert_eq!(vector.len(), 64);
    }
    assert!(batch[2].iter().all(|x| *x == 0.0), "no tokens embeds to zero");
    assert_eq!(embedder.dim(), Some(64));
}

#[test]
fn zero_dimension_hash_embedder_is_clamped() {
    let embedder = HashEmbedder::new(0);
    assert_eq!(embedder.dim(), Some(1));
    let embs = embedder.embed_batch(&["ERROR disk full".to_string()]).expect("embed_batch");
    assert_eq!(embs[0].len(), 1);
    assert_eq!(embedder.embedder_id(), "hash:xxh64:d1");
}

#[test]
fn hash_provider_is_selected_from_settings() {
    let settings = EmbeddingSettings { provider: "hash".into(), dimensions: Some(32), ..Default::default() };
    let embedder = get_default_embedder(&settings).expect("embedder");
    assert_eq!(embedder.dim(), Some(32));
    assert!(embedder.embedder_id().starts_with("hash:"));
}

#[test]
fn unknown_provider_is_rejected() {
    let settings = EmbeddingSettings { provider: "carrier-pigeon".into(), ..Default::default() };
    match get_default_embedder(&settings) {
        Err(Error::InvalidConfig(msg)) => assert!(msg.contains("carrier-pigeon")),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("unknown provider accepted"),
    }
}

#[test]
fn openai_provider_with_key_builds_without_network() {
    let settings = EmbeddingSettings { api_key: Some("sk-test".into()), dimensions: Some(1536), ..Default::default() };
    let embedder = get_default_embedder(&settings).expect("embedder");
    assert_eq!(embedder.embedder_id(), "openai:text-embedding-3-small");
    assert_eq!(embedder.dim(), Some(1536));
}
