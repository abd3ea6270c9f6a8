//! Embedding providers: an OpenAI-compatible HTTP client and a deterministic
//! hashing embedder for offline use.

use lograg_core::config::EmbeddingSettings;
use lograg_core::traits::Embedder;
use lograg_core::{Error, Result};

mod hash;
mod openai;

pub use hash::HashEmbedder;
pub use openai::OpenAiEmbedder;

/// Build the embedder named by `settings.provider`.
///
/// `APP_USE_FAKE_EMBEDDINGS=1` forces the hashing embedder regardless of configuration.
pub fn get_default_embedder(settings: &EmbeddingSettings) -> Result<Box<dyn Embedder>> {
    let use_fake = std::env::var("APP_USE_FAKE_EMBEDDINGS").ok().map(|v| v == "1" || v.eq_ignore_ascii_case("true")).unwrap_or(false);
    let dim = settings.dimensions.unwrap_or(HashEmbedder::DEFAULT_DIM);
    if use_fake {
        tracing::info!(dim, "using hash embedder (APP_USE_FAKE_EMBEDDINGS)");
        return Ok(Box::new(HashEmbedder::new(dim)));
    }
    match settings.provider.as_str() {
        "openai" => {
            let embedder = OpenAiEmbedder::from_settings(settings)?;
            tracing::info!(model = %settings.model, base_url = %settings.base_url, "using OpenAI embedder");
            Ok(Box::new(embedder))
        }
        "hash" | "fake" => {
            tracing::info!(dim, "using hash embedder");
            Ok(Box::new(HashEmbedder::new(dim)))
        }
        other => Err(Error::InvalidConfig(format!("unknown embedding provider '{other}'"))),
    }
}
