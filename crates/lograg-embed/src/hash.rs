use std::hash::{Hash, Hasher};

use anyhow::Result;
use lograg_core::traits::Embedder;
use twox_hash::XxHash64;

/// Deterministic bag-of-tokens embedder.
///
/// Each whitespace token is hashed into one of `dim` buckets and the result
/// is L2-normalized. Lines that share tokens land close together, which is
/// enough for offline runs and tests; it carries no semantics beyond that.
/// Text without tokens embeds to the zero vector.
pub struct HashEmbedder {
    dim: usize,
    id: String,
}

impl HashEmbedder {
    pub const DEFAULT_DIM: usize = 1024;

    /// `dim` is clamped to at least 1.
    pub fn new(dim: usize) -> Self {
        let dim = dim.max(1);
        Self { dim, id: format!("hash:xxh64:d{dim}") }
    }

    fn embed_one(&self, text: &str) -> Vec<f32> {
        let mut v = vec![0f32; self.dim];
        for (i, token) in text.split_whitespace().enumerate() {
            let mut hasher = XxHash64::with_seed(0);
            token.hash(&mut hasher);
            let h = hasher.finish();
            let idx = (h as usize) % self.dim;
            let val = (((h >> 32) as u32) as f32) / (u32::MAX as f32);
            v[idx] += val + (i as f32 % 3.0) * 0.01;
        }
        let norm = (v.iter().map(|x| x * x).sum::<f32>()).sqrt().max(1e-6);
        for x in &mut v { *x /= norm; }
        v
    }
}

impl Default for HashEmbedder {
    fn default() -> Self { Self::new(Self::DEFAULT_DIM) }
}

impl Embedder for HashEmbedder {
    fn embedder_id(&self) -> &str { &self.id }
    fn dim(&self) -> Option<usize> { Some(self.dim) }
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.embed_one(t)).collect())
    }
}
