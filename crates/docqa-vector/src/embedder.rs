use anyhow::{ensure, Result};
use std::hash::{Hash, Hasher};
use twox_hash::XxHash64;

use docqa_core::traits::Embedder;

/// Deterministic, L2-normalized feature-hashing embedder.
///
/// Hashes character bigrams (single characters for one-character input) into
/// `dim` buckets. Stands in for a hosted embedding model during development
/// and in tests; similar strings land close together, nothing more.
#[derive(Debug, Clone)]
pub struct HashEmbedder { dim: usize }

impl HashEmbedder {
    pub fn new(dim: usize) -> Result<Self> {
        ensure!(dim > 0, "embedding dimension must be positive");
        Ok(Self { dim })
    }

    pub fn embed_text(&self, text: &str) -> Vec<f32> {
        let chars: Vec<char> = text.chars().collect();
        let grams: Vec<&[char]> = if chars.len() < 2 { vec![&chars[..]] } else { chars.windows(2).collect() };
        let mut v = vec![0f32; self.dim];
        for (i, gram) in grams.iter().enumerate() {
            if gram.is_empty() { continue; }
            let mut hasher = XxHash64::with_seed(0);
            gram.hash(&mut hasher);
            let h = hasher.finish();
            let idx = (h % self.dim as u64) as usize;
            let val = (((h >> 32) as u32) as f32) / (u32::MAX as f32);
            v[idx] += val + (i as f32 % 3.0) * 0.01;
        }
        let norm = (v.iter().map(|x| x * x).sum::<f32>()).sqrt().max(1e-6);
        for x in &mut v { *x /= norm; }
        v
    }
}

impl Embedder for HashEmbedder {
    fn dim(&self) -> usize { self.dim }
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.embed_text(t)).collect())
    }
}
