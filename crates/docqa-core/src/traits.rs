//! Seams between the fuser and the signals it combines.
//!
//! The lexical scorer lives in this workspace; the vector source and the
//! embedder are usually backed by an external service and report failures
//! through `anyhow`.

use crate::error::Result;
use crate::types::{ChunkId, ScoreVector};

pub trait Embedder: Send + Sync {
    /// Embedding dimensionality.
    fn dim(&self) -> usize;
    /// Compute embeddings for a batch of input texts.
    fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>>;
}

/// Scores a query against every chunk of the corpus it was built over.
pub trait LexicalScorer: Send + Sync {
    /// Number of corpus positions covered by each score vector.
    fn corpus_len(&self) -> usize;
    /// One score per corpus position, higher is better.
    fn score(&self, query: &str) -> Result<ScoreVector>;
}

/// Dense similarity lookup, already populated with the corpus embeddings.
///
/// Returns `(chunk_id, distance)` pairs where a lower distance is closer. The
/// result may be partial; retries and timeouts belong to the implementation.
pub trait VectorSimilaritySource: Send + Sync {
    fn query(&self, text: &str, limit: usize) -> anyhow::Result<Vec<(ChunkId, f64)>>;
}
