use anyhow::{bail, Context, Result};
use tracing::debug;

use docqa_core::config::DistanceMetric;
use docqa_core::error::Error;
use docqa_core::traits::{Embedder, VectorSimilaritySource};
use docqa_core::types::ChunkId;

use crate::distance::distance;

/// Brute-force nearest-neighbour lookup over precomputed chunk embeddings.
///
/// The query is embedded with the same [`Embedder`] family that produced the
/// stored vectors; every stored vector is compared and the `limit` closest are
/// returned ascending by distance, ties by chunk id.
pub struct InMemoryVectorSource {
    embedder: Box<dyn Embedder>,
    entries: Vec<(ChunkId, Vec<f32>)>,
    metric: DistanceMetric,
}

impl InMemoryVectorSource {
    pub fn new(embedder: Box<dyn Embedder>, entries: Vec<(ChunkId, Vec<f32>)>, metric: DistanceMetric) -> docqa_core::error::Result<Self> {
        let dim = embedder.dim();
        if let Some((id, v)) = entries.iter().find(|(_, v)| v.len() != dim) {
            return Err(Error::InvalidConfig(format!("embedding for '{id}' has dimension {}, embedder produces {dim}", v.len())));
        }
        Ok(Self { embedder, entries, metric })
    }

    /// Embeds `texts` with this source's embedder and stores them under `ids`.
    pub fn from_texts(embedder: Box<dyn Embedder>, ids: Vec<ChunkId>, texts: &[String], metric: DistanceMetric) -> Result<Self> {
        let vectors = embedder.embed_batch(texts).context("embedding corpus")?;
        if vectors.len() != ids.len() { bail!("embedder returned {} vectors for {} chunks", vectors.len(), ids.len()); }
        Ok(Self::new(embedder, ids.into_iter().zip(vectors).collect(), metric)?)
    }

    pub fn len(&self) -> usize { self.entries.len() }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }
}

impl VectorSimilaritySource for InMemoryVectorSource {
    fn query(&self, text: &str, limit: usize) -> Result<Vec<(ChunkId, f64)>> {
        let query_vec = self
            .embedder
            .embed_batch(&[text.to_string()])?
            .pop()
            .context("embedder returned no vector for the query")?;
        if query_vec.len() != self.embedder.dim() {
            bail!("query embedding has dimension {}, expected {}", query_vec.len(), self.embedder.dim());
        }
        let mut hits: Vec<(ChunkId, f64)> = self
            .entries
            .iter()
            .map(|(id, v)| (id.clone(), f64::from(distance(self.metric, &query_vec, v))))
            .collect();
        hits.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
        hits.truncate(limit);
        debug!(returned = hits.len(), stored = self.entries.len(), "vector lookup done");
        Ok(hits)
    }
}
