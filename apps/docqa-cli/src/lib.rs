//! docqa-cli
//!
//! Wiring shared by the `docqa` binary.
use tracing::{info, warn};

use docqa_core::config::VectorConfig;
use docqa_core::snapshot::Snapshot;
use docqa_vector::{HashEmbedder, InMemoryVectorSource};

/// Builds the vector source for `snapshot` in the `HashEmbedder` space.
///
/// Queries are embedded with `HashEmbedder`, so every chunk is re-embedded
/// with it too. Stored snapshot embeddings come from a different model and
/// are never compared against hashed queries.
pub fn vector_source(snapshot: &Snapshot, config: &VectorConfig) -> anyhow::Result<InMemoryVectorSource> {
    if !snapshot.embeddings.is_empty() {
        warn!(
            stored = snapshot.embeddings.len(),
            dim = config.dim,
            "ignoring stored snapshot embeddings; re-embedding every chunk with the hashing embedder"
        );
    }
    let embedder = HashEmbedder::new(config.dim)?;
    let ids = snapshot.corpus.iter().map(|c| c.chunk_id.clone()).collect();
    let texts: Vec<String> = snapshot.corpus.iter().map(|c| c.text.clone()).collect();
    let source = InMemoryVectorSource::from_texts(Box::new(embedder), ids, &texts, config.metric)?;
    info!(chunks = source.len(), dim = config.dim, metric = ?config.metric, "vector source ready");
    Ok(source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use docqa_core::config::DistanceMetric;
    use docqa_core::traits::VectorSimilaritySource;

    const MIXED: &str = concat!(
        r#"{"chunk_id": "law_0", "source_id": "law.pdf", "text": "景品類の定義", "embedding": [0.9, 0.1, 0.0]}"#,
        "\n",
        r#"{"chunk_id": "law_1", "source_id": "law.pdf", "text": "不当な表示の禁止", "embedding": [0.0, 0.2, 0.8]}"#,
        "\n",
        r#"{"chunk_id": "faq_0", "source_id": "faq.pdf", "text": "資金決済の目的"}"#,
        "\n",
    );

    #[test]
    fn mixed_snapshot_is_embedded_in_query_space() {
        let snapshot = Snapshot::from_reader(MIXED.as_bytes()).unwrap();
        let config = VectorConfig { metric: DistanceMetric::Cosine, dim: 32 };

        let source = vector_source(&snapshot, &config).expect("stored 3-dim vectors must not leak in");

        assert_eq!(source.len(), 3);
        for chunk in snapshot.corpus.iter() {
            let hits = source.query(&chunk.text, 3).unwrap();
            assert_eq!(hits[0].0, chunk.chunk_id, "chunk text is nearest to its own vector");
            assert!(hits[0].1.abs() < 1e-5, "{}: distance {}", chunk.chunk_id, hits[0].1);
        }
    }

    #[test]
    fn snapshot_without_embeddings_uses_configured_dim() {
        let data = r#"{"chunk_id": "a", "source_id": "s", "text": "景品類"}"#;
        let snapshot = Snapshot::from_reader(data.as_bytes()).unwrap();
        let source = vector_source(&snapshot, &VectorConfig::default()).unwrap();
        assert_eq!(source.len(), 1);
        assert_eq!(source.query("景品類", 1).unwrap()[0].0, "a");
    }

    #[test]
    fn zero_dim_is_rejected() {
        let data = r#"{"chunk_id": "a", "source_id": "s", "text": "x"}"#;
        let snapshot = Snapshot::from_reader(data.as_bytes()).unwrap();
        assert!(vector_source(&snapshot, &VectorConfig { metric: DistanceMetric::L2, dim: 0 }).is_err());
    }
}
