use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

use docqa_core::config::RetrieverConfig;
use docqa_core::error::{Error, Result};
use docqa_core::traits::{LexicalScorer, VectorSimilaritySource};
use docqa_core::types::{Corpus, RankedResult, ScoreDetail};
use docqa_text::LexicalIndex;

use crate::diversify::diversify;
use crate::filter::filter_sources;
use crate::fusion::{fuse, normalize, normalize_partial, rank_order};

/// Hybrid lexical + vector retriever over a fixed corpus.
///
/// Immutable after construction; share it across threads behind an `Arc`.
/// Several retrievers with different weights can coexist over the same corpus.
pub struct HybridRetriever {
    corpus: Corpus,
    lexical: Arc<dyn LexicalScorer>,
    vector: Arc<dyn VectorSimilaritySource>,
    config: RetrieverConfig,
}

/// Normalized signals for one query, aligned with corpus positions.
struct Signals {
    lexical: Vec<f64>,
    vector: Vec<f64>,
    degraded: bool,
}

impl HybridRetriever {
    /// Builds the character n-gram index over `corpus` and wires in `vector`.
    pub fn new(corpus: Corpus, vector: Arc<dyn VectorSimilaritySource>, config: RetrieverConfig) -> Result<Self> {
        config.validate()?;
        let lexical = LexicalIndex::build(&corpus, &config.lexical)?;
        Ok(Self { corpus, lexical: Arc::new(lexical), vector, config })
    }

    /// Uses an already built lexical scorer instead of indexing `corpus`.
    pub fn with_lexical(
        corpus: Corpus,
        lexical: Arc<dyn LexicalScorer>,
        vector: Arc<dyn VectorSimilaritySource>,
        config: RetrieverConfig,
    ) -> Result<Self> {
        config.validate()?;
        if lexical.corpus_len() != corpus.len() {
            return Err(Error::InvalidConfig(format!(
                "lexical scorer covers {} chunks, corpus has {}",
                lexical.corpus_len(),
                corpus.len()
            )));
        }
        Ok(Self { corpus, lexical, vector, config })
    }

    pub fn alpha(&self) -> f64 { self.config.alpha }

    pub fn corpus(&self) -> &Corpus { &self.corpus }

    pub fn config(&self) -> &RetrieverConfig { &self.config }

    /// Top `k` chunks by fused score using the configured weight.
    pub fn search(&self, query: &str, k: usize) -> Result<Vec<RankedResult>> {
        self.search_with_alpha(query, k, self.config.alpha)
    }

    /// Top `k` chunks with `alpha` overriding the configured weight for this call.
    pub fn search_with_alpha(&self, query: &str, k: usize, alpha: f64) -> Result<Vec<RankedResult>> {
        check_k(k, "k")?;
        check_alpha(alpha)?;
        let signals = self.signals(query)?;
        Ok(self.rank(&signals, alpha, k))
    }

    /// Best `k_per_source` chunks of every source, grouped by ascending `source_id`.
    pub fn search_diverse(&self, query: &str, k_per_source: usize) -> Result<Vec<RankedResult>> {
        check_k(k_per_source, "k_per_source")?;
        let signals = self.signals(query)?;
        let ranked = self.rank(&signals, self.config.alpha, self.corpus.len());
        let results = diversify(ranked, k_per_source);
        debug!(k_per_source, returned = results.len(), "diversified results");
        Ok(results)
    }

    /// Top `k` chunks among sources whose id contains any of `patterns`.
    ///
    /// Over-fetches `k * search_multiplier` fused results before filtering, so
    /// a narrow selection can return fewer than `k`.
    pub fn search_in_sources(&self, query: &str, k: usize, patterns: &[String]) -> Result<Vec<RankedResult>> {
        check_k(k, "k")?;
        let signals = self.signals(query)?;
        let fetch = k.saturating_mul(self.config.search_multiplier);
        let ranked = self.rank(&signals, self.config.alpha, fetch);
        let results = filter_sources(ranked, patterns, k);
        debug!(fetched = fetch.min(self.corpus.len()), kept = results.len(), patterns = patterns.len(), "source filter applied");
        Ok(results)
    }

    /// Like [`Self::search_in_sources`] with the patterns of a configured group.
    pub fn search_in_group(&self, query: &str, k: usize, group: &str) -> Result<Vec<RankedResult>> {
        let patterns = self
            .config
            .source_groups
            .get(group)
            .ok_or_else(|| Error::NotFound(format!("source group '{group}'")))?;
        self.search_in_sources(query, k, patterns)
    }

    pub fn explain(&self, query: &str, k: usize) -> Result<Vec<ScoreDetail>> {
        Ok(self.search(query, k)?.iter().map(ScoreDetail::from).collect())
    }

    /// Rankings for several weights; both signals are computed once.
    pub fn sweep(&self, query: &str, k: usize, alphas: &[f64]) -> Result<Vec<(f64, Vec<RankedResult>)>> {
        check_k(k, "k")?;
        for &alpha in alphas { check_alpha(alpha)?; }
        let signals = self.signals(query)?;
        Ok(alphas.iter().map(|&alpha| (alpha, self.rank(&signals, alpha, k))).collect())
    }

    fn signals(&self, query: &str) -> Result<Signals> {
        let started = Instant::now();
        let n = self.corpus.len();

        let raw_lexical = self.lexical.score(query)?;
        if raw_lexical.len() != n {
            return Err(Error::Index(format!("lexical scorer returned {} scores for {n} chunks", raw_lexical.len())));
        }
        if let Some(position) = raw_lexical.iter().position(|s| !s.is_finite()) {
            return Err(Error::Index(format!("lexical scorer returned a non-finite score at position {position}")));
        }
        let lexical = normalize(&raw_lexical);
        let lexical_ms = started.elapsed().as_millis();

        let (vector, degraded) = match self.vector.query(query, n) {
            Ok(hits) => (normalize_partial(&self.align_hits(hits)), false),
            Err(err) if self.config.lexical_fallback => {
                let error = format!("{err:#}");
                warn!(error = %error, "vector source failed, ranking by lexical signal only");
                (vec![0.0; n], true)
            }
            Err(err) => return Err(Error::RetrievalUnavailable(format!("{err:#}"))),
        };
        debug!(chunks = n, lexical_ms, total_ms = started.elapsed().as_millis(), degraded, "signals computed");
        Ok(Signals { lexical, vector, degraded })
    }

    /// Maps `(chunk_id, distance)` hits onto corpus positions as negated
    /// distances. Unknown ids and non-finite distances are dropped; a
    /// repeated id keeps its smallest distance.
    fn align_hits(&self, hits: Vec<(String, f64)>) -> Vec<Option<f64>> {
        let mut aligned: Vec<Option<f64>> = vec![None; self.corpus.len()];
        let total = hits.len();
        let (mut unknown, mut non_finite) = (0usize, 0usize);
        for (chunk_id, distance) in hits {
            if !distance.is_finite() {
                non_finite += 1;
                continue;
            }
            let Some(position) = self.corpus.position_of(&chunk_id) else {
                unknown += 1;
                continue;
            };
            let similarity = -distance;
            let slot = &mut aligned[position];
            if slot.map_or(true, |current| similarity > current) { *slot = Some(similarity); }
        }
        if unknown > 0 { warn!(unknown, "vector source returned ids outside the corpus"); }
        let present = aligned.iter().flatten().count();
        debug!(hits = total, present, absent = aligned.len() - present, non_finite, "vector hits aligned");
        aligned
    }

    fn rank(&self, signals: &Signals, alpha: f64, limit: usize) -> Vec<RankedResult> {
        let fused = if signals.degraded { signals.lexical.clone() } else { fuse(&signals.lexical, &signals.vector, alpha) };
        rank_order(&fused)
            .into_iter()
            .take(limit)
            .filter_map(|position| {
                let chunk = self.corpus.get(position)?.clone();
                Some(RankedResult {
                    chunk,
                    position,
                    fused_score: fused[position],
                    lexical_component: signals.lexical[position],
                    vector_component: signals.vector[position],
                    degraded: signals.degraded,
                })
            })
            .collect()
    }
}

fn check_k(k: usize, name: &str) -> Result<()> {
    if k == 0 { return Err(Error::InvalidArgument(format!("{name} must be at least 1"))); }
    Ok(())
}

fn check_alpha(alpha: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&alpha) {
        return Err(Error::InvalidArgument(format!("alpha must be within [0, 1], got {alpha}")));
    }
    Ok(())
}
