//! Per-source capping of a fused ranking.
use std::collections::BTreeMap;

use docqa_core::types::RankedResult;

/// Groups `ranked` by `source_id`, keeps the first `k_per_source` of each
/// group in the incoming order, and concatenates the groups by ascending
/// `source_id`. Scores are left untouched, so the output is not globally
/// sorted by score.
pub fn diversify(ranked: Vec<RankedResult>, k_per_source: usize) -> Vec<RankedResult> {
    let mut groups: BTreeMap<String, Vec<RankedResult>> = BTreeMap::new();
    for result in ranked {
        let group = groups.entry(result.chunk.source_id.clone()).or_default();
        if group.len() < k_per_source { group.push(result); }
    }
    groups.into_values().flatten().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use docqa_core::types::Chunk;
    use proptest::prelude::*;
    use std::collections::HashMap;

    fn hit(source: &str, ordinal: usize, score: f64) -> RankedResult {
        RankedResult {
            chunk: Chunk::from_ordinal("text", source, ordinal),
            position: ordinal,
            fused_score: score,
            lexical_component: score,
            vector_component: score,
            degraded: false,
        }
    }

    #[test]
    fn groups_are_capped_and_ordered_by_source() {
        let ranked = vec![hit("b.pdf", 0, 0.9), hit("a.pdf", 0, 0.8), hit("b.pdf", 1, 0.7), hit("b.pdf", 2, 0.6), hit("a.pdf", 1, 0.1)];
        let out = diversify(ranked, 2);
        let ids: Vec<_> = out.iter().map(|r| r.chunk.chunk_id.as_str()).collect();
        assert_eq!(ids, vec!["a.pdf_chunk_0", "a.pdf_chunk_1", "b.pdf_chunk_0", "b.pdf_chunk_1"]);
        assert!((out[2].fused_score - 0.9).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_input_stays_empty() {
        assert!(diversify(Vec::new(), 3).is_empty());
    }

    proptest! {
        #[test]
        fn cap_and_total_hold(sources in prop::collection::vec(0u8..5, 0..60), k in 1usize..5) {
            let ranked: Vec<_> = sources
                .iter()
                .enumerate()
                .map(|(i, s)| hit(&format!("src{s}"), i, 1.0 / (i as f64 + 1.0)))
                .collect();
            let mut counts: HashMap<String, usize> = HashMap::new();
            for r in &ranked { *counts.entry(r.chunk.source_id.clone()).or_default() += 1; }

            let out = diversify(ranked, k);

            let expected: usize = counts.values().map(|c| (*c).min(k)).sum();
            prop_assert_eq!(out.len(), expected);
            let mut seen: HashMap<&str, usize> = HashMap::new();
            for r in &out { *seen.entry(r.chunk.source_id.as_str()).or_default() += 1; }
            prop_assert!(seen.values().all(|c| *c <= k));
            prop_assert!(out.windows(2).all(|w| w[0].chunk.source_id <= w[1].chunk.source_id));
        }
    }
}
