//! Score normalization and linear fusion.
//!
//! Each signal is min-max normalized on its own, then combined as
//!
//! ```text
//! fused[i] = (1 - alpha) * lexical[i] + alpha * vector[i]
//! ```
//!
//! `alpha = 0` is pure lexical ranking, `alpha = 1` pure vector ranking.
//! A signal with no spread (every score equal) normalizes to `1.0`
//! everywhere so a uniform signal is not zeroed out.

/// Min-max normalization into `[0, 1]`.
///
/// The maximum maps to `1.0`, the minimum to `0.0`. Uniform input maps to
/// all `1.0`; empty input stays empty.
pub fn normalize(raw: &[f64]) -> Vec<f64> {
    let Some((min, max)) = min_max(raw.iter().copied()) else { return Vec::new() };
    let range = max - min;
    raw.iter().map(|&s| if range > 0.0 { (s - min) / range } else { 1.0 }).collect()
}

/// Min-max normalization for a signal that may lack some positions.
///
/// Present values are normalized among themselves; absent positions get the
/// worst score `0.0`. Present values with no spread map to `1.0`, and a signal
/// with nothing present is uniform, so every position maps to `1.0`.
pub fn normalize_partial(raw: &[Option<f64>]) -> Vec<f64> {
    let Some((min, max)) = min_max(raw.iter().flatten().copied()) else { return vec![1.0; raw.len()] };
    let range = max - min;
    raw.iter()
        .map(|s| match s {
            Some(s) if range > 0.0 => (s - min) / range,
            Some(_) => 1.0,
            None => 0.0,
        })
        .collect()
}

/// Linear convex combination of two normalized, position-aligned signals.
pub fn fuse(lexical: &[f64], vector: &[f64], alpha: f64) -> Vec<f64> {
    debug_assert_eq!(lexical.len(), vector.len());
    lexical.iter().zip(vector).map(|(l, v)| (1.0 - alpha) * l + alpha * v).collect()
}

/// Positions sorted by score descending. The sort is stable, so ties keep
/// corpus order.
pub fn rank_order(fused: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..fused.len()).collect();
    order.sort_by(|&a, &b| fused[b].total_cmp(&fused[a]));
    order
}

fn min_max(scores: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    scores.fold(None, |acc, s| match acc {
        None => Some((s, s)),
        Some((min, max)) => Some((min.min(s), max.max(s))),
    })
}
