//! Exact f32 distances. Lower is closer for every metric.

use docqa_core::config::DistanceMetric;

pub fn distance(metric: DistanceMetric, a: &[f32], b: &[f32]) -> f32 {
    match metric {
        DistanceMetric::L2 => euclidean_sq(a, b),
        DistanceMetric::Cosine => 1.0 - cosine_similarity(a, b),
    }
}

pub fn euclidean_sq(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

/// Zero vectors have no direction; their similarity to anything is `0.0`.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 { return 0.0; }
    dot / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn euclidean_is_squared() {
        assert!((euclidean_sq(&[0.0, 0.0], &[3.0, 4.0]) - 25.0).abs() < 1e-6);
        assert!(distance(DistanceMetric::L2, &[1.0, 2.0], &[1.0, 2.0]).abs() < 1e-6);
    }

    #[test]
    fn cosine_distance_range() {
        assert!(distance(DistanceMetric::Cosine, &[1.0, 0.0], &[2.0, 0.0]).abs() < 1e-6);
        assert!((distance(DistanceMetric::Cosine, &[1.0, 0.0], &[0.0, 1.0]) - 1.0).abs() < 1e-6);
        assert!((distance(DistanceMetric::Cosine, &[1.0, 0.0], &[-1.0, 0.0]) - 2.0).abs() < 1e-6);
        assert!((distance(DistanceMetric::Cosine, &[0.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-6);
    }
}
