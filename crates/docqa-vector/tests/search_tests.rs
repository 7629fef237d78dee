use docqa_core::config::DistanceMetric;
use docqa_core::traits::VectorSimilaritySource;
use docqa_vector::{HashEmbedder, InMemoryVectorSource};

fn source(metric: DistanceMetric) -> InMemoryVectorSource {
    let texts: Vec<String> = ["景品類の定義", "表示の規制", "資金決済の目的"].iter().map(|s| s.to_string()).collect();
    let ids = vec!["a".to_string(), "b".to_string(), "c".to_string()];
    InMemoryVectorSource::from_texts(Box::new(HashEmbedder::new(128).unwrap()), ids, &texts, metric).expect("source")
}

#[test]
fn exact_text_is_nearest() {
    for metric in [DistanceMetric::L2, DistanceMetric::Cosine] {
        let hits = source(metric).query("表示の規制", 3).unwrap();
        assert_eq!(hits.len(), 3);
        assert_eq!(hits[0].0, "b");
        assert!(hits[0].1.abs() < 1e-5, "identical text has zero distance, got {}", hits[0].1);
        assert!(hits.windows(2).all(|w| w[0].1 <= w[1].1), "ascending by distance");
    }
}

#[test]
fn limit_truncates() {
    let hits = source(DistanceMetric::L2).query("景品", 2).unwrap();
    assert_eq!(hits.len(), 2);
}

#[test]
fn dimension_mismatch_is_rejected() {
    let embedder = Box::new(HashEmbedder::new(4).unwrap());
    let res = InMemoryVectorSource::new(embedder, vec![("a".to_string(), vec![0.0; 3])], DistanceMetric::L2);
    assert!(res.is_err());
}
