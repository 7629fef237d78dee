use std::collections::HashMap;

use docqa_core::config::LexicalConfig;
use docqa_core::types::{Chunk, Corpus};
use docqa_text::LexicalIndex;

fn chunks() -> Vec<Chunk> {
    vec![
        Chunk::from_ordinal("景品類とは、顧客を誘引するための手段として提供する物品をいう。", "景表法.pdf", 0),
        Chunk::from_ordinal("不当な表示の禁止について定める。", "景表法.pdf", 1),
        Chunk::from_ordinal("Q: 景品類の上限額はいくらですか。", "Q&A.pdf", 0),
        Chunk::from_ordinal("施行規則は景品類の価額の算定方法を定める。", "施行規則.pdf", 0),
        Chunk::from_ordinal("資金決済に関する法律の目的。", "資金決済法.pdf", 0),
    ]
}

fn scores_by_id(corpus: &Corpus, query: &str) -> HashMap<String, f64> {
    let index = LexicalIndex::build(corpus, &LexicalConfig::default()).expect("index");
    let scores = index.score(query).expect("score");
    assert_eq!(scores.len(), corpus.len());
    corpus.iter().zip(scores).map(|(c, s)| (c.chunk_id.clone(), s)).collect()
}

#[test]
fn scores_follow_chunks_when_corpus_is_reordered() {
    let forward = Corpus::new(chunks()).unwrap();
    let mut reversed_chunks = chunks();
    reversed_chunks.reverse();
    let reversed = Corpus::new(reversed_chunks).unwrap();

    let a = scores_by_id(&forward, "景品類の定義");
    let b = scores_by_id(&reversed, "景品類の定義");
    for (id, score) in &a {
        assert!((score - b[id]).abs() < 1e-6, "{id}: {score} vs {}", b[id]);
    }
}

#[test]
fn scoring_is_repeatable() {
    let corpus = Corpus::new(chunks()).unwrap();
    let index = LexicalIndex::build(&corpus, &LexicalConfig::default()).unwrap();
    let first = index.score("景品類の上限").unwrap();
    for _ in 0..3 { assert_eq!(index.score("景品類の上限").unwrap(), first); }
    assert!(first.iter().all(|s| *s >= 0.0));
}

#[test]
fn unrelated_query_is_uniformly_zero() {
    let corpus = Corpus::new(chunks()).unwrap();
    let index = LexicalIndex::build(&corpus, &LexicalConfig::default()).unwrap();
    assert!(index.score("xyz").unwrap().iter().all(|s| *s == 0.0));
}

#[test]
fn narrower_ngram_bounds_change_vocabulary() {
    let corpus = Corpus::new(chunks()).unwrap();
    let index = LexicalIndex::build(&corpus, &LexicalConfig { min_gram: 2, max_gram: 2 }).unwrap();
    assert_eq!(index.tokenize("景品類"), vec!["景品".to_string(), "品類".to_string()]);
    assert!(LexicalIndex::build(&corpus, &LexicalConfig { min_gram: 3, max_gram: 1 }).is_err());
}
