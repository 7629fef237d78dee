//! Source selection by `source_id` substring.
use docqa_core::types::RankedResult;

/// True when `source_id` contains any of `patterns`. No patterns selects
/// every source.
pub fn matches_source(source_id: &str, patterns: &[String]) -> bool {
    patterns.is_empty() || patterns.iter().any(|p| source_id.contains(p.as_str()))
}

/// Keeps results whose source matches, preserving rank order, up to `k`.
pub fn filter_sources(ranked: Vec<RankedResult>, patterns: &[String], k: usize) -> Vec<RankedResult> {
    ranked.into_iter().filter(|r| matches_source(&r.chunk.source_id, patterns)).take(k).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substring_match() {
        let patterns = vec!["景品".to_string(), "施行規則".to_string()];
        assert!(matches_source("景品表示法.pdf", &patterns));
        assert!(matches_source("景品表示法施行規則.pdf", &patterns));
        assert!(!matches_source("資金決済法.pdf", &patterns));
    }

    #[test]
    fn empty_patterns_select_all() {
        assert!(matches_source("anything", &[]));
    }
}
