//! docqa-text
//!
//! Lexical index over the corpus: an in-RAM tantivy index whose text field is
//! analyzed into overlapping character n-grams and scored with BM25.
pub mod tantivy_utils;
pub mod index;

pub use index::LexicalIndex;
