//! docqa-hybrid
//!
//! Fuses the lexical and vector signals into one ranking. See [`HybridRetriever`]
//! for the query surface; [`fusion`] and [`diversify`] hold the pure pieces.
pub mod diversify;
pub mod filter;
pub mod fusion;
pub mod retriever;

pub use retriever::HybridRetriever;
