//! docqa-vector
//!
//! In-process stand-ins for the external embedding and vector-store services:
//! a brute-force [`InMemoryVectorSource`] over precomputed chunk embeddings and
//! a deterministic [`HashEmbedder`] for development and tests.
pub mod distance;
pub mod embedder;
pub mod search;

pub use embedder::HashEmbedder;
pub use search::InMemoryVectorSource;
