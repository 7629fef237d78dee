//! docqa-core
//!
//! Shared data model, error type, collaborator traits, configuration and
//! corpus snapshot loading for the docqa retrieval crates.

pub mod config;
pub mod error;
pub mod snapshot;
pub mod traits;
pub mod types;
