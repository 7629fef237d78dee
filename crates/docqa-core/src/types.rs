//! Domain types used by the lexical index, the vector source and the fuser.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{Error, Result};

pub type ChunkId = String;

/// One score per corpus position, aligned with [`Corpus`] order.
pub type ScoreVector = Vec<f64>;

/// Number of characters kept in a [`ScoreDetail`] preview.
pub const PREVIEW_CHARS: usize = 200;

/// A slice of a source document, the atomic unit of retrieval.
///
/// - `text`: the chunk payload
/// - `source_id`: originating document (file name or external id)
/// - `chunk_id`: identifier unique within the corpus
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub text: String,
    pub source_id: String,
    pub chunk_id: ChunkId,
}

impl Chunk {
    pub fn new(text: impl Into<String>, source_id: impl Into<String>, chunk_id: impl Into<ChunkId>) -> Self {
        Self { text: text.into(), source_id: source_id.into(), chunk_id: chunk_id.into() }
    }

    /// Builds the conventional `"{source_id}_chunk_{ordinal}"` identifier.
    pub fn from_ordinal(text: impl Into<String>, source_id: impl Into<String>, ordinal: usize) -> Self {
        let source_id = source_id.into();
        let chunk_id = format!("{source_id}_chunk_{ordinal}");
        Self { text: text.into(), source_id, chunk_id }
    }
}

/// Ordered, immutable, non-empty sequence of chunks.
///
/// Cloning is cheap: chunks and the id lookup are shared.
#[derive(Debug, Clone)]
pub struct Corpus {
    chunks: Arc<[Chunk]>,
    positions: Arc<HashMap<ChunkId, usize>>,
}

impl Corpus {
    pub fn new(chunks: Vec<Chunk>) -> Result<Self> {
        if chunks.is_empty() {
            return Err(Error::InvalidConfig("corpus is empty, nothing to index".to_string()));
        }
        let mut positions = HashMap::with_capacity(chunks.len());
        for (position, chunk) in chunks.iter().enumerate() {
            if positions.insert(chunk.chunk_id.clone(), position).is_some() {
                return Err(Error::InvalidConfig(format!("duplicate chunk_id '{}'", chunk.chunk_id)));
            }
        }
        Ok(Self { chunks: chunks.into(), positions: Arc::new(positions) })
    }

    pub fn len(&self) -> usize { self.chunks.len() }

    pub fn is_empty(&self) -> bool { self.chunks.is_empty() }

    pub fn chunks(&self) -> &[Chunk] { &self.chunks }

    pub fn get(&self, position: usize) -> Option<&Chunk> { self.chunks.get(position) }

    pub fn iter(&self) -> std::slice::Iter<'_, Chunk> { self.chunks.iter() }

    /// Resolves a collaborator-supplied chunk id to its corpus position.
    pub fn position_of(&self, chunk_id: &str) -> Option<usize> { self.positions.get(chunk_id).copied() }
}

/// A fused hit with full score provenance.
///
/// `lexical_component` and `vector_component` are the normalized signals in
/// `[0, 1]`; `fused_score` is their weighted sum. `degraded` marks results
/// ranked by the lexical signal alone after the vector source failed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedResult {
    pub chunk: Chunk,
    pub position: usize,
    pub fused_score: f64,
    pub lexical_component: f64,
    pub vector_component: f64,
    pub degraded: bool,
}

/// Flattened, display-oriented view of a [`RankedResult`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreDetail {
    pub chunk_id: ChunkId,
    pub source_id: String,
    pub preview: String,
    pub fused_score: f64,
    pub lexical_score: f64,
    pub vector_score: f64,
}

impl From<&RankedResult> for ScoreDetail {
    fn from(result: &RankedResult) -> Self {
        let mut preview: String = result.chunk.text.chars().take(PREVIEW_CHARS).collect();
        preview.push_str("...");
        Self {
            chunk_id: result.chunk.chunk_id.clone(),
            source_id: result.chunk.source_id.clone(),
            preview,
            fused_score: result.fused_score,
            lexical_score: result.lexical_component,
            vector_score: result.vector_component,
        }
    }
}
