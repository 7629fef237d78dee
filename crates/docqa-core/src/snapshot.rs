//! Corpus snapshot loading.
//!
//! A snapshot is a JSON Lines file with one chunk per line:
//! `{"chunk_id": "...", "source_id": "...", "text": "...", "embedding": [..]}`.
//! `embedding` is optional. Blank lines are skipped.
use serde::Deserialize;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::info;

use crate::error::{Error, Result};
use crate::types::{Chunk, ChunkId, Corpus};

#[derive(Debug, Deserialize)]
struct SnapshotRecord {
    chunk_id: ChunkId,
    source_id: String,
    text: String,
    #[serde(default)]
    embedding: Option<Vec<f32>>,
}

/// A corpus plus whatever precomputed embeddings the snapshot carried.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub corpus: Corpus,
    pub embeddings: Vec<(ChunkId, Vec<f32>)>,
}

impl Snapshot {
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .map_err(|e| Error::InvalidConfig(format!("cannot open snapshot {}: {e}", path.display())))?;
        let snapshot = Self::from_reader(BufReader::new(file))?;
        info!(path = %path.display(), chunks = snapshot.corpus.len(), embeddings = snapshot.embeddings.len(), "loaded corpus snapshot");
        Ok(snapshot)
    }

    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut chunks = Vec::new();
        let mut embeddings = Vec::new();
        for (line_no, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| Error::InvalidConfig(format!("snapshot line {}: {e}", line_no + 1)))?;
            if line.trim().is_empty() { continue; }
            let record: SnapshotRecord = serde_json::from_str(&line)
                .map_err(|e| Error::InvalidConfig(format!("snapshot line {}: {e}", line_no + 1)))?;
            if let Some(embedding) = record.embedding { embeddings.push((record.chunk_id.clone(), embedding)); }
            chunks.push(Chunk { text: record.text, source_id: record.source_id, chunk_id: record.chunk_id });
        }
        Ok(Self { corpus: Corpus::new(chunks)?, embeddings })
    }
}
