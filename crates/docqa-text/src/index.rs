use std::time::Instant;
use tantivy::collector::TopDocs;
use tantivy::query::{BooleanQuery, Occur, Query, TermQuery};
use tantivy::schema::{Field, IndexRecordOption, Value};
use tantivy::tokenizer::{TextAnalyzer, TokenStream};
use tantivy::{doc, DocAddress, Index, IndexWriter, Searcher, TantivyDocument, Term};
use tracing::{debug, info};

use docqa_core::config::LexicalConfig;
use docqa_core::error::{Error, Result};
use docqa_core::traits::LexicalScorer;
use docqa_core::types::{Corpus, ScoreVector};

use crate::tantivy_utils::{build_schema, register_tokenizer};

const WRITER_MEMORY_BYTES: usize = 50_000_000;

/// BM25 over character n-grams, built once for a fixed corpus.
///
/// Every chunk is indexed eagerly at construction. Scores come back as a dense
/// vector aligned with corpus positions; chunks sharing no n-gram with the
/// query score `0.0`.
pub struct LexicalIndex {
	searcher: Searcher,
	text_field: Field,
	analyzer: TextAnalyzer,
	// segment ordinal -> doc id -> corpus position
	positions: Vec<Vec<Option<usize>>>,
	corpus_len: usize,
}

fn index_err(e: tantivy::TantivyError) -> Error { Error::Index(e.to_string()) }

impl LexicalIndex {
	pub fn build(corpus: &Corpus, config: &LexicalConfig) -> Result<Self> {
		config.validate()?;
		let started = Instant::now();
		let schema = build_schema();
		let index = Index::create_in_ram(schema.clone());
		let analyzer = register_tokenizer(&index, config).map_err(index_err)?;
		let position_field = schema.get_field("position").map_err(index_err)?;
		let text_field = schema.get_field("text").map_err(index_err)?;

		let mut index_writer: IndexWriter = index.writer_with_num_threads(1, WRITER_MEMORY_BYTES).map_err(index_err)?;
		for (position, chunk) in corpus.iter().enumerate() {
			let doc = doc!(
				position_field => position as u64,
				text_field => chunk.text.clone(),
			);
			index_writer.add_document(doc).map_err(index_err)?;
		}
		index_writer.commit().map_err(index_err)?;

		let reader = index.reader().map_err(index_err)?;
		let searcher = reader.searcher();
		let positions = Self::collect_positions(&searcher, position_field)?;
		let mapped: usize = positions.iter().map(|seg| seg.iter().flatten().count()).sum();
		if mapped != corpus.len() {
			return Err(Error::Index(format!("indexed {mapped} documents for a corpus of {}", corpus.len())));
		}
		info!(chunks = corpus.len(), min_gram = config.min_gram, max_gram = config.max_gram, elapsed_ms = started.elapsed().as_millis(), "lexical index built");
		Ok(Self { searcher, text_field, analyzer, positions, corpus_len: corpus.len() })
	}

	fn collect_positions(searcher: &Searcher, position_field: Field) -> Result<Vec<Vec<Option<usize>>>> {
		let mut positions = Vec::with_capacity(searcher.segment_readers().len());
		for (segment_ord, segment_reader) in searcher.segment_readers().iter().enumerate() {
			let segment_ord = u32::try_from(segment_ord).map_err(|e| Error::Index(e.to_string()))?;
			let mut segment_positions = vec![None; segment_reader.max_doc() as usize];
			for doc_id in segment_reader.doc_ids_alive() {
				let doc: TantivyDocument = searcher.doc(DocAddress::new(segment_ord, doc_id)).map_err(index_err)?;
				segment_positions[doc_id as usize] = doc.get_first(position_field).and_then(|v| v.as_u64()).and_then(|p| usize::try_from(p).ok());
			}
			positions.push(segment_positions);
		}
		Ok(positions)
	}

	/// The term sequence the index sees for `text`, repeated grams included.
	pub fn tokenize(&self, text: &str) -> Vec<String> {
		let mut analyzer = self.analyzer.clone();
		let mut stream = analyzer.token_stream(text);
		let mut terms = Vec::new();
		while stream.advance() { terms.push(stream.token().text.clone()); }
		terms
	}

	pub fn score(&self, query: &str) -> Result<ScoreVector> {
		let mut scores = vec![0.0; self.corpus_len];
		let terms = self.tokenize(query);
		if terms.is_empty() {
			debug!("query produced no lexical terms");
			return Ok(scores);
		}
		// Each occurrence is its own clause, so repeated grams add up.
		let clauses: Vec<(Occur, Box<dyn Query>)> = terms
			.iter()
			.map(|t| {
				let term = Term::from_field_text(self.text_field, t);
				(Occur::Should, Box::new(TermQuery::new(term, IndexRecordOption::WithFreqs)) as Box<dyn Query>)
			})
			.collect();
		let query = BooleanQuery::new(clauses);
		let top_docs = self.searcher.search(&query, &TopDocs::with_limit(self.corpus_len)).map_err(index_err)?;
		let matched = top_docs.len();
		for (score, address) in top_docs {
			let position = self
				.positions
				.get(address.segment_ord as usize)
				.and_then(|seg| seg.get(address.doc_id as usize))
				.copied()
				.flatten();
			if let Some(position) = position { scores[position] = f64::from(score); }
		}
		debug!(terms = terms.len(), matched, "lexical scoring done");
		Ok(scores)
	}

	pub fn corpus_len(&self) -> usize { self.corpus_len }
}

impl LexicalScorer for LexicalIndex {
	fn corpus_len(&self) -> usize { self.corpus_len }
	fn score(&self, query: &str) -> Result<ScoreVector> { Self::score(self, query) }
}
