use tantivy::schema::{IndexRecordOption, Schema, TextFieldIndexing, TextOptions, STORED};
use tantivy::tokenizer::{NgramTokenizer, TextAnalyzer};
use tantivy::Index;

use docqa_core::config::LexicalConfig;

pub const NGRAM_TOKENIZER: &str = "char_ngram";

pub fn build_schema() -> Schema {
	let mut schema_builder = Schema::builder();
	let _position_field = schema_builder.add_u64_field("position", STORED);
	let text_field_indexing = TextFieldIndexing::default().set_tokenizer(NGRAM_TOKENIZER).set_index_option(IndexRecordOption::WithFreqs);
	let text_options = TextOptions::default().set_indexing_options(text_field_indexing);
	let _text_field = schema_builder.add_text_field("text", text_options);
	schema_builder.build()
}

/// Overlapping character n-grams with no whitespace splitting and no case
/// folding; the corpus script has no reliable word boundaries.
pub fn ngram_analyzer(config: &LexicalConfig) -> tantivy::Result<TextAnalyzer> {
	let tokenizer = NgramTokenizer::new(config.min_gram, config.max_gram, false)?;
	Ok(TextAnalyzer::builder(tokenizer).build())
}

pub fn register_tokenizer(index: &Index, config: &LexicalConfig) -> tantivy::Result<TextAnalyzer> {
	let analyzer = ngram_analyzer(config)?;
	index.tokenizers().register(NGRAM_TOKENIZER, analyzer.clone());
	Ok(analyzer)
}
