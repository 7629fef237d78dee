//! Lightweight configuration loader and path helpers.
//!
//! Uses Figment to merge `config.toml` + `config.<env>.toml` + `APP_*` env vars
//! (`__` separates nested keys, e.g. `APP_RETRIEVER__ALPHA=0.7`). Typed
//! sections are extracted with serde defaults so a missing file or section
//! falls back to the built-in values.
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

pub struct Config {
    figment: Figment,
    base: PathBuf,
}

impl Config {
    /// Load from the working directory, picking the environment from `RUST_ENV`.
    pub fn load() -> Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());
        Self::load_from(Path::new("."), &env_name)
    }

    pub fn load_from(dir: &Path, env_name: &str) -> Result<Self> {
        let mut figment = Figment::new().merge(Toml::file(dir.join("config.toml")));
        match env_name {
            "dev" | "development" => figment = figment.merge(Toml::file(dir.join("config.dev.toml"))),
            "prod" | "production" => figment = figment.merge(Toml::file(dir.join("config.prod.toml"))),
            "test" | "testing" => figment = figment.merge(Toml::file(dir.join("config.test.toml"))),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));
        let config = Self { figment, base: dir.to_path_buf() };
        config.retriever()?.validate()?;
        Ok(config)
    }

    pub fn from_figment(figment: Figment) -> Self { Self { figment, base: PathBuf::from(".") } }

    pub fn get<T>(&self, key: &str) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| Error::InvalidConfig(format!("Failed to get '{key}': {e}")))
    }

    fn section<T>(&self, key: &str) -> Result<T>
    where
        T: serde::de::DeserializeOwned + Default,
    {
        if self.figment.find_value(key).is_err() { return Ok(T::default()); }
        self.get(key)
    }

    pub fn retriever(&self) -> Result<RetrieverConfig> { self.section("retriever") }

    pub fn vector(&self) -> Result<VectorConfig> { self.section("vector") }

    /// `data.snapshot`, expanded and resolved against the config directory.
    pub fn snapshot_path(&self) -> Result<Option<PathBuf>> {
        let data: DataConfig = self.section("data")?;
        Ok(data.snapshot.map(|p| resolve_with_base(&self.base, p)))
    }
}

/// Tuning for the hybrid retriever, read from `[retriever]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrieverConfig {
    /// Weight of the vector signal; the lexical signal gets `1 - alpha`.
    pub alpha: f64,
    pub top_k: usize,
    pub k_per_source: usize,
    /// Over-fetch factor applied before source filtering.
    pub search_multiplier: usize,
    /// Rank by the lexical signal alone when the vector source fails.
    pub lexical_fallback: bool,
    pub lexical: LexicalConfig,
    /// Named groups of `source_id` substrings, e.g. one law and its regulations.
    pub source_groups: BTreeMap<String, Vec<String>>,
}

impl Default for RetrieverConfig {
    fn default() -> Self {
        Self {
            alpha: 0.5,
            top_k: 5,
            k_per_source: 2,
            search_multiplier: 3,
            lexical_fallback: false,
            lexical: LexicalConfig::default(),
            source_groups: BTreeMap::new(),
        }
    }
}

impl RetrieverConfig {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.alpha) {
            return Err(Error::InvalidConfig(format!("retriever.alpha must be within [0, 1], got {}", self.alpha)));
        }
        for (name, value) in [("top_k", self.top_k), ("k_per_source", self.k_per_source), ("search_multiplier", self.search_multiplier)] {
            if value == 0 { return Err(Error::InvalidConfig(format!("retriever.{name} must be at least 1"))); }
        }
        self.lexical.validate()
    }
}

/// Character n-gram bounds for the lexical analyzer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LexicalConfig {
    pub min_gram: usize,
    pub max_gram: usize,
}

impl Default for LexicalConfig {
    fn default() -> Self { Self { min_gram: 1, max_gram: 3 } }
}

impl LexicalConfig {
    pub fn validate(&self) -> Result<()> {
        if self.min_gram == 0 || self.min_gram > self.max_gram {
            return Err(Error::InvalidConfig(format!(
                "retriever.lexical requires 1 <= min_gram <= max_gram, got {}..{}",
                self.min_gram, self.max_gram
            )));
        }
        Ok(())
    }
}

/// Distance reported by the in-memory vector source. Lower is closer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceMetric {
    /// Squared Euclidean distance.
    #[default]
    L2,
    /// `1 - cosine_similarity`.
    Cosine,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorConfig {
    pub metric: DistanceMetric,
    /// Dimension used by the development embedder when the snapshot has none.
    pub dim: usize,
}

impl Default for VectorConfig {
    fn default() -> Self { Self { metric: DistanceMetric::L2, dim: 256 } }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct DataConfig {
    snapshot: Option<String>,
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Resolve a possibly relative path against a given base directory after expansion.
/// If `p` is absolute, it's returned as-is; otherwise `base.join(p)` is returned.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() { p } else { base.join(p) }
}
