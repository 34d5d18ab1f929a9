//! Corpus generation configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::{DEFAULT_CHUNK_SIZE, DEFAULT_WORKER_COUNT, MAX_WORKER_COUNT};

/// How relation tokens are rendered into the corpus.
///
/// Relation rendering is an extension point. The default leaves tokens
/// untouched; `Bracketed` squashes a relation into a single `<token>` so it
/// can be added to a tokenizer vocabulary as one unit.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum RelationStyle {
    #[default]
    Passthrough,
    Bracketed,
}

impl std::fmt::Display for RelationStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RelationStyle::Passthrough => write!(f, "passthrough"),
            RelationStyle::Bracketed => write!(f, "bracketed"),
        }
    }
}

/// Fully resolved settings for one corpus run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusConfig {
    /// Location of the serialized walk collection.
    pub input_path: PathBuf,

    /// Location of the generated corpus.
    pub output_path: PathBuf,

    /// Walks per batch.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Worker pool size.
    #[serde(default = "default_worker_count")]
    pub worker_count: usize,

    #[serde(default)]
    pub relation_style: RelationStyle,
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

fn default_worker_count() -> usize {
    DEFAULT_WORKER_COUNT
}

/// Errors raised while loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required setting: {0}")]
    Missing(&'static str),

    #[error("invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl From<ConfigError> for rw_common::Error {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Invalid { field, reason } => {
                rw_common::Error::InvalidConfig { field, reason }
            }
            other => rw_common::Error::Config(other.to_string()),
        }
    }
}

impl CorpusConfig {
    /// Config with default chunking and pool sizes.
    pub fn new(input_path: impl Into<PathBuf>, output_path: impl Into<PathBuf>) -> Self {
        Self {
            input_path: input_path.into(),
            output_path: output_path.into(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            worker_count: DEFAULT_WORKER_COUNT,
            relation_style: RelationStyle::default(),
        }
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn with_worker_count(mut self, worker_count: usize) -> Self {
        self.worker_count = worker_count;
        self
    }

    pub fn with_relation_style(mut self, style: RelationStyle) -> Self {
        self.relation_style = style;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.input_path.as_os_str().is_empty() {
            return Err(ConfigError::Missing("input_path"));
        }
        if self.output_path.as_os_str().is_empty() {
            return Err(ConfigError::Missing("output_path"));
        }
        if self.input_path == self.output_path {
            return Err(ConfigError::Invalid {
                field: "output_path",
                reason: "must differ from input_path".to_string(),
            });
        }
        if self.chunk_size == 0 {
            return Err(ConfigError::Invalid {
                field: "chunk_size",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.worker_count == 0 || self.worker_count > MAX_WORKER_COUNT {
            return Err(ConfigError::Invalid {
                field: "worker_count",
                reason: format!("must be in [1, {MAX_WORKER_COUNT}], got {}", self.worker_count),
            });
        }
        Ok(())
    }
}
