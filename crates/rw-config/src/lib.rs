//! Random-walk corpus configuration loading and validation.
//!
//! This crate provides:
//! - The typed [`CorpusConfig`] used by every corpus run
//! - Config resolution (CLI/env → config file → defaults)
//! - Semantic validation of chunking and pool sizes
//! - Relation vocabularies used when joining assertion files

pub mod corpus;
pub mod relations;
pub mod resolve;

pub use corpus::{ConfigError, CorpusConfig, RelationStyle};
pub use relations::RelationVocabulary;
pub use resolve::{resolve_config, ConfigFile, ConfigOverrides, ConfigSource, ResolvedConfig};

/// Default number of walks per batch.
pub const DEFAULT_CHUNK_SIZE: usize = 1000;

/// Default worker pool size.
pub const DEFAULT_WORKER_COUNT: usize = 10;

/// Upper bound on the worker pool size.
pub const MAX_WORKER_COUNT: usize = 1024;
