//! Config resolution: CLI/env overrides → config file → defaults.
//!
//! Environment variables are folded into [`ConfigOverrides`] by the CLI
//! parser, so this module only layers explicit overrides over an optional
//! TOML file. The file is taken from `--config` when given, otherwise from
//! `$XDG_CONFIG_HOME/rw-corpus/config.toml` if that exists.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::corpus::{ConfigError, CorpusConfig, RelationStyle};
use crate::{DEFAULT_CHUNK_SIZE, DEFAULT_WORKER_COUNT};

const CONFIG_DIR_NAME: &str = "rw-corpus";
const CONFIG_FILE_NAME: &str = "config.toml";

/// On-disk config file. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub input_path: Option<PathBuf>,
    pub output_path: Option<PathBuf>,
    pub chunk_size: Option<usize>,
    pub worker_count: Option<usize>,
    pub relation_style: Option<RelationStyle>,
}

impl ConfigFile {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Values supplied on the command line or through the environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub config_path: Option<PathBuf>,
    pub input_path: Option<PathBuf>,
    pub output_path: Option<PathBuf>,
    pub chunk_size: Option<usize>,
    pub worker_count: Option<usize>,
    pub relation_style: Option<RelationStyle>,
}

/// Where the file layer of a resolved config came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "path", rename_all = "snake_case")]
pub enum ConfigSource {
    /// `--config` / `RW_CORPUS_CONFIG`.
    Explicit(PathBuf),
    /// The per-user config file.
    UserDefault(PathBuf),
    /// No config file; built-in defaults only.
    Defaults,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Explicit(path) => write!(f, "{}", path.display()),
            ConfigSource::UserDefault(path) => write!(f, "{} (user default)", path.display()),
            ConfigSource::Defaults => write!(f, "built-in defaults"),
        }
    }
}

/// A validated config plus its provenance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedConfig {
    pub config: CorpusConfig,
    pub source: ConfigSource,
}

/// Per-user config file location, whether or not it exists.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Resolve the effective config using the per-user default location.
pub fn resolve_config(overrides: &ConfigOverrides) -> Result<ResolvedConfig, ConfigError> {
    resolve_config_with(overrides, default_config_path().as_deref())
}

/// Resolve the effective config with an explicit fallback file location.
pub fn resolve_config_with(
    overrides: &ConfigOverrides,
    user_default: Option<&Path>,
) -> Result<ResolvedConfig, ConfigError> {
    let (file, source) = match (&overrides.config_path, user_default) {
        (Some(path), _) => (ConfigFile::load(path)?, ConfigSource::Explicit(path.clone())),
        (None, Some(path)) if path.is_file() => (
            ConfigFile::load(path)?,
            ConfigSource::UserDefault(path.to_path_buf()),
        ),
        _ => (ConfigFile::default(), ConfigSource::Defaults),
    };

    let input_path = overrides
        .input_path
        .clone()
        .or(file.input_path)
        .ok_or(ConfigError::Missing("input_path"))?;
    let output_path = overrides
        .output_path
        .clone()
        .or(file.output_path)
        .ok_or(ConfigError::Missing("output_path"))?;

    let config = CorpusConfig {
        input_path,
        output_path,
        chunk_size: overrides
            .chunk_size
            .or(file.chunk_size)
            .unwrap_or(DEFAULT_CHUNK_SIZE),
        worker_count: overrides
            .worker_count
            .or(file.worker_count)
            .unwrap_or(DEFAULT_WORKER_COUNT),
        relation_style: overrides
            .relation_style
            .or(file.relation_style)
            .unwrap_or_default(),
    };
    config.validate()?;

    Ok(ResolvedConfig { config, source })
}
