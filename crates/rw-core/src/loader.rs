//! Walk collection loading.
//!
//! Two on-disk layouts are accepted:
//! - `.json`: one array of walks, each an array of strings
//! - `.jsonl` / `.ndjson`: one walk array per line; blank lines are skipped

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use tracing::{debug, info};

use rw_common::{Error, Result, Walk, WalkCollection};

/// Serialization layout of a walk collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkFormat {
    Json,
    JsonLines,
}

impl WalkFormat {
    /// Pick the layout from the file extension. Unknown extensions are read
    /// as a single JSON document.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("jsonl") | Some("ndjson") => WalkFormat::JsonLines,
            _ => WalkFormat::Json,
        }
    }
}

/// Load the full walk collection into memory.
pub fn load_walks(path: &Path) -> Result<WalkCollection> {
    let format = WalkFormat::from_path(path);
    let file = File::open(path).map_err(|e| Error::io_at(path, e))?;
    let walks = parse_walks(BufReader::new(file), format, path)?;

    let empty = walks.iter().filter(|w| w.is_empty()).count();
    let incomplete = walks
        .iter()
        .filter(|w| !w.is_empty() && !w.is_complete())
        .count();
    info!(
        path = %path.display(),
        walks = walks.len(),
        empty,
        incomplete,
        "loaded walk collection"
    );
    Ok(walks)
}

/// Parse walks from a reader. `path` is only used in error messages.
pub fn parse_walks<R: Read>(reader: R, format: WalkFormat, path: &Path) -> Result<WalkCollection> {
    match format {
        WalkFormat::Json => serde_json::from_reader(reader).map_err(|e| Error::InvalidWalks {
            path: path.to_path_buf(),
            reason: e.to_string(),
        }),
        WalkFormat::JsonLines => {
            let mut walks = Vec::new();
            for (n, line) in BufReader::new(reader).lines().enumerate() {
                let line = line.map_err(|e| Error::io_at(path, e))?;
                if line.trim().is_empty() {
                    continue;
                }
                let walk: Walk = serde_json::from_str(&line).map_err(|e| Error::InvalidWalks {
                    path: path.to_path_buf(),
                    reason: format!("line {}: {e}", n + 1),
                })?;
                walks.push(walk);
            }
            debug!(walks = walks.len(), "parsed JSON Lines walks");
            Ok(walks)
        }
    }
}
