//! Corpus persistence.
//!
//! Text is written to a temporary file beside the target and renamed into
//! place, so a reader sees either the previous file or the complete new one.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info};

use rw_common::{Error, Result};

/// Write `text` to `path` as UTF-8, creating parent directories and
/// replacing any existing file. Returns the number of bytes written.
pub fn write_corpus(path: &Path, text: &str) -> Result<u64> {
    let bytes = write_atomic(path, text.as_bytes())?;
    info!(path = %path.display(), bytes, "corpus written");
    Ok(bytes)
}

/// Atomically replace `path` with `contents`.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<u64> {
    let parent = parent_dir(path);
    fs::create_dir_all(&parent).map_err(|e| Error::io_at(&parent, e))?;

    let mut tmp = NamedTempFile::new_in(&parent).map_err(|e| Error::io_at(&parent, e))?;
    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        writer
            .write_all(contents)
            .and_then(|()| writer.flush())
            .map_err(|e| Error::io_at(path, e))?;
    }
    tmp.as_file().sync_all().map_err(|e| Error::io_at(path, e))?;
    relax_permissions(tmp.path()).map_err(|e| Error::io_at(path, e))?;

    tmp.persist(path).map_err(|e| Error::io_at(path, e.error))?;
    debug!(path = %path.display(), "replaced file atomically");
    Ok(contents.len() as u64)
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Temp files are created owner-only; the corpus is an ordinary data file.
#[cfg(unix)]
fn relax_permissions(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn relax_permissions(_path: &Path) -> std::io::Result<()> {
    Ok(())
}
