//! JSON blob persistence.
//!
//! `save_json` writes through a temporary file in the target directory,
//! fsyncs it and renames it over the target, so a crash mid-write leaves
//! either the old content or the new content, never a truncated file.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::persist::error::PersistError;

/// Writes `data` as pretty-printed JSON to `path`, replacing any existing file.
///
/// The parent directory is created if needed.
///
/// # Errors
///
/// Returns a [`PersistError`] if the directory cannot be created, the value
/// cannot be serialized, or the temp-file write or rename fails.
pub fn save_json<T: Serialize + ?Sized>(path: &Path, data: &T) -> Result<(), PersistError> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&parent).map_err(|source| PersistError::CreateDir {
        path: parent.clone(),
        source,
    })?;

    let mut json = serde_json::to_string_pretty(data).map_err(|source| PersistError::Serialize {
        path: path.to_path_buf(),
        source,
    })?;
    json.push('\n');

    let temp_path = temp_path_for(path);
    write_synced(&temp_path, json.as_bytes()).map_err(|source| PersistError::Write {
        path: temp_path.clone(),
        source,
    })?;

    fs::rename(&temp_path, path).map_err(|source| PersistError::Replace {
        path: path.to_path_buf(),
        temp_path: temp_path.clone(),
        source,
    })?;

    tracing::debug!(path = %path.display(), "saved JSON state");
    Ok(())
}

/// Reads and parses the JSON file at `path`.
///
/// Returns `None` when the file is missing, unreadable, or does not parse
/// as `T`.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Option<T> {
    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::debug!(path = %path.display(), error = %e, "could not read JSON file");
            }
            return None;
        }
    };
    match serde_json::from_str(&content) {
        Ok(v) => Some(v),
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "could not parse JSON file");
            None
        }
    }
}

/// Like [`load_json`] but falls back to `default` instead of `None`.
pub fn load_json_or<T: DeserializeOwned>(path: &Path, default: T) -> T {
    load_json(path).unwrap_or(default)
}

/// Temp file sibling of `path`: `.<name>.tmp.<pid>`.
fn temp_path_for(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "state.json".to_string());
    path.with_file_name(format!(".{}.tmp.{}", name, std::process::id()))
}

fn write_synced(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}
