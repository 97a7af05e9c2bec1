//! Disk I/O helpers: load from file and atomic write.
//!
//! The rename-over approach is close to atomic on most platforms. On NTFS
//! (Windows) it's reliable; on FAT32 or network shares there are no hard
//! guarantees. Either way the file on disk is always the last complete
//! snapshot that was written successfully, never a partial one.

use crate::error::{Error, Result};
use crate::serializer::Serializer;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

/// What [`load`] found on disk.
#[derive(Debug, Clone, PartialEq)]
pub enum Loaded<T> {
    /// No file at the path yet (first run).
    Missing,
    /// The file exists and decoded cleanly. May be empty.
    Items(Vec<T>),
}

/// Reads and deserializes the file at `path`. A missing file is reported as
/// [`Loaded::Missing`]; a blank file decodes to an empty list. Anything
/// unreadable is [`Error::Io`], anything malformed is [`Error::Deserialize`].
pub fn load<T, S>(path: &Path, serializer: &S) -> Result<Loaded<T>>
where
    T: DeserializeOwned,
    S: Serializer,
{
    let bytes = match std::fs::read(path) {
        Ok(b) => b,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Loaded::Missing),
        Err(e) => return Err(Error::Io(e.to_string())),
    };
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Loaded::Items(Vec::new()));
    }
    serializer.deserialize(&bytes).map(Loaded::Items)
}

/// Write `bytes` to `<path>.tmp` and then rename over `path`. This avoids
/// leaving a half-written file if the process crashes mid-write.
pub fn atomic_write(path: &Path, bytes: &[u8]) -> Result<()> {
    let tmp = temp_path_for(path);
    std::fs::write(&tmp, bytes).map_err(|e| Error::Io(e.to_string()))?;
    if let Err(e) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(Error::Io(e.to_string()));
    }
    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");
    path.with_extension(format!("{ext}.tmp"))
}
