//! Byte cache for downloaded catalogs.
//!
//! The fetch client takes a `&dyn CacheStore` so tests and callers choose
//! where bytes live. `DirCache` keeps one file per key under a directory.

use std::io;
use std::path::{Path, PathBuf};

pub trait CacheStore {
    fn get(&self, key: &str) -> Option<Vec<u8>>;
    fn put(&self, key: &str, bytes: &[u8]) -> io::Result<()>;
}

/// Directory-backed store. Keys are plain file names; anything with a path
/// separator or a leading dot is rejected.
#[derive(Debug, Clone)]
pub struct DirCache {
    dir: PathBuf,
}

impl DirCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> io::Result<PathBuf> {
        if key.is_empty() || key.starts_with('.') || key.contains(|c: char| c == '/' || c == '\\') {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid cache key '{key}'"),
            ));
        }
        Ok(self.dir.join(key))
    }
}

impl CacheStore for DirCache {
    fn get(&self, key: &str) -> Option<Vec<u8>> {
        let path = self.path_for(key).ok()?;
        match std::fs::read(&path) {
            Ok(bytes) => {
                tracing::debug!(path = %path.display(), bytes = bytes.len(), "cache hit");
                Some(bytes)
            }
            Err(e) => {
                if e.kind() != io::ErrorKind::NotFound {
                    tracing::warn!(path = %path.display(), error = %e, "cache read failed");
                }
                None
            }
        }
    }

    /// Written via a temp file + rename.
    fn put(&self, key: &str, bytes: &[u8]) -> io::Result<()> {
        let path = self.path_for(key)?;
        std::fs::create_dir_all(&self.dir)?;
        let tmp = self.dir.join(format!(".{key}.tmp"));
        std::fs::write(&tmp, bytes)?;
        std::fs::rename(&tmp, &path)?;
        tracing::debug!(path = %path.display(), bytes = bytes.len(), "cache write");
        Ok(())
    }
}
