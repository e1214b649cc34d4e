// src/core/cache/file_store.rs

//! A cache store keeping one JSON file per key in a directory.
//!
//! Writes go to a temporary file which is then renamed over the final path, so a reader
//! in another worker process sees either the old entry or the new one, never a torn write.

use super::{CacheEntry, CacheStore};
use crate::core::StylaError;
use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

/// Keys longer than this are stored under a digest so file names stay within OS limits.
const MAX_PLAIN_KEY_LEN: usize = 200;
const ENTRY_EXTENSION: &str = ".json";

/// A directory-backed cache store safe to share between processes.
#[derive(Debug, Clone)]
pub struct FileCacheStore {
    dir: PathBuf,
}

impl FileCacheStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Maps a key to the path of its entry file.
    pub fn entry_path(&self, key: &str) -> PathBuf {
        let file_name = if key.len() > MAX_PLAIN_KEY_LEN {
            let digest = Sha256::digest(key.as_bytes());
            format!("h-{}{ENTRY_EXTENSION}", hex::encode(digest))
        } else {
            format!("{key}{ENTRY_EXTENSION}")
        };
        self.dir.join(file_name)
    }

    async fn read_entry(path: &Path) -> Result<Option<CacheEntry>, StylaError> {
        let bytes = match fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_slice(&bytes)?))
    }
}

#[async_trait]
impl CacheStore for FileCacheStore {
    async fn get(&self, key: &str) -> Result<Option<CacheEntry>, StylaError> {
        Self::read_entry(&self.entry_path(key)).await
    }

    async fn put(&self, key: &str, entry: CacheEntry) -> Result<(), StylaError> {
        fs::create_dir_all(&self.dir).await?;
        let final_path = self.entry_path(key);
        let mut temp_name = final_path.as_os_str().to_owned();
        temp_name.push(format!(".tmp.{}", rand::random::<u32>()));
        let temp_path = PathBuf::from(temp_name);

        let payload = serde_json::to_vec(&entry)?;
        if let Err(e) = fs::write(&temp_path, &payload).await {
            fs::remove_file(&temp_path).await.ok();
            return Err(e.into());
        }

        // Atomically replace the previous entry.
        if let Err(e) = fs::rename(&temp_path, &final_path).await {
            if let Err(remove_err) = fs::remove_file(&temp_path).await {
                warn!(
                    "Additionally failed to remove temporary cache file {:?}: {}",
                    temp_path, remove_err
                );
            }
            return Err(e.into());
        }
        debug!("Wrote cache entry {:?}", final_path);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StylaError> {
        match fs::remove_file(self.entry_path(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn purge_older_than(&self, cutoff: i64) -> Result<usize, StylaError> {
        let mut dir = match fs::read_dir(&self.dir).await {
            Ok(dir) => dir,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };

        let mut removed = 0;
        while let Some(dir_entry) = dir.next_entry().await? {
            let path = dir_entry.path();
            let is_entry_file = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with(ENTRY_EXTENSION));
            if !is_entry_file {
                continue;
            }

            let expired = match Self::read_entry(&path).await {
                Ok(Some(entry)) => entry.timestamp < cutoff,
                Ok(None) => false,
                Err(e) => {
                    warn!("Removing unreadable cache file {:?}: {}", path, e);
                    true
                }
            };
            if !expired {
                continue;
            }
            match fs::remove_file(&path).await {
                Ok(()) => removed += 1,
                // Another process got there first.
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => warn!("Failed to remove cache file {:?}: {}", path, e),
            }
        }
        Ok(removed)
    }
}
