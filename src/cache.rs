//! Byte cache for HTTP responses, keyed by sha256(url).
//!
//! Entries go stale by file age: `get` with a TTL window returns a hit only
//! while the entry's mtime is within the window. A stale entry is left on
//! disk and simply overwritten by the next `put`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use sha2::{Digest, Sha256};
use tokio::fs;

#[derive(Clone, Debug)]
pub struct HttpCache {
    root: PathBuf,
}

impl HttpCache {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn default_root() -> PathBuf {
        let base = std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("."));
        base.join(".cache").join("dexgrid")
    }

    fn entry_path(&self, url: &str) -> PathBuf {
        let mut hasher = Sha256::new();
        hasher.update(url.as_bytes());
        let digest = hex::encode(hasher.finalize());
        self.root.join("http").join(digest)
    }

    /// Returns the cached bytes when the entry exists and is younger than `ttl`.
    pub async fn get(&self, url: &str, ttl: Duration) -> Option<Vec<u8>> {
        let path = self.entry_path(url);
        if !entry_is_fresh(&path, ttl).await {
            return None;
        }
        fs::read(&path).await.ok()
    }

    pub async fn put(&self, url: &str, bytes: &[u8]) {
        let path = self.entry_path(url);
        if let Some(parent) = path.parent() {
            let _ = fs::create_dir_all(parent).await;
        }
        let _ = fs::write(&path, bytes).await;
    }

    /// Drops an entry, e.g. after a response that cached but failed to parse.
    pub async fn purge(&self, url: &str) {
        let _ = fs::remove_file(self.entry_path(url)).await;
    }
}

async fn entry_is_fresh(path: &Path, ttl: Duration) -> bool {
    let Ok(metadata) = fs::metadata(path).await else {
        return false;
    };
    let Ok(modified) = metadata.modified() else {
        // No mtime on this filesystem; treat the entry as fresh.
        return true;
    };
    match modified.elapsed() {
        Ok(age) => age <= ttl,
        // mtime in the future (clock skew); keep the entry.
        Err(_) => true,
    }
}
