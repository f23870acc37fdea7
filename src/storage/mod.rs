//! Artifact persistence
//!
//! Artifacts are response bodies keyed by URL. The filesystem layout
//! mirrors the remote path hierarchy: the URL scheme is stripped and a
//! trailing-slash URL maps to an index file, so `https://ex.com/docs/`
//! lands at `<root>/ex.com/docs/index.html`.
//!
//! Writes are not transactional; the capture ledger upstream guarantees at
//! most one write per URL.

use crate::KagamiError;
use async_trait::async_trait;
use std::path::PathBuf;

/// File name that stands in for a trailing-slash URL
pub const INDEX_FILE: &str = "index.html";

/// Write seam for captured response bodies
#[async_trait]
pub trait ArtifactSink: Send + Sync {
    /// Persists `bytes` under the path derived from `url`, overwriting
    /// any previous content.
    async fn save(&self, url: &str, bytes: &[u8]) -> crate::Result<()>;
}

/// Stores artifacts on the local filesystem under a fixed root
#[derive(Debug, Clone)]
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Derives the mirrored path for `url`.
    pub fn artifact_path(&self, url: &str) -> PathBuf {
        let stripped = url
            .strip_prefix("https://")
            .or_else(|| url.strip_prefix("http://"))
            .unwrap_or(url);

        if let Some(dir) = stripped.strip_suffix('/') {
            self.root.join(dir).join(INDEX_FILE)
        } else {
            self.root.join(stripped)
        }
    }
}

#[async_trait]
impl ArtifactSink for FsStore {
    async fn save(&self, url: &str, bytes: &[u8]) -> crate::Result<()> {
        let path = self.artifact_path(url);

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| KagamiError::Artifact {
                    path: path.clone(),
                    source,
                })?;
        }

        tokio::fs::write(&path, bytes)
            .await
            .map_err(|source| KagamiError::Artifact {
                path: path.clone(),
                source,
            })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_path_strips_https_scheme() {
        let store = FsStore::new("/mirror");
        assert_eq!(
            store.artifact_path("https://ex.com/a/b.css"),
            PathBuf::from("/mirror/ex.com/a/b.css")
        );
    }

    #[test]
    fn test_path_strips_http_scheme() {
        let store = FsStore::new("/mirror");
        assert_eq!(
            store.artifact_path("http://ex.com/a"),
            PathBuf::from("/mirror/ex.com/a")
        );
    }

    #[test]
    fn test_trailing_slash_maps_to_index_file() {
        let store = FsStore::new("/mirror");
        assert_eq!(
            store.artifact_path("https://ex.com/docs/"),
            PathBuf::from("/mirror/ex.com/docs/index.html")
        );
    }

    #[test]
    fn test_bare_host_is_a_file() {
        let store = FsStore::new("/mirror");
        assert_eq!(
            store.artifact_path("https://ex.com"),
            PathBuf::from("/mirror/ex.com")
        );
    }

    #[tokio::test]
    async fn test_save_creates_intermediate_dirs() {
        let dir = TempDir::new().unwrap();
        let store = FsStore::new(dir.path());

        store
            .save("https://ex.com/deep/nested/page.html", b"hello")
            .await
            .unwrap();

        let written = dir.path().join("ex.com/deep/nested/page.html");
        assert_eq!(std::fs::read(written).unwrap(), b"hello");
    }

    #[tokio::test]
    async fn test_save_overwrites() {
        let dir = TempDir::new().unwrap();
        let store = FsStore::new(dir.path());

        store.save("https://ex.com/page", b"first").await.unwrap();
        store.save("https://ex.com/page", b"second").await.unwrap();

        let written = dir.path().join("ex.com/page");
        assert_eq!(std::fs::read(written).unwrap(), b"second");
    }

    #[tokio::test]
    async fn test_save_error_names_the_path() {
        let dir = TempDir::new().unwrap();
        let store = FsStore::new(dir.path());

        // A file where a directory is needed forces the failure.
        store.save("https://ex.com/blocker", b"x").await.unwrap();
        let result = store.save("https://ex.com/blocker/child", b"y").await;

        match result {
            Err(KagamiError::Artifact { path, .. }) => {
                assert!(path.ends_with("ex.com/blocker/child"));
            }
            other => panic!("expected Artifact error, got {:?}", other.map(|_| ())),
        }
    }
}
