//! Artifact storage keyed by (run, tool, case).

use std::path::PathBuf;

use async_trait::async_trait;
use swapbench_core::types::DbId;

/// Failure persisting an artifact payload.
#[derive(Debug, thiserror::Error)]
#[error("failed to store artifact at {path}: {source}")]
pub struct ArtifactStoreError {
    pub path: String,
    #[source]
    pub source: std::io::Error,
}

/// Durable storage for generation artifacts.
///
/// The location is deterministic given `(run_id, tool_id, case_id)`, so
/// reporting can resolve any artifact later without extra bookkeeping.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Persist `png` and return the stable URI it is retrievable under.
    async fn save(
        &self,
        run_id: DbId,
        tool_id: &str,
        case_id: &str,
        png: &[u8],
    ) -> Result<String, ArtifactStoreError>;
}

/// Filesystem-backed artifact store.
///
/// Writes `<root>/<run_id>/<tool_id>/<case_id>.png` and returns the
/// matching `/runs/...` URI the presentation layer serves from.
pub struct FsArtifactStore {
    root: PathBuf,
}

impl FsArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl ArtifactStore for FsArtifactStore {
    async fn save(
        &self,
        run_id: DbId,
        tool_id: &str,
        case_id: &str,
        png: &[u8],
    ) -> Result<String, ArtifactStoreError> {
        let dir = self.root.join(run_id.to_string()).join(tool_id);
        let path = dir.join(format!("{case_id}.png"));
        let display = path.display().to_string();

        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|source| ArtifactStoreError {
                path: display.clone(),
                source,
            })?;
        tokio::fs::write(&path, png)
            .await
            .map_err(|source| ArtifactStoreError {
                path: display,
                source,
            })?;

        Ok(format!("/runs/{run_id}/{tool_id}/{case_id}.png"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn save_writes_file_and_returns_deterministic_uri() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsArtifactStore::new(dir.path());

        let uri = store.save(7, "faceswap", "tc_01", b"png-bytes").await.unwrap();
        assert_eq!(uri, "/runs/7/faceswap/tc_01.png");

        let on_disk = dir.path().join("7").join("faceswap").join("tc_01.png");
        assert_eq!(std::fs::read(on_disk).unwrap(), b"png-bytes");
    }

    #[tokio::test]
    async fn save_overwrites_previous_artifact_for_same_triple() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsArtifactStore::new(dir.path());

        store.save(7, "faceswap", "tc_01", b"first").await.unwrap();
        let uri = store.save(7, "faceswap", "tc_01", b"second").await.unwrap();
        assert_eq!(uri, "/runs/7/faceswap/tc_01.png");

        let on_disk = dir.path().join("7").join("faceswap").join("tc_01.png");
        assert_eq!(std::fs::read(on_disk).unwrap(), b"second");
    }

    #[tokio::test]
    async fn unwritable_root_surfaces_io_error() {
        let store = FsArtifactStore::new("/proc/no-such-root");
        let err = store.save(1, "faceswap", "tc_01", b"x").await.unwrap_err();
        assert!(err.path.contains("tc_01.png"));
    }
}
