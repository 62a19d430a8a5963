//! Artifact storage
//!
//! Filesystem lifecycle for the two artifact kinds the pipeline touches:
//! transient staged uploads and published conversion outputs. Staging names
//! carry a per-request UUID so concurrent requests never collide; publication
//! goes through a write-to-temporary-then-rename step so the published path
//! is never observable partially written. A later publish under the same
//! logical name replaces the earlier artifact (last-write-wins, documented).

use std::path::{Path, PathBuf};

use chrono::Utc;
use uuid::Uuid;

use crate::convert::{ConversionArtifact, ConvertError, ConvertResult};

/// URL prefix under which published artifacts are served
pub const FILES_PREFIX: &str = "/files";

/// Local filesystem artifact store
#[derive(Clone)]
pub struct ArtifactStore {
    staging_dir: PathBuf,
    publish_dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(staging_dir: impl Into<PathBuf>, publish_dir: impl Into<PathBuf>) -> Self {
        Self {
            staging_dir: staging_dir.into(),
            publish_dir: publish_dir.into(),
        }
    }

    /// Create both storage roots if they do not exist yet
    pub async fn ensure_dirs(&self) -> ConvertResult<()> {
        for dir in [&self.staging_dir, &self.publish_dir] {
            tokio::fs::create_dir_all(dir).await.map_err(|e| {
                ConvertError::StorageFailure(format!("Failed to create storage root: {}", e))
            })?;
        }
        Ok(())
    }

    // ========================================================================
    // Staging
    // ========================================================================

    /// Write a transient artifact to a request-scoped location
    ///
    /// The staging name embeds a fresh UUID, so two concurrent requests
    /// uploading the same file name stage to different paths.
    pub async fn stage_temp(&self, name: &str, bytes: &[u8]) -> ConvertResult<PathBuf> {
        let staged_name = format!("{}-{}", Uuid::new_v4(), sanitize_name(name));
        let path = self.staging_dir.join(staged_name);

        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| ConvertError::StorageFailure(format!("Failed to stage upload: {}", e)))?;

        tracing::debug!(path = %path.display(), size = bytes.len(), "Staged upload");
        Ok(path)
    }

    /// Remove a transient artifact
    ///
    /// Idempotent: a missing path is a no-op. Called on every pipeline exit
    /// path, so failures here are logged rather than propagated.
    pub async fn release_temp(&self, path: &Path) {
        match tokio::fs::remove_file(path).await {
            Ok(()) => tracing::debug!(path = %path.display(), "Released staged upload"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to release staged upload");
            }
        }
    }

    // ========================================================================
    // Publication
    // ========================================================================

    /// Publish a final artifact atomically under its logical name
    pub async fn publish(&self, name: &str, bytes: &[u8]) -> ConvertResult<ConversionArtifact> {
        let name = sanitize_name(name);
        let final_path = self.publish_dir.join(&name);

        // Temporary sibling in the same directory keeps the rename atomic
        let tmp_path = self.publish_dir.join(format!(".{}.tmp", Uuid::new_v4()));

        tokio::fs::write(&tmp_path, bytes)
            .await
            .map_err(|e| ConvertError::StorageFailure(format!("Failed to write artifact: {}", e)))?;

        if let Err(e) = tokio::fs::rename(&tmp_path, &final_path).await {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(ConvertError::StorageFailure(format!(
                "Failed to publish artifact: {}",
                e
            )));
        }

        tracing::info!(name = %name, size = bytes.len(), "Published artifact");

        Ok(ConversionArtifact {
            url: format!("{}/{}", FILES_PREFIX, name),
            file_name: name,
            size: bytes.len() as u64,
            created_at: Utc::now(),
        })
    }

    /// Read back a published artifact by logical name
    ///
    /// Returns `None` for unknown names. Names that would escape the publish
    /// root are treated as unknown rather than resolved.
    pub async fn retrieve(&self, name: &str) -> ConvertResult<Option<Vec<u8>>> {
        if name != sanitize_name(name) {
            return Ok(None);
        }

        match tokio::fs::read(self.publish_dir.join(name)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ConvertError::StorageFailure(format!(
                "Failed to read artifact: {}",
                e
            ))),
        }
    }
}

/// Reduce a submitted name to a safe base name
///
/// Path separators and parent components are dropped so client-controlled
/// names cannot address files outside the storage roots.
fn sanitize_name(name: &str) -> String {
    let base = name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(name)
        .trim_matches('.');

    if base.is_empty() {
        "unnamed".to_string()
    } else {
        base.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_store(dir: &TempDir) -> ArtifactStore {
        ArtifactStore::new(dir.path().join("staging"), dir.path().join("artifacts"))
    }

    #[tokio::test]
    async fn test_stage_and_release() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);
        store.ensure_dirs().await.unwrap();

        let path = store.stage_temp("report.docx", b"bytes").await.unwrap();
        assert!(path.exists());
        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"bytes");

        store.release_temp(&path).await;
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_release_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);
        store.ensure_dirs().await.unwrap();

        let path = store.stage_temp("report.docx", b"bytes").await.unwrap();
        store.release_temp(&path).await;
        // Second release of the same path must be a silent no-op
        store.release_temp(&path).await;
    }

    #[tokio::test]
    async fn test_concurrent_stages_do_not_collide() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);
        store.ensure_dirs().await.unwrap();

        let first = store.stage_temp("same.docx", b"one").await.unwrap();
        let second = store.stage_temp("same.docx", b"two").await.unwrap();

        assert_ne!(first, second);
        assert_eq!(tokio::fs::read(&first).await.unwrap(), b"one");
        assert_eq!(tokio::fs::read(&second).await.unwrap(), b"two");
    }

    #[tokio::test]
    async fn test_publish_and_retrieve() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);
        store.ensure_dirs().await.unwrap();

        let artifact = store.publish("report.pdf", b"%PDF-fake").await.unwrap();
        assert_eq!(artifact.file_name, "report.pdf");
        assert_eq!(artifact.size, 9);
        assert_eq!(artifact.url, "/files/report.pdf");

        let bytes = store.retrieve("report.pdf").await.unwrap().unwrap();
        assert_eq!(bytes, b"%PDF-fake");
    }

    #[tokio::test]
    async fn test_publish_leaves_no_temporaries() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);
        store.ensure_dirs().await.unwrap();

        store.publish("a.pdf", b"content").await.unwrap();

        let mut entries = tokio::fs::read_dir(dir.path().join("artifacts"))
            .await
            .unwrap();
        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await.unwrap() {
            names.push(entry.file_name().to_string_lossy().to_string());
        }
        assert_eq!(names, ["a.pdf"]);
    }

    #[tokio::test]
    async fn test_same_name_publish_is_last_write_wins() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);
        store.ensure_dirs().await.unwrap();

        store.publish("doc.pdf", b"first").await.unwrap();
        store.publish("doc.pdf", b"second").await.unwrap();

        let bytes = store.retrieve("doc.pdf").await.unwrap().unwrap();
        assert_eq!(bytes, b"second");
    }

    #[tokio::test]
    async fn test_retrieve_unknown_name() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);
        store.ensure_dirs().await.unwrap();

        assert!(store.retrieve("missing.pdf").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_retrieve_rejects_traversal() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);
        store.ensure_dirs().await.unwrap();

        assert!(store.retrieve("../escape.pdf").await.unwrap().is_none());
        assert!(store.retrieve("a/b.pdf").await.unwrap().is_none());
    }

    #[test]
    fn test_sanitize_name() {
        assert_eq!(sanitize_name("report.pdf"), "report.pdf");
        assert_eq!(sanitize_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_name("dir\\file.pdf"), "file.pdf");
        assert_eq!(sanitize_name("..."), "unnamed");
    }
}
