//! Conversion pipeline orchestration
//!
//! One request-scoped operation: validate → stage → extract → render →
//! publish → cleanup. The first failing stage short-circuits the rest, the
//! staged copy is released on every exit path, and no partial artifact is
//! ever published. Collaborators are injected at construction.

use std::sync::Arc;

use super::error::{ConvertError, ConvertResult};
use super::extract;
use super::render::{DocumentRenderer, RenderEngine};
use super::types::{ConversionArtifact, ConversionResult, UploadSubmission};
use super::validate;
use crate::storage::ArtifactStore;

/// Sequences the conversion stages for one upload
#[derive(Clone)]
pub struct ConversionPipeline {
    store: ArtifactStore,
    renderer: Arc<DocumentRenderer>,
}

impl ConversionPipeline {
    pub fn new(store: ArtifactStore, engine: Arc<dyn RenderEngine>) -> Self {
        Self {
            store,
            renderer: Arc::new(DocumentRenderer::new(engine)),
        }
    }

    /// Convert one submission, mapping every failure to a stable descriptor
    pub async fn convert(&self, submission: UploadSubmission) -> ConversionResult {
        match self.try_convert(&submission).await {
            Ok(artifact) => {
                tracing::info!(
                    source = %submission.file_name,
                    artifact = %artifact.file_name,
                    size = artifact.size,
                    "Conversion complete"
                );
                ConversionResult::ok(artifact)
            }
            Err(err) => {
                tracing::warn!(
                    source = %submission.file_name,
                    code = err.code(),
                    error = %err,
                    "Conversion failed"
                );
                ConversionResult::failed(&err)
            }
        }
    }

    /// Run the staged pipeline, returning the raw typed outcome
    pub async fn try_convert(
        &self,
        submission: &UploadSubmission,
    ) -> ConvertResult<ConversionArtifact> {
        validate::validate(submission)?;

        // Extraction and rendering both work from a fresh staged copy; the
        // upload stream itself is never handed to a consumer.
        let staged = self
            .store
            .stage_temp(&submission.file_name, &submission.data)
            .await?;

        let result = self.run_staged(submission, &staged).await;

        // Cleanup runs on success and failure alike
        self.store.release_temp(&staged).await;

        result
    }

    async fn run_staged(
        &self,
        submission: &UploadSubmission,
        staged: &std::path::Path,
    ) -> ConvertResult<ConversionArtifact> {
        let document = extract::extract(staged).await?;

        tracing::debug!(
            source = %submission.file_name,
            blocks = document.len(),
            "Extracted document"
        );

        let pdf_bytes = self.renderer.render(&document).await?;

        self.store.publish(&submission.output_name(), &pdf_bytes).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::testing::docx_bytes;
    use crate::convert::RenderEngine;
    use async_trait::async_trait;
    use tempfile::TempDir;

    /// Engine that echoes the joined content back as the "PDF" bytes
    struct EchoEngine;

    #[async_trait]
    impl RenderEngine for EchoEngine {
        async fn render(&self, content: &str) -> ConvertResult<Vec<u8>> {
            Ok(content.as_bytes().to_vec())
        }
    }

    /// Engine that always fails, simulating an unavailable binary
    struct BrokenEngine;

    #[async_trait]
    impl RenderEngine for BrokenEngine {
        async fn render(&self, _content: &str) -> ConvertResult<Vec<u8>> {
            Err(ConvertError::RenderFailure("engine unavailable".into()))
        }
    }

    struct Fixture {
        dir: TempDir,
        store: ArtifactStore,
    }

    async fn fixture() -> Fixture {
        let dir = TempDir::new().unwrap();
        let store = ArtifactStore::new(dir.path().join("staging"), dir.path().join("artifacts"));
        store.ensure_dirs().await.unwrap();
        Fixture { dir, store }
    }

    async fn staging_is_empty(fix: &Fixture) -> bool {
        let mut entries = tokio::fs::read_dir(fix.dir.path().join("staging"))
            .await
            .unwrap();
        entries.next_entry().await.unwrap().is_none()
    }

    #[tokio::test]
    async fn test_end_to_end_success() {
        let fix = fixture().await;
        let pipeline = ConversionPipeline::new(fix.store.clone(), Arc::new(EchoEngine));

        let submission =
            UploadSubmission::new("greeting.docx", docx_bytes(&["Hello", "World"]));
        let result = pipeline.convert(submission).await;

        assert!(result.success);
        let artifact = result.artifact.unwrap();
        assert_eq!(artifact.file_name, "greeting.pdf");
        assert_eq!(artifact.url, "/files/greeting.pdf");

        // Rendered text content equals the blocks joined with a line break
        let bytes = fix.store.retrieve("greeting.pdf").await.unwrap().unwrap();
        assert_eq!(bytes, b"Hello\nWorld");

        // Staged copy is gone after completion
        assert!(staging_is_empty(&fix).await);
    }

    #[tokio::test]
    async fn test_empty_source_document_converts() {
        let fix = fixture().await;
        let pipeline = ConversionPipeline::new(fix.store.clone(), Arc::new(EchoEngine));

        let submission = UploadSubmission::new("blank.docx", docx_bytes(&[]));
        let result = pipeline.convert(submission).await;

        assert!(result.success);
        let bytes = fix.store.retrieve("blank.pdf").await.unwrap().unwrap();
        assert!(bytes.is_empty());
    }

    #[tokio::test]
    async fn test_txt_upload_rejected_without_artifact() {
        let fix = fixture().await;
        let pipeline = ConversionPipeline::new(fix.store.clone(), Arc::new(EchoEngine));

        let submission = UploadSubmission::new("notes.txt", b"plain text".to_vec());
        let result = pipeline.convert(submission).await;

        assert!(!result.success);
        assert_eq!(result.error.unwrap().code, "UNSUPPORTED_FORMAT");

        // Rejection happens before staging: nothing ever touched the store
        assert!(staging_is_empty(&fix).await);
        assert!(fix.store.retrieve("notes.pdf").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_empty_submission_rejected() {
        let fix = fixture().await;
        let pipeline = ConversionPipeline::new(fix.store.clone(), Arc::new(EchoEngine));

        let submission = UploadSubmission::new("empty.docx", Vec::new());
        let result = pipeline.convert(submission).await;

        assert!(!result.success);
        assert_eq!(result.error.unwrap().code, "EMPTY_SUBMISSION");
    }

    #[tokio::test]
    async fn test_malformed_source_cleans_up_staging() {
        let fix = fixture().await;
        let pipeline = ConversionPipeline::new(fix.store.clone(), Arc::new(EchoEngine));

        let submission = UploadSubmission::new("broken.docx", b"not a zip".to_vec());
        let result = pipeline.convert(submission).await;

        assert!(!result.success);
        assert_eq!(result.error.unwrap().code, "MALFORMED_SOURCE");
        assert!(staging_is_empty(&fix).await);
        assert!(fix.store.retrieve("broken.pdf").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_render_failure_publishes_nothing_and_cleans_up() {
        let fix = fixture().await;
        let pipeline = ConversionPipeline::new(fix.store.clone(), Arc::new(BrokenEngine));

        let submission = UploadSubmission::new("doomed.docx", docx_bytes(&["content"]));
        let result = pipeline.convert(submission).await;

        assert!(!result.success);
        assert_eq!(result.error.unwrap().code, "RENDER_FAILURE");

        // No partial artifact, no leftover staged copy
        assert!(fix.store.retrieve("doomed.pdf").await.unwrap().is_none());
        assert!(staging_is_empty(&fix).await);
    }

    #[tokio::test]
    async fn test_same_name_reconversion_overwrites() {
        let fix = fixture().await;
        let pipeline = ConversionPipeline::new(fix.store.clone(), Arc::new(EchoEngine));

        let first = UploadSubmission::new("doc.docx", docx_bytes(&["first"]));
        let second = UploadSubmission::new("doc.docx", docx_bytes(&["second"]));

        assert!(pipeline.convert(first).await.success);
        assert!(pipeline.convert(second).await.success);

        let bytes = fix.store.retrieve("doc.pdf").await.unwrap().unwrap();
        assert_eq!(bytes, b"second");
    }
}
