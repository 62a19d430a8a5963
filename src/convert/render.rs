//! PDF rendering
//!
//! The extracted text is handed to an external HTML-to-PDF engine
//! (wkhtmltopdf by default). The engine is a black box behind the
//! `RenderEngine` trait: a correctly configured binary turns the wrapped
//! content into PDF bytes on stdout; an absent or failing binary surfaces as
//! `RenderFailure`. Exactly one attempt per request — retry policy, if any,
//! belongs to the caller.

use std::process::Stdio;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use super::error::{ConvertError, ConvertResult};
use super::types::ExtractedDocument;

// ============================================================================
// Render Engine Trait
// ============================================================================

/// External conversion capability: content in, PDF bytes out
#[async_trait]
pub trait RenderEngine: Send + Sync {
    /// Render the joined text content into an output byte stream
    async fn render(&self, content: &str) -> ConvertResult<Vec<u8>>;
}

// ============================================================================
// wkhtmltopdf Engine
// ============================================================================

/// Engine backed by a wkhtmltopdf-style binary (stdin HTML, stdout PDF)
pub struct WkhtmltopdfEngine {
    binary: String,
}

impl WkhtmltopdfEngine {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Wrap plain text in a minimal HTML page for the engine
    ///
    /// Text is escaped and line breaks become `<br>` so the rendered page
    /// preserves the one-line-per-block layout.
    fn wrap_html(content: &str) -> String {
        let escaped = html_escape::encode_text(content).replace('\n', "<br>\n");
        format!(
            "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"></head>\n<body>{}</body></html>\n",
            escaped
        )
    }
}

#[async_trait]
impl RenderEngine for WkhtmltopdfEngine {
    async fn render(&self, content: &str) -> ConvertResult<Vec<u8>> {
        let html = Self::wrap_html(content);

        let mut child = Command::new(&self.binary)
            .arg("--quiet")
            .arg("-") // read HTML from stdin
            .arg("-") // write PDF to stdout
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                ConvertError::RenderFailure(format!(
                    "Failed to launch render engine '{}': {}",
                    self.binary, e
                ))
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(html.as_bytes()).await.map_err(|e| {
                ConvertError::RenderFailure(format!("Failed to feed render engine: {}", e))
            })?;
        }

        let output = child.wait_with_output().await.map_err(|e| {
            ConvertError::RenderFailure(format!("Render engine did not complete: {}", e))
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ConvertError::RenderFailure(format!(
                "Render engine exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        Ok(output.stdout)
    }
}

// ============================================================================
// Document Renderer
// ============================================================================

/// Converts an extracted document into a PDF byte stream
pub struct DocumentRenderer {
    engine: Arc<dyn RenderEngine>,
}

impl DocumentRenderer {
    pub fn new(engine: Arc<dyn RenderEngine>) -> Self {
        Self { engine }
    }

    /// Render the document: blocks joined with a single line break, in order
    pub async fn render(&self, doc: &ExtractedDocument) -> ConvertResult<Vec<u8>> {
        self.engine.render(&doc.joined()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::types::TextBlock;
    use tokio::sync::Mutex;

    /// Engine that records the content it was asked to render
    struct CapturingEngine {
        seen: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl RenderEngine for CapturingEngine {
        async fn render(&self, content: &str) -> ConvertResult<Vec<u8>> {
            self.seen.lock().await.push(content.to_string());
            Ok(content.as_bytes().to_vec())
        }
    }

    #[test]
    fn test_wrap_html_escapes_markup() {
        let html = WkhtmltopdfEngine::wrap_html("a < b & c");
        assert!(html.contains("a &lt; b &amp; c"));
    }

    #[test]
    fn test_wrap_html_turns_newlines_into_breaks() {
        let html = WkhtmltopdfEngine::wrap_html("Hello\nWorld");
        assert!(html.contains("Hello<br>\nWorld"));
    }

    #[tokio::test]
    async fn test_renderer_joins_blocks_with_line_breaks() {
        let engine = Arc::new(CapturingEngine {
            seen: Mutex::new(Vec::new()),
        });
        let renderer = DocumentRenderer::new(engine.clone());

        let doc = ExtractedDocument::new(vec![
            TextBlock("Hello".to_string()),
            TextBlock("World".to_string()),
        ]);

        let bytes = renderer.render(&doc).await.unwrap();
        assert_eq!(bytes, b"Hello\nWorld");

        let seen = engine.seen.lock().await;
        assert_eq!(seen.as_slice(), ["Hello\nWorld"]);
    }

    #[tokio::test]
    async fn test_missing_binary_is_render_failure() {
        let engine = WkhtmltopdfEngine::new("/nonexistent/render-engine");
        let result = engine.render("anything").await;
        assert!(matches!(result, Err(ConvertError::RenderFailure(_))));
    }
}
