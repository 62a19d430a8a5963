//! Conversion pipeline types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::ConvertError;

/// Source extension accepted by the pipeline
pub const SOURCE_EXTENSION: &str = "docx";

/// Extension of published artifacts
pub const OUTPUT_EXTENSION: &str = "pdf";

// ============================================================================
// Submission Types
// ============================================================================

/// One uploaded file, as received from the request
///
/// Ephemeral: owned by the pipeline for the duration of a single request and
/// never persisted beyond conversion.
#[derive(Debug, Clone)]
pub struct UploadSubmission {
    /// Declared file name (as submitted by the client)
    pub file_name: String,

    /// Declared content type, if the client sent one
    pub content_type: Option<String>,

    /// Raw file bytes
    pub data: Vec<u8>,
}

impl UploadSubmission {
    pub fn new(file_name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: None,
            data,
        }
    }

    /// Declared extension, lowercased, without the dot
    pub fn extension(&self) -> Option<String> {
        let (stem, ext) = self.file_name.rsplit_once('.')?;
        if stem.is_empty() {
            return None;
        }
        Some(ext.to_ascii_lowercase())
    }

    /// Base name with the output extension swapped in
    ///
    /// `report.docx` becomes `report.pdf`.
    pub fn output_name(&self) -> String {
        let base = self
            .file_name
            .rsplit_once('.')
            .map(|(stem, _)| stem)
            .unwrap_or(&self.file_name);
        format!("{}.{}", base, OUTPUT_EXTENSION)
    }
}

// ============================================================================
// Extracted Content
// ============================================================================

/// One paragraph-equivalent unit of extracted plain text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBlock(pub String);

impl TextBlock {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Ordered sequence of text blocks extracted from a source document
///
/// Block order equals source paragraph order. An empty sequence is valid and
/// produces an empty rendered output, not an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedDocument {
    pub blocks: Vec<TextBlock>,
}

impl ExtractedDocument {
    pub fn new(blocks: Vec<TextBlock>) -> Self {
        Self { blocks }
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Renderable content: blocks joined with a single line break
    pub fn joined(&self) -> String {
        self.blocks
            .iter()
            .map(|b| b.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

// ============================================================================
// Artifact Types
// ============================================================================

/// A published conversion artifact
///
/// Write-once: created at publication and never mutated. A later publish of
/// the same logical name replaces it wholesale (last-write-wins).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionArtifact {
    /// Published file name
    pub file_name: String,

    /// Retrievable path for the files route
    pub url: String,

    /// Size in bytes
    pub size: u64,

    /// When the artifact was published
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Result Types
// ============================================================================

/// Stable error descriptor returned to the caller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDescriptor {
    /// Machine-readable error code
    pub code: String,

    /// Human-readable message
    pub message: String,
}

impl From<&ConvertError> for ErrorDescriptor {
    fn from(err: &ConvertError) -> Self {
        Self {
            code: err.code().to_string(),
            message: err.user_message(),
        }
    }
}

/// Outcome of one conversion request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionResult {
    /// Whether the conversion succeeded
    pub success: bool,

    /// Reference to the published artifact, on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact: Option<ConversionArtifact>,

    /// Error descriptor, on failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorDescriptor>,
}

impl ConversionResult {
    pub fn ok(artifact: ConversionArtifact) -> Self {
        Self {
            success: true,
            artifact: Some(artifact),
            error: None,
        }
    }

    pub fn failed(err: &ConvertError) -> Self {
        Self {
            success: false,
            artifact: None,
            error: Some(ErrorDescriptor::from(err)),
        }
    }
}
