//! Conversion error taxonomy
//!
//! Every failure the pipeline can produce maps to one of these variants.
//! All of them are recoverable at the request boundary: the caller gets a
//! stable code and may simply resubmit.

use thiserror::Error;

/// Conversion pipeline error type
#[derive(Debug, Error)]
pub enum ConvertError {
    /// No authenticated account for the request
    #[error("Authentication required")]
    Unauthenticated,

    /// Declared file name does not carry the expected extension
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Zero-length upload
    #[error("Empty submission")]
    EmptySubmission,

    /// Source bytes cannot be opened as a DOCX package
    #[error("Malformed source document: {0}")]
    MalformedSource(String),

    /// External rendering engine unavailable or failed
    #[error("Render failure: {0}")]
    RenderFailure(String),

    /// Filesystem error while staging or publishing an artifact
    #[error("Storage failure: {0}")]
    StorageFailure(String),
}

/// Result type alias for pipeline operations
pub type ConvertResult<T> = std::result::Result<T, ConvertError>;

impl ConvertError {
    /// Stable machine-readable code for this error
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::UnsupportedFormat(_) => "UNSUPPORTED_FORMAT",
            Self::EmptySubmission => "EMPTY_SUBMISSION",
            Self::MalformedSource(_) => "MALFORMED_SOURCE",
            Self::RenderFailure(_) => "RENDER_FAILURE",
            Self::StorageFailure(_) => "STORAGE_FAILURE",
        }
    }

    /// Get HTTP status code for this error
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::UnsupportedFormat(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::EmptySubmission => StatusCode::BAD_REQUEST,
            Self::MalformedSource(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::RenderFailure(_) => StatusCode::BAD_GATEWAY,
            Self::StorageFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// User-facing message for this error
    ///
    /// `StorageFailure` detail may contain filesystem paths; it is logged
    /// server-side and replaced with a generic message here.
    pub fn user_message(&self) -> String {
        match self {
            Self::StorageFailure(_) => "Storage failure".to_string(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_distinct() {
        let errors = [
            ConvertError::Unauthenticated,
            ConvertError::UnsupportedFormat("txt".into()),
            ConvertError::EmptySubmission,
            ConvertError::MalformedSource("not a zip".into()),
            ConvertError::RenderFailure("engine missing".into()),
            ConvertError::StorageFailure("disk full".into()),
        ];
        let codes: std::collections::HashSet<_> = errors.iter().map(|e| e.code()).collect();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_storage_detail_not_exposed() {
        let err = ConvertError::StorageFailure("/var/lib/docpress/staging/x".into());
        assert!(!err.user_message().contains("/var"));
    }
}
