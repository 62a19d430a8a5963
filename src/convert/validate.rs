//! Upload validation
//!
//! Fast, cheap pre-filter on the declared file name and byte length. No
//! content-structure inspection happens here; a valid-looking name wrapping
//! garbage bytes is discovered later by the extractor.

use super::error::{ConvertError, ConvertResult};
use super::types::{UploadSubmission, SOURCE_EXTENSION};

/// Validate an upload submission
///
/// Pure inspection: accepts only a `.docx` declared extension with non-empty
/// content. No side effects.
pub fn validate(submission: &UploadSubmission) -> ConvertResult<()> {
    if submission.data.is_empty() {
        return Err(ConvertError::EmptySubmission);
    }

    match submission.extension() {
        Some(ext) if ext == SOURCE_EXTENSION => Ok(()),
        Some(ext) => Err(ConvertError::UnsupportedFormat(ext)),
        None => Err(ConvertError::UnsupportedFormat(
            submission.file_name.clone(),
        )),
    }
}
