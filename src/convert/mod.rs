//! Document conversion pipeline
//!
//! Everything between a validated upload and a published PDF artifact:
//!
//! - `validate`: cheap pre-filter on the declared name and byte length
//! - `extract`: DOCX package → ordered plain-text blocks
//! - `render`: joined blocks → PDF bytes via an external engine
//! - `pipeline`: the orchestrator tying the stages together

pub mod error;
pub mod extract;
pub mod pipeline;
pub mod render;
pub mod types;
pub mod validate;

pub use error::{ConvertError, ConvertResult};
pub use pipeline::ConversionPipeline;
pub use render::{DocumentRenderer, RenderEngine, WkhtmltopdfEngine};
pub use types::{
    ConversionArtifact, ConversionResult, ErrorDescriptor, ExtractedDocument, TextBlock,
    UploadSubmission,
};

#[cfg(test)]
pub(crate) mod testing {
    //! Shared fixtures for pipeline and extraction tests

    use std::io::{Cursor, Write};
    use zip::write::SimpleFileOptions;

    /// Build a minimal DOCX package containing the given paragraphs
    pub fn docx_bytes(paragraphs: &[&str]) -> Vec<u8> {
        let body: String = paragraphs
            .iter()
            .map(|p| format!("<w:p><w:r><w:t>{}</w:t></w:r></w:p>", p))
            .collect();
        docx_with_body(&body)
    }

    /// Build a DOCX package with a raw WordprocessingML body
    pub fn docx_with_body(body: &str) -> Vec<u8> {
        let xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
<w:body>{}</w:body>
</w:document>"#,
            body
        );

        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("word/document.xml", SimpleFileOptions::default())
            .unwrap();
        writer.write_all(xml.as_bytes()).unwrap();
        writer.finish().unwrap().into_inner()
    }
}
