//! DOCX content extraction
//!
//! Opens a staged source file as a ZIP package and walks the
//! WordprocessingML in `word/document.xml`, emitting one `TextBlock` per
//! top-level paragraph in document order. Styling, tables, images, and
//! headers/footers are dropped. Extraction is deterministic: identical bytes
//! always produce an identical block sequence.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use quick_xml::events::Event;
use quick_xml::Reader;
use zip::ZipArchive;

use super::error::{ConvertError, ConvertResult};
use super::types::{ExtractedDocument, TextBlock};

/// Main document part inside the DOCX package
const DOCUMENT_ENTRY: &str = "word/document.xml";

/// Extract the text content of a staged DOCX file
///
/// Parsing is CPU-bound, so it runs on the blocking pool.
pub async fn extract(path: &Path) -> ConvertResult<ExtractedDocument> {
    let path: PathBuf = path.to_path_buf();

    tokio::task::spawn_blocking(move || extract_sync(&path))
        .await
        .map_err(|e| ConvertError::MalformedSource(format!("Task join error: {}", e)))?
}

/// Synchronous extraction from a filesystem path
pub fn extract_sync(path: &Path) -> ConvertResult<ExtractedDocument> {
    let file = File::open(path)
        .map_err(|e| ConvertError::StorageFailure(format!("Failed to open staged source: {}", e)))?;

    let mut archive = ZipArchive::new(file)
        .map_err(|e| ConvertError::MalformedSource(format!("Not a DOCX package: {}", e)))?;

    let mut xml = String::new();
    archive
        .by_name(DOCUMENT_ENTRY)
        .map_err(|e| {
            ConvertError::MalformedSource(format!("Missing {}: {}", DOCUMENT_ENTRY, e))
        })?
        .read_to_string(&mut xml)
        .map_err(|e| ConvertError::MalformedSource(format!("Unreadable document part: {}", e)))?;

    parse_document_xml(&xml)
}

/// Walk the WordprocessingML event stream and collect paragraph text
///
/// Only `w:t` runs contribute text; `w:tab` becomes a literal tab. `w:tbl`
/// and `w:drawing` subtrees are skipped entirely, so paragraphs nested in
/// tables or text boxes never produce blocks.
fn parse_document_xml(xml: &str) -> ConvertResult<ExtractedDocument> {
    let mut reader = Reader::from_str(xml);

    let mut blocks = Vec::new();
    let mut current: Option<String> = None;
    let mut in_text_run = false;
    let mut skip_depth: usize = 0;

    loop {
        match reader.read_event() {
            Err(e) => {
                return Err(ConvertError::MalformedSource(format!(
                    "Invalid document XML: {}",
                    e
                )))
            }
            Ok(Event::Eof) => break,
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"w:tbl" | b"w:drawing" => skip_depth += 1,
                b"w:p" if skip_depth == 0 => current = Some(String::new()),
                b"w:t" if skip_depth == 0 && current.is_some() => in_text_run = true,
                _ => {}
            },
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:tbl" | b"w:drawing" => skip_depth = skip_depth.saturating_sub(1),
                b"w:p" if skip_depth == 0 => {
                    if let Some(text) = current.take() {
                        blocks.push(TextBlock(text));
                    }
                }
                b"w:t" => in_text_run = false,
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.name().as_ref() {
                // Word emits blank paragraphs as self-closing <w:p/>
                b"w:p" if skip_depth == 0 => blocks.push(TextBlock(String::new())),
                b"w:tab" if skip_depth == 0 => {
                    if let Some(text) = current.as_mut() {
                        text.push('\t');
                    }
                }
                _ => {}
            },
            Ok(Event::Text(e)) => {
                if in_text_run {
                    let unescaped = e.unescape().map_err(|e| {
                        ConvertError::MalformedSource(format!("Invalid text content: {}", e))
                    })?;
                    if let Some(text) = current.as_mut() {
                        text.push_str(&unescaped);
                    }
                }
            }
            Ok(_) => {}
        }
    }

    Ok(ExtractedDocument::new(blocks))
}
