//! Turning uploaded files into indexable text.
//!
//! PDFs are extracted page by page; everything else is treated as UTF-8 text.

use crate::error::{Result, VoxragError};
use tracing::debug;

/// Whether a filename names a PDF document (case-insensitive).
pub fn is_pdf(filename: &str) -> bool {
    filename.to_lowercase().ends_with(".pdf")
}

/// Extract the text of a file based on its name.
///
/// PDF parsing runs on the blocking pool. A parser failure, including a panic inside
/// the parser, is reported as [`VoxragError::Pdf`].
pub async fn extract_text(filename: &str, bytes: Vec<u8>) -> Result<String> {
    if !is_pdf(filename) {
        return Ok(decode_text(&bytes));
    }

    match tokio::task::spawn_blocking(move || extract_pdf_text(&bytes)).await {
        Ok(result) => result,
        Err(e) => Err(VoxragError::Pdf(e.to_string())),
    }
}

/// Extract all pages of a PDF, each page followed by a newline.
pub fn extract_pdf_text(bytes: &[u8]) -> Result<String> {
    let pages = pdf_extract::extract_text_from_mem_by_pages(bytes)
        .map_err(|e| VoxragError::Pdf(e.to_string()))?;
    debug!("Extracted {} PDF pages", pages.len());

    let mut text = String::new();
    for page in pages {
        text.push_str(&page);
        text.push('\n');
    }
    Ok(text)
}

/// Decode bytes as UTF-8, dropping invalid sequences.
pub fn decode_text(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => String::from_utf8_lossy(bytes)
            .chars()
            .filter(|c| *c != char::REPLACEMENT_CHARACTER)
            .collect(),
    }
}
