//! Text Extractor: turns an uploaded résumé into plain text.
//!
//! Public entry point is infallible: a document that cannot be read yields an
//! empty string, which the session treats as "résumé not loaded yet".

use std::panic::{self, AssertUnwindSafe};

use thiserror::Error;
use tracing::{debug, warn};

mod docx;

/// Declared kind of an uploaded document, taken from its file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
    /// Anything else is decoded as UTF-8 text.
    PlainText,
}

impl DocumentKind {
    pub fn from_file_name(file_name: &str) -> Self {
        let lower = file_name.to_ascii_lowercase();
        if lower.ends_with(".pdf") {
            DocumentKind::Pdf
        } else if lower.ends_with(".docx") {
            DocumentKind::Docx
        } else {
            DocumentKind::PlainText
        }
    }
}

#[derive(Debug, Error)]
pub(crate) enum ExtractError {
    #[error("PDF parse error: {0}")]
    Pdf(String),

    #[error("PDF parser panicked")]
    PdfPanicked,

    #[error("DOCX container error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("DOCX XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Extracts plain text from a document. Never fails; unreadable input gives "".
///
/// CPU-bound for PDFs; call from `spawn_blocking` inside async handlers.
pub fn extract_text(bytes: &[u8], kind: DocumentKind) -> String {
    match try_extract(bytes, kind) {
        Ok(text) => {
            debug!("Extracted {} chars from {:?} document", text.len(), kind);
            text
        }
        Err(e) => {
            warn!("Could not extract text from {:?} document: {e}", kind);
            String::new()
        }
    }
}

fn try_extract(bytes: &[u8], kind: DocumentKind) -> Result<String, ExtractError> {
    let text = match kind {
        DocumentKind::Pdf => read_pdf(bytes)?,
        DocumentKind::Docx => docx::read_docx(bytes)?,
        DocumentKind::PlainText => read_plain_text(bytes),
    };
    Ok(text.trim().to_string())
}

fn read_pdf(bytes: &[u8]) -> Result<String, ExtractError> {
    // pdf-extract panics on some malformed inputs instead of returning an error.
    panic::catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text_from_mem(bytes)))
        .map_err(|_| ExtractError::PdfPanicked)?
        .map_err(|e| ExtractError::Pdf(format!("{e:?}")))
}

/// Lossy UTF-8 decode that drops undecodable bytes rather than substituting them.
fn read_plain_text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes)
        .trim_start_matches('\u{feff}')
        .chars()
        .filter(|&c| c != char::REPLACEMENT_CHARACTER)
        .collect()
}
