//! Document text extraction for uploaded resumes.
//!
//! Extraction is best-effort: a document that cannot be read becomes empty
//! text, which the matcher scores like any other candidate. Only an
//! unsupported file type is reported back as an error.

pub mod docx;
pub mod pdf;

use thiserror::Error;
use tracing::info;

use crate::extract::docx::DocxReader;
use crate::extract::pdf::extract_pdf_text;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("unsupported document type for '{0}': expected .pdf or .docx")]
    UnsupportedType(String),

    #[error("invalid extraction pattern: {0}")]
    Pattern(#[from] regex::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
}

impl DocumentKind {
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let (_, ext) = file_name.rsplit_once('.')?;
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(DocumentKind::Pdf),
            "docx" => Some(DocumentKind::Docx),
            _ => None,
        }
    }
}

/// Dispatches on the file extension to the matching reader.
#[derive(Debug, Clone)]
pub struct DocumentExtractor {
    docx: DocxReader,
}

impl DocumentExtractor {
    pub fn new() -> Result<Self, ExtractError> {
        Ok(Self {
            docx: DocxReader::new()?,
        })
    }

    /// CPU-bound; call from `spawn_blocking` inside async handlers.
    pub fn extract_text(&self, file_name: &str, bytes: &[u8]) -> Result<String, ExtractError> {
        let kind = DocumentKind::from_file_name(file_name)
            .ok_or_else(|| ExtractError::UnsupportedType(file_name.to_string()))?;

        let text = match kind {
            DocumentKind::Pdf => extract_pdf_text(bytes),
            DocumentKind::Docx => self.docx.extract_text(bytes),
        };

        info!(
            "Extracted {} chars from '{}' ({:?}, {} bytes)",
            text.chars().count(),
            file_name,
            kind,
            bytes.len()
        );
        Ok(text)
    }
}
