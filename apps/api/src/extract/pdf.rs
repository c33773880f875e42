use std::panic::{catch_unwind, AssertUnwindSafe};

use pdf_extract::{output_doc_page, Document, OutputError, PlainTextOutput};
use tracing::{debug, warn};

/// Extracts text from a PDF held in memory, page by page.
///
/// Each page is trimmed and pages are joined with a single space. A page that
/// fails (or makes the parser panic) contributes an empty fragment; only a
/// document that cannot be loaded at all yields an empty string.
pub fn extract_pdf_text(bytes: &[u8]) -> String {
    let Some(doc) = load_document(bytes) else {
        return String::new();
    };

    let page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();
    let pages: Vec<String> = page_numbers
        .iter()
        .map(|&page_num| extract_page(&doc, page_num))
        .collect();

    debug!("PDF extracted: {} page(s)", pages.len());
    pages
        .iter()
        .map(|page| page.trim())
        .collect::<Vec<_>>()
        .join(" ")
}

fn load_document(bytes: &[u8]) -> Option<Document> {
    let loaded = catch_unwind(AssertUnwindSafe(|| Document::load_mem(bytes)));

    let mut doc = match loaded {
        Ok(Ok(doc)) => doc,
        Ok(Err(e)) => {
            warn!("PDF could not be loaded: {e}");
            return None;
        }
        Err(_) => {
            warn!("PDF loading panicked; treating document as empty");
            return None;
        }
    };

    // Owner-password-only documents open with an empty user password.
    if doc.is_encrypted() {
        if let Err(e) = doc.decrypt("") {
            warn!("Encrypted PDF could not be opened: {e}");
            return None;
        }
    }
    Some(doc)
}

fn extract_page(doc: &Document, page_num: u32) -> String {
    let extracted = catch_unwind(AssertUnwindSafe(|| -> Result<String, OutputError> {
        let mut text = String::new();
        {
            let mut output = PlainTextOutput::new(&mut text);
            output_doc_page(doc, &mut output, page_num)?;
        }
        Ok(text)
    }));

    match extracted {
        Ok(Ok(text)) => text,
        Ok(Err(e)) => {
            warn!("PDF page {page_num} extraction failed: {e}");
            String::new()
        }
        Err(_) => {
            warn!("PDF page {page_num} extraction panicked; using empty text");
            String::new()
        }
    }
}
