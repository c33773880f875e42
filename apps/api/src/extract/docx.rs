use std::io::{Cursor, Read};

use regex::Regex;
use tracing::warn;

const DOCUMENT_PART: &str = "word/document.xml";

// Text runs, paragraph ends, run tabs, and line/page/carriage breaks, in document order.
// Tab stops (`<w:tab w:val=.. w:pos=../>` inside `<w:tabs>`) always carry attributes.
const MARKUP_PATTERN: &str =
    r"(?s)<w:t(?:\s[^>]*)?>(.*?)</w:t>|</w:p>|<w:tab/>|<w:(?:br|cr)(?:\s[^>]*)?/>";

const ENTITY_PATTERN: &str = r"&(?:#x([0-9A-Fa-f]+)|#([0-9]+)|(lt|gt|quot|apos|amp));";

/// Pulls plain text out of the main document part of a `.docx` container.
#[derive(Debug, Clone)]
pub struct DocxReader {
    markup: Regex,
    entity: Regex,
}

impl DocxReader {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            markup: Regex::new(MARKUP_PATTERN)?,
            entity: Regex::new(ENTITY_PATTERN)?,
        })
    }

    /// Unreadable containers or a missing document part yield an empty string.
    pub fn extract_text(&self, bytes: &[u8]) -> String {
        match read_document_xml(bytes) {
            Ok(xml) => self.xml_to_text(&xml),
            Err(e) => {
                warn!("DOCX extraction failed: {e}");
                String::new()
            }
        }
    }

    fn xml_to_text(&self, xml: &str) -> String {
        let mut text = String::new();
        for caps in self.markup.captures_iter(xml) {
            match caps.get(1) {
                Some(run) => text.push_str(&self.decode_entities(run.as_str())),
                None => match caps.get(0).map(|m| m.as_str()) {
                    Some("<w:tab/>") => text.push('\t'),
                    _ => text.push('\n'),
                },
            }
        }
        text.trim_end().to_string()
    }

    /// Resolves the predefined XML entities and numeric character references in
    /// one pass. Unknown or invalid references are left as written.
    fn decode_entities(&self, raw: &str) -> String {
        self.entity
            .replace_all(raw, |caps: &regex::Captures| {
                let code_point = match (caps.get(1), caps.get(2)) {
                    (Some(hex), _) => u32::from_str_radix(hex.as_str(), 16).ok(),
                    (_, Some(dec)) => dec.as_str().parse::<u32>().ok(),
                    _ => None,
                };
                if let Some(c) = code_point.and_then(char::from_u32) {
                    return c.to_string();
                }
                match caps.get(3).map(|m| m.as_str()) {
                    Some("lt") => "<".to_string(),
                    Some("gt") => ">".to_string(),
                    Some("quot") => "\"".to_string(),
                    Some("apos") => "'".to_string(),
                    Some("amp") => "&".to_string(),
                    _ => caps[0].to_string(),
                }
            })
            .into_owned()
    }
}

fn read_document_xml(bytes: &[u8]) -> anyhow::Result<String> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;
    let mut part = archive.by_name(DOCUMENT_PART)?;
    let mut xml = String::new();
    part.read_to_string(&mut xml)?;
    Ok(xml)
}
