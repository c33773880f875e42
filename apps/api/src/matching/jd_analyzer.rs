//! JD Analyzer: derives a job title and the catalog keywords present in a raw job description.

use std::collections::BTreeSet;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::matching::catalog::{CatalogError, KeywordCatalog};

const TITLE_PATTERN: &str = r"(?i)(job title|position):\s*(.+)";

/// The active job for a session: a title plus the catalog terms found in the JD.
///
/// `keywords` is an ordered set so display and matching order are reproducible.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobDescriptor {
    pub title: String,
    pub keywords: BTreeSet<String>,
}

impl JobDescriptor {
    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.keywords.is_empty()
    }
}

/// Keyword extraction uses strict whole-word matching; candidate matching in
/// `matcher` is plain substring containment. The two steps intentionally differ.
#[derive(Debug, Clone)]
pub struct JdAnalyzer {
    catalog: KeywordCatalog,
    title_pattern: Regex,
}

impl JdAnalyzer {
    pub fn new(catalog: KeywordCatalog) -> Result<Self, CatalogError> {
        let title_pattern = Regex::new(TITLE_PATTERN).map_err(|source| CatalogError::Pattern {
            term: TITLE_PATTERN.to_string(),
            source,
        })?;
        Ok(Self {
            catalog,
            title_pattern,
        })
    }

    pub fn catalog(&self) -> &KeywordCatalog {
        &self.catalog
    }

    /// Never fails: blank input yields an empty descriptor.
    pub fn analyze(&self, jd_text: &str) -> JobDescriptor {
        JobDescriptor {
            title: self.extract_title(jd_text),
            keywords: self.extract_keywords(jd_text),
        }
    }

    /// `Job Title:` / `Position:` label if present, else the first non-blank line.
    pub fn extract_title(&self, jd_text: &str) -> String {
        if let Some(caps) = self.title_pattern.captures(jd_text) {
            if let Some(title) = caps.get(2) {
                return title.as_str().trim().to_string();
            }
        }

        jd_text
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .unwrap_or_default()
            .to_string()
    }

    pub fn extract_keywords(&self, jd_text: &str) -> BTreeSet<String> {
        if jd_text.trim().is_empty() {
            return BTreeSet::new();
        }

        self.catalog
            .iter()
            .filter(|term| term.occurs_in(jd_text))
            .map(|term| term.term().to_string())
            .collect()
    }
}
