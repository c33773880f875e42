//! Keyword Catalog: the ordered skill taxonomy the JD analyzer matches against.
//!
//! Built once at startup, either from the built-in list or from a JSON file
//! (`CATALOG_PATH`) holding an array of strings. Each term carries a
//! precompiled whole-word pattern so analysis never compiles regexes per request.

use std::collections::HashSet;
use std::path::Path;

use regex::Regex;
use thiserror::Error;
use tracing::info;

/// Skill terms recognised when no external catalog is configured.
pub const DEFAULT_SKILLS: &[&str] = &[
    "Python",
    "Go",
    "Java",
    "Rust",
    "C++",
    "C#",
    "Golang",
    "TypeScript",
    "React",
    "Angular",
    "Node.js",
    "Flask",
    "Django",
    "Spring",
    "Express",
    "AWS",
    "GCP",
    "Azure",
    "Cloud",
    "CI/CD",
    "DevOps",
    "Docker",
    "Kubernetes",
    "Terraform",
    "Ansible",
    "Linux",
    "Jenkins",
    "Bash",
    "Shell",
    "SQL",
    "NoSQL",
    "PostgreSQL",
    "MongoDB",
    "Snowflake",
    "ETL",
    "Airflow",
    "GraphQL",
    "REST API",
    "SOAP",
    "Microservices",
    "Big Data",
    "Machine Learning",
    "NLP",
    "LLM",
    "Pandas",
    "NumPy",
    "Spark",
];

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("catalog file '{path}' must be a JSON array of strings: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("catalog term at position {0} is empty")]
    EmptyTerm(usize),

    #[error("catalog has no terms")]
    NoTerms,

    #[error("invalid pattern for '{term}': {source}")]
    Pattern {
        term: String,
        #[source]
        source: regex::Error,
    },
}

/// A single catalog entry with its compiled whole-word matcher.
#[derive(Debug, Clone)]
pub struct CatalogTerm {
    term: String,
    pattern: Regex,
}

impl CatalogTerm {
    fn new(term: String) -> Result<Self, CatalogError> {
        // The boundary groups consume one non-word neighbour, or anchor at the text edge,
        // so "Go" never matches inside "Going" and "C++" still matches before a space.
        let source = format!(r"(?i)(?:^|[^\w]){}(?:$|[^\w])", regex::escape(&term));
        let pattern = Regex::new(&source).map_err(|source| CatalogError::Pattern {
            term: term.clone(),
            source,
        })?;
        Ok(Self { term, pattern })
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    /// Case-insensitive whole-word presence of this term in `text`.
    pub fn occurs_in(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }
}

/// Ordered, case-insensitively distinct list of skill terms.
#[derive(Debug, Clone)]
pub struct KeywordCatalog {
    terms: Vec<CatalogTerm>,
}

impl KeywordCatalog {
    /// Builds a catalog from raw terms. Terms are trimmed; later case-insensitive
    /// duplicates are dropped so the first spelling wins.
    pub fn from_terms<I, S>(terms: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut compiled = Vec::new();

        for (position, raw) in terms.into_iter().enumerate() {
            let term = raw.as_ref().trim();
            if term.is_empty() {
                return Err(CatalogError::EmptyTerm(position));
            }
            if seen.insert(term.to_lowercase()) {
                compiled.push(CatalogTerm::new(term.to_string())?);
            }
        }

        if compiled.is_empty() {
            return Err(CatalogError::NoTerms);
        }

        Ok(Self { terms: compiled })
    }

    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_terms(DEFAULT_SKILLS)
    }

    /// Reads a JSON array of strings from `path`.
    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let display = path.display().to_string();
        let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: display.clone(),
            source,
        })?;
        let terms: Vec<String> = serde_json::from_str(&raw).map_err(|source| {
            CatalogError::Parse {
                path: display,
                source,
            }
        })?;
        Self::from_terms(terms)
    }

    /// Loads the external catalog when a path is configured, otherwise the built-in list.
    pub fn load(path: Option<&Path>) -> Result<Self, CatalogError> {
        let catalog = match path {
            Some(p) => Self::from_path(p)?,
            None => Self::builtin()?,
        };
        info!(
            "Keyword catalog loaded: {} terms ({})",
            catalog.len(),
            path.map(|p| p.display().to_string())
                .unwrap_or_else(|| "built-in".to_string())
        );
        Ok(catalog)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CatalogTerm> {
        self.terms.iter()
    }

    pub fn term_names(&self) -> Vec<String> {
        self.terms.iter().map(|t| t.term.clone()).collect()
    }

    /// Never zero: construction rejects a catalog without terms.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.terms.len()
    }
}
