use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Score of one candidate against the active job. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub candidate_name: String,
    pub score: f64,
    pub matched_keywords: Vec<String>,
    pub missing_keywords: Vec<String>,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// All results produced by a single comparison request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonRun {
    pub run_id: Uuid,
    pub job_title: String,
    pub results: Vec<MatchResult>,
    pub created_at: DateTime<Utc>,
}

impl ComparisonRun {
    pub fn new(job_title: String, results: Vec<MatchResult>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            job_title,
            results,
            created_at: Utc::now(),
        }
    }

    /// First result for `candidate_name`; names are not unique across uploads.
    pub fn find(&self, candidate_name: &str) -> Option<&MatchResult> {
        self.results
            .iter()
            .find(|r| r.candidate_name == candidate_name)
    }
}
