//! Run Orchestrator: scores each submitted candidate against the session's
//! active job and records the results.

use chrono::Utc;
use tracing::{info, warn};

use crate::matching::jd_analyzer::JobDescriptor;
use crate::matching::matcher::match_keywords;
use crate::matching::outreach::compose;
use crate::models::match_result::{ComparisonRun, MatchResult};
use crate::models::session::Session;

/// Candidate label used for pasted profile text.
pub const PROFILE_CANDIDATE_NAME: &str = "LinkedIn Paste";

const DOCUMENT_EXTENSIONS: [&str; 2] = [".pdf", ".docx"];

/// One piece of candidate text submitted for comparison.
#[derive(Debug, Clone)]
pub enum CandidateInput {
    /// Text extracted from an uploaded resume.
    Document { file_name: String, text: String },
    /// Pasted profile text; has no candidate identity.
    Profile { text: String },
}

impl CandidateInput {
    /// `None` for blank profile text, which does not count as a submission.
    pub fn profile(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        if text.trim().is_empty() {
            None
        } else {
            Some(CandidateInput::Profile { text })
        }
    }

    pub fn display_name(&self) -> String {
        match self {
            CandidateInput::Document { file_name, .. } => candidate_name_from_file(file_name),
            CandidateInput::Profile { .. } => PROFILE_CANDIDATE_NAME.to_string(),
        }
    }

    fn text(&self) -> &str {
        match self {
            CandidateInput::Document { text, .. } | CandidateInput::Profile { text } => text,
        }
    }

    fn is_named(&self) -> bool {
        matches!(self, CandidateInput::Document { .. })
    }
}

/// Strips a trailing `.pdf` / `.docx` (any case) from an uploaded file name.
/// A name that would be left blank (`.pdf`) is kept as uploaded.
pub fn candidate_name_from_file(file_name: &str) -> String {
    let lower = file_name.to_ascii_lowercase();
    DOCUMENT_EXTENSIONS
        .iter()
        .find(|ext| lower.ends_with(*ext))
        .map(|ext| &file_name[..file_name.len() - ext.len()])
        .filter(|stem| !stem.trim().is_empty())
        .unwrap_or(file_name)
        .to_string()
}

/// Scores every input against `job`, in submission order.
pub fn score_candidates(job: &JobDescriptor, inputs: &[CandidateInput]) -> Vec<MatchResult> {
    inputs
        .iter()
        .map(|input| {
            let name = input.display_name();
            let outcome = match_keywords(input.text(), &job.keywords);
            let message = compose(
                input.is_named().then_some(name.as_str()),
                &outcome.matched,
                &job.title,
            );
            MatchResult {
                candidate_name: name,
                score: outcome.score,
                matched_keywords: outcome.matched,
                missing_keywords: outcome.missing,
                message,
                timestamp: Utc::now(),
            }
        })
        .collect()
}

#[derive(Debug, Clone)]
pub enum RunOutcome {
    /// Nothing was submitted; session state is untouched.
    NoData,
    Completed(ComparisonRun),
}

/// Runs a comparison for `session` and appends the results to its history.
pub fn run_comparison(session: &mut Session, inputs: &[CandidateInput]) -> RunOutcome {
    if inputs.is_empty() {
        info!("Session {}: comparison requested with no candidate input", session.id);
        return RunOutcome::NoData;
    }

    let job = session.active_job();
    if job.is_empty() {
        warn!("Session {}: no job description analyzed; all scores will be 0", session.id);
    }
    let results = score_candidates(&job, inputs);
    let run = ComparisonRun::new(job.title.clone(), results);

    info!(
        "Session {}: run {} scored {} candidate(s) against '{}' ({} keywords)",
        session.id,
        run.run_id,
        run.results.len(),
        job.title,
        job.keywords.len()
    );

    session.record_run(run.clone());
    RunOutcome::Completed(run)
}
