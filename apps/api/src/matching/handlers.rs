//! Axum route handlers for the Matching API.

use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State},
    response::Response,
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::export::{csv_attachment, format_score, results_to_csv, RESULTS_FILE_NAME};
use crate::extract::DocumentExtractor;
use crate::matching::jd_analyzer::JobDescriptor;
use crate::matching::orchestrator::{run_comparison, CandidateInput, RunOutcome};
use crate::models::match_result::{ComparisonRun, MatchResult};
use crate::state::AppState;

const RESUME_FIELD: &str = "resumes";
const PROFILE_FIELD: &str = "profile_text";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub terms: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeJdRequest {
    pub jd_text: String,
}

#[derive(Debug, Deserialize)]
pub struct TextCandidate {
    pub name: String,
    pub text: String,
}

/// JSON counterpart of the multipart upload: candidate texts already extracted.
#[derive(Debug, Deserialize)]
pub struct TextRunRequest {
    #[serde(default)]
    pub candidates: Vec<TextCandidate>,
    #[serde(default)]
    pub profile_text: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Completed,
    NoData,
}

/// One line of the interactive scoreboard.
#[derive(Debug, Serialize)]
pub struct ScoreboardRow {
    pub candidate: String,
    pub score: String,
    pub matched_skills: String,
    pub missing_skills: String,
}

impl From<&MatchResult> for ScoreboardRow {
    fn from(result: &MatchResult) -> Self {
        Self {
            candidate: result.candidate_name.clone(),
            score: format_score(result),
            matched_skills: result.matched_keywords.join(", "),
            missing_skills: result.missing_keywords.join(", "),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RunResponse {
    pub status: RunStatus,
    pub message: String,
    pub run_id: Option<Uuid>,
    pub job_title: Option<String>,
    pub scoreboard: Vec<ScoreboardRow>,
    pub results: Vec<MatchResult>,
}

impl From<RunOutcome> for RunResponse {
    fn from(outcome: RunOutcome) -> Self {
        match outcome {
            RunOutcome::NoData => RunResponse {
                status: RunStatus::NoData,
                message: "No data to compare.".to_string(),
                run_id: None,
                job_title: None,
                scoreboard: vec![],
                results: vec![],
            },
            RunOutcome::Completed(run) => RunResponse::completed(run),
        }
    }
}

impl RunResponse {
    fn completed(run: ComparisonRun) -> Self {
        RunResponse {
            status: RunStatus::Completed,
            message: "Scoreboard generated!".to_string(),
            run_id: Some(run.run_id),
            job_title: Some(run.job_title),
            scoreboard: run.results.iter().map(ScoreboardRow::from).collect(),
            results: run.results,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct OutreachResponse {
    pub candidate: String,
    pub message: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/catalog
pub async fn handle_get_catalog(State(state): State<AppState>) -> Json<CatalogResponse> {
    Json(CatalogResponse {
        terms: state.analyzer.catalog().term_names(),
    })
}

/// POST /api/v1/sessions/:id/job
///
/// Analyzes a JD and makes it the session's active job. Blank text is accepted
/// and yields an empty descriptor.
pub async fn handle_analyze_jd(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<AnalyzeJdRequest>,
) -> Result<Json<JobDescriptor>, AppError> {
    let job = state.analyzer.analyze(&request.jd_text);

    let stored = job.clone();
    state
        .sessions
        .update(session_id, move |session| session.job = Some(stored))
        .await?;

    info!(
        "Session {session_id}: JD analyzed, title='{}', {} keyword(s)",
        job.title,
        job.keywords.len()
    );
    Ok(Json(job))
}

/// GET /api/v1/sessions/:id/job
pub async fn handle_get_job(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<JobDescriptor>, AppError> {
    let session = state.sessions.get(session_id).await?;
    session
        .job
        .map(Json)
        .ok_or_else(|| AppError::NotFound("No job description analyzed yet".to_string()))
}

/// POST /api/v1/sessions/:id/runs
///
/// Multipart form: any number of `resumes` files (.pdf / .docx) plus an
/// optional `profile_text` field. Resumes are scored first, in upload order.
pub async fn handle_run_upload(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<RunResponse>, AppError> {
    state.sessions.get(session_id).await?;

    let mut uploads: Vec<(String, Bytes)> = Vec::new();
    let mut profile_text: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some(RESUME_FIELD) => {
                let file_name = field
                    .file_name()
                    .map(str::to_string)
                    .ok_or_else(|| AppError::Validation("Resume upload is missing a file name".to_string()))?;
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read '{file_name}': {e}")))?;
                uploads.push((file_name, data));
            }
            Some(PROFILE_FIELD) => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read profile text: {e}")))?;
                profile_text = Some(text);
            }
            _ => {}
        }
    }

    let mut inputs = extract_uploads(state.extractor.clone(), uploads).await?;
    inputs.extend(profile_text.and_then(CandidateInput::profile));

    let outcome = state
        .sessions
        .update(session_id, |session| run_comparison(session, &inputs))
        .await?;
    Ok(Json(outcome.into()))
}

/// POST /api/v1/sessions/:id/runs/text
pub async fn handle_run_text(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<TextRunRequest>,
) -> Result<Json<RunResponse>, AppError> {
    if let Some(position) = request.candidates.iter().position(|c| c.name.trim().is_empty()) {
        return Err(AppError::Validation(format!(
            "Candidate at position {position} has a blank name"
        )));
    }

    let mut inputs: Vec<CandidateInput> = request
        .candidates
        .into_iter()
        .map(|c| CandidateInput::Document {
            file_name: c.name,
            text: c.text,
        })
        .collect();
    inputs.extend(request.profile_text.and_then(CandidateInput::profile));

    let outcome = state
        .sessions
        .update(session_id, |session| run_comparison(session, &inputs))
        .await?;
    Ok(Json(outcome.into()))
}

/// GET /api/v1/sessions/:id/runs/latest
pub async fn handle_get_latest_run(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<RunResponse>, AppError> {
    let run = latest_run(&state, session_id).await?;
    Ok(Json(RunResponse::completed(run)))
}

/// GET /api/v1/sessions/:id/runs/latest/messages/:candidate
pub async fn handle_get_outreach(
    State(state): State<AppState>,
    Path((session_id, candidate)): Path<(Uuid, String)>,
) -> Result<Json<OutreachResponse>, AppError> {
    let run = latest_run(&state, session_id).await?;
    let result = run
        .find(&candidate)
        .ok_or_else(|| AppError::NotFound(format!("No candidate '{candidate}' in the latest run")))?;

    Ok(Json(OutreachResponse {
        candidate: result.candidate_name.clone(),
        message: result.message.clone(),
    }))
}

/// GET /api/v1/sessions/:id/runs/latest/export
pub async fn handle_export_latest_run(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let run = latest_run(&state, session_id).await?;
    let csv = results_to_csv(&run.results)?;
    Ok(csv_attachment(RESULTS_FILE_NAME, csv))
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

async fn latest_run(state: &AppState, session_id: Uuid) -> Result<ComparisonRun, AppError> {
    state
        .sessions
        .get(session_id)
        .await?
        .latest_run
        .ok_or_else(|| AppError::NotFound("No comparison run yet".to_string()))
}

/// Extracts every upload off the async executor, preserving upload order.
async fn extract_uploads(
    extractor: Arc<DocumentExtractor>,
    uploads: Vec<(String, Bytes)>,
) -> Result<Vec<CandidateInput>, AppError> {
    if uploads.is_empty() {
        return Ok(vec![]);
    }

    tokio::task::spawn_blocking(move || {
        uploads
            .into_iter()
            .map(|(file_name, data)| {
                let text = extractor.extract_text(&file_name, &data)?;
                Ok(CandidateInput::Document { file_name, text })
            })
            .collect::<Result<Vec<_>, AppError>>()
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in extraction: {e}")))?
}
