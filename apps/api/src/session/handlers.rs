//! Axum route handlers for sessions, display mode, and the gated history view.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Response,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::export::{csv_attachment, results_to_csv, HISTORY_FILE_NAME};
use crate::matching::jd_analyzer::JobDescriptor;
use crate::models::match_result::MatchResult;
use crate::models::session::{DisplayMode, Session};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SessionSummary {
    pub session_id: Uuid,
    pub display_mode: DisplayMode,
    pub job: Option<JobDescriptor>,
    pub latest_run_id: Option<Uuid>,
    pub history_count: usize,
    pub history_unlocked: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&Session> for SessionSummary {
    fn from(session: &Session) -> Self {
        Self {
            session_id: session.id,
            display_mode: session.display_mode,
            job: session.job.clone(),
            latest_run_id: session.latest_run.as_ref().map(|r| r.run_id),
            history_count: session.history().len(),
            history_unlocked: session.history_unlocked,
            created_at: session.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct DisplayModeRequest {
    pub display_mode: DisplayMode,
}

#[derive(Debug, Deserialize)]
pub struct UnlockRequest {
    pub secret: String,
}

#[derive(Debug, Serialize)]
pub struct UnlockResponse {
    pub history_unlocked: bool,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub entries: Vec<MatchResult>,
    pub total: usize,
    pub message: Option<String>,
}

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<SessionSummary>) {
    let session = state.sessions.create(state.config.display_mode).await;
    (StatusCode::CREATED, Json(SessionSummary::from(&session)))
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionSummary>, AppError> {
    let session = state.sessions.get(session_id).await?;
    Ok(Json(SessionSummary::from(&session)))
}

/// DELETE /api/v1/sessions/:id
///
/// Ends the session and drops its job, runs and history.
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.sessions.remove(session_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/v1/sessions/:id/display-mode
pub async fn handle_set_display_mode(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<DisplayModeRequest>,
) -> Result<Json<SessionSummary>, AppError> {
    let summary = state
        .sessions
        .update(session_id, |session| {
            session.display_mode = request.display_mode;
            SessionSummary::from(&*session)
        })
        .await?;
    Ok(Json(summary))
}

/// POST /api/v1/sessions/:id/unlock
///
/// Checks the presented secret with the configured access gate. No lockout:
/// callers may retry freely.
pub async fn handle_unlock_history(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<UnlockRequest>,
) -> Result<Json<UnlockResponse>, AppError> {
    state.sessions.get(session_id).await?;

    if !state.access_gate.authorize(&request.secret).await {
        warn!(
            "Session {session_id}: history unlock rejected by {} gate",
            state.access_gate.name()
        );
        return Err(AppError::Unauthorized("Incorrect password.".to_string()));
    }

    state
        .sessions
        .update(session_id, |session| session.history_unlocked = true)
        .await?;
    info!("Session {session_id}: history view unlocked");

    Ok(Json(UnlockResponse {
        history_unlocked: true,
    }))
}

/// GET /api/v1/sessions/:id/history
pub async fn handle_get_history(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<HistoryResponse>, AppError> {
    let session = unlocked_session(&state, session_id).await?;
    let entries = session.history().to_vec();
    let message = entries
        .is_empty()
        .then(|| "No matching history available yet.".to_string());

    Ok(Json(HistoryResponse {
        total: entries.len(),
        entries,
        message,
    }))
}

/// GET /api/v1/sessions/:id/history/export
pub async fn handle_export_history(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let session = unlocked_session(&state, session_id).await?;
    let csv = results_to_csv(session.history())?;
    Ok(csv_attachment(HISTORY_FILE_NAME, csv))
}

async fn unlocked_session(state: &AppState, session_id: Uuid) -> Result<Session, AppError> {
    let session = state.sessions.get(session_id).await?;
    if !session.history_unlocked {
        return Err(AppError::Forbidden(
            "History view is locked; unlock it with the hiring manager password".to_string(),
        ));
    }
    Ok(session)
}
