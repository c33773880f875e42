//! CSV export of run results and session history.

use axum::{
    http::header,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::models::match_result::MatchResult;

pub const RESULTS_FILE_NAME: &str = "match_results.csv";
pub const HISTORY_FILE_NAME: &str = "full_history.csv";

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// One exported row. Column names are the headers written to the file.
#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    #[serde(rename = "Candidate")]
    candidate: &'a str,
    #[serde(rename = "Score")]
    score: String,
    #[serde(rename = "Matched Skills")]
    matched_skills: String,
    #[serde(rename = "Missing Skills")]
    missing_skills: String,
    #[serde(rename = "InMail")]
    message: &'a str,
    #[serde(rename = "Date")]
    date: String,
}

impl<'a> From<&'a MatchResult> for CsvRow<'a> {
    fn from(result: &'a MatchResult) -> Self {
        Self {
            candidate: &result.candidate_name,
            score: format_score(result),
            matched_skills: result.matched_keywords.join(", "),
            missing_skills: result.missing_keywords.join(", "),
            message: &result.message,
            date: result.timestamp.format(DATE_FORMAT).to_string(),
        }
    }
}

/// Score with one decimal (`66.7%`, `100.0%`, `0.0%`), or a bare `0%` when the
/// job had no keywords to match.
pub fn format_score(result: &MatchResult) -> String {
    if result.matched_keywords.is_empty() && result.missing_keywords.is_empty() {
        return "0%".to_string();
    }
    format!("{:.1}%", result.score)
}

/// Serializes results (header row included, even when empty) to CSV bytes.
pub fn results_to_csv(results: &[MatchResult]) -> anyhow::Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    if results.is_empty() {
        writer.write_record([
            "Candidate",
            "Score",
            "Matched Skills",
            "Missing Skills",
            "InMail",
            "Date",
        ])?;
    }
    for result in results {
        writer.serialize(CsvRow::from(result))?;
    }
    writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("failed to flush CSV writer: {e}"))
}

/// Wraps CSV bytes as a file download.
pub fn csv_attachment(file_name: &str, bytes: Vec<u8>) -> Response {
    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        bytes,
    )
        .into_response()
}
