use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::matching::jd_analyzer::JobDescriptor;
use crate::models::match_result::{ComparisonRun, MatchResult};

/// Cosmetic light/dark preference. Has no effect on matching.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayMode {
    #[default]
    Light,
    Dark,
}

impl FromStr for DisplayMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(DisplayMode::Light),
            "dark" => Ok(DisplayMode::Dark),
            other => Err(format!("unknown display mode '{other}' (expected light or dark)")),
        }
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayMode::Light => f.write_str("light"),
            DisplayMode::Dark => f.write_str("dark"),
        }
    }
}

/// Per-user working state: the active job, the latest run and the run history.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub job: Option<JobDescriptor>,
    pub latest_run: Option<ComparisonRun>,
    pub history_unlocked: bool,
    pub display_mode: DisplayMode,
    pub created_at: DateTime<Utc>,
    /// Last time a request read or changed this session; drives idle eviction.
    pub last_active: DateTime<Utc>,
    // append-only
    history: Vec<MatchResult>,
}

impl Session {
    pub fn new(display_mode: DisplayMode) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            job: None,
            latest_run: None,
            history_unlocked: false,
            display_mode,
            created_at: now,
            last_active: now,
            history: Vec::new(),
        }
    }

    pub fn touch(&mut self) {
        self.last_active = Utc::now();
    }

    /// The analyzed job, or an empty descriptor when no JD has been analyzed yet.
    pub fn active_job(&self) -> JobDescriptor {
        self.job.clone().unwrap_or_default()
    }

    /// Replaces the latest run and appends its results to history, in order.
    pub fn record_run(&mut self, run: ComparisonRun) {
        self.history.extend(run.results.iter().cloned());
        self.latest_run = Some(run);
    }

    pub fn history(&self) -> &[MatchResult] {
        &self.history
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(name: &str) -> MatchResult {
        MatchResult {
            candidate_name: name.to_string(),
            score: 50.0,
            matched_keywords: vec!["Rust".to_string()],
            missing_keywords: vec!["Go".to_string()],
            message: String::new(),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_display_mode_parses_case_insensitively() {
        assert_eq!("Dark".parse::<DisplayMode>().unwrap(), DisplayMode::Dark);
        assert_eq!(" light ".parse::<DisplayMode>().unwrap(), DisplayMode::Light);
        assert!("sepia".parse::<DisplayMode>().is_err());
    }

    #[test]
    fn test_display_mode_serde_snake_case() {
        let json = serde_json::to_string(&DisplayMode::Dark).unwrap();
        assert_eq!(json, r#""dark""#);
    }

    #[test]
    fn test_active_job_defaults_to_empty_descriptor() {
        let session = Session::new(DisplayMode::Light);
        assert!(session.active_job().is_empty());
    }

    #[test]
    fn test_record_run_appends_history_and_replaces_latest() {
        let mut session = Session::new(DisplayMode::Light);
        session.record_run(ComparisonRun::new("SRE".into(), vec![result("a"), result("b")]));
        session.record_run(ComparisonRun::new("SRE".into(), vec![result("c")]));

        let names: Vec<&str> = session
            .history()
            .iter()
            .map(|r| r.candidate_name.as_str())
            .collect();
        assert_eq!(names, vec!["a", "b", "c"]);

        let latest = session.latest_run.as_ref().unwrap();
        assert_eq!(latest.results.len(), 1);
        assert!(latest.find("c").is_some());
        assert!(latest.find("a").is_none());
    }
}
