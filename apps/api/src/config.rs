use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};

use crate::models::session::DisplayMode;

const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
const DEFAULT_SESSION_IDLE_TTL_SECS: u64 = 4 * 60 * 60;
const DEFAULT_SESSION_SWEEP_INTERVAL_SECS: u64 = 5 * 60;

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    /// Shared secret for the hiring-manager history view.
    pub hiring_manager_secret: String,
    /// Optional JSON array of skill terms replacing the built-in catalog.
    pub catalog_path: Option<PathBuf>,
    /// Default display mode for new sessions (cosmetic).
    pub display_mode: DisplayMode,
    pub max_upload_bytes: usize,
    /// Sessions untouched for this long are evicted.
    pub session_idle_ttl: Duration,
    pub session_sweep_interval: Duration,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |key: &str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .with_context(|| format!("Required environment variable '{key}' is not set"))
        };

        let seconds = |key: &str, default: u64| -> Result<u64> {
            match lookup(key) {
                None => Ok(default),
                Some(v) => match v.parse::<u64>() {
                    Ok(secs) if secs > 0 => Ok(secs),
                    _ => Err(anyhow!("{key} must be a positive number of seconds")),
                },
            }
        };

        Ok(Config {
            hiring_manager_secret: require("HIRING_MANAGER_SECRET")?,
            catalog_path: lookup("CATALOG_PATH")
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
            display_mode: lookup("DISPLAY_MODE")
                .map(|v| v.parse::<DisplayMode>())
                .transpose()
                .map_err(|e| anyhow!("DISPLAY_MODE: {e}"))?
                .unwrap_or_default(),
            max_upload_bytes: lookup("MAX_UPLOAD_BYTES")
                .map(|v| v.parse::<usize>())
                .transpose()
                .context("MAX_UPLOAD_BYTES must be a positive integer")?
                .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
            session_idle_ttl: Duration::from_secs(seconds(
                "SESSION_IDLE_TTL_SECS",
                DEFAULT_SESSION_IDLE_TTL_SECS,
            )?),
            session_sweep_interval: Duration::from_secs(seconds(
                "SESSION_SWEEP_INTERVAL_SECS",
                DEFAULT_SESSION_SWEEP_INTERVAL_SECS,
            )?),
            port: lookup("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}
