//! Configuration and settings management
//!
//! Loads settings from environment variables and optional config files.
//! The deployment carries one static API key; every bot in the gallery
//! authenticates with it.

use crate::pullstring::bot::StartOptions;
use chrono::{Local, Offset};
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

/// Application settings loaded from environment variables
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Settings {
    /// PullString web API key (bearer credential)
    pub web_api_key: String,
    /// Project identifier of the ConfigBot that serves the gallery list
    pub config_bot_project_id: String,

    /// Participant identifier for cross-device continuity
    pub participant: Option<String>,
    /// Project build to run against (e.g. "sandbox", "production")
    pub build_type: Option<String>,
    /// Language override sent on turns
    pub language: Option<String>,
    /// Locale override sent on turns
    pub locale: Option<String>,
}

impl Settings {
    /// Create new settings by loading from environment and files
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if loading fails.
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{run_mode}")).required(false))
            // Local overrides, not checked into git
            .add_source(File::with_name("config/local").required(false))
            // ignore_empty treats empty env vars as unset
            .add_source(Environment::default().ignore_empty(true))
            .build()?;

        let mut settings: Self = s.try_deserialize()?;

        // Fallback: check environment variables directly if config didn't
        // pick them up (automatic UPPER_SNAKE_CASE mapping can differ)
        if settings.participant.is_none() {
            if let Ok(val) = std::env::var("PARTICIPANT") {
                if !val.is_empty() {
                    settings.participant = Some(val);
                }
            }
        }
        if settings.build_type.is_none() {
            if let Ok(val) = std::env::var("BUILD_TYPE") {
                if !val.is_empty() {
                    settings.build_type = Some(val);
                }
            }
        }

        Ok(settings)
    }

    /// Start-call options derived from these settings plus the local clock.
    #[must_use]
    pub fn start_options(&self) -> StartOptions {
        StartOptions {
            time_zone_offset: Some(local_time_zone_offset_minutes()),
            participant: self.participant.clone(),
            build_type: self.build_type.clone(),
        }
    }
}

/// Minutes offset from UTC of the local clock, as sent on session start.
#[must_use]
pub fn local_time_zone_offset_minutes() -> i32 {
    Local::now().offset().fix().local_minus_utc() / 60
}

/// HTTP request timeout in seconds.
///
/// Uses the `HTTP_TIMEOUT_SECS` environment variable or a 30s default.
/// This prevents infinite hangs when the API is slow or unresponsive.
#[must_use]
pub fn get_http_timeout_secs() -> u64 {
    std::env::var("HTTP_TIMEOUT_SECS")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(30)
}
