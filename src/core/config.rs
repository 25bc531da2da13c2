//! # Configuration
//!
//! Environment-driven settings. `.env` is loaded by the binary before
//! `Config::from_env` runs.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

use anyhow::Result;
use std::env;
use std::time::Duration;

/// Default polling interval; must stay under one minute
pub const DEFAULT_POLL_SECONDS: u64 = 30;

/// Upper bound on a single notification dispatch
pub const DEFAULT_NOTIFY_TIMEOUT_SECONDS: u64 = 20;

/// Progress timestamps default to IST (+05:30)
pub const DEFAULT_PROGRESS_OFFSET_MINUTES: i32 = 330;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: String,
    pub log_level: String,
    pub poll_interval: Duration,
    pub notify_timeout: Duration,
    pub speech_enabled: bool,
    pub speech_language: String,
    pub audio_player: String,
    pub speech_output_path: String,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub progress_offset_minutes: i32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            database_path: "recall.db".to_string(),
            log_level: "info".to_string(),
            poll_interval: Duration::from_secs(DEFAULT_POLL_SECONDS),
            notify_timeout: Duration::from_secs(DEFAULT_NOTIFY_TIMEOUT_SECONDS),
            speech_enabled: true,
            speech_language: "en".to_string(),
            audio_player: "mpg123".to_string(),
            speech_output_path: "reminder.mp3".to_string(),
            gemini_api_key: None,
            gemini_model: "gemini-1.5-pro".to_string(),
            progress_offset_minutes: DEFAULT_PROGRESS_OFFSET_MINUTES,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup (env, tests)
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let poll_seconds = match lookup("REMINDER_POLL_SECONDS") {
            Some(v) => v
                .trim()
                .parse::<u64>()
                .map_err(|e| anyhow::anyhow!("Invalid REMINDER_POLL_SECONDS '{}': {}", v, e))?,
            None => DEFAULT_POLL_SECONDS,
        };
        // Every target minute must be sampled at least once
        if poll_seconds == 0 || poll_seconds >= 60 {
            return Err(anyhow::anyhow!(
                "REMINDER_POLL_SECONDS must be between 1 and 59, got {}",
                poll_seconds
            ));
        }

        let notify_timeout_seconds = match lookup("NOTIFY_TIMEOUT_SECONDS") {
            Some(v) => v
                .trim()
                .parse::<u64>()
                .map_err(|e| anyhow::anyhow!("Invalid NOTIFY_TIMEOUT_SECONDS '{}': {}", v, e))?,
            None => DEFAULT_NOTIFY_TIMEOUT_SECONDS,
        };

        let speech_enabled = lookup("SPEECH_ENABLED")
            .map(|v| !matches!(v.trim().to_lowercase().as_str(), "0" | "false" | "no" | "off"))
            .unwrap_or(defaults.speech_enabled);

        let progress_offset_minutes = match lookup("PROGRESS_TIMEZONE_OFFSET_MINUTES") {
            Some(v) => v.trim().parse::<i32>().map_err(|e| {
                anyhow::anyhow!("Invalid PROGRESS_TIMEZONE_OFFSET_MINUTES '{}': {}", v, e)
            })?,
            None => DEFAULT_PROGRESS_OFFSET_MINUTES,
        };

        Ok(Config {
            database_path: lookup("DATABASE_PATH").unwrap_or(defaults.database_path),
            log_level: lookup("LOG_LEVEL").unwrap_or(defaults.log_level),
            poll_interval: Duration::from_secs(poll_seconds),
            notify_timeout: Duration::from_secs(notify_timeout_seconds),
            speech_enabled,
            speech_language: lookup("SPEECH_LANGUAGE").unwrap_or(defaults.speech_language),
            audio_player: lookup("AUDIO_PLAYER").unwrap_or(defaults.audio_player),
            speech_output_path: lookup("SPEECH_OUTPUT_PATH")
                .unwrap_or(defaults.speech_output_path),
            gemini_api_key: lookup("GEMINI_API_KEY").filter(|k| !k.trim().is_empty()),
            gemini_model: lookup("GEMINI_MODEL").unwrap_or(defaults.gemini_model),
            progress_offset_minutes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_env_empty() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.database_path, "recall.db");
        assert_eq!(config.poll_interval, Duration::from_secs(30));
        assert_eq!(config.notify_timeout, Duration::from_secs(20));
        assert!(config.speech_enabled);
        assert!(config.gemini_api_key.is_none());
        assert_eq!(config.progress_offset_minutes, 330);
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("DATABASE_PATH", "/tmp/x.db"),
            ("REMINDER_POLL_SECONDS", "15"),
            ("SPEECH_ENABLED", "false"),
            ("GEMINI_API_KEY", "abc"),
        ]))
        .unwrap();
        assert_eq!(config.database_path, "/tmp/x.db");
        assert_eq!(config.poll_interval, Duration::from_secs(15));
        assert!(!config.speech_enabled);
        assert_eq!(config.gemini_api_key.as_deref(), Some("abc"));
    }

    #[test]
    fn test_poll_interval_must_be_under_a_minute() {
        assert!(Config::from_lookup(lookup_from(&[("REMINDER_POLL_SECONDS", "60")])).is_err());
        assert!(Config::from_lookup(lookup_from(&[("REMINDER_POLL_SECONDS", "0")])).is_err());
        assert!(Config::from_lookup(lookup_from(&[("REMINDER_POLL_SECONDS", "abc")])).is_err());
        assert!(Config::from_lookup(lookup_from(&[("REMINDER_POLL_SECONDS", "59")])).is_ok());
    }

    #[test]
    fn test_blank_api_key_is_none() {
        let config = Config::from_lookup(lookup_from(&[("GEMINI_API_KEY", "  ")])).unwrap();
        assert!(config.gemini_api_key.is_none());
    }
}
