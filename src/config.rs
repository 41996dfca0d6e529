use axum::http::HeaderValue;
use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::editor::DayDefaults;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub scheduler_api_url: String,
    pub bind_addr: String,
    pub cors_origin: HeaderValue,
    pub debug_key: Option<String>,
    pub day_defaults: DayDefaults,
    pub poll_interval: Duration,
    pub poll_attempts: u32,
    pub editor_session_ttl: Duration,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        let scheduler_api_url = env::var("SCHEDULER_API_URL")
            .map_err(|_| "SCHEDULER_API_URL must be set".to_string())?
            .trim_end_matches('/')
            .to_string();

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

        let cors_origin = env::var("CORS_ORIGIN")
            .unwrap_or_else(|_| "http://localhost:3000".to_string())
            .parse::<HeaderValue>()
            .map_err(|e| format!("Invalid CORS_ORIGIN: {}", e))?;

        let debug_key = env::var("DEBUG_KEY").ok().filter(|k| !k.is_empty());

        let day_defaults = DayDefaults {
            num_shifts: parse_or("DEFAULT_MIN_SHIFTS_PER_DAY", 2)?,
            num_consultations: parse_or("DEFAULT_MIN_CONSULTATIONS_PER_DAY", 1)?,
        };

        let poll_interval = Duration::from_millis(parse_or("SCHEDULE_POLL_INTERVAL_MS", 500)?);
        let poll_attempts = parse_or("SCHEDULE_POLL_ATTEMPTS", 120)?;
        let editor_session_ttl = Duration::from_secs(parse_or("EDITOR_SESSION_TTL_SECS", 1800)?);

        Ok(Self {
            scheduler_api_url,
            bind_addr,
            cors_origin,
            debug_key,
            day_defaults,
            poll_interval,
            poll_attempts,
            editor_session_ttl,
        })
    }
}

#[cfg(test)]
impl AppConfig {
    pub(crate) fn test_config(scheduler_api_url: &str) -> Self {
        Self {
            scheduler_api_url: scheduler_api_url.to_string(),
            bind_addr: "127.0.0.1:0".to_string(),
            cors_origin: HeaderValue::from_static("http://localhost:3000"),
            debug_key: Some("test-debug-key".to_string()),
            day_defaults: DayDefaults {
                num_shifts: 2,
                num_consultations: 1,
            },
            poll_interval: Duration::from_millis(1),
            poll_attempts: 3,
            editor_session_ttl: Duration::from_secs(60),
        }
    }
}

fn parse_or<T: FromStr>(key: &str, default: T) -> Result<T, String> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| format!("{} must be a non-negative integer, got '{}'", key, raw)),
        Err(_) => Ok(default),
    }
}
