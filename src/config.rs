//! Runtime configuration
//!
//! Everything is read from the environment once at startup.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `FITSENSE_DATABASE_PATH` | `<project>/data/fitsense.db` |
//! | `GEMINI_API_KEY` | unset (rule-based only) |
//! | `FITSENSE_GEMINI_MODEL` | `gemini-2.0-flash-exp` |
//! | `FITSENSE_AI_TIMEOUT_SECS` | 20 |
//! | `FITSENSE_AI_RETRIES` | 1 |

use std::path::PathBuf;
use std::time::Duration;

use tracing::warn;

use crate::ai::gemini::DEFAULT_MODEL;

pub const DATABASE_PATH_ENV: &str = "FITSENSE_DATABASE_PATH";
pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const GEMINI_MODEL_ENV: &str = "FITSENSE_GEMINI_MODEL";
pub const AI_TIMEOUT_ENV: &str = "FITSENSE_AI_TIMEOUT_SECS";
pub const AI_RETRIES_ENV: &str = "FITSENSE_AI_RETRIES";

pub const DEFAULT_AI_TIMEOUT_SECS: u64 = 20;
pub const DEFAULT_AI_RETRIES: u32 = 1;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: PathBuf,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub ai_timeout: Duration,
    pub ai_retries: u32,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        Self {
            database_path: non_empty(DATABASE_PATH_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(default_database_path),
            gemini_api_key: non_empty(GEMINI_API_KEY_ENV),
            gemini_model: non_empty(GEMINI_MODEL_ENV).unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            ai_timeout: Duration::from_secs(parse_nonzero_or(
                AI_TIMEOUT_ENV,
                non_empty(AI_TIMEOUT_ENV),
                DEFAULT_AI_TIMEOUT_SECS,
            )),
            ai_retries: parse_or(AI_RETRIES_ENV, non_empty(AI_RETRIES_ENV), DEFAULT_AI_RETRIES),
        }
    }

    pub fn ai_enabled(&self) -> bool {
        self.gemini_api_key.is_some()
    }
}

fn parse_or<T: std::str::FromStr + Copy + std::fmt::Display>(key: &str, raw: Option<String>, default: T) -> T {
    match raw {
        Some(value) => value.parse().unwrap_or_else(|_| {
            warn!("Ignoring {}={:?}, using {}", key, value, default);
            default
        }),
        None => default,
    }
}

/// Like [`parse_or`], but 0 is also ignored
fn parse_nonzero_or(key: &str, raw: Option<String>, default: u64) -> u64 {
    match parse_or(key, raw, default) {
        0 => {
            warn!("Ignoring {}=0, using {}", key, default);
            default
        }
        value => value,
    }
}

/// `data/fitsense.db` next to the executable, stepping out of
/// `target/release` or `target/debug` to the project root
fn default_database_path() -> PathBuf {
    let mut path = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."));

    if path.ends_with("release") || path.ends_with("debug") {
        if let Some(parent) = path.parent() {
            if let Some(grandparent) = parent.parent() {
                path = grandparent.to_path_buf();
            }
        }
    }

    path.push("data");
    path.push("fitsense.db");
    path
}
