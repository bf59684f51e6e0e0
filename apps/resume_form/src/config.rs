use std::path::PathBuf;

use anyhow::{bail, Context, Result};

/// Backend used when `RESUME_API_BASE` is not set.
pub const DEFAULT_API_BASE: &str = "https://ai-resume-generator-rw01.onrender.com";

/// Whether the summary returned by analyze is sent through enhance before it
/// is placed in the form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SummaryPolicy {
    #[default]
    Keep,
    Enhance,
}

/// Client configuration. Every value has a default, so an empty environment
/// yields a working config pointed at the hosted backend.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_base: String,
    pub http_timeout_secs: u64,
    pub summary_policy: SummaryPolicy,
    pub download_dir: PathBuf,
    pub rust_log: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            http_timeout_secs: 120,
            summary_policy: SummaryPolicy::Keep,
            download_dir: PathBuf::from("."),
            rust_log: "info".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Applies a command-line base URL. A blank value keeps the current one.
    pub fn override_api_base(&mut self, raw: &str) {
        if let Some(base) = normalize_base(raw) {
            self.api_base = base;
        }
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Config::default();

        let enhance_summary = match lookup("ENHANCE_SUMMARY_AFTER_ANALYZE") {
            Some(raw) => parse_bool(&raw)
                .context("ENHANCE_SUMMARY_AFTER_ANALYZE must be a boolean such as true or 0")?,
            None => false,
        };
        let summary_policy = if enhance_summary {
            SummaryPolicy::Enhance
        } else {
            SummaryPolicy::Keep
        };

        Ok(Config {
            api_base: lookup("RESUME_API_BASE")
                .and_then(|base| normalize_base(&base))
                .unwrap_or(defaults.api_base),
            http_timeout_secs: match lookup("RESUME_HTTP_TIMEOUT_SECS") {
                Some(raw) => raw
                    .trim()
                    .parse::<u64>()
                    .context("RESUME_HTTP_TIMEOUT_SECS must be a whole number of seconds")?,
                None => defaults.http_timeout_secs,
            },
            summary_policy,
            download_dir: lookup("RESUME_DOWNLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.download_dir),
            rust_log: lookup("RUST_LOG").unwrap_or(defaults.rust_log),
        })
    }
}

fn normalize_base(raw: &str) -> Option<String> {
    let base = raw.trim().trim_end_matches('/');
    (!base.is_empty()).then(|| base.to_string())
}

fn parse_bool(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => bail!("invalid boolean '{other}'"),
    }
}
