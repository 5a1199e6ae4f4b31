use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::llm_client::{DEFAULT_API_URL, DEFAULT_MODEL};
use crate::skills::expander::DEFAULT_THRESHOLD;

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub llm_api_key: String,
    pub llm_api_url: String,
    pub parser_model: String,
    pub screener_model: String,
    pub optimizer_model: String,
    /// 0–100 similarity a JD term must reach to be added to a candidate's skills.
    pub skill_match_threshold: f64,
    /// Replaces the built-in synonym table when set.
    pub skill_synonyms_path: Option<PathBuf>,
    /// Directory for staged PDF uploads. Defaults to the system temp dir.
    pub pdf_staging_dir: Option<PathBuf>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let skill_match_threshold = match std::env::var("SKILL_MATCH_THRESHOLD") {
            Ok(raw) => parse_threshold(&raw)?,
            Err(_) => DEFAULT_THRESHOLD,
        };

        Ok(Config {
            llm_api_key: require_env("LLM_API_KEY")?,
            llm_api_url: env_or("LLM_API_URL", DEFAULT_API_URL),
            parser_model: env_or("PARSER_MODEL", DEFAULT_MODEL),
            screener_model: env_or("SCREENER_MODEL", DEFAULT_MODEL),
            optimizer_model: env_or("OPTIMIZER_MODEL", DEFAULT_MODEL),
            skill_match_threshold,
            skill_synonyms_path: std::env::var("SKILL_SYNONYMS_PATH").ok().map(PathBuf::from),
            pdf_staging_dir: std::env::var("PDF_STAGING_DIR").ok().map(PathBuf::from),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_threshold(raw: &str) -> Result<f64> {
    let value = raw
        .trim()
        .parse::<f64>()
        .context("SKILL_MATCH_THRESHOLD must be a number")?;
    anyhow::ensure!(
        (0.0..=100.0).contains(&value),
        "SKILL_MATCH_THRESHOLD must be between 0 and 100, got {value}"
    );
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_threshold_accepts_range() {
        assert_eq!(parse_threshold("85").unwrap(), 85.0);
        assert_eq!(parse_threshold(" 92.5 ").unwrap(), 92.5);
        assert_eq!(parse_threshold("0").unwrap(), 0.0);
    }

    #[test]
    fn test_parse_threshold_rejects_out_of_range_and_garbage() {
        assert!(parse_threshold("101").is_err());
        assert!(parse_threshold("-1").is_err());
        assert!(parse_threshold("high").is_err());
        assert!(parse_threshold("NaN").is_err());
    }
}
