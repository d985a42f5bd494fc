use std::path::PathBuf;

use anyhow::{Context, Result};

const DEFAULT_LLM_BASE_URL: &str = "https://api.groq.com/openai/v1";
const DEFAULT_STAGING_DIR: &str = "uploads";

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
///
/// The model credential and identifier are optional here on purpose: a missing
/// value surfaces as a configuration error on the request that needs it.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub llm_api_key: Option<String>,
    pub llm_model: Option<String>,
    pub llm_base_url: String,
    pub staging_dir: PathBuf,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            llm_api_key: optional_env("GROQ_API_KEY"),
            llm_model: first_env(&["LLM_MODEL", "MODEL"]),
            llm_base_url: optional_env("LLM_BASE_URL")
                .unwrap_or_else(|| DEFAULT_LLM_BASE_URL.to_string()),
            staging_dir: optional_env("STAGING_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STAGING_DIR)),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// First set, non-blank value among `keys`.
fn first_env(keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| optional_env(key))
}

/// Reads an env var, treating blank values as unset.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
