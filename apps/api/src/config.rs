use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Fails at startup if the provider credential is missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            gemini_api_key: require_any_env(&["GEMINI_API_KEY", "API_KEY"])?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

/// Returns the first non-empty variable among `keys`.
fn require_any_env(keys: &[&str]) -> Result<String> {
    keys.iter()
        .find_map(|key| std::env::var(key).ok().filter(|v| !v.trim().is_empty()))
        .with_context(|| {
            format!(
                "Required environment variable '{}' is not set",
                keys.join("' or '")
            )
        })
}
