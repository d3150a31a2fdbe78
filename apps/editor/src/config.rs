use anyhow::{Context, Result};

const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Every variable is optional; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Request body limit for document payloads.
    pub max_body_bytes: usize,
    /// Allowed browser origin. Permissive CORS when unset.
    pub cors_origin: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8080,
            rust_log: "info".to_string(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            cors_origin: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            max_body_bytes: match optional_env("MAX_BODY_BYTES") {
                Some(raw) => raw
                    .parse::<usize>()
                    .context("MAX_BODY_BYTES must be a byte count")?,
                None => DEFAULT_MAX_BODY_BYTES,
            },
            cors_origin: optional_env("CORS_ORIGIN"),
        })
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
