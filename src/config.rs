use std::env;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::warn;

pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_HUGGINGFACE_MODEL_URL: &str =
    "https://api-inference.huggingface.co/models/stabilityai/stable-diffusion-3.5-large";

/// Process-level settings, read once at startup and handed to whatever needs them.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: Option<String>,
    pub gemini_api_base: String,
    pub gemini_model: String,
    pub huggingface_api_key: Option<String>,
    pub huggingface_model_url: String,
    pub text_timeout: Duration,
    pub image_timeout: Duration,
    pub port: u16,
    pub cors_origin: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            gemini_api_base: DEFAULT_GEMINI_API_BASE.to_string(),
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            huggingface_api_key: None,
            huggingface_model_url: DEFAULT_HUGGINGFACE_MODEL_URL.to_string(),
            text_timeout: Duration::from_secs(90),
            image_timeout: Duration::from_secs(120),
            port: 5000,
            cors_origin: "http://localhost:3000".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        let config = Self {
            gemini_api_key: env_secret("GEMINI_API_KEY"),
            gemini_api_base: env_string("GEMINI_API_BASE", &defaults.gemini_api_base),
            gemini_model: env_string("GEMINI_MODEL", &defaults.gemini_model),
            huggingface_api_key: env_secret("HUGGINGFACE_API_KEY"),
            huggingface_model_url: env_string("HUGGINGFACE_MODEL_URL", &defaults.huggingface_model_url),
            text_timeout: Duration::from_secs(env_parse("TEXT_TIMEOUT_SECS", 90)?),
            image_timeout: Duration::from_secs(env_parse("IMAGE_TIMEOUT_SECS", 120)?),
            port: env_parse("PORT", defaults.port)?,
            cors_origin: env_string("CORS_ORIGIN", &defaults.cors_origin),
        };

        if config.gemini_api_key.is_none() {
            warn!("⚠️ GEMINI_API_KEY is not set; prompt generation will be refused");
        }
        if config.huggingface_api_key.is_none() {
            warn!("⚠️ HUGGINGFACE_API_KEY is not set; image generation will be refused");
        }

        Ok(config)
    }
}

fn env_string(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn env_secret(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn env_parse<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => value
            .trim()
            .parse::<T>()
            .with_context(|| format!("{name} must be a number, got '{value}'")),
        _ => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = Config::default();
        assert_eq!(config.port, 5000);
        assert_eq!(config.gemini_model, "gemini-1.5-flash");
        assert_eq!(config.image_timeout, Duration::from_secs(120));
        assert!(config.gemini_api_key.is_none());
    }

    #[test]
    fn env_parse_rejects_garbage() {
        env::set_var("COZYCRAFT_TEST_PORT_GARBAGE", "not-a-port");
        let parsed: Result<u16> = env_parse("COZYCRAFT_TEST_PORT_GARBAGE", 5000);
        assert!(parsed.is_err());
        env::remove_var("COZYCRAFT_TEST_PORT_GARBAGE");
    }

    #[test]
    fn blank_secret_counts_as_missing() {
        env::set_var("COZYCRAFT_TEST_BLANK_SECRET", "   ");
        assert_eq!(env_secret("COZYCRAFT_TEST_BLANK_SECRET"), None);
        env::remove_var("COZYCRAFT_TEST_BLANK_SECRET");
    }
}
