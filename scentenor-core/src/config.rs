use anyhow::{Context, Result};

/// Default completion model used when COMPLETION_MODEL env var is not set
pub const DEFAULT_COMPLETION_MODEL: &str = "gpt-3.5-turbo";

/// Default address the web server binds to when SCENTENOR_ADDR is not set
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

/// Application configuration loaded from the environment
#[derive(Debug, Clone)]
pub struct Config {
    pub weather_api_key: String,
    pub completion_api_key: String,
    pub completion_model: String,
    pub bind_addr: String,
}

impl Config {
    /// Load configuration from a .env file and the environment
    ///
    /// Both API keys are required; the hosting environment supplies them and
    /// they are never embedded in source.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Not an error if .env is missing

        let weather_api_key =
            std::env::var("WEATHER_API_KEY").context("WEATHER_API_KEY not set")?;

        let completion_api_key =
            std::env::var("OPENAI_API_KEY").context("OPENAI_API_KEY not set")?;

        let completion_model = std::env::var("COMPLETION_MODEL")
            .unwrap_or_else(|_| DEFAULT_COMPLETION_MODEL.to_string());

        let bind_addr =
            std::env::var("SCENTENOR_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());

        Ok(Self {
            weather_api_key,
            completion_api_key,
            completion_model,
            bind_addr,
        })
    }
}
