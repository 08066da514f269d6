use std::env;
use std::num::NonZeroU32;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use dotenvy::dotenv;
use medicine_parser::config::DEFAULT_MODEL;
use medicine_parser::{EngineConfig, MedicineParser};
use openai_client::{OpenAIClient, SecretString, GROQ_BASE_URL};

/// Model service and engine settings, shared by the API server and the
/// file runner.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    pub api_key: SecretString,
    pub base_url: String,
    pub model: String,
    pub request_timeout: Duration,
    pub cache_capacity: usize,
    pub upstream_requests_per_second: NonZeroU32,
}

impl ParserConfig {
    /// Load parser settings from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            api_key: required_secret("GROQ_API_KEY")?,
            base_url: env::var("LLM_BASE_URL").unwrap_or_else(|_| GROQ_BASE_URL.to_string()),
            model: env::var("LLM_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            request_timeout: Duration::from_secs(parse_or("LLM_TIMEOUT_SECS", 30)?),
            cache_capacity: parse_or("PARSER_CACHE_CAPACITY", 1000)?,
            upstream_requests_per_second: parse_or(
                "UPSTREAM_REQUESTS_PER_SECOND",
                NonZeroU32::new(10).context("default rate is non-zero")?,
            )?,
        })
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig::default()
            .with_model(self.model.clone())
            .with_cache_capacity(self.cache_capacity)
            .with_upstream_rate(self.upstream_requests_per_second)
    }

    pub fn build_parser(&self) -> MedicineParser {
        let client = OpenAIClient::new(self.api_key.clone())
            .with_base_url(self.base_url.clone())
            .with_timeout(self.request_timeout);
        MedicineParser::with_client(client, self.engine_config())
    }
}

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub parser: ParserConfig,
    pub jwt_secret: SecretString,
    pub jwt_issuer: String,
    pub api_username: String,
    pub api_password: SecretString,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let parser = ParserConfig::from_env()?;

        Ok(Self {
            port: parse_or("PORT", 8000)?,
            parser,
            jwt_secret: required_secret("JWT_SECRET_KEY")?,
            jwt_issuer: env::var("JWT_ISSUER").unwrap_or_else(|_| "medicine-parser".to_string()),
            api_username: env::var("API_USERNAME").context("API_USERNAME must be set")?,
            api_password: required_secret("API_PASSWORD")?,
        })
    }
}

fn required_secret(key: &str) -> Result<SecretString> {
    let value = env::var(key).with_context(|| format!("{} must be set", key))?;
    anyhow::ensure!(!value.is_empty(), "{} must not be empty", key);
    Ok(SecretString::new(value))
}

fn parse_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .with_context(|| format!("{} must be a valid value, got {:?}", key, raw)),
        Err(_) => Ok(default),
    }
}
