use anyhow::{Context, Result};
use diagnostics::PipelineConfig;
use dotenvy::dotenv;
use std::env;

/// CLI configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    /// Without a key the fallback stage is disabled
    pub openai_api_key: Option<String>,
    pub openai_model: Option<String>,
    pub fallback_char_budget: usize,
    pub max_stored_chars: usize,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        let defaults = PipelineConfig::default();

        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://diagnostics.db?mode=rwc".to_string()),
            openai_api_key: env::var("OPENAI_API_KEY").ok().filter(|k| !k.is_empty()),
            openai_model: env::var("OPENAI_MODEL").ok(),
            fallback_char_budget: match env::var("FALLBACK_CHAR_BUDGET") {
                Ok(v) => v
                    .parse()
                    .context("FALLBACK_CHAR_BUDGET must be a valid number")?,
                Err(_) => defaults.fallback_char_budget,
            },
            max_stored_chars: match env::var("MAX_STORED_CHARS") {
                Ok(v) => v.parse().context("MAX_STORED_CHARS must be a valid number")?,
                Err(_) => defaults.max_stored_chars,
            },
        })
    }

    /// Pipeline settings derived from the environment.
    pub fn pipeline(&self) -> PipelineConfig {
        let config = PipelineConfig::new()
            .with_fallback_char_budget(self.fallback_char_budget)
            .with_max_stored_chars(self.max_stored_chars);

        if self.openai_api_key.is_some() {
            config
        } else {
            config.without_fallback()
        }
    }
}
