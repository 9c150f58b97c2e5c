use std::env;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::llm::{ClassifyOptions, ClientSettings};

pub const DEFAULT_MODEL: &str = "gpt-4";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub model: String,
    pub base_url: String,
    pub request_timeout_secs: u64,
    pub concurrency_limit: usize,
    pub include_keywords: bool,
    pub include_explanations: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let openai_api_key = env::var("OPENAI_API_KEY")
            .map_err(|_| Error::Config("OPENAI_API_KEY environment variable not set".to_string()))?;

        let model = env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let base_url = env::var("OPENAI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let request_timeout_secs = env::var("REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(60);

        let concurrency_limit = env::var("CONCURRENCY_LIMIT")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|&n: &usize| n > 0)
            .unwrap_or(1);

        let include_keywords = env_flag("INCLUDE_KEYWORDS", true);
        let include_explanations = env_flag("INCLUDE_EXPLANATIONS", true);

        Ok(Self {
            openai_api_key,
            model,
            base_url,
            request_timeout_secs,
            concurrency_limit,
            include_keywords,
            include_explanations,
        })
    }

    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            model: self.model.clone(),
            base_url: self.base_url.clone(),
            timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }
}

fn env_flag(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"))
        .unwrap_or(default)
}

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub options: ClassifyOptions,
    /// Upper bound on classification requests in flight. 1 keeps the run strictly sequential.
    pub concurrency_limit: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            options: ClassifyOptions::default(),
            concurrency_limit: 1,
        }
    }
}

impl From<&Config> for PipelineConfig {
    fn from(config: &Config) -> Self {
        Self {
            options: ClassifyOptions {
                include_keywords: config.include_keywords,
                include_explanations: config.include_explanations,
            },
            concurrency_limit: config.concurrency_limit,
        }
    }
}
