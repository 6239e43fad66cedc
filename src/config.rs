use crate::error::{Error, Result};
use std::env;
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_SITE: &str = "reddit.com";
pub const DEFAULT_CLASSIFY_DELAY_MS: u64 = 2_000;

#[derive(Debug, Clone)]
pub struct Config {
    pub serpapi_api_key: String,
    pub openai_api_key: String,
    pub reddit: RedditCredentials,
    pub model: String,
    pub search_site: String,
    pub classify_delay: Duration,
    pub http_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct RedditCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl RedditCredentials {
    /// Reddit asks API clients to identify themselves with a descriptive user agent.
    pub fn user_agent(&self) -> String {
        match &self.username {
            Some(username) => format!("Comment Extraction (by u/{})", username),
            None => "Comment Extraction (threadsift)".to_string(),
        }
    }

    /// Username and password, when both are configured.
    pub fn script_login(&self) -> Option<(&str, &str)> {
        match (&self.username, &self.password) {
            (Some(u), Some(p)) => Some((u.as_str(), p.as_str())),
            _ => None,
        }
    }
}

fn required(name: &str) -> Result<String> {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| Error::Config(format!("{} environment variable not set", name)))
}

fn optional(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let serpapi_api_key = required("SERPAPI_API_KEY")?;
        let openai_api_key = required("OPENAI_API_KEY")?;

        let reddit = RedditCredentials {
            client_id: required("REDDIT_CLIENT_ID")?,
            client_secret: required("REDDIT_CLIENT_SECRET")?,
            username: optional("REDDIT_USERNAME"),
            password: optional("REDDIT_PASSWORD"),
        };

        let model = optional("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let search_site = optional("SEARCH_SITE").unwrap_or_else(|| DEFAULT_SITE.to_string());

        let classify_delay = env::var("CLASSIFY_DELAY_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_millis)
            .unwrap_or(Duration::from_millis(DEFAULT_CLASSIFY_DELAY_MS));

        let http_timeout = env::var("HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(120));

        Ok(Self {
            serpapi_api_key,
            openai_api_key,
            reddit,
            model,
            search_site,
            classify_delay,
            http_timeout,
        })
    }
}

/// Per-run knobs handed to the research pipeline.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub model: String,
    pub search_site: String,
    pub classify_delay: Duration,
}

impl From<&Config> for PipelineConfig {
    fn from(config: &Config) -> Self {
        Self {
            model: config.model.clone(),
            search_site: config.search_site.clone(),
            classify_delay: config.classify_delay,
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            search_site: DEFAULT_SITE.to_string(),
            classify_delay: Duration::from_millis(DEFAULT_CLASSIFY_DELAY_MS),
        }
    }
}
