// Server configuration loaded from environment variables.
// Decision: Fail fast at startup when a required secret is missing
// Decision: SLACK_API_URL exists only to point the client at a test server

use anyhow::{anyhow, Context, Result};

const DEFAULT_HTTP_PORT: u16 = 9000;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub http_port: u16,
    pub github_webhook_secret: String,
    pub slack_signing_secret: String,
    pub slack_oauth_token: String,
    /// Channel that receives a message for every committed event
    pub slack_log_channel: Option<String>,
    pub slack_api_url: Option<String>,
    /// Route prefix, e.g. "/tracker" gives "/tracker/api/v0/record"
    pub api_prefix: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup (the environment in production)
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &str| {
            optional(key).ok_or_else(|| anyhow!("{key} environment variable required"))
        };

        let http_port = match optional("HTTP_PORT") {
            Some(port) => port
                .parse()
                .with_context(|| format!("HTTP_PORT must be a port number, got {port:?}"))?,
            None => DEFAULT_HTTP_PORT,
        };

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            http_port,
            github_webhook_secret: required("GITHUB_WEBHOOK_SECRET")?,
            slack_signing_secret: required("SLACK_SIGNING_SECRET")?,
            slack_oauth_token: required("SLACK_OAUTH_TOKEN")?,
            slack_log_channel: optional("SLACK_LOG_CHANNEL"),
            slack_api_url: optional("SLACK_API_URL"),
            api_prefix: optional("API_PREFIX").unwrap_or_default(),
        })
    }

    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.http_port)
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("http_port", &self.http_port)
            .field("github_webhook_secret", &"[REDACTED]")
            .field("slack_signing_secret", &"[REDACTED]")
            .field("slack_oauth_token", &"[REDACTED]")
            .field("slack_log_channel", &self.slack_log_channel)
            .field("slack_api_url", &self.slack_api_url)
            .field("api_prefix", &self.api_prefix)
            .finish()
    }
}
