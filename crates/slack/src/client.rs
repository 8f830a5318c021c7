// HTTP client wrapper for the Slack Web API

use std::time::Duration;

use async_trait::async_trait;
use event_tracker_core::{ChatPlatform, Result as TrackerResult};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::SlackError;

pub const DEFAULT_API_URL: &str = "https://slack.com/api";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const CHAT_POST_MESSAGE: &str = "chat.postMessage";
const USERS_INFO: &str = "users.info";

#[derive(Debug, Serialize)]
struct PostMessageRequest<'a> {
    channel: &'a str,
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseUrlMessage<'a> {
    text: &'a str,
}

/// Status fields shared by every Web API response
#[derive(Debug, Deserialize)]
struct ApiStatus {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UsersInfoBody {
    user: SlackUser,
}

/// The `user` object returned by `users.info`
#[derive(Debug, Clone, Deserialize)]
pub struct SlackUser {
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Offset from UTC in seconds
    #[serde(default)]
    pub tz_offset: i32,
}

#[derive(Clone)]
pub struct SlackClient {
    api_url: String,
    token: String,
    http: reqwest::Client,
}

impl SlackClient {
    pub fn new(token: impl Into<String>) -> Result<Self, SlackError> {
        Self::with_base_url(token, DEFAULT_API_URL)
    }

    /// Point the client at another Web API root
    pub fn with_base_url(
        token: impl Into<String>,
        api_url: impl Into<String>,
    ) -> Result<Self, SlackError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            api_url: api_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
            http,
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/{}", self.api_url, method)
    }

    /// Post `text` to `channel`
    pub async fn chat_post_message(&self, channel: &str, text: &str) -> Result<(), SlackError> {
        let response = self
            .http
            .post(self.method_url(CHAT_POST_MESSAGE))
            .bearer_auth(&self.token)
            .json(&PostMessageRequest { channel, text })
            .send()
            .await?;

        self.handle_response::<serde_json::Value>(CHAT_POST_MESSAGE, response)
            .await?;
        debug!(channel, "Posted Slack message");
        Ok(())
    }

    /// Look up a user's profile
    pub async fn users_info(&self, user: &str) -> Result<SlackUser, SlackError> {
        let response = self
            .http
            .get(self.method_url(USERS_INFO))
            .bearer_auth(&self.token)
            .query(&[("user", user)])
            .send()
            .await?;

        let body: UsersInfoBody = self.handle_response(USERS_INFO, response).await?;
        Ok(body.user)
    }

    /// Reply through an interaction's response URL
    ///
    /// Response URLs are pre-authorised, so no token is sent.
    pub async fn post_response_url(&self, response_url: &str, text: &str) -> Result<(), SlackError> {
        let response = self
            .http
            .post(response_url)
            .json(&ResponseUrlMessage { text })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SlackError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        method: &str,
        response: reqwest::Response,
    ) -> Result<T, SlackError> {
        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(SlackError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| SlackError::Decode(e.to_string()))?;
        let api_status: ApiStatus = serde_json::from_value(body.clone())
            .map_err(|e| SlackError::Decode(e.to_string()))?;

        if !api_status.ok {
            return Err(SlackError::Api {
                method: method.to_string(),
                error: api_status
                    .error
                    .unwrap_or_else(|| "unknown_error".to_string()),
            });
        }

        serde_json::from_value(body).map_err(|e| SlackError::Decode(format!("{method}: {e}")))
    }
}

impl std::fmt::Debug for SlackClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlackClient")
            .field("api_url", &self.api_url)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

#[async_trait]
impl ChatPlatform for SlackClient {
    async fn user_tz_offset(&self, user_id: &str) -> TrackerResult<i32> {
        Ok(self.users_info(user_id).await?.tz_offset)
    }

    async fn post_message(&self, channel: &str, text: &str) -> TrackerResult<()> {
        Ok(self.chat_post_message(channel, text).await?)
    }

    async fn respond(&self, response_url: &str, text: &str) -> TrackerResult<()> {
        Ok(self.post_response_url(response_url, text).await?)
    }
}
