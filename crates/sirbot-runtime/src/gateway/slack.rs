//! Slack Web API client implementing [`MessagingGateway`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, RequestBuilder, Url};
use serde::Deserialize;
use serde_json::{Map, Value, json};
use tracing::{debug, trace};

use sirbot_core::{ApiError, ApiResult, MessagingGateway, OutboundEvent, UserProfile};

/// Every Web API response is wrapped in `{"ok": bool, "error": "..."}`.
#[derive(Debug, Deserialize)]
struct Envelope {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(flatten)]
    body: Map<String, Value>,
}

impl Envelope {
    fn into_body(self) -> ApiResult<Map<String, Value>> {
        if self.ok {
            Ok(self.body)
        } else {
            Err(ApiError::from_code(
                self.error.unwrap_or_else(|| "unknown_error".to_string()),
            ))
        }
    }
}

/// Decodes a Web API response from its status code and body.
fn decode(status: u16, body: &str) -> ApiResult<Map<String, Value>> {
    if !(200..300).contains(&status) {
        return Err(ApiError::Status(status));
    }
    serde_json::from_str::<Envelope>(body)?.into_body()
}

pub struct SlackWebApi {
    client: Client,
    base_url: String,
    token: String,
}

impl SlackWebApi {
    pub fn new(
        base_url: impl Into<String>,
        token: impl Into<String>,
        timeout: Duration,
    ) -> reqwest::Result<Self> {
        let client = ClientBuilder::new().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    fn endpoint(&self, method: &str) -> String {
        format!("{}/{method}", self.base_url)
    }

    async fn call(&self, method: &str, request: RequestBuilder) -> ApiResult<Map<String, Value>> {
        trace!(method, "Calling Slack Web API");
        let response = request
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let result = decode(status, &body);
        if let Err(e) = &result {
            debug!(method, status, error = %e, "Slack Web API call failed");
        }
        result
    }
}

impl std::fmt::Debug for SlackWebApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlackWebApi")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl MessagingGateway for SlackWebApi {
    async fn send(&self, message: &OutboundEvent) -> ApiResult<()> {
        let request = self
            .client
            .post(self.endpoint("chat.postMessage"))
            .json(message);
        self.call("chat.postMessage", request).await.map(|_| ())
    }

    async fn add_reaction(&self, channel_id: &str, message_id: &str, name: &str) -> ApiResult<()> {
        let request = self.client.post(self.endpoint("reactions.add")).json(&json!({
            "channel": channel_id,
            "timestamp": message_id,
            "name": name,
        }));
        self.call("reactions.add", request).await.map(|_| ())
    }

    async fn lookup_user(&self, user_id: &str) -> ApiResult<UserProfile> {
        let url = Url::parse_with_params(&self.endpoint("users.info"), [("user", user_id)])
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let mut body = self.call("users.info", self.client.get(url)).await?;

        body.remove("user")
            .map(UserProfile)
            .ok_or_else(|| ApiError::Serialization("users.info response has no user".into()))
    }
}
