//! Retell voice-agent API client

use super::{AgentUpdate, Operation, ProxyError, VoiceAgentApi, WebCallRequest};
use crate::config::RetellConfig;
use crate::flow::ConversationFlow;
use async_trait::async_trait;
use reqwest::{Client, Method};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the Retell REST API
pub struct RetellClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl RetellClient {
    pub fn new(config: &RetellConfig) -> Result<Self, ProxyError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ProxyError::Transport(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: config.api_key.clone().filter(|k| !k.is_empty()),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn send<B: Serialize + Sync>(
        &self,
        op: Operation,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<Value, ProxyError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ProxyError::MissingConfig("RETELL_API_KEY"))?;

        let response = self
            .client
            .request(method, self.url(path))
            .bearer_auth(api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProxyError::Transport(format!("Request timeout: {e}"))
                } else if e.is_connect() {
                    ProxyError::Transport(format!("Connection failed: {e}"))
                } else {
                    ProxyError::Transport(format!("Request failed: {e}"))
                }
            })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ProxyError::Transport(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            return Err(ProxyError::upstream(status, &text, op.fallback_message()));
        }

        if text.trim().is_empty() {
            return Ok(Value::Object(serde_json::Map::new()));
        }

        serde_json::from_str(&text)
            .map_err(|e| ProxyError::Transport(format!("Failed to parse response: {e}")))
    }
}

#[async_trait]
impl VoiceAgentApi for RetellClient {
    async fn create_conversation_flow(&self, flow: &ConversationFlow) -> Result<Value, ProxyError> {
        self.send(
            Operation::CreateFlow,
            Method::POST,
            "create-conversation-flow",
            flow,
        )
        .await
    }

    async fn create_web_call(&self, request: &WebCallRequest) -> Result<Value, ProxyError> {
        self.send(
            Operation::CreateWebCall,
            Method::POST,
            "v2/create-web-call",
            request,
        )
        .await
    }

    async fn update_agent(&self, agent_id: &str, update: &AgentUpdate) -> Result<Value, ProxyError> {
        self.send(
            Operation::UpdateAgent,
            Method::PATCH,
            &format!("update-agent/{agent_id}"),
            update,
        )
        .await
    }
}
