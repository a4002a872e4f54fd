//! Voice-agent API abstraction
//!
//! The hosted service owns calls, agents and flows; this module only forwards
//! requests to it and classifies what comes back.

mod error;
mod retell;

pub use error::ProxyError;
pub use retell::RetellClient;

use crate::flow::ConversationFlow;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;

/// Body sent to create a browser web call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WebCallRequest {
    pub agent_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retell_llm_dynamic_variables: Option<Value>,
}

/// Fields patched on an agent
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentUpdate {
    pub agent_name: String,
    pub language: String,
}

/// Outbound operation, used for logging and fallback error text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    CreateFlow,
    CreateWebCall,
    UpdateAgent,
}

impl Operation {
    pub fn name(self) -> &'static str {
        match self {
            Operation::CreateFlow => "create_conversation_flow",
            Operation::CreateWebCall => "create_web_call",
            Operation::UpdateAgent => "update_agent",
        }
    }

    pub fn fallback_message(self) -> &'static str {
        match self {
            Operation::CreateFlow => "Failed to create flow",
            Operation::CreateWebCall => "Failed to create web call",
            Operation::UpdateAgent => "Failed to update agent",
        }
    }
}

/// Common interface to the hosted voice-agent service
#[async_trait]
pub trait VoiceAgentApi: Send + Sync {
    async fn create_conversation_flow(&self, flow: &ConversationFlow) -> Result<Value, ProxyError>;

    async fn create_web_call(&self, request: &WebCallRequest) -> Result<Value, ProxyError>;

    async fn update_agent(&self, agent_id: &str, update: &AgentUpdate) -> Result<Value, ProxyError>;
}

/// Logging wrapper for voice-agent clients
pub struct LoggingVoiceApi {
    inner: Arc<dyn VoiceAgentApi>,
}

impl LoggingVoiceApi {
    pub fn new(inner: Arc<dyn VoiceAgentApi>) -> Self {
        Self { inner }
    }

    fn record(op: Operation, start: Instant, result: &Result<Value, ProxyError>) {
        let duration = start.elapsed();
        match result {
            Ok(_) => {
                tracing::info!(
                    operation = op.name(),
                    duration_ms = %duration.as_millis(),
                    "Voice API request completed"
                );
            }
            Err(ProxyError::Upstream { status, message }) => {
                tracing::warn!(
                    operation = op.name(),
                    duration_ms = %duration.as_millis(),
                    status = *status,
                    error = %message,
                    "Voice API rejected request"
                );
            }
            Err(e) => {
                tracing::error!(
                    operation = op.name(),
                    duration_ms = %duration.as_millis(),
                    error = %e,
                    "Voice API request failed"
                );
            }
        }
    }
}

#[async_trait]
impl VoiceAgentApi for LoggingVoiceApi {
    async fn create_conversation_flow(&self, flow: &ConversationFlow) -> Result<Value, ProxyError> {
        let start = Instant::now();
        let result = self.inner.create_conversation_flow(flow).await;
        Self::record(Operation::CreateFlow, start, &result);
        result
    }

    async fn create_web_call(&self, request: &WebCallRequest) -> Result<Value, ProxyError> {
        let start = Instant::now();
        let result = self.inner.create_web_call(request).await;
        Self::record(Operation::CreateWebCall, start, &result);
        result
    }

    async fn update_agent(&self, agent_id: &str, update: &AgentUpdate) -> Result<Value, ProxyError> {
        let start = Instant::now();
        let result = self.inner.update_agent(agent_id, update).await;
        Self::record(Operation::UpdateAgent, start, &result);
        result
    }
}
