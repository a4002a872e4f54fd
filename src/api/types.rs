//! API request and response types

use crate::flow::FlowProblem;
use crate::order::TranscriptTurn;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Request to start a browser web call
#[derive(Debug, Deserialize)]
pub struct CreateWebCallRequest {
    #[serde(default)]
    pub agent_id: Option<String>,
    #[serde(default)]
    pub metadata: Option<Value>,
    #[serde(default)]
    pub retell_llm_dynamic_variables: Option<Value>,
}

/// Request to rename the template agent
#[derive(Debug, Default, Deserialize)]
pub struct UpdateAgentRequest {
    #[serde(default)]
    pub agent_name: Option<String>,
}

/// Transcript posted by the UI on every update
#[derive(Debug, Deserialize)]
pub struct OrderRequest {
    #[serde(default)]
    pub transcript: Vec<TranscriptTurn>,
}

/// Settings the browser needs before starting a call
#[derive(Debug, Serialize)]
pub struct PublicConfigResponse {
    pub agent_id: Option<String>,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub problems: Vec<String>,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>, status: u16) -> Self {
        Self {
            error: message.into(),
            status,
            details: None,
            problems: Vec::new(),
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_problems(mut self, problems: &[FlowProblem]) -> Self {
        self.problems = problems.iter().map(ToString::to_string).collect();
        self
    }
}
