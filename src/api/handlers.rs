//! HTTP request handlers

use super::assets::{get_index_html, serve_static};
use super::types::{
    CreateWebCallRequest, ErrorResponse, OrderRequest, PublicConfigResponse, UpdateAgentRequest,
};
use super::AppState;
use crate::flow::{self, FlowRequest, FlowValidationError};
use crate::order::OrderSnapshot;
use crate::voice_api::{AgentUpdate, ProxyError, WebCallRequest};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, patch, post},
    Json, Router,
};
use serde_json::Value;

/// Language applied to the template agent on every update
pub const AGENT_LANGUAGE: &str = "ar-eg";

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Calling UI
        .route("/", get(serve_index))
        .route("/assets/*path", get(serve_static))
        .route("/api/config", get(public_config))
        // Conversation flows
        .route("/api/create-flow", post(create_flow))
        .route("/api/create-flow/cafe", post(create_cafe_flow))
        // Calls and agents
        .route("/api/create-web-call", post(create_web_call))
        .route("/api/update-agent", patch(update_agent))
        // Order display
        .route("/api/order", post(extract_order))
        .route("/version", get(get_version))
        .with_state(state)
}

// ============================================================
// UI
// ============================================================

async fn serve_index() -> impl IntoResponse {
    match get_index_html() {
        Some(content) => Html(content).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Html("<h1>404 - UI not found</h1>".to_string()),
        )
            .into_response(),
    }
}

async fn public_config(State(state): State<AppState>) -> Json<PublicConfigResponse> {
    Json(PublicConfigResponse {
        agent_id: state.agents.public_agent_id.clone(),
    })
}

// ============================================================
// Conversation Flows
// ============================================================

async fn create_flow(
    State(state): State<AppState>,
    payload: Result<Json<FlowRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let Json(request) = payload?;
    send_flow(&state, request).await
}

/// Create the built-in café ordering flow
async fn create_cafe_flow(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    send_flow(&state, flow::cafe_order_flow()).await
}

async fn send_flow(
    state: &AppState,
    request: FlowRequest,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let flow = flow::prepare(request)?;
    tracing::debug!(nodes = flow.nodes.len(), "Creating conversation flow");

    let created = state.voice_api.create_conversation_flow(&flow).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

// ============================================================
// Calls and Agents
// ============================================================

async fn create_web_call(
    State(state): State<AppState>,
    payload: Result<Json<CreateWebCallRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let Json(req) = payload?;

    let agent_id = req
        .agent_id
        .filter(|id| !id.is_empty())
        .or_else(|| state.agents.public_agent_id.clone())
        .ok_or_else(|| AppError::BadRequest("agent_id is required".to_string()))?;

    let request = WebCallRequest {
        agent_id,
        metadata: req.metadata.filter(|v| !v.is_null()),
        retell_llm_dynamic_variables: req.retell_llm_dynamic_variables.filter(|v| !v.is_null()),
    };

    let call = state.voice_api.create_web_call(&request).await?;
    Ok((StatusCode::CREATED, Json(call)))
}

async fn update_agent(
    State(state): State<AppState>,
    payload: Result<Json<UpdateAgentRequest>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Json(req) = payload?;

    let agent_id = state
        .agents
        .template_agent_id
        .as_deref()
        .ok_or(ProxyError::MissingConfig("RETELL_TEMPLATE_AGENT_ID"))?;

    let update = AgentUpdate {
        agent_name: req
            .agent_name
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| state.agents.display_name.clone()),
        language: AGENT_LANGUAGE.to_string(),
    };

    let agent = state.voice_api.update_agent(agent_id, &update).await?;
    Ok(Json(agent))
}

// ============================================================
// Order Display
// ============================================================

async fn extract_order(
    State(state): State<AppState>,
    payload: Result<Json<OrderRequest>, JsonRejection>,
) -> Result<Json<OrderSnapshot>, AppError> {
    let Json(req) = payload?;
    Ok(Json(state.orders.extract(&req.transcript)))
}

// ============================================================
// Version
// ============================================================

async fn get_version() -> &'static str {
    concat!("cafe-voice ", env!("CARGO_PKG_VERSION"))
}

// ============================================================
// Error Handling
// ============================================================

enum AppError {
    BadRequest(String),
    MalformedBody(String),
    InvalidFlow(FlowValidationError),
    Proxy(ProxyError),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::MalformedBody(rejection.body_text())
    }
}

impl From<FlowValidationError> for AppError {
    fn from(err: FlowValidationError) -> Self {
        AppError::InvalidFlow(err)
    }
}

impl From<ProxyError> for AppError {
    fn from(err: ProxyError) -> Self {
        AppError::Proxy(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::BadRequest(msg) => {
                tracing::warn!(error = %msg, "Rejected request");
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse::new(msg, StatusCode::BAD_REQUEST.as_u16()),
                )
            }
            AppError::MalformedBody(msg) => {
                tracing::warn!(error = %msg, "Unreadable request body");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new(msg, 500).with_details("Internal server error"),
                )
            }
            AppError::InvalidFlow(err) => {
                tracing::warn!(problems = err.problems.len(), error = %err, "Rejected flow");
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse::new(err.to_string(), StatusCode::BAD_REQUEST.as_u16())
                        .with_problems(&err.problems),
                )
            }
            AppError::Proxy(ProxyError::Upstream { status, message }) => {
                let code = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
                (code, ErrorResponse::new(message, status))
            }
            AppError::Proxy(err @ ProxyError::MissingConfig(_)) => {
                tracing::error!(error = %err, "Missing configuration");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new(err.to_string(), 500),
                )
            }
            AppError::Proxy(err @ ProxyError::Transport(_)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::new(err.to_string(), 500).with_details("Internal server error"),
            ),
        };

        (status, Json(body)).into_response()
    }
}
