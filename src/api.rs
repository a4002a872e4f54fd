//! HTTP API for the café voice assistant

mod assets;
mod handlers;
mod types;


pub use handlers::create_router;

use crate::config::AgentSettings;
use crate::order::OrderExtractor;
use crate::voice_api::VoiceAgentApi;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub voice_api: Arc<dyn VoiceAgentApi>,
    pub orders: Arc<dyn OrderExtractor>,
    pub agents: Arc<AgentSettings>,
}

impl AppState {
    pub fn new(
        voice_api: Arc<dyn VoiceAgentApi>,
        orders: Arc<dyn OrderExtractor>,
        agents: AgentSettings,
    ) -> Self {
        Self {
            voice_api,
            orders,
            agents: Arc::new(agents),
        }
    }
}
