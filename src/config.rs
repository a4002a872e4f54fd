//! Runtime configuration, read once at startup and passed to handlers

pub const DEFAULT_BASE_URL: &str = "https://api.retellai.com";
pub const DEFAULT_AGENT_DISPLAY_NAME: &str = "ass";
pub const DEFAULT_PORT: u16 = 8000;

/// Connection settings for the voice-agent API
#[derive(Debug, Clone)]
pub struct RetellConfig {
    pub api_key: Option<String>,
    pub base_url: String,
}

impl Default for RetellConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

/// Agent ids and naming used by the proxy endpoints
#[derive(Debug, Clone)]
pub struct AgentSettings {
    /// Agent patched by update-agent
    pub template_agent_id: Option<String>,
    /// Agent id handed to the browser for web calls
    pub public_agent_id: Option<String>,
    /// Name applied on update when the caller sends none
    pub display_name: String,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            template_agent_id: None,
            public_agent_id: None,
            display_name: DEFAULT_AGENT_DISPLAY_NAME.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub retell: RetellConfig,
    pub agents: AgentSettings,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; empty values count as unset
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            retell: RetellConfig {
                api_key: get("RETELL_API_KEY"),
                base_url: get("RETELL_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            },
            agents: AgentSettings {
                template_agent_id: get("RETELL_TEMPLATE_AGENT_ID"),
                public_agent_id: get("RETELL_PUBLIC_AGENT_ID"),
                display_name: get("AGENT_DISPLAY_NAME")
                    .unwrap_or_else(|| DEFAULT_AGENT_DISPLAY_NAME.to_string()),
            },
            port: get("CAFE_VOICE_PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PORT),
        }
    }

    /// Names of unset variables the endpoints need
    pub fn missing_secrets(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.retell.api_key.is_none() {
            missing.push("RETELL_API_KEY");
        }
        if self.agents.template_agent_id.is_none() {
            missing.push("RETELL_TEMPLATE_AGENT_ID");
        }
        if self.agents.public_agent_id.is_none() {
            missing.push("RETELL_PUBLIC_AGENT_ID");
        }
        missing
    }
}
