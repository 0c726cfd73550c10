pub mod http;

use serde::{Deserialize, Serialize};

/// Wire body POSTed to the agent endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentRequest {
    pub prompt: String,
    pub agent: String,
}

/// Wire body returned by the agent endpoint. Either field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AgentReply {
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}
