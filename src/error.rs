use thiserror::Error;

pub const BUSY_MESSAGE: &str = "Already processing a request. Please wait.";
pub const EMPTY_PROMPT_MESSAGE: &str = "Please enter a prompt or question.";
pub const CONNECT_MESSAGE: &str =
    "Unable to connect to AI service. Please check your connection and try again.";

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("a request is already in flight")]
    Busy,

    #[error("prompt is empty")]
    EmptyPrompt,

    #[error("agent service reported: {0}")]
    Service(String),

    #[error("agent endpoint returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("timeout after {0}ms")]
    Timeout(u64),

    #[error("response too large: {size} bytes (max {max})")]
    TooLarge { size: usize, max: usize },

    #[error("failed to parse agent response: {0}")]
    Parse(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl AgentError {
    /// True for failures between us and the agent service. These all collapse
    /// into one caller-facing message.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Status { .. }
                | Self::Request(_)
                | Self::Timeout(_)
                | Self::TooLarge { .. }
                | Self::Parse(_)
        )
    }

    /// Produce the message shown to callers.
    /// Transport detail (URLs, status bodies, parser output) is never included.
    pub fn user_message(&self) -> String {
        match self {
            Self::Busy => BUSY_MESSAGE.to_string(),
            Self::EmptyPrompt => EMPTY_PROMPT_MESSAGE.to_string(),
            Self::Service(msg) => msg.clone(),
            Self::Config(msg) => format!("invalid configuration: {msg}"),
            _ => CONNECT_MESSAGE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_variants_share_one_message() {
        let errors = [
            AgentError::Status {
                status: 502,
                body: "upstream exploded at 10.0.0.3".to_string(),
            },
            AgentError::Timeout(30_000),
            AgentError::TooLarge { size: 10, max: 5 },
            AgentError::Parse("expected value at line 1".to_string()),
        ];
        for err in errors {
            assert!(err.is_transport(), "{err:?} should be transport");
            assert_eq!(err.user_message(), CONNECT_MESSAGE);
        }
    }

    #[test]
    fn service_error_is_verbatim() {
        let err = AgentError::Service("Agent 'x' is not available".to_string());
        assert!(!err.is_transport());
        assert_eq!(err.user_message(), "Agent 'x' is not available");
    }

    #[test]
    fn usage_errors_have_fixed_messages() {
        assert_eq!(AgentError::Busy.user_message(), BUSY_MESSAGE);
        assert_eq!(AgentError::EmptyPrompt.user_message(), EMPTY_PROMPT_MESSAGE);
        assert!(!AgentError::Busy.is_transport());
    }
}
