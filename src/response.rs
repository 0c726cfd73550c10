use serde::{Deserialize, Serialize};

use crate::error::AgentError;

/// Caller-facing outcome of a submit.
/// Exactly one of the fields is meaningful; check `error` first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateResult {
    pub response: String,
    pub error: String,
}

impl GateResult {
    pub fn success(response: String) -> Self {
        Self {
            response,
            error: String::new(),
        }
    }

    pub fn failure(error: String) -> Self {
        Self {
            response: String::new(),
            error,
        }
    }

    pub fn is_error(&self) -> bool {
        !self.error.is_empty()
    }
}

impl From<Result<String, AgentError>> for GateResult {
    fn from(result: Result<String, AgentError>) -> Self {
        match result {
            Ok(text) => Self::success(text),
            Err(e) => Self::failure(e.user_message()),
        }
    }
}
