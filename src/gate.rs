//! Single-flight front door to the agent endpoint.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::config::Config;
use crate::dispatch::http::HttpDispatch;
use crate::dispatch::AgentRequest;
use crate::error::AgentError;
use crate::response::GateResult;

pub const NO_RESPONSE: &str = "No response received";

pub struct RequestGate {
    dispatch: HttpDispatch,
    endpoint: String,
    busy: AtomicBool,
}

/// Holds the busy flag for the lifetime of one submit. Dropping it releases
/// the flag, including when the submit future is dropped mid-request.
struct BusyGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> BusyGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

impl RequestGate {
    pub fn new(config: &Config) -> Result<Self, AgentError> {
        config.validate()?;
        Ok(Self {
            dispatch: HttpDispatch::new(config)?,
            endpoint: config.endpoint.trim().to_string(),
            busy: AtomicBool::new(false),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Submit a prompt and fold the outcome into the caller-facing shape.
    pub async fn submit(&self, prompt: &str, agent: &str) -> GateResult {
        GateResult::from(self.try_submit(prompt, agent).await)
    }

    /// Submit a prompt, keeping the error taxonomy.
    ///
    /// Rejects immediately with [`AgentError::Busy`] while another submit is in
    /// flight and with [`AgentError::EmptyPrompt`] for blank input; neither
    /// touches the network. Otherwise issues exactly one POST.
    pub async fn try_submit(&self, prompt: &str, agent: &str) -> Result<String, AgentError> {
        if self.is_busy() {
            return Err(AgentError::Busy);
        }
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(AgentError::EmptyPrompt);
        }
        // Lost a race with another caller between the check and here.
        let Some(_guard) = BusyGuard::acquire(&self.busy) else {
            return Err(AgentError::Busy);
        };

        let req = AgentRequest {
            prompt: prompt.to_string(),
            agent: agent.to_string(),
        };

        let reply = match self.dispatch.post_prompt(&self.endpoint, &req).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!(error = %e, agent, "agent request failed");
                return Err(e);
            }
        };

        if let Some(err) = reply.error.filter(|e| !e.is_empty()) {
            tracing::info!(agent, "agent service reported an error");
            return Err(AgentError::Service(err));
        }

        Ok(reply
            .response
            .filter(|r| !r.is_empty())
            .unwrap_or_else(|| NO_RESPONSE.to_string()))
    }
}
