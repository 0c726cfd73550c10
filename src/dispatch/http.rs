use std::time::Duration;

use reqwest::Client;

use crate::config::Config;
use crate::dispatch::{AgentReply, AgentRequest};
use crate::error::AgentError;

pub const MAX_RESPONSE_BYTES: usize = 2 * 1024 * 1024; // 2MB

/// Preview length for error bodies kept in logs.
const ERROR_BODY_PREVIEW: usize = 512;

pub struct HttpDispatch {
    client: Client,
    request_timeout: Option<Duration>,
}

impl HttpDispatch {
    pub fn new(config: &Config) -> Result<Self, AgentError> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout())
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(1)
            .build()
            .map_err(|e| AgentError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            request_timeout: config.request_timeout(),
        })
    }

    /// POST one prompt and decode the reply. Exactly one request is issued.
    pub async fn post_prompt(
        &self,
        endpoint: &str,
        req: &AgentRequest,
    ) -> Result<AgentReply, AgentError> {
        tracing::debug!(agent = %req.agent, prompt_len = req.prompt.len(), "posting prompt");

        let mut builder = self
            .client
            .post(endpoint)
            .header("Content-Type", "application/json")
            .json(req);
        if let Some(timeout) = self.request_timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await.map_err(|e| self.map_send_error(e))?;
        let status = response.status();

        // Any non-success status is a transport failure, whatever the body says.
        if !status.is_success() {
            let error_bytes = response.bytes().await.unwrap_or_default();
            let truncated = &error_bytes[..error_bytes.len().min(ERROR_BODY_PREVIEW)];
            return Err(AgentError::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(truncated).into_owned(),
            });
        }

        let bytes = response.bytes().await.map_err(|e| self.map_send_error(e))?;

        if bytes.len() > MAX_RESPONSE_BYTES {
            return Err(AgentError::TooLarge {
                size: bytes.len(),
                max: MAX_RESPONSE_BYTES,
            });
        }

        serde_json::from_slice(&bytes).map_err(|e| AgentError::Parse(e.to_string()))
    }

    fn map_send_error(&self, e: reqwest::Error) -> AgentError {
        match self.request_timeout {
            Some(timeout) if e.is_timeout() => AgentError::Timeout(timeout.as_millis() as u64),
            _ => AgentError::Request(e),
        }
    }
}
