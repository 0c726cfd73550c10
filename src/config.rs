use std::env;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::AgentError;

pub const DEFAULT_AGENT: &str = "general";
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Full URL the prompt is POSTed to.
    pub endpoint: String,
    /// Agent kind sent when the caller doesn't pick one.
    pub agent: String,
    pub connect_timeout_secs: u64,
    /// Whole-request timeout. None leaves the request bounded only by the transport.
    pub request_timeout_secs: Option<u64>,
}

fn default_agent() -> String {
    DEFAULT_AGENT.to_string()
}

/// On-disk shape read by `load`. Every key is optional so `AGENT_RELAY_ENDPOINT`
/// can supply the endpoint a shared file leaves out.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    endpoint: Option<String>,
    agent: Option<String>,
    connect_timeout_secs: Option<u64>,
    request_timeout_secs: Option<u64>,
}

impl FileConfig {
    fn parse(s: &str) -> Result<Self, AgentError> {
        toml::from_str(s).map_err(|e| AgentError::Config(format!("bad TOML: {e}")))
    }

    fn read(path: &Path) -> Result<Self, AgentError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| AgentError::Config(format!("cannot read {}: {e}", path.display())))?;
        tracing::debug!(path = %path.display(), "loaded config file");
        Self::parse(&text)
    }

    /// Fill the endpoint from `endpoint` when the file has none.
    fn into_config(self, endpoint: Option<String>) -> Result<Config, AgentError> {
        let endpoint = endpoint
            .or(self.endpoint)
            .ok_or_else(|| AgentError::Config("no endpoint configured".to_string()))?;
        Ok(Config {
            endpoint,
            agent: self.agent.unwrap_or_else(default_agent),
            connect_timeout_secs: self
                .connect_timeout_secs
                .unwrap_or(DEFAULT_CONNECT_TIMEOUT_SECS),
            request_timeout_secs: self.request_timeout_secs,
        })
    }
}

impl Config {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            agent: default_agent(),
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            request_timeout_secs: None,
        }
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// Missing optional keys take their defaults; `endpoint` is required.
    pub fn from_toml_str(s: &str) -> Result<Self, AgentError> {
        let config = FileConfig::parse(s)?.into_config(None)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_env() -> Result<Self, AgentError> {
        let endpoint = env::var("AGENT_RELAY_ENDPOINT")
            .map_err(|_| AgentError::Config("AGENT_RELAY_ENDPOINT is not set".to_string()))?;
        let mut config = Config::new(endpoint);
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Read the TOML file named by `AGENT_RELAY_CONFIG` if set, then layer env
    /// overrides on top. The file may omit `endpoint` when `AGENT_RELAY_ENDPOINT`
    /// is set. Without the file, equivalent to `from_env`.
    pub fn load() -> Result<Self, AgentError> {
        let Ok(path) = env::var("AGENT_RELAY_CONFIG") else {
            return Self::from_env();
        };
        let file = FileConfig::read(Path::new(&path))?;
        let mut config = file.into_config(env::var("AGENT_RELAY_ENDPOINT").ok())?;
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// A standalone file must name its endpoint.
    pub fn from_file(path: &Path) -> Result<Self, AgentError> {
        let config = FileConfig::read(path)?.into_config(None)?;
        config.validate()?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) -> Result<(), AgentError> {
        if let Some(agent) = env::var("AGENT_RELAY_AGENT")
            .ok()
            .filter(|a| !a.trim().is_empty())
        {
            self.agent = agent;
        }
        if let Ok(v) = env::var("AGENT_RELAY_CONNECT_TIMEOUT_SECS") {
            self.connect_timeout_secs = parse_secs("AGENT_RELAY_CONNECT_TIMEOUT_SECS", &v)?;
        }
        if let Ok(v) = env::var("AGENT_RELAY_TIMEOUT_SECS") {
            self.request_timeout_secs = Some(parse_secs("AGENT_RELAY_TIMEOUT_SECS", &v)?);
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), AgentError> {
        let endpoint = self.endpoint.trim();
        if endpoint.is_empty() {
            return Err(AgentError::Config("endpoint is empty".to_string()));
        }
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(AgentError::Config(format!(
                "endpoint must be an http(s) URL, got {endpoint}"
            )));
        }
        if self.connect_timeout_secs == 0 {
            return Err(AgentError::Config(
                "connect_timeout_secs must be positive".to_string(),
            ));
        }
        if self.request_timeout_secs == Some(0) {
            return Err(AgentError::Config(
                "request_timeout_secs must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_secs(name: &str, value: &str) -> Result<u64, AgentError> {
    value
        .trim()
        .parse::<u64>()
        .map_err(|_| AgentError::Config(format!("{name} must be a whole number of seconds")))
}
