use std::sync::Mutex;

use agent_relay::RequestGate;
use agent_relay::config::{Config, DEFAULT_AGENT, DEFAULT_CONNECT_TIMEOUT_SECS};
use agent_relay::error::{AgentError, EMPTY_PROMPT_MESSAGE};

/// Tests that touch process env must hold this lock.
static ENV_LOCK: Mutex<()> = Mutex::new(());

const ENV_KEYS: &[&str] = &[
    "AGENT_RELAY_CONFIG",
    "AGENT_RELAY_ENDPOINT",
    "AGENT_RELAY_AGENT",
    "AGENT_RELAY_CONNECT_TIMEOUT_SECS",
    "AGENT_RELAY_TIMEOUT_SECS",
];

fn clear_env() {
    for key in ENV_KEYS {
        // SAFETY: callers hold ENV_LOCK.
        unsafe { std::env::remove_var(key) };
    }
}

fn set_env(key: &str, value: &str) {
    // SAFETY: callers hold ENV_LOCK.
    unsafe { std::env::set_var(key, value) };
}

#[test]
fn new_uses_defaults() {
    let config = Config::new("https://agents.example.com/ask");
    assert_eq!(config.agent, DEFAULT_AGENT);
    assert_eq!(config.connect_timeout_secs, DEFAULT_CONNECT_TIMEOUT_SECS);
    assert_eq!(config.request_timeout(), None);
    assert!(config.validate().is_ok());
}

#[test]
fn toml_minimal_and_full() {
    let minimal = Config::from_toml_str(r#"endpoint = "http://localhost:8080/agent""#).unwrap();
    assert_eq!(minimal, Config::new("http://localhost:8080/agent"));

    let full = Config::from_toml_str(
        r#"
        endpoint = "https://agents.example.com/ask"
        agent = "research"
        connect_timeout_secs = 3
        request_timeout_secs = 45
        "#,
    )
    .unwrap();
    assert_eq!(full.agent, "research");
    assert_eq!(full.connect_timeout().as_secs(), 3);
    assert_eq!(full.request_timeout().map(|d| d.as_secs()), Some(45));
}

#[test]
fn toml_rejects_unknown_keys_and_bad_values() {
    let unknown = Config::from_toml_str(
        r#"
        endpoint = "http://localhost/agent"
        retries = 3
        "#,
    );
    assert!(matches!(unknown, Err(AgentError::Config(_))));

    let zero = Config::from_toml_str(
        r#"
        endpoint = "http://localhost/agent"
        request_timeout_secs = 0
        "#,
    );
    assert!(matches!(zero, Err(AgentError::Config(_))));

    let scheme = Config::from_toml_str(r#"endpoint = "ftp://localhost/agent""#);
    assert!(matches!(scheme, Err(AgentError::Config(_))));

    let missing = Config::from_toml_str(r#"agent = "general""#);
    assert!(matches!(missing, Err(AgentError::Config(_))));
}

#[test]
fn gate_refuses_invalid_config() {
    let err = RequestGate::new(&Config::new("   ")).err().unwrap();
    assert!(matches!(err, AgentError::Config(_)));
    assert!(err.user_message().starts_with("invalid configuration"));
}

#[test]
fn usage_errors_resolve_without_io() {
    let gate = RequestGate::new(&Config::new("http://127.0.0.1:1/agent")).unwrap();
    assert_eq!(gate.endpoint(), "http://127.0.0.1:1/agent");
    let result = tokio_test::block_on(gate.submit("   ", "general"));
    assert_eq!(result.error, EMPTY_PROMPT_MESSAGE);
}

#[test]
fn from_env_reads_all_keys() {
    let _lock = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    clear_env();

    assert!(matches!(Config::from_env(), Err(AgentError::Config(_))));

    set_env("AGENT_RELAY_ENDPOINT", "http://localhost:9000/agent");
    set_env("AGENT_RELAY_AGENT", "support");
    set_env("AGENT_RELAY_CONNECT_TIMEOUT_SECS", "4");
    set_env("AGENT_RELAY_TIMEOUT_SECS", "60");
    let config = Config::from_env().unwrap();
    assert_eq!(config.endpoint, "http://localhost:9000/agent");
    assert_eq!(config.agent, "support");
    assert_eq!(config.connect_timeout_secs, 4);
    assert_eq!(config.request_timeout_secs, Some(60));

    set_env("AGENT_RELAY_TIMEOUT_SECS", "a minute");
    assert!(matches!(Config::from_env(), Err(AgentError::Config(_))));

    clear_env();
}

#[test]
fn load_layers_env_over_file() {
    let _lock = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    clear_env();

    let path = std::env::temp_dir().join(format!("agent-relay-config-{}.toml", std::process::id()));
    std::fs::write(
        &path,
        "endpoint = \"http://file.example/agent\"\nagent = \"from-file\"\nrequest_timeout_secs = 20\n",
    )
    .unwrap();
    set_env("AGENT_RELAY_CONFIG", path.to_str().unwrap());

    let config = Config::load().unwrap();
    assert_eq!(config.endpoint, "http://file.example/agent");
    assert_eq!(config.agent, "from-file");
    assert_eq!(config.request_timeout_secs, Some(20));

    set_env("AGENT_RELAY_AGENT", "from-env");
    let config = Config::load().unwrap();
    assert_eq!(config.agent, "from-env");
    assert_eq!(config.endpoint, "http://file.example/agent");

    set_env("AGENT_RELAY_CONFIG", "/nonexistent/agent-relay.toml");
    assert!(matches!(Config::load(), Err(AgentError::Config(_))));

    clear_env();
    let _ = std::fs::remove_file(&path);
}

#[test]
fn load_takes_endpoint_from_env_when_file_omits_it() {
    let _lock = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    clear_env();

    let path = std::env::temp_dir().join(format!(
        "agent-relay-no-endpoint-{}.toml",
        std::process::id()
    ));
    std::fs::write(&path, "agent = \"shared\"\nconnect_timeout_secs = 5\n").unwrap();
    set_env("AGENT_RELAY_CONFIG", path.to_str().unwrap());

    // Neither source names an endpoint.
    assert!(matches!(Config::load(), Err(AgentError::Config(_))));

    set_env("AGENT_RELAY_ENDPOINT", "http://env.example/agent");
    let config = Config::load().unwrap();
    assert_eq!(config.endpoint, "http://env.example/agent");
    assert_eq!(config.agent, "shared");
    assert_eq!(config.connect_timeout_secs, 5);

    // A standalone read of the same file still needs the endpoint.
    assert!(matches!(Config::from_file(&path), Err(AgentError::Config(_))));

    clear_env();
    let _ = std::fs::remove_file(&path);
}
