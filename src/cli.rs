use clap::Parser;

/// Send a prompt to the agent endpoint and print the reply as HTML.
#[derive(Parser, Debug, Clone)]
#[command(name = "agent-relay", version)]
pub struct Cli {
    /// Also copy the raw reply to the clipboard.
    #[arg(long, default_value_t = false)]
    pub copy: bool,

    /// Agent kind to ask. Defaults to the configured agent.
    #[arg(long, value_name = "KIND")]
    pub agent: Option<String>,

    /// Prompt words. Everything from the first word on is prompt text, flags
    /// included. Read from stdin when empty.
    #[arg(trailing_var_arg = true, value_name = "PROMPT")]
    pub prompt: Vec<String>,
}

impl Cli {
    /// The prompt words joined by spaces, or None when none were given.
    pub fn prompt_text(&self) -> Option<String> {
        (!self.prompt.is_empty()).then(|| self.prompt.join(" "))
    }
}
