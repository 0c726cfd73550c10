use std::io::{self, Write};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// A platform clipboard that can take text.
pub trait ClipboardBackend {
    fn set_text(&mut self, text: &str) -> Result<(), String>;
}

#[cfg(feature = "system-clipboard")]
impl ClipboardBackend for arboard::Clipboard {
    fn set_text(&mut self, text: &str) -> Result<(), String> {
        arboard::Clipboard::set_text(self, text).map_err(|e| e.to_string())
    }
}

/// Opens a backend handle. Called again after a handle fails.
pub type Connect = Box<dyn FnMut() -> Result<Box<dyn ClipboardBackend>, String>>;

/// Copies text to the system clipboard, falling back to an OSC 52 escape
/// sequence on the terminal when the platform clipboard is unavailable.
pub struct ClipboardWriter {
    connect: Option<Connect>,
    system: Option<Box<dyn ClipboardBackend>>,
    terminal: Box<dyn Write>,
}

impl Default for ClipboardWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ClipboardWriter {
    /// System clipboard when built with `system-clipboard`, OSC 52 on stderr
    /// otherwise. stdout is left to the caller's output.
    pub fn new() -> Self {
        Self {
            connect: default_connect(),
            system: None,
            terminal: Box::new(io::stderr()),
        }
    }

    /// Skip the platform clipboard and write only to `terminal`.
    pub fn terminal_only(terminal: impl Write + 'static) -> Self {
        Self {
            connect: None,
            system: None,
            terminal: Box::new(terminal),
        }
    }

    pub fn with_backend(
        connect: impl FnMut() -> Result<Box<dyn ClipboardBackend>, String> + 'static,
        terminal: impl Write + 'static,
    ) -> Self {
        Self {
            connect: Some(Box::new(connect)),
            system: None,
            terminal: Box::new(terminal),
        }
    }

    /// Returns true if either mechanism accepted the text. A terminal that
    /// ignores OSC 52 still reports success; only write errors are observed.
    pub fn copy(&mut self, text: &str) -> bool {
        if self.connect.is_some() {
            match self.copy_system(text) {
                Ok(()) => return true,
                Err(msg) => tracing::debug!("system clipboard failed, using OSC 52: {msg}"),
            }
        }
        match self.copy_osc52(text) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("OSC 52 clipboard write failed: {e}");
                false
            }
        }
    }

    fn copy_system(&mut self, text: &str) -> Result<(), String> {
        let system = match self.system.as_mut() {
            Some(system) => system,
            None => {
                let Some(connect) = self.connect.as_mut() else {
                    return Err("no system clipboard".to_string());
                };
                self.system.insert(connect()?)
            }
        };
        // Keep the handle on success: some platforms drop the contents with it.
        // Discard it on failure so the next copy starts fresh.
        if let Err(e) = system.set_text(text) {
            self.system = None;
            return Err(e);
        }
        Ok(())
    }

    fn copy_osc52(&mut self, text: &str) -> io::Result<()> {
        self.terminal.write_all(osc52_sequence(text).as_bytes())?;
        self.terminal.flush()
    }
}

#[cfg(feature = "system-clipboard")]
fn default_connect() -> Option<Connect> {
    Some(Box::new(|| {
        let clipboard = arboard::Clipboard::new().map_err(|e| e.to_string())?;
        Ok(Box::new(clipboard) as Box<dyn ClipboardBackend>)
    }))
}

#[cfg(not(feature = "system-clipboard"))]
fn default_connect() -> Option<Connect> {
    None
}

/// `ESC ] 52 ; c ; <base64> BEL`
pub fn osc52_sequence(text: &str) -> String {
    format!("\x1b]52;c;{}\x07", STANDARD.encode(text))
}
