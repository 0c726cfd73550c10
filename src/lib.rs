pub mod cli;
pub mod clipboard;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod format;
pub mod gate;
pub mod response;

pub use format::to_html;
pub use gate::RequestGate;
pub use response::GateResult;
