//! Configuration for the terminal adapter.
//!
//! ```toml
//! [adapters.terminal]
//! prompt = "ape> "
//! channel = "#stdin"
//! nick = "stdin"
//! ordered = true
//! ```

use serde::{Deserialize, Serialize};

/// Terminal adapter configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerminalConfig {
    /// Written before each line is read. Empty disables the prompt.
    pub prompt: String,

    /// Channel reported by every event and used for replies.
    pub channel: String,

    /// Nick reported as the sender of every line.
    pub nick: String,

    /// Handle each line to completion before reading the next.
    ///
    /// Off by default: every line is dispatched on its own task.
    pub ordered: bool,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            prompt: "> ".to_string(),
            channel: "#stdin".to_string(),
            nick: "stdin".to_string(),
            ordered: false,
        }
    }
}
