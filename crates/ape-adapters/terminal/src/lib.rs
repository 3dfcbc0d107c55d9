//! Terminal transport for Ape.
//!
//! Reads one message per line from stdin and prints replies to stdout as
//! `"{channel}: {message}"`. A line starting with `<bot name>:` is
//! addressed to the bot.
//!
//! ```text
//! > ape: ping
//! #stdin: pong
//! ```

pub mod adapter;
pub mod config;

pub use adapter::TerminalAdapter;
pub use config::TerminalConfig;
