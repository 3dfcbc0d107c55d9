//! # Ape
//!
//! A small chat-bot framework for Rust.
//!
//! ## Overview
//!
//! Transports turn platform input into events; a router hands each event to
//! at most one handler: the first matching pattern route, else the command
//! named by the first word of a message addressed to the bot, else a default
//! handler. Unmatched events are dropped silently.
//!
//! ```text
//! ┌─────────────┐     ┌───────────┐     ┌──────────────────────────┐
//! │   Adapter   │────▶│ EventSink │────▶│ Router                   │
//! │ (terminal)  │     │ (1 task / │     │  1. pattern routes       │──▶ handler
//! └──────▲──────┘     │  message) │     │  2. commands (addressed) │
//!        │            └───────────┘     │  3. default  (addressed) │
//!        │                              └──────────────────────────┘
//!        └──────────── Provider::send ◀── Event::reply
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ape::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let runtime = ApeRuntime::new();
//!
//!     runtime.router().add_command_fn("ping", |event, _args| async move {
//!         let _ = event.reply("pong").await;
//!     });
//!     runtime.router().add_pattern_route_fn(
//!         Regex::new(r"weather in (\w+)")?,
//!         |event, args| async move {
//!             let _ = event.reply(&format!("no idea about {}", args[1])).await;
//!         },
//!     );
//!
//!     runtime.register_adapter::<TerminalAdapter>().await?;
//!     runtime.run().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - `terminal`: the stdin/stdout transport (default)
//! - `toml-config`: `ape.toml` configuration files (default)
//! - `yaml-config`: `ape.yaml` configuration files
//! - `json-log`: JSON log output

pub use ape_core as core;
pub use ape_framework as framework;
pub use ape_runtime as runtime;

#[cfg(feature = "terminal")]
pub use ape_adapter_terminal as terminal;

pub use ape_framework::global;

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use ape::prelude::*;
/// ```
pub mod prelude {
    // Runtime - main entry point
    pub use ape_runtime::ApeRuntime;

    // Routing
    pub use ape_framework::{Dispatched, Regex, Router, global};

    // Event and handler contracts
    pub use ape_core::{
        Adapter, BotIdentity, BoxedEvent, Event, EventSink, Handler, Message, Provider,
        SendError, SendResult, async_trait, handler_fn,
    };

    // Logging macros
    pub use ape_runtime::prelude::*;

    #[cfg(feature = "terminal")]
    pub use ape_adapter_terminal::{TerminalAdapter, TerminalConfig};
}
