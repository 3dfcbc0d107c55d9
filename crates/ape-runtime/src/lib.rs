//! Ape Runtime - orchestration layer for the Ape chat-bot framework.
//!
//! This crate provides:
//! - Layered configuration (`ape.toml`, profile files, `APE_*` variables)
//! - Logging setup driven by the `[logging]` section
//! - [`ApeRuntime`], which builds adapters from their config sections, feeds
//!   their events to a router and handles shutdown
//!
//! ```ignore
//! use ape_runtime::ApeRuntime;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let runtime = ApeRuntime::new();
//!
//!     runtime.router().add_command_fn("ping", |event, _| async move {
//!         let _ = event.reply("pong").await;
//!     });
//!     runtime.register_adapter::<MyAdapter>().await?;
//!
//!     // Run until Ctrl+C
//!     runtime.run().await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod runtime;

pub use config::{ApeConfig, ConfigError, ConfigLoader, ConfigResult, LoggingConfig};
pub use error::{RuntimeError, RuntimeResult};
pub use logging::{LoggingBuilder, SpanEvents};
pub use runtime::{ApeRuntime, RuntimeBuilder};

// Re-export tracing for use by other crates
pub use tracing;

/// Logging macros for handler code.
pub mod prelude {
    pub use tracing::{Level, debug, error, info, instrument, span, trace, warn};
}
