//! Configuration module for the Ape runtime.
//!
//! Configuration is loaded in layers with figment (defaults, files,
//! `APE_*` environment variables, programmatic overrides) and validated
//! before use.

pub mod error;
pub mod loader;
pub mod schema;
pub mod validation;

pub use error::{ConfigError, ConfigResult};
pub use loader::{ConfigLoader, Profile, load_config, load_config_from_file};
pub use schema::{ApeConfig, LogFormat, LogLevel, LogOutput, LoggingConfig, SpanEventConfig};
pub use validation::validate_config;
