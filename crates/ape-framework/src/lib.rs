//! # Ape Framework
//!
//! The routing layer of Ape: decides which registered handler processes each
//! inbound event.
//!
//! This layer provides:
//! - [`Router`]: ordered pattern routes, a command table keyed by the first
//!   word of addressed messages, and a default handler
//! - [`PatternRoute`]: regular-expression routes whose captures become the
//!   handler's arguments
//! - [`global`]: an opt-in process-wide router with the same API

pub mod global;
pub mod route;
pub mod router;

pub use route::PatternRoute;
pub use router::{Dispatched, Route, RouteKind, Router};

// Re-exported so callers can build patterns without their own dependency.
pub use regex::Regex;
