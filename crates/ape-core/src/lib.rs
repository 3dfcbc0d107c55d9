//! # Ape Core
//!
//! The contracts shared by every part of the Ape chat-bot framework.
//!
//! - **Events**: an immutable view of one inbound message ([`Event`], [`Message`])
//! - **Providers**: the outbound `send` primitive of a transport ([`Provider`])
//! - **Handlers**: units that process an event plus extracted arguments ([`Handler`])
//! - **Adapters**: transports that produce events and feed an [`EventSink`]
//! - **Text**: address detection and whitespace tokenization ([`ParsedText`])
//!
//! ## Flow
//!
//! ```text
//! ┌───────────┐     ┌───────────┐     ┌──────────┐     ┌─────────┐
//! │  Adapter  │────▶│ EventSink │────▶│  Router  │────▶│ Handler │
//! │(transport)│     │ (1 task/  │     │(framework│     └────┬────┘
//! └─────▲─────┘     │  message) │     │  crate)  │          │
//!       │           └───────────┘     └──────────┘          │
//!       └──────────────── Provider::send ◀── Event::reply ──┘
//! ```
//!
//! The router lives in `ape-framework`; this crate only defines what it
//! routes.

pub mod adapter;
pub mod error;
pub mod event;
pub mod handler;
pub mod identity;
pub mod message;
pub mod provider;
pub mod text;

pub use adapter::{Adapter, BoxedAdapter, ConfigurableAdapter, EventSink};
pub use error::{AdapterError, AdapterResult, SendError, SendResult};
pub use event::{BoxedEvent, Event};
pub use handler::{BoxedHandler, Handler, HandlerFn, handler_fn};
pub use identity::BotIdentity;
pub use message::{Message, MessageBuilder};
pub use provider::{BoxedProvider, Provider};
pub use text::{ParsedText, tokenize};

// Re-exported so implementors don't need their own dependency.
pub use async_trait::async_trait;

/// Prelude for common imports.
pub mod prelude {
    pub use super::{
        Adapter, BotIdentity, BoxedEvent, BoxedHandler, Event, EventSink, Handler, Message,
        Provider, SendError, SendResult, async_trait, handler_fn,
    };
}
