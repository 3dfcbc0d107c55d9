//! The inbound event contract.
//!
//! An [`Event`] is an immutable view of one parsed message. Transports
//! usually build the stock [`Message`](crate::Message) type, but anything
//! implementing the trait can be dispatched, which lets a transport resolve
//! fields such as the sender's nickname lazily.
//!
//! # Tokenization
//!
//! `command()` and `args()` are a whitespace tokenization of `text()`:
//!
//! ```rust,ignore
//! // text() == "foo bar  baz"
//! assert_eq!(event.command(), "foo");
//! assert_eq!(event.args(), ["bar", "baz"]);
//! ```

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::SendResult;
use crate::provider::BoxedProvider;

/// One inbound chat message, as seen by the router and handlers.
#[async_trait]
pub trait Event: Send + Sync {
    /// First whitespace-delimited token of [`text`](Event::text); empty if
    /// the text is empty.
    fn command(&self) -> &str;

    /// Remaining tokens of [`text`](Event::text), in order.
    fn args(&self) -> &[String];

    /// Transport-specific destination identifier of the conversation.
    fn channel(&self) -> &str;

    /// Full message text, after address stripping and trimming.
    fn text(&self) -> &str;

    /// Sender display name; empty when the transport cannot supply one.
    fn nick(&self) -> &str;

    /// Whether the message was addressed to the bot (`name: ...`), or came
    /// from a single-user channel where every message is.
    fn is_directly_addressed(&self) -> bool;

    /// The transport that produced this event.
    fn provider(&self) -> &BoxedProvider;

    /// Sends `message` back to where this event came from.
    ///
    /// The default sends to [`channel`](Event::channel) through the
    /// provider. Failures are returned as-is; nothing is retried.
    async fn reply(&self, message: &str) -> SendResult<()> {
        self.provider().send(self.channel(), message).await
    }
}

/// A shared event trait object.
pub type BoxedEvent = Arc<dyn Event>;

impl std::fmt::Debug for dyn Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Event")
            .field("provider", &self.provider().name())
            .field("channel", &self.channel())
            .field("nick", &self.nick())
            .field("text", &self.text())
            .field("addressed", &self.is_directly_addressed())
            .finish()
    }
}
