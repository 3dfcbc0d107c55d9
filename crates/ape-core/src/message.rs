//! The stock [`Event`] implementation built by transports.

use async_trait::async_trait;

use crate::error::SendResult;
use crate::event::Event;
use crate::identity::BotIdentity;
use crate::provider::BoxedProvider;
use crate::text::ParsedText;

/// An immutable inbound text message.
///
/// # Example
///
/// ```rust,ignore
/// let event = Message::builder(provider)
///     .channel("#general")
///     .nick("alice")
///     .parse("ape: echo hi", &identity);
///
/// assert!(event.is_directly_addressed());
/// assert_eq!(event.command(), "echo");
/// ```
#[derive(Clone)]
pub struct Message {
    provider: BoxedProvider,
    channel: String,
    nick: String,
    reply_to: Option<String>,
    parsed: ParsedText,
}

impl Message {
    /// Starts building a message produced by `provider`.
    pub fn builder(provider: BoxedProvider) -> MessageBuilder {
        MessageBuilder {
            provider,
            channel: String::new(),
            nick: String::new(),
            reply_to: None,
        }
    }

    /// Returns the destination replies are sent to.
    pub fn reply_destination(&self) -> &str {
        self.reply_to.as_deref().unwrap_or(&self.channel)
    }
}

#[async_trait]
impl Event for Message {
    fn command(&self) -> &str {
        &self.parsed.command
    }

    fn args(&self) -> &[String] {
        &self.parsed.args
    }

    fn channel(&self) -> &str {
        &self.channel
    }

    fn text(&self) -> &str {
        &self.parsed.text
    }

    fn nick(&self) -> &str {
        &self.nick
    }

    fn is_directly_addressed(&self) -> bool {
        self.parsed.addressed
    }

    fn provider(&self) -> &BoxedProvider {
        &self.provider
    }

    async fn reply(&self, message: &str) -> SendResult<()> {
        self.provider.send(self.reply_destination(), message).await
    }
}

impl std::fmt::Debug for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Message")
            .field("provider", &self.provider.name())
            .field("channel", &self.channel)
            .field("nick", &self.nick)
            .field("reply_to", &self.reply_to)
            .field("parsed", &self.parsed)
            .finish()
    }
}

/// Builder for [`Message`]. Finished by one of the `parse*` methods.
pub struct MessageBuilder {
    provider: BoxedProvider,
    channel: String,
    nick: String,
    reply_to: Option<String>,
}

impl MessageBuilder {
    /// Sets the channel identifier.
    pub fn channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = channel.into();
        self
    }

    /// Sets the sender's display name.
    pub fn nick(mut self, nick: impl Into<String>) -> Self {
        self.nick = nick.into();
        self
    }

    /// Sends replies to `destination` instead of the channel, for
    /// transports whose displayed channel name differs from its address.
    pub fn reply_to(mut self, destination: impl Into<String>) -> Self {
        self.reply_to = Some(destination.into());
        self
    }

    /// Detects a `name:` address against `identity`, then tokenizes.
    pub fn parse(self, raw: &str, identity: &BotIdentity) -> Message {
        self.finish(ParsedText::parse(raw, identity))
    }

    /// Tokenizes a message that is always addressed to the bot.
    pub fn parse_addressed(self, raw: &str) -> Message {
        self.finish(ParsedText::addressed(raw))
    }

    /// Tokenizes a message that is never addressed to the bot.
    pub fn parse_overheard(self, raw: &str) -> Message {
        self.finish(ParsedText::overheard(raw))
    }

    /// Uses an already parsed text.
    pub fn finish(self, parsed: ParsedText) -> Message {
        Message {
            provider: self.provider,
            channel: self.channel,
            nick: self.nick,
            reply_to: self.reply_to,
            parsed,
        }
    }
}
