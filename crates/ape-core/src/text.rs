//! Turning raw message text into a command line.
//!
//! Transports run every inbound message through [`ParsedText`]: strip the
//! bot's address (if any), trim, then split on runs of whitespace. The first
//! token is the command, the rest are its arguments.

use crate::identity::BotIdentity;

/// Splits `text` into a command and its arguments.
///
/// Runs of whitespace collapse, so `"foo bar  baz"` gives
/// `("foo", ["bar", "baz"])`. Empty or blank text gives `("", [])`.
pub fn tokenize(text: &str) -> (String, Vec<String>) {
    let mut tokens = text.split_whitespace().map(str::to_owned);
    let command = tokens.next().unwrap_or_default();
    (command, tokens.collect())
}

/// A tokenized inbound message.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedText {
    /// Message text after address stripping and trimming.
    pub text: String,
    /// First token of `text`.
    pub command: String,
    /// Remaining tokens of `text`.
    pub args: Vec<String>,
    /// Whether the bot was directly addressed.
    pub addressed: bool,
}

impl ParsedText {
    /// Parses text from a multi-user channel.
    ///
    /// The message counts as addressed only when it starts with one of the
    /// bot's names and a colon; the address is removed from `text`.
    pub fn parse(raw: &str, identity: &BotIdentity) -> Self {
        match identity.strip_address(raw) {
            Some(rest) => Self::build(rest, true),
            None => Self::build(raw, false),
        }
    }

    /// Parses text from a single-destination channel (a private webhook or a
    /// one-to-one chat), where every message is meant for the bot.
    pub fn addressed(raw: &str) -> Self {
        Self::build(raw, true)
    }

    /// Parses text the bot merely overheard.
    pub fn overheard(raw: &str) -> Self {
        Self::build(raw, false)
    }

    fn build(text: &str, addressed: bool) -> Self {
        let text = text.trim();
        let (command, args) = tokenize(text);
        Self {
            text: text.to_owned(),
            command,
            args,
            addressed,
        }
    }
}
