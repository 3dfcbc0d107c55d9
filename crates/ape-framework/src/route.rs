//! Pattern routes.
//!
//! A [`PatternRoute`] pairs a regular expression with a handler. Patterns are
//! matched against the event's full `text()` and fire whether or not the bot
//! was addressed, which suits "overheard" behaviours such as expanding any
//! URL posted in a channel.

use regex::Regex;

use ape_core::BoxedHandler;

/// A regular expression and the handler it triggers.
#[derive(Clone)]
pub struct PatternRoute {
    pattern: Regex,
    handler: BoxedHandler,
}

impl PatternRoute {
    /// Creates a new route.
    pub fn new(pattern: Regex, handler: BoxedHandler) -> Self {
        Self { pattern, handler }
    }

    /// Returns the route's pattern.
    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }

    /// Returns the route's handler.
    pub fn handler(&self) -> &BoxedHandler {
        &self.handler
    }

    /// Matches `text` against the pattern.
    ///
    /// On a match, returns the whole match followed by every capture group in
    /// order. Groups that did not take part in the match are returned as empty
    /// strings, so the list has exactly one entry per group, group 0 first.
    pub fn captures(&self, text: &str) -> Option<Vec<String>> {
        let caps = self.pattern.captures(text)?;
        Some(
            caps.iter()
                .map(|m| m.map_or_else(String::new, |m| m.as_str().to_owned()))
                .collect(),
        )
    }
}

impl std::fmt::Debug for PatternRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PatternRoute")
            .field("pattern", &self.pattern.as_str())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use ape_core::{BoxedEvent, handler_fn};

    use super::*;

    fn route(pattern: &str) -> PatternRoute {
        let handler = handler_fn(|_event: BoxedEvent, _args: Vec<String>| async {});
        PatternRoute::new(Regex::new(pattern).unwrap(), Arc::new(handler))
    }

    #[test]
    fn test_whole_match_then_groups() {
        let r = route(r"^weather in (\w+)$");
        assert_eq!(
            r.captures("weather in Boston"),
            Some(vec!["weather in Boston".to_string(), "Boston".to_string()])
        );
        assert_eq!(r.captures("weather on Mars"), None);
    }

    #[test]
    fn test_unmatched_group_is_empty() {
        let r = route(r"(a)|(b)");
        assert_eq!(
            r.captures("b"),
            Some(vec!["b".to_string(), String::new(), "b".to_string()])
        );
    }

    #[test]
    fn test_unanchored_match_inside_text() {
        let r = route(r"https?://\S+");
        assert_eq!(
            r.captures("see https://example.com now"),
            Some(vec!["https://example.com".to_string()])
        );
    }
}
