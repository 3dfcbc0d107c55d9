//! The bot's own names, used for direct-address detection.

use serde::{Deserialize, Serialize};

/// Names the bot answers to.
///
/// A message is directly addressed when it starts with one of these names
/// followed by a colon, e.g. `ape: ping`. Comparison is case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotIdentity {
    /// Primary nickname.
    #[serde(default = "default_name")]
    pub name: String,

    /// Additional names, such as a platform-encoded mention (`<@U123>`).
    #[serde(default)]
    pub aliases: Vec<String>,
}

impl Default for BotIdentity {
    fn default() -> Self {
        Self::new(default_name())
    }
}

fn default_name() -> String {
    "ape".to_string()
}

impl BotIdentity {
    /// Creates an identity with a single name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            aliases: Vec::new(),
        }
    }

    /// Adds an alias (builder pattern).
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Iterates the primary name followed by the aliases.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.aliases.iter().map(String::as_str))
    }

    /// Returns whether `target` is one of this bot's names, ignoring case.
    pub fn answers_to(&self, target: &str) -> bool {
        if target.is_empty() {
            return false;
        }
        let target = target.to_lowercase();
        self.names().any(|name| name.to_lowercase() == target)
    }

    /// Strips a leading `name:` address from `raw`.
    ///
    /// Only the first colon is considered, and it must not be the first
    /// byte. The text before it is trimmed before comparison. Returns the
    /// remainder after the colon (untrimmed) when the prefix names this bot.
    pub fn strip_address<'a>(&self, raw: &'a str) -> Option<&'a str> {
        let colon = raw.find(':')?;
        if colon == 0 {
            return None;
        }
        let target = raw[..colon].trim();
        self.answers_to(target).then(|| &raw[colon + 1..])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_address_case_insensitive() {
        let id = BotIdentity::new("ape");
        assert_eq!(id.strip_address("APE: ping"), Some(" ping"));
        assert_eq!(id.strip_address("  ape  :ping"), Some("ping"));
    }

    #[test]
    fn test_strip_address_folds_non_ascii_case() {
        let id = BotIdentity::new("Ärger").alias("Ωmega");
        assert_eq!(id.strip_address("ärger: ping"), Some(" ping"));
        assert_eq!(id.strip_address("ÄRGER:ping"), Some("ping"));
        assert!(id.answers_to("ωMEGA"));
        assert!(!id.answers_to("arger"));
    }

    #[test]
    fn test_strip_address_alias() {
        let id = BotIdentity::new("ape").alias("<@U42>");
        assert_eq!(id.strip_address("<@U42>: weather"), Some(" weather"));
    }

    #[test]
    fn test_strip_address_rejects_other_names() {
        let id = BotIdentity::new("ape");
        assert_eq!(id.strip_address("bob: ping"), None);
        assert_eq!(id.strip_address(":ape ping"), None);
        assert_eq!(id.strip_address("ape ping"), None);
        // Only the first colon counts.
        assert_eq!(id.strip_address("note: ape: ping"), None);
    }

    #[test]
    fn test_empty_name_never_matches() {
        let id = BotIdentity::new("");
        assert!(!id.answers_to(""));
        assert_eq!(id.strip_address(" : ping"), None);
    }
}
