//! Dispatcher configuration.
//!
//! User-facing texts resolve in three steps: the per-request override, then
//! the dispatcher's configured text, then a built-in default. Empty strings
//! count as absent at every step.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::known::{KNOWN_MAIL_CLIENTS, MatchPolicy};

/// Built-in title of the host's app chooser.
pub const DEFAULT_PICKER_TITLE: &str = "Send EMail using:";

/// Built-in message shown when the host refuses the launch.
pub const DEFAULT_DENIED_MESSAGE: &str = "Sending EMail has been forbidden by permissions";

/// Built-in message shown when no mail app can handle the request.
pub const DEFAULT_NO_HANDLER_MESSAGE: &str = "No EMail app has been found";

/// Optional user-facing texts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiTexts {
    /// Title of the app chooser.
    pub picker_title: Option<String>,
    /// Notification text when the host denies the launch.
    pub denied_message: Option<String>,
    /// Notification text when no mail app is available.
    pub no_handler_message: Option<String>,
}

impl UiTexts {
    /// Resolves every text against `fallback`, then against the built-ins.
    #[must_use]
    pub fn resolve(&self, fallback: &Self) -> ResolvedTexts {
        ResolvedTexts {
            picker_title: pick(
                [self.picker_title.as_deref(), fallback.picker_title.as_deref()],
                DEFAULT_PICKER_TITLE,
            ),
            denied_message: pick(
                [self.denied_message.as_deref(), fallback.denied_message.as_deref()],
                DEFAULT_DENIED_MESSAGE,
            ),
            no_handler_message: pick(
                [
                    self.no_handler_message.as_deref(),
                    fallback.no_handler_message.as_deref(),
                ],
                DEFAULT_NO_HANDLER_MESSAGE,
            ),
        }
    }
}

fn pick(candidates: [Option<&str>; 2], builtin: &str) -> String {
    candidates
        .into_iter()
        .flatten()
        .find(|text| !text.is_empty())
        .unwrap_or(builtin)
        .to_string()
}

/// Texts with every default applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTexts {
    /// Title of the app chooser.
    pub picker_title: String,
    /// Notification text when the host denies the launch.
    pub denied_message: String,
    /// Notification text when no mail app is available.
    pub no_handler_message: String,
}

impl Default for ResolvedTexts {
    fn default() -> Self {
        UiTexts::default().resolve(&UiTexts::default())
    }
}

/// Settings shared by every dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatcherConfig {
    /// Texts used when a request does not override them.
    pub texts: UiTexts,
    /// Identifiers of well-known mail clients, matched as substrings.
    pub known_clients: Vec<String>,
    /// How allow-list matches are counted.
    pub match_policy: MatchPolicy,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            texts: UiTexts::default(),
            known_clients: KNOWN_MAIL_CLIENTS.iter().map(ToString::to_string).collect(),
            match_policy: MatchPolicy::default(),
        }
    }
}

impl DispatcherConfig {
    /// Parses a configuration from JSON. Missing fields keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Sets the default texts.
    #[must_use]
    pub fn with_texts(mut self, texts: UiTexts) -> Self {
        self.texts = texts;
        self
    }

    /// Replaces the known-client allow-list.
    #[must_use]
    pub fn with_known_clients<I, S>(mut self, clients: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.known_clients = clients.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the allow-list match policy.
    #[must_use]
    pub const fn with_match_policy(mut self, policy: MatchPolicy) -> Self {
        self.match_policy = policy;
        self
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::redundant_clone,
    clippy::manual_string_new,
    clippy::needless_collect,
    clippy::unreadable_literal,
    clippy::used_underscore_items,
    clippy::similar_names
)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_defaults() {
        let texts = ResolvedTexts::default();
        assert_eq!(texts.picker_title, DEFAULT_PICKER_TITLE);
        assert_eq!(texts.denied_message, DEFAULT_DENIED_MESSAGE);
        assert_eq!(texts.no_handler_message, DEFAULT_NO_HANDLER_MESSAGE);
    }

    #[test]
    fn test_resolution_order() {
        let request = UiTexts {
            picker_title: Some("Pick one".to_string()),
            denied_message: Some(String::new()),
            no_handler_message: None,
        };
        let configured = UiTexts {
            picker_title: Some("Configured".to_string()),
            denied_message: Some("Denied!".to_string()),
            no_handler_message: Some(String::new()),
        };

        let texts = request.resolve(&configured);
        assert_eq!(texts.picker_title, "Pick one");
        assert_eq!(texts.denied_message, "Denied!");
        assert_eq!(texts.no_handler_message, DEFAULT_NO_HANDLER_MESSAGE);
    }

    #[test]
    fn test_default_config_uses_known_clients() {
        let config = DispatcherConfig::default();
        assert_eq!(config.known_clients.len(), KNOWN_MAIL_CLIENTS.len());
        assert!(config.known_clients.iter().any(|c| c == "com.google.android.gm"));
        assert_eq!(config.match_policy, MatchPolicy::DistinctCandidates);
    }

    #[test]
    fn test_from_json_partial() {
        let config = DispatcherConfig::from_json(
            r#"{"texts": {"picker_title": "Mail with"}, "match_policy": "match_events"}"#,
        )
        .unwrap();
        assert_eq!(config.texts.picker_title.as_deref(), Some("Mail with"));
        assert_eq!(config.texts.denied_message, None);
        assert_eq!(config.match_policy, MatchPolicy::MatchEvents);
        assert_eq!(config.known_clients.len(), KNOWN_MAIL_CLIENTS.len());
    }

    #[test]
    fn test_from_json_malformed() {
        let result = DispatcherConfig::from_json("{not json");
        assert!(matches!(result, Err(crate::Error::Config(_))));
    }

    #[test]
    fn test_roundtrip_custom_clients() {
        let config = DispatcherConfig::default().with_known_clients(["org.example.mail"]);
        let json = serde_json::to_string(&config).unwrap();
        let parsed = DispatcherConfig::from_json(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_load_missing_file() {
        let result = DispatcherConfig::load("/nonexistent/mailcompose.json");
        assert!(matches!(result, Err(crate::Error::Io(_))));
    }
}
