//! Configuration for the chat client.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::core::errors::{ChatError, ChatResult};

/// Environment variable overriding the backend base URL.
pub const API_URL_ENV: &str = "MODULAR_CHAT_API_URL";
/// Environment variable overriding the user id sent with each turn.
pub const USER_ID_ENV: &str = "MODULAR_CHAT_USER_ID";
/// Environment variable enabling a client-side request timeout (seconds).
pub const TIMEOUT_ENV: &str = "MODULAR_CHAT_TIMEOUT_SECS";

/// Local development backend.
pub const DEFAULT_API_BASE: &str = "http://localhost:8080";
/// User id used when none is configured.
pub const DEFAULT_USER_ID: &str = "client-web";
/// Title given to every new conversation.
pub const DEFAULT_TITLE: &str = "Nova conversa";

/// Chat client configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Backend base URL, without the `/chat` suffix.
    pub api_base: String,
    /// Client-assigned user id sent as `user_id`.
    pub user_id: String,
    /// Title of newly created conversations.
    pub default_title: String,
    /// Optional request deadline. `None` lets a turn run until the network gives up.
    #[serde(default, with = "opt_duration_serde")]
    pub request_timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            user_id: DEFAULT_USER_ID.to_string(),
            default_title: DEFAULT_TITLE.to_string(),
            request_timeout: None,
        }
    }
}

impl ClientConfig {
    /// Create a new config with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the config from process environment variables, falling back to defaults.
    ///
    /// # Errors
    /// Returns an error if an override is malformed or the result fails validation.
    pub fn from_env() -> ChatResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load the config through an arbitrary key lookup (used by `from_env`).
    ///
    /// Empty values are treated as unset.
    ///
    /// # Errors
    /// Returns an error if an override is malformed or the result fails validation.
    pub fn from_lookup<F>(lookup: F) -> ChatResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(url) = get(API_URL_ENV) {
            config.api_base = url.trim().to_string();
        }
        if let Some(user) = get(USER_ID_ENV) {
            config.user_id = user.trim().to_string();
        }
        if let Some(secs) = get(TIMEOUT_ENV) {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                ChatError::InvalidConfig(format!("{TIMEOUT_ENV} must be a whole number of seconds"))
            })?;
            config.request_timeout = Some(Duration::from_secs(secs));
        }

        config.validate()?;
        Ok(config)
    }

    /// Set the backend base URL.
    #[must_use]
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Set the user id.
    #[must_use]
    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = user_id.into();
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Validate configuration invariants.
    ///
    /// # Errors
    /// Returns an error if any value is out of range or invalid.
    pub fn validate(&self) -> ChatResult<()> {
        let url = Url::parse(&self.api_base)
            .map_err(|e| ChatError::InvalidConfig(format!("api_base {:?}: {e}", self.api_base)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ChatError::InvalidConfig(format!(
                "api_base must use http or https, got {}",
                url.scheme()
            )));
        }

        if self.user_id.trim().is_empty() {
            return Err(ChatError::InvalidConfig("user_id must not be empty".to_string()));
        }

        if self.request_timeout == Some(Duration::ZERO) {
            return Err(ChatError::InvalidConfig(
                "request_timeout must be > 0 when set".to_string(),
            ));
        }

        Ok(())
    }

    /// Full URL of the chat endpoint.
    #[must_use]
    pub fn chat_url(&self) -> String {
        format!("{}/chat", self.api_base.trim_end_matches('/'))
    }

    /// Full URL of the log endpoint for one conversation.
    #[must_use]
    pub fn logs_url(&self, conversation_id: &str) -> String {
        format!("{}/logs/{conversation_id}", self.api_base.trim_end_matches('/'))
    }
}

/// Serde module for optional durations stored as whole seconds.
mod opt_duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.map(|d| d.as_secs()).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = Option::<u64>::deserialize(deserializer)?;
        Ok(secs.map(Duration::from_secs))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.api_base, "http://localhost:8080");
        assert_eq!(config.user_id, "client-web");
        assert_eq!(config.default_title, "Nova conversa");
        assert_eq!(config.request_timeout, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = ClientConfig::new()
            .with_api_base("https://chat.example.com/")
            .with_user_id("u1")
            .with_timeout(Duration::from_secs(30));

        assert_eq!(config.chat_url(), "https://chat.example.com/chat");
        assert_eq!(config.logs_url("conv-1"), "https://chat.example.com/logs/conv-1");
        assert_eq!(config.user_id, "u1");
        assert_eq!(config.request_timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_lookup_overrides() {
        let config = ClientConfig::from_lookup(lookup_from(&[
            (API_URL_ENV, "http://10.0.0.2:9000"),
            (USER_ID_ENV, "tester"),
            (TIMEOUT_ENV, "15"),
        ]))
        .unwrap();
        assert_eq!(config.chat_url(), "http://10.0.0.2:9000/chat");
        assert_eq!(config.user_id, "tester");
        assert_eq!(config.request_timeout, Some(Duration::from_secs(15)));
    }

    #[test]
    fn test_lookup_empty_values_fall_back() {
        let config = ClientConfig::from_lookup(lookup_from(&[(API_URL_ENV, "  ")])).unwrap();
        assert_eq!(config.api_base, DEFAULT_API_BASE);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(ClientConfig::new().with_api_base("not a url").validate().is_err());
        assert!(ClientConfig::new().with_api_base("ftp://host").validate().is_err());
        assert!(ClientConfig::new().with_user_id(" ").validate().is_err());
        assert!(ClientConfig::new().with_timeout(Duration::ZERO).validate().is_err());
        assert!(ClientConfig::from_lookup(lookup_from(&[(TIMEOUT_ENV, "soon")])).is_err());
    }

    #[test]
    fn test_timeout_serde_as_seconds() {
        let config = ClientConfig::new().with_timeout(Duration::from_secs(7));
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["request_timeout"], 7);
        let back: ClientConfig = serde_json::from_value(json).unwrap();
        assert_eq!(back, config);
    }
}
