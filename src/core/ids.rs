//! Identifier types for conversations and messages.
//!
//! Identifiers are short opaque strings. They are "practically unique" within a
//! session; nothing here is meant to be cryptographically unguessable.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Number of hex characters kept from a random UUID.
const ID_LEN: usize = 10;

/// Prefix applied to conversation identifiers.
pub const CONVERSATION_PREFIX: &str = "conv-";

/// Generate a fresh opaque identifier.
///
/// Consumes randomness from a v4 UUID and keeps the first [`ID_LEN`] hex digits.
#[must_use]
pub fn new_id() -> String {
    let mut raw = Uuid::new_v4().simple().to_string();
    raw.truncate(ID_LEN);
    raw
}

/// Declare a string newtype with a consistent API.
macro_rules! define_string_id {
    (
        $(#[$meta:meta])*
        $name:ident,
        prefix = $prefix:expr
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl Default for $name {
            #[inline]
            fn default() -> Self {
                Self::new()
            }
        }

        impl $name {
            /// Create a new identifier.
            #[must_use]
            pub fn new() -> Self {
                Self(format!("{}{}", $prefix, new_id()))
            }

            /// Wrap an existing identifier string as-is.
            #[must_use]
            pub fn from_raw(raw: impl Into<String>) -> Self {
                Self(raw.into())
            }

            /// Borrow the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            #[inline]
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<$name> for String {
            #[inline]
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

define_string_id!(
    /// Identifier of a conversation thread (sent to the backend as `conversation_id`).
    ConversationId,
    prefix = CONVERSATION_PREFIX
);

define_string_id!(
    /// Identifier of a single message.
    MessageId,
    prefix = ""
);

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_new_id_shape() {
        let id = new_id();
        assert_eq!(id.len(), ID_LEN);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_ids_are_practically_unique() {
        let ids: HashSet<String> = (0..10_000).map(|_| new_id()).collect();
        assert_eq!(ids.len(), 10_000);
    }

    #[test]
    fn test_conversation_id_prefix() {
        let id = ConversationId::new();
        assert!(id.as_str().starts_with(CONVERSATION_PREFIX));
        assert_eq!(id.as_str().len(), CONVERSATION_PREFIX.len() + ID_LEN);
    }

    #[test]
    fn test_serde_transparent() {
        let id = MessageId::from_raw("abc123");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"abc123\"");
        let back: MessageId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
