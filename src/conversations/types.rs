//! Message and conversation model.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::core::ids::{ConversationId, MessageId};

/// Who produced a message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Author {
    /// The person typing into the client.
    User,
    /// The backend (or a failure synthesized in its place).
    Bot,
}

impl Author {
    /// Stable string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Bot => "bot",
        }
    }
}

impl fmt::Display for Author {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Backend agent that produced a bot reply.
///
/// Serialized as the backend's plain agent name. Names outside the known set are
/// kept verbatim in [`AgentTag::Other`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum AgentTag {
    /// `RouterAgent`: first hop; also blamed for transport failures.
    Router,
    /// `MathAgent`.
    Math,
    /// `KnowledgeAgent`: default when the backend reports no workflow.
    Knowledge,
    /// Any agent name this client does not know about.
    Other(String),
}

impl AgentTag {
    /// Wire name of the router agent.
    pub const ROUTER: &'static str = "RouterAgent";
    /// Wire name of the math agent.
    pub const MATH: &'static str = "MathAgent";
    /// Wire name of the knowledge agent.
    pub const KNOWLEDGE: &'static str = "KnowledgeAgent";

    /// Map a backend agent name onto a tag.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            Self::ROUTER => Self::Router,
            Self::MATH => Self::Math,
            Self::KNOWLEDGE => Self::Knowledge,
            other => Self::Other(other.to_string()),
        }
    }

    /// Backend agent name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Router => Self::ROUTER,
            Self::Math => Self::MATH,
            Self::Knowledge => Self::KNOWLEDGE,
            Self::Other(name) => name,
        }
    }

    /// Whether this is one of the agents the client knows how to display.
    #[must_use]
    pub const fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl fmt::Display for AgentTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for AgentTag {
    fn from(value: &str) -> Self {
        Self::from_name(value)
    }
}

impl Serialize for AgentTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for AgentTag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Self::from_name(&name))
    }
}

/// A single message in a conversation.
///
/// Fields are private so a message cannot change after construction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    id: MessageId,
    who: Author,
    text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    meta: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    agent: Option<AgentTag>,
    created_at: DateTime<Utc>,
}

impl Message {
    /// Build a user message. User messages never carry an agent tag.
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            id: MessageId::new(),
            who: Author::User,
            text: text.into(),
            meta: None,
            agent: None,
            created_at: Utc::now(),
        }
    }

    /// Build a bot message.
    #[must_use]
    pub fn bot(text: impl Into<String>, meta: Option<String>, agent: AgentTag) -> Self {
        Self {
            id: MessageId::new(),
            who: Author::Bot,
            text: text.into(),
            meta,
            agent: Some(agent),
            created_at: Utc::now(),
        }
    }

    /// Message id.
    #[must_use]
    pub const fn id(&self) -> &MessageId {
        &self.id
    }

    /// Author.
    #[must_use]
    pub const fn who(&self) -> Author {
        self.who
    }

    /// Body text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Supplementary provenance text, if any.
    #[must_use]
    pub fn meta(&self) -> Option<&str> {
        self.meta.as_deref()
    }

    /// Agent tag, if any.
    #[must_use]
    pub const fn agent(&self) -> Option<&AgentTag> {
        self.agent.as_ref()
    }

    /// Creation time.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// An ordered thread of messages.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    id: ConversationId,
    /// Display title.
    pub title: String,
    messages: Vec<Message>,
    created_at: DateTime<Utc>,
}

impl Conversation {
    /// Create an empty conversation with a fresh id.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: ConversationId::new(),
            title: title.into(),
            messages: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Conversation id.
    #[must_use]
    pub const fn id(&self) -> &ConversationId {
        &self.id
    }

    /// Messages in chronological order.
    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Creation time.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Whether no message has been exchanged yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Append a message at the end. The only mutation messages ever see.
    pub(crate) fn push(&mut self, message: Message) {
        self.messages.push(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_tag_names() {
        assert_eq!(AgentTag::from_name("RouterAgent"), AgentTag::Router);
        assert_eq!(AgentTag::from_name("MathAgent"), AgentTag::Math);
        assert_eq!(AgentTag::from_name("KnowledgeAgent"), AgentTag::Knowledge);
        assert_eq!(
            AgentTag::from_name("WeatherAgent"),
            AgentTag::Other("WeatherAgent".to_string())
        );
        assert_eq!(AgentTag::Other("X".to_string()).as_str(), "X");
        assert!(!AgentTag::from_name("WeatherAgent").is_known());
    }

    #[test]
    fn test_agent_tag_serde_is_plain_string() {
        let json = serde_json::to_string(&AgentTag::Math).unwrap();
        assert_eq!(json, "\"MathAgent\"");
        let tag: AgentTag = serde_json::from_str("\"Mystery\"").unwrap();
        assert_eq!(tag, AgentTag::Other("Mystery".to_string()));
    }

    #[test]
    fn test_user_message_has_no_agent() {
        let msg = Message::user("oi");
        assert_eq!(msg.who(), Author::User);
        assert_eq!(msg.text(), "oi");
        assert!(msg.agent().is_none());
        assert!(msg.meta().is_none());
    }

    #[test]
    fn test_bot_message_always_tagged() {
        let msg = Message::bot("42", Some("calc".to_string()), AgentTag::Math);
        assert_eq!(msg.who(), Author::Bot);
        assert_eq!(msg.agent(), Some(&AgentTag::Math));
        assert_eq!(msg.meta(), Some("calc"));
    }

    #[test]
    fn test_message_ids_distinct() {
        assert_ne!(Message::user("a").id(), Message::user("a").id());
    }

    #[test]
    fn test_message_serde_shape() {
        let msg = Message::user("hello");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["who"], "user");
        assert!(json.get("agent").is_none());
    }
}
