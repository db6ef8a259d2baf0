//! Conversation model and the in-memory store holding it.

pub mod store;
pub mod types;

pub use store::ConversationStore;
pub use types::{AgentTag, Author, Conversation, Message};
