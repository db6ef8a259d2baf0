//! Core identifiers, errors and configuration.

pub mod config;
pub mod errors;
pub mod ids;

pub use config::ClientConfig;
pub use errors::{ChatError, ChatResult};
pub use ids::{new_id, ConversationId, MessageId};
