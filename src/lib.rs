//! Client-side orchestration for a multi-agent chat backend.
//!
//! Keeps several conversation threads in memory, sends one user turn at a time to the
//! backend's `/chat` endpoint, and tags each reply with the agent that produced it.

// Interdiction stricte de pratiques dangereuses ou non idiomatiques
#![deny(unsafe_code)] // Le code unsafe est interdit
#![deny(missing_docs)] // Toute fonction, struct, enum ou module public doit être documenté
#![deny(unused_imports)] // Les imports inutilisés sont interdits
#![deny(unused_must_use)] // Oblige à gérer explicitement les Result et Option
#![deny(nonstandard_style)] // Empêche tout style de code non standard

// Clippy pour stricte discipline
#![deny(clippy::all)]
#![deny(clippy::unwrap_used)] // Interdit unwrap()
#![deny(clippy::expect_used)] // Interdit expect()
#![deny(clippy::print_stdout)] // La sortie console passe par tokio::io
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
#![cfg_attr(
    test,
    allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)
)]

/// Backend protocol: wire types, HTTP client, agent classifier.
pub mod backend;
/// Conversation model and in-memory store.
pub mod conversations;
/// Identifiers, errors and configuration.
pub mod core;
/// Chat session and turn protocol.
pub mod session;
/// Entry helpers for the console client.
pub mod start_chat_client;
/// Display projection.
pub mod view;

pub use backend::{classify, ChatBackend, HttpChatBackend};
pub use conversations::{AgentTag, Author, Conversation, ConversationStore, Message};
pub use crate::core::{ChatError, ChatResult, ClientConfig, ConversationId, MessageId};
pub use session::{ChatSession, IgnoreReason, TurnOutcome, FAILURE_TEXT};
