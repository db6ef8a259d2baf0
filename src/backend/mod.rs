//! Backend protocol: wire types, the HTTP client and the agent classifier.

pub mod classifier;
pub mod client;
pub mod wire;

pub use classifier::classify;
pub use client::{ChatBackend, HttpChatBackend};
pub use wire::{ChatRequest, ChatResponse, LogsResponse, WorkflowStep, DEFAULT_RESPONSE};
