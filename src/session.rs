//! Chat session: conversation state plus the turn protocol against the backend.
//!
//! A [`ChatSession`] owns the [`ConversationStore`], the pending input buffer and the
//! `busy` flag. At most one turn is outstanding per session; a send attempted while
//! one is in flight is dropped, not queued.
//!
//! Backend failures never escape [`ChatSession::send_turn`]. They are appended to the
//! conversation as a bot message tagged `RouterAgent`, so the conversation history is
//! the single channel for both replies and errors.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, info, warn};

use crate::backend::classifier::classify;
use crate::backend::client::{ChatBackend, HttpChatBackend};
use crate::backend::wire::ChatRequest;
use crate::conversations::store::ConversationStore;
use crate::conversations::types::{AgentTag, Conversation, Message};
use crate::core::config::ClientConfig;
use crate::core::errors::ChatResult;
use crate::core::ids::ConversationId;

/// Body of the bot message appended when a turn fails.
pub const FAILURE_TEXT: &str = "Falha ao falar com o backend. Verifique a API.";

/// Why a send attempt was not admitted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Input was empty after trimming.
    EmptyInput,
    /// Another turn is still outstanding.
    Busy,
    /// The target conversation does not exist in this session.
    UnknownConversation,
}

/// Effect of one send attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Nothing was appended.
    Ignored(IgnoreReason),
    /// The backend answered; carries the appended bot message.
    Replied(Message),
    /// The exchange failed; carries the appended failure message.
    Failed(Message),
}

impl TurnOutcome {
    /// The bot message appended by this turn, if any.
    #[must_use]
    pub const fn message(&self) -> Option<&Message> {
        match self {
            Self::Ignored(_) => None,
            Self::Replied(msg) | Self::Failed(msg) => Some(msg),
        }
    }
}

/// Clears the busy flag on every exit path, including panics and dropped futures.
struct BusyGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> BusyGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Client-side chat session against one backend.
pub struct ChatSession<B = HttpChatBackend> {
    backend: B,
    user_id: String,
    store: RwLock<ConversationStore>,
    input: Mutex<String>,
    busy: AtomicBool,
}

impl ChatSession<HttpChatBackend> {
    /// Build a session talking HTTP to the backend named in `config`.
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid or the HTTP client cannot be built.
    pub fn from_config(config: &ClientConfig) -> ChatResult<Self> {
        let backend = HttpChatBackend::new(config.clone())?;
        Ok(Self::new(backend, config))
    }
}

impl<B: ChatBackend> ChatSession<B> {
    /// Create a session with one empty conversation selected.
    #[must_use]
    pub fn new(backend: B, config: &ClientConfig) -> Self {
        let store = ConversationStore::init(config.default_title.clone());
        info!(
            "Chat session ready for user {} ({})",
            config.user_id,
            store.current_conversation().id()
        );
        Self {
            backend,
            user_id: config.user_id.clone(),
            store: RwLock::new(store),
            input: Mutex::new(String::new()),
            busy: AtomicBool::new(false),
        }
    }

    fn read_store(&self) -> RwLockReadGuard<'_, ConversationStore> {
        self.store.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_store(&self) -> RwLockWriteGuard<'_, ConversationStore> {
        self.store.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_input(&self) -> MutexGuard<'_, String> {
        self.input.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Backend used by this session.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Whether a turn is outstanding.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Replace the pending input buffer.
    pub fn set_input(&self, text: impl Into<String>) {
        *self.lock_input() = text.into();
    }

    /// Current pending input.
    pub fn input(&self) -> String {
        self.lock_input().clone()
    }

    /// Run `f` against a consistent snapshot of the store.
    pub fn with_store<R>(&self, f: impl FnOnce(&ConversationStore) -> R) -> R {
        f(&self.read_store())
    }

    /// Copy of the selected conversation.
    pub fn current_conversation(&self) -> Conversation {
        self.read_store().current_conversation().clone()
    }

    /// Index of the selected conversation.
    pub fn selected_index(&self) -> usize {
        self.read_store().selected_index()
    }

    /// Create a conversation, put it first and select it.
    pub fn new_conversation(&self) -> ConversationId {
        let id = self.write_store().create_conversation();
        info!("New conversation {id}");
        id
    }

    /// Select the conversation at `index`.
    ///
    /// # Errors
    /// Returns an error if `index` is out of range; the selection is unchanged.
    pub fn select_conversation(&self, index: usize) -> ChatResult<()> {
        self.write_store().select_conversation(index)?;
        debug!("Selected conversation #{index}");
        Ok(())
    }

    /// Send the pending input to the selected conversation.
    pub async fn send(&self) -> TurnOutcome {
        let text = self.input();
        let conversation_id = self.read_store().current_conversation().id().clone();
        self.send_turn(&conversation_id, &text).await
    }

    /// Run one turn: append the user message, ask the backend, append the reply.
    ///
    /// Empty input and sends while busy are ignored. The user message is always in the
    /// store before the reply or the failure message. The `user_id` sent to the backend
    /// is the one this session was configured with ([`ClientConfig::user_id`]).
    pub async fn send_turn(&self, conversation_id: &ConversationId, text: &str) -> TurnOutcome {
        let text = text.trim();
        if text.is_empty() {
            debug!("Ignoring empty input");
            return TurnOutcome::Ignored(IgnoreReason::EmptyInput);
        }

        let Some(_busy) = BusyGuard::acquire(&self.busy) else {
            debug!("Ignoring send while a turn is outstanding");
            return TurnOutcome::Ignored(IgnoreReason::Busy);
        };

        let appended = self
            .write_store()
            .append_to(conversation_id, Message::user(text));
        if let Err(e) = appended {
            warn!("Dropping turn: {e}");
            return TurnOutcome::Ignored(IgnoreReason::UnknownConversation);
        }
        self.lock_input().clear();

        let request = ChatRequest {
            message: text.to_string(),
            user_id: self.user_id.clone(),
            conversation_id: conversation_id.to_string(),
        };

        let outcome = match self.backend.chat(&request).await {
            Ok(response) => {
                let agent = classify(&response.agent_workflow);
                info!("Reply from {agent} in {conversation_id}");
                TurnOutcome::Replied(Message::bot(
                    response.response,
                    Some(response.source_agent_response),
                    agent,
                ))
            }
            Err(e) => {
                warn!("Chat request failed for {conversation_id}: {e}");
                TurnOutcome::Failed(Message::bot(
                    FAILURE_TEXT,
                    Some(e.to_string()),
                    AgentTag::Router,
                ))
            }
        };

        if let Some(reply) = outcome.message() {
            let appended = self.write_store().append_to(conversation_id, reply.clone());
            if let Err(e) = appended {
                warn!("Reply could not be stored: {e}");
            }
        }

        outcome
    }

    /// Backend log lines for the selected conversation.
    ///
    /// # Errors
    /// Returns the backend error as-is; nothing is appended to the conversation.
    pub async fn fetch_logs(&self) -> ChatResult<Vec<String>> {
        let conversation_id = self.read_store().current_conversation().id().clone();
        self.backend.logs(conversation_id.as_str()).await
    }
}
