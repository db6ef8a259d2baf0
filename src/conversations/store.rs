//! In-memory conversation store.
//!
//! Holds every conversation of the running session, most recently created first,
//! plus the index of the selected one. The store is never empty: [`ConversationStore::init`]
//! creates the first conversation and nothing removes conversations afterwards.

use tracing::debug;

use crate::core::config::DEFAULT_TITLE;
use crate::core::errors::{ChatError, ChatResult};
use crate::core::ids::ConversationId;

use super::types::{Conversation, Message};

/// Ordered list of conversations with a current selection.
#[derive(Clone, Debug)]
pub struct ConversationStore {
    conversations: Vec<Conversation>,
    selected: usize,
    default_title: String,
}

impl Default for ConversationStore {
    fn default() -> Self {
        Self::init(DEFAULT_TITLE)
    }
}

impl ConversationStore {
    /// Create a store holding exactly one empty, selected conversation.
    #[must_use]
    pub fn init(default_title: impl Into<String>) -> Self {
        let default_title = default_title.into();
        let first = Conversation::new(default_title.clone());
        debug!("Initialized conversation store with {}", first.id());
        Self {
            conversations: vec![first],
            selected: 0,
            default_title,
        }
    }

    /// Create a new conversation at the front of the list and select it.
    pub fn create_conversation(&mut self) -> ConversationId {
        let conversation = Conversation::new(self.default_title.clone());
        let id = conversation.id().clone();
        self.conversations.insert(0, conversation);
        self.selected = 0;
        debug!("Created conversation {id}");
        id
    }

    /// Select the conversation at `index`.
    ///
    /// # Errors
    /// Returns [`ChatError::SelectionOutOfRange`] and keeps the current selection when
    /// `index` is past the end.
    pub fn select_conversation(&mut self, index: usize) -> ChatResult<()> {
        if index >= self.conversations.len() {
            return Err(ChatError::SelectionOutOfRange {
                index,
                len: self.conversations.len(),
            });
        }
        self.selected = index;
        Ok(())
    }

    /// Append a message to the selected conversation.
    pub fn append_message(&mut self, message: Message) {
        let selected = self.selected;
        self.conversations[selected].push(message);
    }

    /// Append a message to the conversation with the given id.
    ///
    /// # Errors
    /// Returns [`ChatError::UnknownConversation`] if no such conversation exists.
    pub fn append_to(&mut self, id: &ConversationId, message: Message) -> ChatResult<()> {
        let conversation = self
            .conversations
            .iter_mut()
            .find(|c| c.id() == id)
            .ok_or_else(|| ChatError::UnknownConversation(id.to_string()))?;
        conversation.push(message);
        Ok(())
    }

    /// The selected conversation.
    #[must_use]
    pub fn current_conversation(&self) -> &Conversation {
        &self.conversations[self.selected]
    }

    /// Index of the selected conversation.
    #[must_use]
    pub const fn selected_index(&self) -> usize {
        self.selected
    }

    /// All conversations, most recently created first.
    #[must_use]
    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    /// Look up a conversation by id.
    #[must_use]
    pub fn get(&self, id: &ConversationId) -> Option<&Conversation> {
        self.conversations.iter().find(|c| c.id() == id)
    }

    /// Number of conversations. Always at least one.
    #[must_use]
    pub fn len(&self) -> usize {
        self.conversations.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.conversations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversations::types::AgentTag;

    #[test]
    fn test_init_has_one_empty_selected_conversation() {
        let store = ConversationStore::init("Nova conversa");
        assert_eq!(store.len(), 1);
        assert!(!store.is_empty());
        assert_eq!(store.selected_index(), 0);
        assert!(store.current_conversation().is_empty());
        assert_eq!(store.current_conversation().title, "Nova conversa");
    }

    #[test]
    fn test_create_twice_newest_first_and_selected() {
        let mut store = ConversationStore::default();
        let initial = store.current_conversation().id().clone();
        let first = store.create_conversation();
        let second = store.create_conversation();

        assert_ne!(first, second);
        assert_eq!(store.len(), 3);
        assert_eq!(store.selected_index(), 0);
        assert_eq!(store.current_conversation().id(), &second);
        assert_eq!(store.conversations()[1].id(), &first);
        assert_eq!(store.conversations()[2].id(), &initial);
    }

    #[test]
    fn test_create_discards_previous_selection() {
        let mut store = ConversationStore::default();
        store.create_conversation();
        store.select_conversation(1).unwrap();
        store.create_conversation();
        assert_eq!(store.selected_index(), 0);
    }

    #[test]
    fn test_select_out_of_range_keeps_selection() {
        let mut store = ConversationStore::default();
        store.create_conversation();
        store.select_conversation(1).unwrap();

        let err = store.select_conversation(2).unwrap_err();
        assert!(matches!(err, ChatError::SelectionOutOfRange { index: 2, len: 2 }));
        assert_eq!(store.selected_index(), 1);
    }

    #[test]
    fn test_append_only_touches_selected() {
        let mut store = ConversationStore::default();
        store.create_conversation();
        store.select_conversation(1).unwrap();

        store.append_message(Message::user("first"));
        store.append_message(Message::bot("second", None, AgentTag::Knowledge));

        let texts: Vec<&str> = store.conversations()[1]
            .messages()
            .iter()
            .map(Message::text)
            .collect();
        assert_eq!(texts, vec!["first", "second"]);
        assert!(store.conversations()[0].is_empty());
    }

    #[test]
    fn test_append_to_by_id() {
        let mut store = ConversationStore::default();
        let older = store.current_conversation().id().clone();
        store.create_conversation();

        store.append_to(&older, Message::user("late reply")).unwrap();
        assert_eq!(store.get(&older).unwrap().messages().len(), 1);
        assert!(store.current_conversation().is_empty());

        let missing = ConversationId::from_raw("conv-missing");
        assert!(matches!(
            store.append_to(&missing, Message::user("x")),
            Err(ChatError::UnknownConversation(_))
        ));
    }
}
