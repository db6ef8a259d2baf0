//! Read-only display projection of conversations.
//!
//! Everything here is derived from a [`Conversation`] or a [`ConversationStore`] snapshot
//! and recomputed on demand; nothing is cached.

use serde::Serialize;

use crate::conversations::store::ConversationStore;
use crate::conversations::types::{AgentTag, Author, Conversation, Message};

/// Label shown next to user messages.
pub const USER_LABEL: &str = "Você";
/// Label shown next to bot messages.
pub const BOT_LABEL: &str = "Bot";
/// Separator between the badge and the meta text.
pub const META_SEPARATOR: &str = "•";
/// Hint shown for a conversation without messages.
pub const EMPTY_HINT: &str = "Envie uma mensagem para começar. Exemplos: \"Quais são as taxas da maquininha?\", \"65 x 3.11\"";
/// Number of id characters shown in the sidebar.
const SHORT_ID_LEN: usize = 10;

/// Visual badge for a known agent.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Badge {
    /// Text inside the badge.
    pub label: &'static str,
    /// Style class (`router`, `math`, `knowledge`).
    pub class: &'static str,
}

/// Badge for an agent tag. Unknown agents get none.
#[must_use]
pub fn badge(agent: &AgentTag) -> Option<Badge> {
    match agent {
        AgentTag::Router => Some(Badge {
            label: "Router",
            class: "router",
        }),
        AgentTag::Math => Some(Badge {
            label: "MathAgent",
            class: "math",
        }),
        AgentTag::Knowledge => Some(Badge {
            label: "KnowledgeAgent",
            class: "knowledge",
        }),
        AgentTag::Other(_) => None,
    }
}

/// Human label for an author.
#[must_use]
pub const fn who_label(who: Author) -> &'static str {
    match who {
        Author::User => USER_LABEL,
        Author::Bot => BOT_LABEL,
    }
}

/// One message ready for display.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DisplayRow {
    /// Author of the message.
    pub who: Author,
    /// Author label.
    pub who_label: &'static str,
    /// Body text.
    pub text: String,
    /// Agent badge, if the agent is known.
    pub badge: Option<Badge>,
    /// Non-empty meta text.
    pub meta: Option<String>,
}

impl DisplayRow {
    /// Project one message.
    #[must_use]
    pub fn from_message(message: &Message) -> Self {
        Self {
            who: message.who(),
            who_label: who_label(message.who()),
            text: message.text().to_string(),
            badge: message.agent().and_then(badge),
            meta: message
                .meta()
                .filter(|m| !m.is_empty())
                .map(ToString::to_string),
        }
    }

    /// Footer line: badge, then separator and meta when present.
    #[must_use]
    pub fn footer(&self) -> String {
        let mut parts: Vec<&str> = Vec::new();
        if let Some(badge) = &self.badge {
            parts.push(badge.label);
        }
        if let Some(meta) = &self.meta {
            parts.push(META_SEPARATOR);
            parts.push(meta);
        }
        parts.join(" ")
    }
}

/// Rows for every message of a conversation, in order.
#[must_use]
pub fn project(conversation: &Conversation) -> Vec<DisplayRow> {
    conversation
        .messages()
        .iter()
        .map(DisplayRow::from_message)
        .collect()
}

/// One entry of the conversation list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SidebarRow {
    /// Position in the store, usable with `select_conversation`.
    pub index: usize,
    /// Conversation title.
    pub title: String,
    /// Shortened id.
    pub short_id: String,
    /// Whether this is the selected conversation.
    pub active: bool,
}

/// Conversation list in store order.
#[must_use]
pub fn sidebar(store: &ConversationStore) -> Vec<SidebarRow> {
    store
        .conversations()
        .iter()
        .enumerate()
        .map(|(index, conv)| SidebarRow {
            index,
            title: conv.title.clone(),
            short_id: conv.id().as_str().chars().take(SHORT_ID_LEN).collect(),
            active: index == store.selected_index(),
        })
        .collect()
}

/// Plain-text rendering of a conversation, used by the console front end.
#[must_use]
pub fn render_text(conversation: &Conversation) -> String {
    if conversation.is_empty() {
        return EMPTY_HINT.to_string();
    }

    let mut out = String::new();
    for (row, message) in project(conversation).iter().zip(conversation.messages()) {
        out.push_str(&format!(
            "[{}] {}: {}\n",
            message.created_at().format("%H:%M"),
            row.who_label,
            row.text
        ));
        let footer = row.footer();
        if !footer.is_empty() {
            out.push_str(&format!("    {footer}\n"));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Conversation {
        let mut store = ConversationStore::default();
        store.append_message(Message::user("6 x 7"));
        store.append_message(Message::bot("42", Some("calc".to_string()), AgentTag::Math));
        store.append_message(Message::bot(
            "hm",
            Some(String::new()),
            AgentTag::Other("WeatherAgent".to_string()),
        ));
        store.current_conversation().clone()
    }

    #[test]
    fn test_project_rows() {
        let rows = project(&sample());
        assert_eq!(rows.len(), 3);

        assert_eq!(rows[0].who_label, "Você");
        assert_eq!(rows[0].badge, None);
        assert_eq!(rows[0].footer(), "");

        assert_eq!(rows[1].who_label, "Bot");
        assert_eq!(rows[1].badge.as_ref().map(|b| b.class), Some("math"));
        assert_eq!(rows[1].footer(), "MathAgent • calc");

        assert_eq!(rows[2].badge, None);
        assert_eq!(rows[2].meta, None);
    }

    #[test]
    fn test_router_badge_label() {
        assert_eq!(badge(&AgentTag::Router).map(|b| b.label), Some("Router"));
        assert_eq!(
            badge(&AgentTag::Knowledge).map(|b| b.label),
            Some("KnowledgeAgent")
        );
    }

    #[test]
    fn test_projection_is_deterministic() {
        let conv = sample();
        assert_eq!(project(&conv), project(&conv));
    }

    #[test]
    fn test_sidebar_marks_selection() {
        let mut store = ConversationStore::default();
        store.create_conversation();
        store.select_conversation(1).unwrap();

        let rows = sidebar(&store);
        assert_eq!(rows.len(), 2);
        assert!(!rows[0].active);
        assert!(rows[1].active);
        assert_eq!(rows[1].short_id.chars().count(), 10);
        assert!(rows[1].short_id.starts_with("conv-"));
        assert_eq!(rows[1].title, "Nova conversa");
    }

    #[test]
    fn test_render_text() {
        let empty = ConversationStore::default().current_conversation().clone();
        assert_eq!(render_text(&empty), EMPTY_HINT);

        let text = render_text(&sample());
        assert!(text.contains("Você: 6 x 7"));
        assert!(text.contains("Bot: 42"));
        assert!(text.contains("    MathAgent • calc\n"));
        assert_eq!(text.lines().count(), 4);
    }
}
