//! Wire types for the backend `/chat` and `/logs` endpoints.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// Reply text used when the backend omits `response`.
pub const DEFAULT_RESPONSE: &str = "(sem resposta)";

/// Body of `POST /chat`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Trimmed user text.
    pub message: String,
    /// Client-assigned user id.
    pub user_id: String,
    /// Conversation the turn belongs to.
    pub conversation_id: String,
}

/// One step of the backend's agent workflow trace.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowStep {
    /// Agent that handled this step. Empty when the backend left it out.
    #[serde(default, deserialize_with = "null_as_default")]
    pub agent: String,
    /// Routing decision recorded by the backend, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decision: Option<String>,
}

impl WorkflowStep {
    /// Convenience constructor.
    #[must_use]
    pub fn new(agent: impl Into<String>) -> Self {
        Self {
            agent: agent.into(),
            decision: None,
        }
    }
}

/// Body of a successful `POST /chat` reply.
///
/// Every field is optional on the wire:
/// - `response` defaults to [`DEFAULT_RESPONSE`],
/// - `source_agent_response` defaults to the empty string,
/// - `agent_workflow` defaults to empty, including when it is not an array.
///
/// A `null` last workflow step is rejected: there is no agent to tag the reply with,
/// so the turn takes the failure path.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Reply text.
    #[serde(default = "default_response", deserialize_with = "null_as_response")]
    pub response: String,
    /// Free-form provenance of the reply.
    #[serde(default, deserialize_with = "null_as_default")]
    pub source_agent_response: String,
    /// Agents the backend went through, in order.
    #[serde(default, deserialize_with = "lenient_workflow")]
    pub agent_workflow: Vec<WorkflowStep>,
}

impl Default for ChatResponse {
    fn default() -> Self {
        Self {
            response: default_response(),
            source_agent_response: String::new(),
            agent_workflow: Vec::new(),
        }
    }
}

/// Body of `GET /logs/{conversation_id}`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogsResponse {
    /// Raw log lines recorded by the backend for the conversation.
    #[serde(default)]
    pub logs: Vec<String>,
}

fn default_response() -> String {
    DEFAULT_RESPONSE.to_string()
}

fn null_as_default<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_response<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(default_response))
}

fn lenient_workflow<'de, D>(deserializer: D) -> Result<Vec<WorkflowStep>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::Array(items) if items.last().is_some_and(serde_json::Value::is_null) => {
            Err(D::Error::custom("last agent_workflow step is null"))
        }
        serde_json::Value::Array(items) => Ok(items
            .into_iter()
            .map(|item| serde_json::from_value(item).unwrap_or_default())
            .collect()),
        _ => Ok(Vec::new()),
    }
}
