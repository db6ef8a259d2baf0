//! Maps the backend's workflow trace onto a display agent tag.

use crate::conversations::types::AgentTag;

use super::wire::WorkflowStep;

/// Tag of the last workflow step, or `KnowledgeAgent` when the trace is empty.
///
/// Unknown agent names pass through as [`AgentTag::Other`].
#[must_use]
pub fn classify(agent_workflow: &[WorkflowStep]) -> AgentTag {
    agent_workflow
        .last()
        .map_or(AgentTag::Knowledge, |step| AgentTag::from_name(&step.agent))
}
