// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

use crate::domain::event::AgentStateEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AgentId(pub Uuid);

impl AgentId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for AgentId {
    fn default() -> Self {
        Self::new()
    }
}

/// Identifier of a work queue an agent can be skilled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QueueId(pub Uuid);

impl QueueId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for QueueId {
    fn default() -> Self {
        Self::new()
    }
}

/// Availability classification of an agent. There is no unknown state:
/// every accepted event re-derives one of these four values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AgentStatus {
    Available,
    OnCall,
    OnLunch,
    DoNotDisturb,
}

impl AgentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentStatus::Available => "AVAILABLE",
            AgentStatus::OnCall => "ON_CALL",
            AgentStatus::OnLunch => "ON_LUNCH",
            AgentStatus::DoNotDisturb => "DO_NOT_DISTURB",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "AVAILABLE" => Some(AgentStatus::Available),
            "ON_CALL" => Some(AgentStatus::OnCall),
            "ON_LUNCH" => Some(AgentStatus::OnLunch),
            "DO_NOT_DISTURB" => Some(AgentStatus::DoNotDisturb),
            _ => None,
        }
    }
}

/// The `Agent` aggregate: identity, display name, current status, and the
/// owned skill set. Skills have no lifecycle of their own; they are persisted
/// as `(agent_id, queue_id)` rows addressable only through their agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Agent {
    pub id: AgentId,
    pub name: String,
    pub status: AgentStatus,
    pub last_updated_utc: DateTime<Utc>,
    pub skills: HashSet<QueueId>,
}

/// Skill-set changes produced by reconciling an agent against an event.
/// Queue ids present on both sides are left untouched.
#[derive(Debug, Clone, Default)]
pub struct SkillDiff {
    pub added: Vec<QueueId>,
    pub removed: Vec<QueueId>,
}

impl SkillDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

impl Agent {
    /// Construct a brand-new agent from its first accepted event.
    pub fn from_event(event: &AgentStateEvent, status: AgentStatus) -> Self {
        Self {
            id: event.agent_id,
            name: event.agent_name.clone(),
            status,
            last_updated_utc: event.timestamp_utc,
            skills: event.queue_ids.iter().copied().collect(),
        }
    }

    /// Overwrite this agent with an accepted event. The event is authoritative:
    /// last write wins, no field-level merge. Returns the skill diff to apply
    /// at the persistence boundary; afterwards the in-memory skill set equals
    /// the distinct queue ids of the event.
    pub fn apply_event(&mut self, event: &AgentStateEvent, status: AgentStatus) -> SkillDiff {
        let desired: HashSet<QueueId> = event.queue_ids.iter().copied().collect();

        let removed: Vec<QueueId> = self.skills.difference(&desired).copied().collect();
        let added: Vec<QueueId> = desired.difference(&self.skills).copied().collect();

        self.name = event.agent_name.clone();
        self.status = status;
        self.last_updated_utc = event.timestamp_utc;
        self.skills = desired;

        SkillDiff { added, removed }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::event::AgentStateEvent;
    use chrono::Utc;

    fn event_with_queues(agent: &Agent, queue_ids: Vec<QueueId>) -> AgentStateEvent {
        AgentStateEvent {
            agent_id: agent.id,
            agent_name: "Ada".to_string(),
            timestamp_utc: Utc::now(),
            action: "PING".to_string(),
            queue_ids,
        }
    }

    fn agent_with_skills(skills: Vec<QueueId>) -> Agent {
        Agent {
            id: AgentId::new(),
            name: "Ada".to_string(),
            status: AgentStatus::Available,
            last_updated_utc: Utc::now(),
            skills: skills.into_iter().collect(),
        }
    }

    #[test]
    fn apply_event_adds_removes_and_retains_skills() {
        let q1 = QueueId::new();
        let q2 = QueueId::new();
        let q3 = QueueId::new();
        let mut agent = agent_with_skills(vec![q1, q2]);

        let event = event_with_queues(&agent, vec![q2, q3]);
        let diff = agent.apply_event(&event, AgentStatus::Available);

        assert_eq!(diff.added, vec![q3]);
        assert_eq!(diff.removed, vec![q1]);
        let expected: HashSet<QueueId> = [q2, q3].into_iter().collect();
        assert_eq!(agent.skills, expected);
    }

    #[test]
    fn apply_event_with_identical_queues_is_a_noop_diff() {
        let q1 = QueueId::new();
        let q2 = QueueId::new();
        let mut agent = agent_with_skills(vec![q1, q2]);

        let event = event_with_queues(&agent, vec![q1, q2]);
        let diff = agent.apply_event(&event, AgentStatus::Available);

        assert!(diff.is_empty());
        assert_eq!(agent.skills.len(), 2);
    }

    #[test]
    fn duplicate_queue_ids_collapse_to_a_set() {
        let q1 = QueueId::new();
        let mut agent = agent_with_skills(vec![]);

        let event = event_with_queues(&agent, vec![q1, q1, q1]);
        let diff = agent.apply_event(&event, AgentStatus::Available);

        assert_eq!(diff.added, vec![q1]);
        assert_eq!(agent.skills.len(), 1);
    }

    #[test]
    fn apply_event_overwrites_name_status_and_timestamp() {
        let mut agent = agent_with_skills(vec![]);
        let mut event = event_with_queues(&agent, vec![]);
        event.agent_name = "Grace".to_string();

        agent.apply_event(&event, AgentStatus::OnCall);

        assert_eq!(agent.name, "Grace");
        assert_eq!(agent.status, AgentStatus::OnCall);
        assert_eq!(agent.last_updated_utc, event.timestamp_utc);
    }
}
