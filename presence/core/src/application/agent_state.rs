// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Event reconciliation: the one place with real decision logic.
//!
//! `process_event` validates event freshness, derives the agent's new status,
//! and reconciles the agent's skill set against the event's queue list. The
//! whole outcome is handed to the repository as a single atomic upsert;
//! storage failures abort the unit and surface unchanged to the caller.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tracing::info;

use crate::domain::agent::{Agent, AgentId, AgentStatus, SkillDiff};
use crate::domain::event::AgentStateEvent;
use crate::domain::repository::{AgentStateRepository, RepositoryError};

#[derive(Debug, thiserror::Error)]
pub enum ProcessEventError {
    /// Client-input error: the identical event should not be retried.
    #[error("event timestamp {0} is more than an hour old")]
    StaleEvent(DateTime<Utc>),

    /// Backend error: no partial write is visible, the same event is safe
    /// to retry.
    #[error(transparent)]
    Persistence(#[from] RepositoryError),
}

#[async_trait]
pub trait AgentStateService: Send + Sync {
    /// Apply one agent-activity event, returning the resulting status.
    async fn process_event(
        &self,
        event: AgentStateEvent,
    ) -> Result<AgentStatus, ProcessEventError>;

    /// Current aggregate for an agent, if one has been seen.
    async fn get_agent(&self, id: AgentId) -> Result<Option<Agent>, ProcessEventError>;
}

pub struct StandardAgentStateService {
    repository: Arc<dyn AgentStateRepository>,
}

impl StandardAgentStateService {
    pub fn new(repository: Arc<dyn AgentStateRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl AgentStateService for StandardAgentStateService {
    async fn process_event(
        &self,
        event: AgentStateEvent,
    ) -> Result<AgentStatus, ProcessEventError> {
        // Freshness gate uses wall-clock processing time. Future-dated events
        // pass: the gate protects against replays of old events, not skew.
        let hour_ago = Utc::now() - Duration::hours(1);
        if event.timestamp_utc < hour_ago {
            return Err(ProcessEventError::StaleEvent(event.timestamp_utc));
        }

        let status = event.derived_status();

        let (agent, diff) = match self.repository.find_by_id(event.agent_id).await? {
            Some(mut agent) => {
                let diff = agent.apply_event(&event, status);
                (agent, diff)
            }
            None => {
                let agent = Agent::from_event(&event, status);
                let diff = SkillDiff {
                    added: agent.skills.iter().copied().collect(),
                    removed: Vec::new(),
                };
                (agent, diff)
            }
        };

        self.repository.upsert_with_skills(&agent, &diff).await?;

        info!(
            agent_id = %agent.id.0,
            status = status.as_str(),
            "processed agent state event"
        );

        Ok(status)
    }

    async fn get_agent(&self, id: AgentId) -> Result<Option<Agent>, ProcessEventError> {
        Ok(self.repository.find_by_id(id).await?)
    }
}
