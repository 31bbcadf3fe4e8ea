// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! In-memory `AgentStateRepository` for development and testing.
//!
//! Stores whole aggregates under a mutex; the map insert is the atomic unit,
//! so the skill diff is already reflected in the agent passed to
//! `upsert_with_skills` and needs no separate application here.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::domain::agent::{Agent, AgentId, SkillDiff};
use crate::domain::repository::{AgentStateRepository, RepositoryError};

#[derive(Clone, Default)]
pub struct InMemoryAgentStateRepository {
    agents: Arc<Mutex<HashMap<AgentId, Agent>>>,
}

impl InMemoryAgentStateRepository {
    pub fn new() -> Self {
        Self {
            agents: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl AgentStateRepository for InMemoryAgentStateRepository {
    async fn find_by_id(&self, id: AgentId) -> Result<Option<Agent>, RepositoryError> {
        let agents = self
            .agents
            .lock()
            .map_err(|_| RepositoryError::Database("Mutex poisoned".to_string()))?;
        Ok(agents.get(&id).cloned())
    }

    async fn upsert_with_skills(
        &self,
        agent: &Agent,
        _diff: &SkillDiff,
    ) -> Result<(), RepositoryError> {
        let mut agents = self
            .agents
            .lock()
            .map_err(|_| RepositoryError::Database("Mutex poisoned".to_string()))?;
        agents.insert(agent.id, agent.clone());
        Ok(())
    }
}
