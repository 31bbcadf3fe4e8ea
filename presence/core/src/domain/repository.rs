// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Domain Repository Interfaces
//!
//! Persistence contract for the `Agent` aggregate, following the DDD
//! Repository pattern: interface defined in the domain layer, implemented in
//! `crate::infrastructure::repositories`.
//!
//! | Trait | Aggregate | Implementations |
//! |-------|-----------|----------------|
//! | `AgentStateRepository` | `Agent` | `InMemoryAgentStateRepository`, `PostgresAgentStateRepository` |
//!
//! The store must provide per-aggregate atomicity for `upsert_with_skills`:
//! either all changes for one event are durably applied, or none are. It
//! must also enforce `(agent_id, queue_id)` uniqueness and cascade-delete
//! skill rows with their agent.

use async_trait::async_trait;

use crate::domain::agent::{Agent, AgentId, SkillDiff};

/// Repository interface for `Agent` aggregates.
/// One repository per aggregate root.
#[async_trait]
pub trait AgentStateRepository: Send + Sync {
    /// Find an agent by id, eagerly loading its skill set.
    async fn find_by_id(&self, id: AgentId) -> Result<Option<Agent>, RepositoryError>;

    /// Persist the agent row (create or update) together with the skill
    /// additions and removals of `diff`, as one atomic unit.
    async fn upsert_with_skills(
        &self,
        agent: &Agent,
        diff: &SkillDiff,
    ) -> Result<(), RepositoryError>;
}

/// Repository errors
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => RepositoryError::NotFound("Row not found".to_string()),
            _ => RepositoryError::Database(err.to_string()),
        }
    }
}
