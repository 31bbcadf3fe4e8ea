// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # PostgreSQL Agent State Repository
//!
//! Production `AgentStateRepository` implementation backed by the `agents`
//! and `agent_skills` tables via `sqlx`.
//!
//! # Schema
//!
//! - `agents` — one row per agent: id, name, status (text), last_updated_utc
//! - `agent_skills` — one row per `(agent_id, queue_id)` pair, primary-keyed
//!   on the pair and cascade-deleted with the agent
//!
//! # Atomicity
//!
//! `upsert_with_skills` runs the agent upsert and all skill inserts/deletes
//! inside one transaction. The `ON CONFLICT (id) DO UPDATE` upsert takes the
//! agent row lock for the remainder of the transaction, so concurrent events
//! for the same agent serialize at the write phase; skill inserts use
//! `ON CONFLICT DO NOTHING` so a race can never yield duplicate pairs.

use async_trait::async_trait;
use sqlx::postgres::PgPool;
use sqlx::Row;
use uuid::Uuid;

use crate::domain::agent::{Agent, AgentId, AgentStatus, QueueId, SkillDiff};
use crate::domain::repository::{AgentStateRepository, RepositoryError};

pub struct PostgresAgentStateRepository {
    pool: PgPool,
}

impl PostgresAgentStateRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AgentStateRepository for PostgresAgentStateRepository {
    async fn find_by_id(&self, id: AgentId) -> Result<Option<Agent>, RepositoryError> {
        let row = sqlx::query(
            r#"
            SELECT id, name, status, last_updated_utc
            FROM agents
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let status_str: String = row.get("status");
        let status = AgentStatus::from_str(&status_str).ok_or_else(|| {
            RepositoryError::Serialization(format!("unknown agent status '{}'", status_str))
        })?;

        let skill_rows = sqlx::query(
            r#"
            SELECT queue_id
            FROM agent_skills
            WHERE agent_id = $1
            "#,
        )
        .bind(id.0)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        let skills = skill_rows
            .into_iter()
            .map(|r| QueueId(r.get::<Uuid, _>("queue_id")))
            .collect();

        Ok(Some(Agent {
            id: AgentId(row.get("id")),
            name: row.get("name"),
            status,
            last_updated_utc: row.get("last_updated_utc"),
            skills,
        }))
    }

    async fn upsert_with_skills(
        &self,
        agent: &Agent,
        diff: &SkillDiff,
    ) -> Result<(), RepositoryError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO agents (id, name, status, last_updated_utc)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                status = EXCLUDED.status,
                last_updated_utc = EXCLUDED.last_updated_utc
            "#,
        )
        .bind(agent.id.0)
        .bind(&agent.name)
        .bind(agent.status.as_str())
        .bind(agent.last_updated_utc)
        .execute(&mut *tx)
        .await
        .map_err(|e| RepositoryError::Database(format!("Failed to upsert agent: {}", e)))?;

        if !diff.removed.is_empty() {
            let removed: Vec<Uuid> = diff.removed.iter().map(|q| q.0).collect();
            sqlx::query(
                r#"
                DELETE FROM agent_skills
                WHERE agent_id = $1 AND queue_id = ANY($2)
                "#,
            )
            .bind(agent.id.0)
            .bind(&removed)
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::Database(format!("Failed to remove skills: {}", e)))?;
        }

        for queue_id in &diff.added {
            sqlx::query(
                r#"
                INSERT INTO agent_skills (agent_id, queue_id)
                VALUES ($1, $2)
                ON CONFLICT DO NOTHING
                "#,
            )
            .bind(agent.id.0)
            .bind(queue_id.0)
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::Database(format!("Failed to add skill: {}", e)))?;
        }

        tx.commit()
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        Ok(())
    }
}
