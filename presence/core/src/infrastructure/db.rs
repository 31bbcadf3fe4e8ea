// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # PostgreSQL Connection Pool
//!
//! Wraps `sqlx::postgres::PgPool` in a thin `Database` newtype that can be
//! injected into the PostgreSQL repository implementation. Also owns the
//! schema bootstrap for the `agents` / `agent_skills` tables.

use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::domain::repository::RepositoryError;

#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub async fn new(connection_string: &str) -> Result<Self, RepositoryError> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(connection_string)
            .await?;

        Ok(Self { pool })
    }

    pub fn get_pool(&self) -> &PgPool {
        &self.pool
    }

    /// Create the presence tables if they do not exist.
    ///
    /// `agent_skills` is keyed by the natural `(agent_id, queue_id)` pair —
    /// duplicates cannot persist — and cascades with its owning agent.
    pub async fn ensure_schema(&self) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS agents (
                id UUID PRIMARY KEY,
                name VARCHAR(255) NOT NULL,
                status TEXT NOT NULL,
                last_updated_utc TIMESTAMPTZ NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS agent_skills (
                agent_id UUID NOT NULL REFERENCES agents(id) ON DELETE CASCADE,
                queue_id UUID NOT NULL,
                PRIMARY KEY (agent_id, queue_id)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
