// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

pub mod in_memory;
pub mod postgres_agent_state;

pub use in_memory::InMemoryAgentStateRepository;
pub use postgres_agent_state::PostgresAgentStateRepository;
