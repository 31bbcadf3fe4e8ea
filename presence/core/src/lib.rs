// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # AEGIS Presence Core
//!
//! Event-driven agent presence tracking: ingests agent-activity events and
//! maintains a current-state record per agent, including the set of work
//! queues ("skills") the agent is currently eligible for.
//!
//! # Architecture
//!
//! - **domain** — aggregates, events, repository contracts
//! - **application** — the event-reconciliation service
//! - **infrastructure** — PostgreSQL / in-memory persistence
//! - **presentation** — HTTP API

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;

pub use domain::*;
