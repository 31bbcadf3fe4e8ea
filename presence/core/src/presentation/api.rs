// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! HTTP surface for the presence service.
//!
//! Transport-level validation (required fields, well-formed uuids and
//! timestamps) happens in the JSON extractor before the core runs; the
//! service only ever sees a structurally valid event.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tracing::{error, warn};

use crate::application::agent_state::{AgentStateService, ProcessEventError};
use crate::domain::agent::AgentId;
use crate::domain::event::AgentStateEvent;

pub struct AppState {
    pub agent_state_service: Arc<dyn AgentStateService>,
}

pub fn app(service: Arc<dyn AgentStateService>) -> Router {
    let state = Arc::new(AppState {
        agent_state_service: service,
    });

    Router::new()
        .route("/health", get(health))
        .route("/api/agent-state/events", post(process_event))
        .route("/api/agents/{id}", get(get_agent))
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok", "service": "aegis-presence" }))
}

async fn process_event(
    State(state): State<Arc<AppState>>,
    Json(event): Json<AgentStateEvent>,
) -> impl IntoResponse {
    let agent_id = event.agent_id;

    match state.agent_state_service.process_event(event).await {
        Ok(status) => (
            StatusCode::OK,
            Json(json!({
                "message": "Agent state event processed successfully",
                "status": status,
            })),
        ),
        Err(err @ ProcessEventError::StaleEvent(_)) => {
            warn!(agent_id = %agent_id.0, "rejected late agent state event");
            (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": err.to_string() })),
            )
        }
        Err(err) => {
            error!(agent_id = %agent_id.0, error = %err, "failed to process agent state event");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Internal server error" })),
            )
        }
    }
}

async fn get_agent(
    State(state): State<Arc<AppState>>,
    Path(id): Path<uuid::Uuid>,
) -> impl IntoResponse {
    match state.agent_state_service.get_agent(AgentId(id)).await {
        Ok(Some(agent)) => (StatusCode::OK, Json(json!(agent))),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Agent not found" })),
        ),
        Err(err) => {
            error!(agent_id = %id, error = %err, "failed to load agent");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Internal server error" })),
            )
        }
    }
}
