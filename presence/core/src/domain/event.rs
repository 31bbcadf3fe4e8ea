// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Agent-activity events and status derivation.
//!
//! Events are transient input — they are never persisted. The `queueIds`
//! collection is a replacement snapshot of the desired skill set at event
//! time, not a delta.

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::agent::{AgentId, AgentStatus, QueueId};

/// Action code emitted when an agent picks up a call.
pub const ACTION_CALL_STARTED: &str = "CALL_STARTED";
/// Action code emitted when an agent goes on break.
pub const ACTION_START_DO_NOT_DISTURB: &str = "START_DO_NOT_DISTURB";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentStateEvent {
    pub agent_id: AgentId,
    pub agent_name: String,
    pub timestamp_utc: DateTime<Utc>,
    pub action: String,
    #[serde(default)]
    pub queue_ids: Vec<QueueId>,
}

impl AgentStateEvent {
    /// Derive the agent's new status from the event semantics and
    /// time-of-day rules. Pure and deterministic in (action, timestamp).
    ///
    /// First matching rule wins: the lunch-time window is checked before the
    /// general DO_NOT_DISTURB case, and any unrecognized action resets the
    /// agent to `Available`. The window is evaluated against the event's
    /// declared timestamp, not processing time.
    pub fn derived_status(&self) -> AgentStatus {
        match self.action.as_str() {
            ACTION_START_DO_NOT_DISTURB if is_lunch_time(self.timestamp_utc) => {
                AgentStatus::OnLunch
            }
            ACTION_CALL_STARTED => AgentStatus::OnCall,
            ACTION_START_DO_NOT_DISTURB => AgentStatus::DoNotDisturb,
            _ => AgentStatus::Available,
        }
    }
}

/// Lunch window is [11:00, 13:00) on the UTC clock hour.
fn is_lunch_time(timestamp_utc: DateTime<Utc>) -> bool {
    let hour = timestamp_utc.hour();
    (11..13).contains(&hour)
}
