// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use aegis_presence_core::application::agent_state::{
    AgentStateService, ProcessEventError, StandardAgentStateService,
};
use aegis_presence_core::domain::agent::{AgentId, AgentStatus, QueueId};
use aegis_presence_core::domain::event::{AgentStateEvent, ACTION_CALL_STARTED};
use aegis_presence_core::infrastructure::repositories::InMemoryAgentStateRepository;

fn service() -> (Arc<InMemoryAgentStateRepository>, StandardAgentStateService) {
    let repo = Arc::new(InMemoryAgentStateRepository::new());
    let service = StandardAgentStateService::new(repo.clone());
    (repo, service)
}

fn event(
    agent_id: AgentId,
    action: &str,
    timestamp_utc: DateTime<Utc>,
    queue_ids: Vec<QueueId>,
) -> AgentStateEvent {
    AgentStateEvent {
        agent_id,
        agent_name: "Ada".to_string(),
        timestamp_utc,
        action: action.to_string(),
        queue_ids,
    }
}

#[tokio::test]
async fn stale_event_is_rejected_without_a_write() {
    let (repo, service) = service();
    let agent_id = AgentId::new();

    let stale = event(
        agent_id,
        ACTION_CALL_STARTED,
        Utc::now() - Duration::hours(2),
        vec![QueueId::new()],
    );

    let result = service.process_event(stale).await;
    assert!(matches!(result, Err(ProcessEventError::StaleEvent(_))));

    use aegis_presence_core::domain::repository::AgentStateRepository;
    assert!(repo.find_by_id(agent_id).await.unwrap().is_none());
}

#[tokio::test]
async fn event_just_inside_the_freshness_window_is_accepted() {
    let (_, service) = service();
    let fresh = event(
        AgentId::new(),
        ACTION_CALL_STARTED,
        Utc::now() - Duration::minutes(59),
        vec![],
    );

    assert!(service.process_event(fresh).await.is_ok());
}

#[tokio::test]
async fn future_dated_event_is_accepted() {
    let (_, service) = service();
    let future = event(
        AgentId::new(),
        ACTION_CALL_STARTED,
        Utc::now() + Duration::hours(3),
        vec![],
    );

    assert!(service.process_event(future).await.is_ok());
}

#[tokio::test]
async fn first_event_creates_the_agent_aggregate() {
    let (_, service) = service();
    let agent_id = AgentId::new();
    let q1 = QueueId::new();
    let q2 = QueueId::new();
    let ts = Utc::now();

    let status = service
        .process_event(event(agent_id, ACTION_CALL_STARTED, ts, vec![q1, q2]))
        .await
        .unwrap();
    assert_eq!(status, AgentStatus::OnCall);

    let agent = service.get_agent(agent_id).await.unwrap().unwrap();
    assert_eq!(agent.name, "Ada");
    assert_eq!(agent.status, AgentStatus::OnCall);
    assert_eq!(agent.last_updated_utc, ts);
    let expected: HashSet<QueueId> = [q1, q2].into_iter().collect();
    assert_eq!(agent.skills, expected);
}

#[tokio::test]
async fn later_event_reconciles_the_skill_set() {
    let (_, service) = service();
    let agent_id = AgentId::new();
    let q1 = QueueId::new();
    let q2 = QueueId::new();
    let q3 = QueueId::new();

    let t1 = Utc::now() - Duration::minutes(10);
    service
        .process_event(event(agent_id, ACTION_CALL_STARTED, t1, vec![q1, q2]))
        .await
        .unwrap();

    // Q1 removed, Q3 added, Q2 retained; unrecognized action resets status.
    let t2 = Utc::now();
    let status = service
        .process_event(event(agent_id, "PING", t2, vec![q2, q3]))
        .await
        .unwrap();
    assert_eq!(status, AgentStatus::Available);

    let agent = service.get_agent(agent_id).await.unwrap().unwrap();
    assert_eq!(agent.status, AgentStatus::Available);
    assert_eq!(agent.last_updated_utc, t2);
    let expected: HashSet<QueueId> = [q2, q3].into_iter().collect();
    assert_eq!(agent.skills, expected);
}

#[tokio::test]
async fn replaying_an_accepted_event_is_idempotent() {
    let (_, service) = service();
    let agent_id = AgentId::new();
    let q1 = QueueId::new();
    let q2 = QueueId::new();
    let ts = Utc::now();

    let evt = event(agent_id, ACTION_CALL_STARTED, ts, vec![q1, q2]);
    service.process_event(evt.clone()).await.unwrap();
    let first = service.get_agent(agent_id).await.unwrap().unwrap();

    service.process_event(evt).await.unwrap();
    let second = service.get_agent(agent_id).await.unwrap().unwrap();

    assert_eq!(second.name, first.name);
    assert_eq!(second.status, first.status);
    assert_eq!(second.last_updated_utc, first.last_updated_utc);
    assert_eq!(second.skills, first.skills);
}

#[tokio::test]
async fn duplicate_queue_ids_in_one_event_collapse() {
    let (_, service) = service();
    let agent_id = AgentId::new();
    let q1 = QueueId::new();

    service
        .process_event(event(agent_id, "PING", Utc::now(), vec![q1, q1, q1]))
        .await
        .unwrap();

    let agent = service.get_agent(agent_id).await.unwrap().unwrap();
    assert_eq!(agent.skills.len(), 1);
    assert!(agent.skills.contains(&q1));
}

#[tokio::test]
async fn event_with_empty_queue_list_clears_the_skill_set() {
    let (_, service) = service();
    let agent_id = AgentId::new();

    service
        .process_event(event(
            agent_id,
            ACTION_CALL_STARTED,
            Utc::now(),
            vec![QueueId::new(), QueueId::new()],
        ))
        .await
        .unwrap();

    service
        .process_event(event(agent_id, "PING", Utc::now(), vec![]))
        .await
        .unwrap();

    let agent = service.get_agent(agent_id).await.unwrap().unwrap();
    assert!(agent.skills.is_empty());
}

#[tokio::test]
async fn name_change_overwrites_in_place() {
    let (_, service) = service();
    let agent_id = AgentId::new();

    service
        .process_event(event(agent_id, "PING", Utc::now(), vec![]))
        .await
        .unwrap();

    let mut renamed = event(agent_id, "PING", Utc::now(), vec![]);
    renamed.agent_name = "Grace".to_string();
    service.process_event(renamed).await.unwrap();

    let agent = service.get_agent(agent_id).await.unwrap().unwrap();
    assert_eq!(agent.name, "Grace");
}
