//! State-machine tests for the session coordinator, driven through the
//! scripted mock backend and the recording travel driver.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use session_coordinator::{
    backend::{BackendCall, MockSessionBackend},
    travel::TravelRecord,
    RecordingTravel, SessionCoordinator, SessionError, TravelKind,
};
use session_shared::{
    BackendEvent, CoordinatorConfig, EventKind, JoinOutcome, PendingInvite, PlayerCapacity,
    SearchResult, SessionId, SessionState, SESSION_NAME,
};

fn setup() -> (SessionCoordinator, MockSessionBackend, RecordingTravel) {
    setup_with(MockSessionBackend::new())
}

fn setup_with(mock: MockSessionBackend) -> (SessionCoordinator, MockSessionBackend, RecordingTravel) {
    let travel = RecordingTravel::new();
    let coordinator = SessionCoordinator::new(
        Box::new(mock.clone()),
        Box::new(travel.clone()),
        CoordinatorConfig::default(),
    )
    .expect("coordinator construction");
    (coordinator, mock, travel)
}

fn lan_result(name: &str, addr: &str) -> SearchResult {
    SearchResult {
        session_id: SessionId::new(),
        server_name: name.into(),
        endpoint: Some(addr.parse().unwrap()),
        ping_ms: Some(30),
        capacity: Some(PlayerCapacity::new(1, 5)),
    }
}

fn create_complete(success: bool) -> BackendEvent {
    BackendEvent::CreateComplete {
        session: SESSION_NAME.into(),
        success,
    }
}

fn destroy_complete(success: bool) -> BackendEvent {
    BackendEvent::DestroyComplete {
        session: SESSION_NAME.into(),
        success,
    }
}

fn join_complete(outcome: JoinOutcome) -> BackendEvent {
    BackendEvent::JoinComplete {
        session: SESSION_NAME.into(),
        outcome,
    }
}

fn is_create(call: &BackendCall) -> bool {
    matches!(call, BackendCall::CreateSession(_))
}

fn is_destroy(call: &BackendCall) -> bool {
    matches!(call, BackendCall::DestroySession)
}

fn is_join(call: &BackendCall) -> bool {
    matches!(call, BackendCall::JoinSession(_))
}

#[test]
fn host_without_session_creates_directly() {
    let (mut coordinator, mock, travel) = setup();

    coordinator.host("Alpha").unwrap();
    assert_eq!(coordinator.state(), SessionState::Creating);

    let calls = mock.calls();
    assert_eq!(calls.len(), 1);
    let BackendCall::CreateSession(settings) = &calls[0] else {
        panic!("expected a create call, got {calls:?}");
    };
    assert_eq!(settings.server_name(), Some("Alpha"));
    assert_eq!(settings.max_public_connections, 5);
    assert!(settings.should_advertise);
    assert!(settings.uses_presence);
    // Mock reports the null backend name, so LAN matching is on.
    assert!(settings.lan_match);

    mock.complete(create_complete(true));
    coordinator.pump();
    assert_eq!(coordinator.state(), SessionState::Active);
    assert_eq!(
        travel.records(),
        vec![TravelRecord::Server {
            map: "maps/arena".into()
        }]
    );
}

#[test]
fn host_with_active_session_destroys_then_recreates() {
    let (mut coordinator, mock, _travel) = setup();

    coordinator.host("Alpha").unwrap();
    mock.complete(create_complete(true));
    coordinator.pump();
    assert_eq!(coordinator.state(), SessionState::Active);

    coordinator.host("Beta").unwrap();
    assert_eq!(coordinator.state(), SessionState::Destroying);
    assert_eq!(mock.call_count(is_destroy), 1);
    assert_eq!(mock.call_count(is_create), 1);

    mock.complete(destroy_complete(true));
    coordinator.pump();

    // Exactly one follow-up create, carrying the new name.
    assert_eq!(mock.call_count(is_create), 2);
    let calls = mock.calls();
    let BackendCall::CreateSession(settings) = calls.last().unwrap() else {
        panic!("expected a create call, got {calls:?}");
    };
    assert_eq!(settings.server_name(), Some("Beta"));
    assert_eq!(coordinator.state(), SessionState::Creating);
}

#[test]
fn destroy_without_recreate_flag_has_no_followup() {
    let (mut coordinator, mock, _travel) = setup();

    coordinator.host("Alpha").unwrap();
    mock.complete(create_complete(true));
    coordinator.pump();

    coordinator.destroy().unwrap();
    mock.complete(destroy_complete(true));
    coordinator.pump();

    assert_eq!(coordinator.state(), SessionState::Idle);
    assert_eq!(mock.call_count(is_create), 1);
}

#[test]
fn failed_destroy_does_not_chain_into_create() {
    let (mut coordinator, mock, _travel) = setup();

    coordinator.host("Alpha").unwrap();
    mock.complete(create_complete(true));
    coordinator.pump();

    coordinator.host("Beta").unwrap();
    mock.complete(destroy_complete(false));
    coordinator.pump();

    assert_eq!(mock.call_count(is_create), 1);
    assert_eq!(coordinator.state(), SessionState::Idle);
}

#[test]
fn concurrent_host_calls_never_issue_two_creates() {
    let (mut coordinator, mock, _travel) = setup();

    coordinator.host("Alpha").unwrap();
    let second = coordinator.host("Beta");
    assert!(matches!(second, Err(SessionError::OperationRejected(_))));
    assert!(matches!(
        coordinator.create(),
        Err(SessionError::OperationRejected(_))
    ));
    assert_eq!(mock.call_count(is_create), 1);
}

#[test]
fn failed_create_returns_to_idle() {
    let (mut coordinator, mock, travel) = setup();

    coordinator.host("Alpha").unwrap();
    mock.complete(create_complete(false));
    coordinator.pump();

    assert_eq!(coordinator.state(), SessionState::Idle);
    assert!(travel.records().is_empty());
    // The handle is reusable afterwards.
    coordinator.host("Alpha again").unwrap();
    assert_eq!(mock.call_count(is_create), 2);
}

#[test]
fn second_find_before_completion_is_rejected() {
    let (mut coordinator, mock, _travel) = setup();

    coordinator.find().unwrap();
    assert!(coordinator.is_searching());

    let second = coordinator.find();
    assert!(matches!(second, Err(SessionError::OperationRejected(_))));
    assert!(coordinator.is_searching());
    assert!(coordinator.results().is_empty());
    assert_eq!(
        mock.call_count(|call| matches!(call, BackendCall::FindSessions(_))),
        1
    );

    mock.complete(BackendEvent::FindComplete {
        success: true,
        results: vec![
            lan_result("a", "10.0.0.1:7777"),
            lan_result("b", "10.0.0.2:7777"),
        ],
    });
    coordinator.pump();
    assert!(!coordinator.is_searching());
    assert_eq!(coordinator.results().len(), 2);
}

#[test]
fn new_find_replaces_previous_results() {
    let (mut coordinator, mock, _travel) = setup();

    coordinator.find().unwrap();
    mock.complete(BackendEvent::FindComplete {
        success: true,
        results: vec![lan_result("old", "10.0.0.1:7777")],
    });
    coordinator.pump();
    assert_eq!(coordinator.results().len(), 1);

    coordinator.find().unwrap();
    assert!(coordinator.results().is_empty());

    mock.complete(BackendEvent::FindComplete {
        success: true,
        results: vec![
            lan_result("new-1", "10.0.0.2:7777"),
            lan_result("new-2", "10.0.0.3:7777"),
        ],
    });
    coordinator.pump();
    assert_eq!(coordinator.results().len(), 2);
    assert_eq!(coordinator.results()[0].server_name, "new-1");
}

#[test]
fn find_results_are_capped_at_query_limit() {
    let (mut coordinator, mock, _travel) = setup();

    coordinator.find_with(2).unwrap();
    mock.complete(BackendEvent::FindComplete {
        success: true,
        results: vec![
            lan_result("a", "10.0.0.1:7777"),
            lan_result("b", "10.0.0.2:7777"),
            lan_result("c", "10.0.0.3:7777"),
        ],
    });
    coordinator.pump();

    assert_eq!(coordinator.results().len(), 2);
    assert_eq!(coordinator.results()[1].server_name, "b");
}

#[test]
fn join_out_of_bounds_never_reaches_backend() {
    let (mut coordinator, mock, _travel) = setup();

    coordinator.find().unwrap();
    mock.complete(BackendEvent::FindComplete {
        success: true,
        results: vec![
            lan_result("a", "10.0.0.1:7777"),
            lan_result("b", "10.0.0.2:7777"),
            lan_result("c", "10.0.0.3:7777"),
        ],
    });
    coordinator.pump();

    coordinator.join(5);
    assert_eq!(mock.call_count(is_join), 0);
    assert_eq!(coordinator.state(), SessionState::Idle);

    coordinator.join(2);
    assert_eq!(mock.call_count(is_join), 1);
    assert_eq!(coordinator.state(), SessionState::Joining);
}

#[test]
fn join_without_results_is_a_noop() {
    let (mut coordinator, mock, _travel) = setup();

    coordinator.join(0);
    assert!(mock.calls().is_empty());
    assert_eq!(coordinator.state(), SessionState::Idle);
}

#[test]
fn join_success_travels_to_resolved_address() {
    let (mut coordinator, mock, travel) = setup();

    coordinator.find().unwrap();
    mock.complete(BackendEvent::FindComplete {
        success: true,
        results: vec![lan_result("a", "192.168.1.9:7777")],
    });
    coordinator.pump();

    coordinator.join(0);
    mock.complete(join_complete(JoinOutcome::Success));
    coordinator.pump();

    assert_eq!(coordinator.state(), SessionState::Joined);
    assert_eq!(
        travel.records(),
        vec![TravelRecord::Client {
            destination: "192.168.1.9:7777".into(),
            kind: TravelKind::Absolute
        }]
    );
}

#[test]
fn join_aborts_without_resolvable_address() {
    let (mut coordinator, mock, travel) = setup_with(
        MockSessionBackend::new().without_connect_string(),
    );

    coordinator.find().unwrap();
    mock.complete(BackendEvent::FindComplete {
        success: true,
        results: vec![lan_result("a", "192.168.1.9:7777")],
    });
    coordinator.pump();

    coordinator.join(0);
    mock.complete(join_complete(JoinOutcome::Success));
    coordinator.pump();

    assert_eq!(coordinator.state(), SessionState::Idle);
    assert!(travel.records().is_empty());
}

#[test]
fn failed_join_outcome_resets_to_idle() {
    let (mut coordinator, mock, travel) = setup();

    coordinator.find().unwrap();
    mock.complete(BackendEvent::FindComplete {
        success: true,
        results: vec![lan_result("a", "192.168.1.9:7777")],
    });
    coordinator.pump();

    coordinator.join(0);
    mock.complete(join_complete(JoinOutcome::SessionIsFull));
    coordinator.pump();

    assert_eq!(coordinator.state(), SessionState::Idle);
    assert!(travel.records().is_empty());
}

#[test]
fn join_friend_rejects_invalid_result_silently() {
    let (mut coordinator, mock, _travel) = setup();

    let mut invalid = lan_result("a", "10.0.0.1:7777");
    invalid.endpoint = None;
    coordinator.join_friend(&invalid);

    assert!(mock.calls().is_empty());
    assert_eq!(coordinator.state(), SessionState::Idle);
}

#[test]
fn accepted_invite_chains_into_exactly_one_join() {
    let (mut coordinator, mock, _travel) = setup();

    let invite = PendingInvite::new(0, Some("friend".into()), lan_result("a", "10.0.0.1:7777"));
    mock.complete(BackendEvent::InviteAccepted {
        invite: invite.clone(),
    });
    coordinator.pump();

    assert_eq!(mock.call_count(is_join), 1);
    assert_eq!(coordinator.state(), SessionState::Joining);
    assert_eq!(
        coordinator.last_invite().map(|i| i.controller_id),
        Some(0)
    );
}

#[test]
fn network_failure_resets_any_state_with_one_neutral_travel() {
    // From Creating.
    let (mut coordinator, mock, travel) = setup();
    coordinator.host("Alpha").unwrap();
    mock.complete(BackendEvent::NetworkFailure {
        reason: "host left".into(),
    });
    coordinator.pump();
    assert_eq!(coordinator.state(), SessionState::Idle);
    assert_eq!(
        travel.records(),
        vec![TravelRecord::Client {
            destination: "maps/main_menu".into(),
            kind: TravelKind::Absolute
        }]
    );

    // From Active.
    let (mut coordinator, mock, travel) = setup();
    coordinator.host("Alpha").unwrap();
    mock.complete(create_complete(true));
    coordinator.pump();
    mock.complete(BackendEvent::NetworkFailure {
        reason: "host left".into(),
    });
    coordinator.pump();
    assert_eq!(coordinator.state(), SessionState::Idle);
    let neutral_travels = travel
        .records()
        .into_iter()
        .filter(|record| {
            matches!(record, TravelRecord::Client { destination, .. } if destination == "maps/main_menu")
        })
        .count();
    assert_eq!(neutral_travels, 1);
}

#[test]
fn completions_for_foreign_sessions_are_ignored() {
    let (mut coordinator, mock, travel) = setup();

    coordinator.host("Alpha").unwrap();
    mock.complete(BackendEvent::CreateComplete {
        session: "someone_elses_session".into(),
        success: true,
    });
    coordinator.pump();

    assert_eq!(coordinator.state(), SessionState::Creating);
    assert!(travel.records().is_empty());
}

#[test]
fn presence_backend_disables_lan_matching() {
    let (mut coordinator, mock, _travel) = setup_with(MockSessionBackend::named("steam"));

    coordinator.host("Alpha").unwrap();
    let calls = mock.calls();
    let BackendCall::CreateSession(settings) = &calls[0] else {
        panic!("expected a create call, got {calls:?}");
    };
    assert!(!settings.lan_match);
}

#[test]
fn start_requires_an_active_session() {
    let (mut coordinator, mock, _travel) = setup();

    assert!(matches!(
        coordinator.start(),
        Err(SessionError::OperationRejected(_))
    ));
    assert_eq!(
        mock.call_count(|call| matches!(call, BackendCall::StartSession)),
        0
    );

    coordinator.host("Alpha").unwrap();
    mock.complete(create_complete(true));
    coordinator.pump();

    coordinator.start().unwrap();
    assert!(coordinator.handle().started);
    assert_eq!(
        mock.call_count(|call| matches!(call, BackendCall::StartSession)),
        1
    );
}

#[test]
fn backend_start_failure_is_fatal() {
    let mock = MockSessionBackend::new().failing_start();
    let result = SessionCoordinator::new(
        Box::new(mock),
        Box::new(RecordingTravel::new()),
        CoordinatorConfig::default(),
    );
    assert!(matches!(
        result,
        Err(SessionError::BackendUnavailable(_))
    ));
}

#[test]
fn subscribers_receive_completions_in_order() {
    let (mut coordinator, mock, _travel) = setup();

    let creates = Arc::new(AtomicUsize::new(0));
    let failures = Arc::new(AtomicUsize::new(0));
    {
        let creates = creates.clone();
        coordinator.subscribe(EventKind::CreateComplete, move |_| {
            creates.fetch_add(1, Ordering::SeqCst);
        });
    }
    {
        let failures = failures.clone();
        coordinator.subscribe(EventKind::NetworkFailure, move |_| {
            failures.fetch_add(1, Ordering::SeqCst);
        });
    }

    coordinator.host("Alpha").unwrap();
    mock.complete(create_complete(true));
    mock.complete(BackendEvent::NetworkFailure {
        reason: "link dropped".into(),
    });
    assert_eq!(coordinator.pump(), 2);

    assert_eq!(creates.load(Ordering::SeqCst), 1);
    assert_eq!(failures.load(Ordering::SeqCst), 1);
}
