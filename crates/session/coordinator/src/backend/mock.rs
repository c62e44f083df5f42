//! In-memory scripted backend.
//!
//! Records every request the coordinator issues and lets the caller push
//! completions into the queue by hand. Cloneable so tests keep a handle
//! after the coordinator takes ownership of its twin. Shipped un-gated, the
//! same way the loopback transport is: it doubles as the offline backend for
//! examples and harnesses.

use std::sync::{Arc, Mutex};

use session_shared::{BackendEvent, SearchQuery, SearchResult, SessionSettings};
use tokio::sync::mpsc::UnboundedSender;

use super::{BackendError, SessionBackend, NULL_BACKEND_NAME};

/// One recorded backend request.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendCall {
    CreateSession(SessionSettings),
    DestroySession,
    FindSessions(SearchQuery),
    JoinSession(SearchResult),
    StartSession,
    ShowFriendsUi,
    ShowInviteUi,
}

#[derive(Default)]
struct Inner {
    name: Option<&'static str>,
    calls: Vec<BackendCall>,
    events: Option<UnboundedSender<BackendEvent>>,
    joined: Option<SearchResult>,
    fail_resolution: bool,
    fail_start: bool,
}

/// Scripted backend for tests and harnesses.
#[derive(Clone, Default)]
pub struct MockSessionBackend {
    inner: Arc<Mutex<Inner>>,
}

impl MockSessionBackend {
    /// A mock reporting the null backend name (LAN mode).
    pub fn new() -> Self {
        Self::default()
    }

    /// A mock reporting an arbitrary backend name (presence mode for
    /// anything other than "null").
    pub fn named(name: &'static str) -> Self {
        let mock = Self::default();
        mock.inner.lock().unwrap().name = Some(name);
        mock
    }

    /// Makes `start` fail, for exercising the fatal construction path.
    pub fn failing_start(self) -> Self {
        self.inner.lock().unwrap().fail_start = true;
        self
    }

    /// Makes connect-string resolution fail, for exercising join aborts.
    pub fn without_connect_string(self) -> Self {
        self.inner.lock().unwrap().fail_resolution = true;
        self
    }

    /// Snapshot of all recorded requests, in issue order.
    pub fn calls(&self) -> Vec<BackendCall> {
        self.inner.lock().unwrap().calls.clone()
    }

    pub fn call_count(&self, matches: impl Fn(&BackendCall) -> bool) -> usize {
        self.inner
            .lock()
            .unwrap()
            .calls
            .iter()
            .filter(|call| matches(call))
            .count()
    }

    /// Pushes a completion into the coordinator's queue.
    ///
    /// Panics if the backend was never started; a test driving completions
    /// before construction is a broken test.
    pub fn complete(&self, event: BackendEvent) {
        let inner = self.inner.lock().unwrap();
        let events = inner
            .events
            .as_ref()
            .expect("mock backend not started");
        let _ = events.send(event);
    }

    fn record(&self, call: BackendCall) {
        self.inner.lock().unwrap().calls.push(call);
    }
}

impl SessionBackend for MockSessionBackend {
    fn name(&self) -> &'static str {
        self.inner.lock().unwrap().name.unwrap_or(NULL_BACKEND_NAME)
    }

    fn start(&mut self, events: UnboundedSender<BackendEvent>) -> Result<(), BackendError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.fail_start {
            return Err(BackendError::Init("scripted start failure".into()));
        }
        inner.events = Some(events);
        Ok(())
    }

    fn create_session(&mut self, settings: &SessionSettings) -> Result<(), BackendError> {
        self.record(BackendCall::CreateSession(settings.clone()));
        Ok(())
    }

    fn destroy_session(&mut self) -> Result<(), BackendError> {
        self.record(BackendCall::DestroySession);
        Ok(())
    }

    fn find_sessions(&mut self, query: &SearchQuery) -> Result<(), BackendError> {
        self.record(BackendCall::FindSessions(query.clone()));
        Ok(())
    }

    fn join_session(&mut self, result: &SearchResult) -> Result<(), BackendError> {
        self.inner.lock().unwrap().joined = Some(result.clone());
        self.record(BackendCall::JoinSession(result.clone()));
        Ok(())
    }

    fn resolve_connect_string(&self) -> Option<String> {
        let inner = self.inner.lock().unwrap();
        if inner.fail_resolution {
            return None;
        }
        inner
            .joined
            .as_ref()
            .and_then(|result| result.endpoint)
            .map(|endpoint| endpoint.to_string())
    }

    fn start_session(&mut self) -> Result<(), BackendError> {
        self.record(BackendCall::StartSession);
        Ok(())
    }

    fn show_friends_ui(&mut self) -> Result<(), BackendError> {
        self.record(BackendCall::ShowFriendsUi);
        Ok(())
    }

    fn show_invite_ui(&mut self) -> Result<(), BackendError> {
        self.record(BackendCall::ShowInviteUi);
        Ok(())
    }
}
