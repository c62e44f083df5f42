//! The session lifecycle coordinator.
//!
//! Single authority over the named session handle: the only component that
//! issues backend session primitives, the only mutator of the handle and
//! the search results. Commands issue at most one asynchronous request and
//! return; completions are drained by [`SessionCoordinator::pump`] on the
//! same logical thread and re-dispatched to subscribers.

use session_shared::{
    BackendEvent, CoordinatorConfig, EventKind, JoinOutcome, PendingInvite, SearchQuery,
    SearchResult, SessionEvent, SessionHandle, SessionSearch, SessionSettings, SessionState,
};
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracing::{debug, info, warn};

use crate::{
    backend::{SessionBackend, NULL_BACKEND_NAME},
    error::SessionError,
    subscribers::Subscribers,
    travel::{TravelDriver, TravelKind},
};

pub struct SessionCoordinator {
    backend: Box<dyn SessionBackend>,
    travel: Box<dyn TravelDriver>,
    config: CoordinatorConfig,
    handle: SessionHandle,
    search: Option<SessionSearch>,
    searching: bool,
    desired_server_name: Option<String>,
    recreate_on_destroy: bool,
    last_invite: Option<PendingInvite>,
    subscribers: Subscribers,
    completions: UnboundedReceiver<BackendEvent>,
}

impl SessionCoordinator {
    /// Wires the coordinator to its backend and travel driver.
    ///
    /// Fails with [`SessionError::BackendUnavailable`] when the backend
    /// cannot be started; there is no session layer without one.
    pub fn new(
        mut backend: Box<dyn SessionBackend>,
        travel: Box<dyn TravelDriver>,
        config: CoordinatorConfig,
    ) -> Result<Self, SessionError> {
        let (events_tx, completions) = mpsc::unbounded_channel();
        backend
            .start(events_tx)
            .map_err(|err| SessionError::BackendUnavailable(err.to_string()))?;

        Ok(Self {
            backend,
            travel,
            config,
            handle: SessionHandle::new(),
            search: None,
            searching: false,
            desired_server_name: None,
            recreate_on_destroy: false,
            last_invite: None,
            subscribers: Subscribers::new(),
            completions,
        })
    }

    pub fn state(&self) -> SessionState {
        self.handle.state
    }

    pub fn handle(&self) -> &SessionHandle {
        &self.handle
    }

    pub fn is_searching(&self) -> bool {
        self.searching
    }

    /// Current search results, in backend-reported order.
    pub fn results(&self) -> &[SearchResult] {
        self.search
            .as_ref()
            .map(|search| search.results.as_slice())
            .unwrap_or(&[])
    }

    pub fn last_invite(&self) -> Option<&PendingInvite> {
        self.last_invite.as_ref()
    }

    /// Registers a subscriber for one notification kind.
    pub fn subscribe(
        &mut self,
        kind: EventKind,
        handler: impl FnMut(&SessionEvent) + Send + 'static,
    ) {
        self.subscribers.subscribe(kind, Box::new(handler));
    }

    /// Hosts a session under `server_name`.
    ///
    /// An existing session is destroyed first and recreated on destroy
    /// completion; otherwise the session is created directly.
    pub fn host(&mut self, server_name: &str) -> Result<(), SessionError> {
        if self.handle.state.is_transitioning() {
            warn!(
                target = "session::coordinator",
                "host rejected: operation in flight ({})", self.handle.state
            );
            return Err(SessionError::OperationRejected(
                "another session operation is in flight",
            ));
        }

        self.desired_server_name = Some(server_name.to_owned());
        if self.handle.state.has_session() {
            self.recreate_on_destroy = true;
            self.destroy()
        } else {
            self.create()
        }
    }

    /// Issues exactly one create request for the named session.
    pub fn create(&mut self) -> Result<(), SessionError> {
        if self.handle.state != SessionState::Idle {
            warn!(
                target = "session::coordinator",
                "create rejected in state {}", self.handle.state
            );
            return Err(SessionError::OperationRejected(
                "session exists or operation in flight",
            ));
        }

        let lan_match = self.backend.name() == NULL_BACKEND_NAME;
        let server_name = self.desired_server_name.clone().unwrap_or_default();
        let mut settings = SessionSettings::hosting(lan_match, &server_name);
        settings.max_public_connections = self.config.max_public_connections;

        self.handle.state = SessionState::Creating;
        self.handle.settings = Some(settings.clone());
        if let Err(err) = self.backend.create_session(&settings) {
            warn!(target = "session::coordinator", "create request failed: {err}");
            self.handle.reset();
            return Err(SessionError::OperationFailed(err.to_string()));
        }
        info!(
            target = "session::coordinator",
            "creating session \"{server_name}\" (lan: {lan_match})"
        );
        Ok(())
    }

    /// Issues exactly one destroy request for the current session.
    pub fn destroy(&mut self) -> Result<(), SessionError> {
        if !self.handle.state.has_session() {
            warn!(
                target = "session::coordinator",
                "destroy rejected in state {}", self.handle.state
            );
            return Err(SessionError::OperationRejected("no session to destroy"));
        }

        let previous = self.handle.state;
        self.handle.state = SessionState::Destroying;
        if let Err(err) = self.backend.destroy_session() {
            warn!(target = "session::coordinator", "destroy request failed: {err}");
            self.handle.state = previous;
            self.recreate_on_destroy = false;
            return Err(SessionError::OperationFailed(err.to_string()));
        }
        Ok(())
    }

    /// Searches for presence-enabled sessions, capped by configuration.
    pub fn find(&mut self) -> Result<(), SessionError> {
        self.find_with(self.config.max_search_results)
    }

    /// Searches with an explicit result cap. Replaces the previous result
    /// sequence; rejected while a search is already in flight.
    pub fn find_with(&mut self, max_results: usize) -> Result<(), SessionError> {
        if self.searching {
            warn!(target = "session::coordinator", "find rejected: already searching");
            return Err(SessionError::OperationRejected("search already in flight"));
        }
        if self.handle.state.is_transitioning() {
            warn!(
                target = "session::coordinator",
                "find rejected in state {}", self.handle.state
            );
            return Err(SessionError::OperationRejected(
                "session operation in flight",
            ));
        }

        let query = SearchQuery::new(max_results);
        self.search = Some(SessionSearch::new(query.clone()));
        self.searching = true;
        if let Err(err) = self.backend.find_sessions(&query) {
            warn!(target = "session::coordinator", "find request failed: {err}");
            self.searching = false;
            return Err(SessionError::OperationFailed(err.to_string()));
        }
        Ok(())
    }

    /// Joins the search result at `index`.
    ///
    /// Silently no-ops when no results exist or the index is out of bounds;
    /// a stale UI click is not an error worth surfacing.
    pub fn join(&mut self, index: usize) {
        if self.handle.state.is_transitioning() {
            debug!(
                target = "session::coordinator",
                "join ignored: operation in flight ({})", self.handle.state
            );
            return;
        }
        let result = match self.search.as_ref().and_then(|search| search.get(index)) {
            Some(result) => result.clone(),
            None => {
                debug!(
                    target = "session::coordinator",
                    "join ignored: index {index} out of bounds ({} results)",
                    self.results().len()
                );
                return;
            }
        };
        self.join_result(result);
    }

    /// Joins a session from an externally delivered search result (friend
    /// invite). Invalid results are rejected silently.
    pub fn join_friend(&mut self, result: &SearchResult) {
        if !result.is_valid() {
            debug!(target = "session::coordinator", "join_friend ignored: invalid result");
            return;
        }
        if self.handle.state.is_transitioning() {
            debug!(
                target = "session::coordinator",
                "join_friend ignored: operation in flight ({})", self.handle.state
            );
            return;
        }
        info!(target = "session::coordinator", "joining friend session \"{}\"", result.server_name);
        self.join_result(result.clone());
    }

    fn join_result(&mut self, result: SearchResult) {
        self.handle.state = SessionState::Joining;
        if let Err(err) = self.backend.join_session(&result) {
            warn!(target = "session::coordinator", "join request failed: {err}");
            self.handle.reset();
        }
    }

    /// Marks the active session as started/joinable.
    pub fn start(&mut self) -> Result<(), SessionError> {
        if self.handle.state != SessionState::Active {
            debug!(
                target = "session::coordinator",
                "start ignored in state {}", self.handle.state
            );
            return Err(SessionError::OperationRejected("session not active"));
        }
        if let Err(err) = self.backend.start_session() {
            warn!(target = "session::coordinator", "start request failed: {err}");
            return Err(SessionError::OperationFailed(err.to_string()));
        }
        self.handle.started = true;
        Ok(())
    }

    /// Opens the platform friends overlay, if the backend has one.
    pub fn open_friends_overlay(&mut self) {
        if let Err(err) = self.backend.show_friends_ui() {
            debug!(target = "session::coordinator", "friends overlay unavailable: {err}");
        }
    }

    /// Opens the platform invite dialog, if the backend has one.
    pub fn open_invite_dialog(&mut self) {
        if let Err(err) = self.backend.show_invite_ui() {
            debug!(target = "session::coordinator", "invite dialog unavailable: {err}");
        }
    }

    /// Drains pending completions, updating state and notifying
    /// subscribers. Returns the number of events processed.
    pub fn pump(&mut self) -> usize {
        let mut processed = 0;
        loop {
            match self.completions.try_recv() {
                Ok(event) => {
                    self.handle_event(event);
                    processed += 1;
                }
                Err(_) => break,
            }
        }
        processed
    }

    fn handle_event(&mut self, event: BackendEvent) {
        match event {
            BackendEvent::CreateComplete { session, success } => {
                if !self.accepts(&session, "create") {
                    return;
                }
                self.on_create_complete(success);
            }
            BackendEvent::DestroyComplete { session, success } => {
                if !self.accepts(&session, "destroy") {
                    return;
                }
                self.on_destroy_complete(success);
            }
            BackendEvent::FindComplete { success, results } => {
                self.on_find_complete(success, results);
            }
            BackendEvent::JoinComplete { session, outcome } => {
                if !self.accepts(&session, "join") {
                    return;
                }
                self.on_join_complete(outcome);
            }
            BackendEvent::InviteAccepted { invite } => {
                self.on_invite_accepted(invite);
            }
            BackendEvent::NetworkFailure { reason } => {
                self.on_network_failure(&reason);
            }
        }
    }

    /// Completions name the session they refer to; anything aimed at a
    /// different handle is dropped.
    fn accepts(&self, session: &str, what: &str) -> bool {
        if session == self.handle.name {
            true
        } else {
            warn!(
                target = "session::coordinator",
                "ignoring {what} completion for foreign session \"{session}\""
            );
            false
        }
    }

    fn on_create_complete(&mut self, success: bool) {
        if self.handle.state != SessionState::Creating {
            warn!(
                target = "session::coordinator",
                "stale create completion in state {}", self.handle.state
            );
            return;
        }

        if success {
            self.handle.mark_created();
            info!(target = "session::coordinator", "hosting");
            self.travel.server_travel(&self.config.listen_map);
        } else {
            warn!(target = "session::coordinator", "could not create session");
            self.handle.reset();
        }
        self.dispatch(SessionEvent::CreateComplete { success });
    }

    fn on_destroy_complete(&mut self, success: bool) {
        if self.handle.state != SessionState::Destroying {
            warn!(
                target = "session::coordinator",
                "stale destroy completion in state {}", self.handle.state
            );
            return;
        }

        self.handle.reset();
        self.dispatch(SessionEvent::DestroyComplete { success });

        let recreate = std::mem::take(&mut self.recreate_on_destroy);
        if recreate && success {
            if let Err(err) = self.create() {
                warn!(target = "session::coordinator", "recreate after destroy failed: {err}");
            }
        }
    }

    fn on_find_complete(&mut self, success: bool, results: Vec<SearchResult>) {
        if !self.searching {
            warn!(target = "session::coordinator", "stale find completion");
            return;
        }
        self.searching = false;

        let results = match (&mut self.search, success) {
            (Some(search), true) => {
                search.populate(results);
                info!(
                    target = "session::coordinator",
                    "find finished: {} session(s)",
                    search.results.len()
                );
                search.results.clone()
            }
            _ => {
                warn!(target = "session::coordinator", "find failed");
                Vec::new()
            }
        };
        self.dispatch(SessionEvent::FindComplete { success, results });
    }

    fn on_join_complete(&mut self, outcome: JoinOutcome) {
        if self.handle.state != SessionState::Joining {
            warn!(
                target = "session::coordinator",
                "stale join completion in state {}", self.handle.state
            );
            return;
        }

        if outcome == JoinOutcome::Success {
            match self.backend.resolve_connect_string() {
                Some(address) => {
                    info!(target = "session::coordinator", "joining {address}");
                    self.travel.client_travel(&address, TravelKind::Absolute);
                    self.handle.state = SessionState::Joined;
                }
                None => {
                    warn!(
                        target = "session::coordinator",
                        "no resolvable address; aborting join"
                    );
                    self.handle.reset();
                }
            }
        } else {
            warn!(target = "session::coordinator", "join failed: {outcome:?}");
            self.handle.reset();
        }
        self.dispatch(SessionEvent::JoinComplete { outcome });
    }

    fn on_invite_accepted(&mut self, invite: PendingInvite) {
        info!(
            target = "session::coordinator",
            "invite accepted (controller {})", invite.controller_id
        );
        self.last_invite = Some(invite.clone());
        self.dispatch(SessionEvent::InviteAccepted {
            invite: invite.clone(),
        });
        self.join_friend(&invite.result);
    }

    fn on_network_failure(&mut self, reason: &str) {
        warn!(target = "session::coordinator", "network failure: {reason}");
        self.handle.reset();
        self.searching = false;
        self.recreate_on_destroy = false;
        self.travel
            .client_travel(&self.config.offline_map, TravelKind::Absolute);
        self.dispatch(SessionEvent::NetworkFailure);
    }

    fn dispatch(&mut self, event: SessionEvent) {
        self.subscribers.dispatch(&event);
    }
}
