//! Completion events and subscriber notifications.
//!
//! Backends deliver [`BackendEvent`]s through an unbounded queue; the
//! coordinator pumps that queue on its own thread, updates the handle and
//! re-dispatches [`SessionEvent`]s to registered subscribers.

use crate::{invite::PendingInvite, search::SearchResult};

/// Result of an attempt to join a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinOutcome {
    Success,
    SessionIsFull,
    SessionDoesNotExist,
    CouldNotRetrieveAddress,
    AlreadyInSession,
    UnknownError,
}

/// Events a backend pushes into the coordinator's completion queue.
///
/// Completions carry the session name they refer to; the coordinator matches
/// on the name instead of assuming FIFO request/response pairing.
#[derive(Debug, Clone)]
pub enum BackendEvent {
    CreateComplete {
        session: String,
        success: bool,
    },
    DestroyComplete {
        session: String,
        success: bool,
    },
    FindComplete {
        success: bool,
        results: Vec<SearchResult>,
    },
    JoinComplete {
        session: String,
        outcome: JoinOutcome,
    },
    InviteAccepted {
        invite: PendingInvite,
    },
    NetworkFailure {
        reason: String,
    },
}

/// Notifications the coordinator dispatches to subscribers.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    CreateComplete { success: bool },
    DestroyComplete { success: bool },
    FindComplete {
        success: bool,
        results: Vec<SearchResult>,
    },
    JoinComplete { outcome: JoinOutcome },
    InviteAccepted { invite: PendingInvite },
    NetworkFailure,
}

impl SessionEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            SessionEvent::CreateComplete { .. } => EventKind::CreateComplete,
            SessionEvent::DestroyComplete { .. } => EventKind::DestroyComplete,
            SessionEvent::FindComplete { .. } => EventKind::FindComplete,
            SessionEvent::JoinComplete { .. } => EventKind::JoinComplete,
            SessionEvent::InviteAccepted { .. } => EventKind::InviteAccepted,
            SessionEvent::NetworkFailure => EventKind::NetworkFailure,
        }
    }
}

/// Discriminant used to register subscribers per notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    CreateComplete,
    DestroyComplete,
    FindComplete,
    JoinComplete,
    InviteAccepted,
    NetworkFailure,
}
