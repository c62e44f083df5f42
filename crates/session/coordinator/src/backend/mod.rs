//! Session backend capability trait and implementations.
//!
//! A backend is the transport/session provider the coordinator delegates
//! to: it receives one request per operation and later reports the outcome
//! as a [`BackendEvent`] on the completion queue handed to [`SessionBackend::start`].
//! Requests never block; completions may arrive in any order.

pub mod lan;
pub mod mock;
pub mod steam;

use session_shared::{BackendEvent, SearchQuery, SearchResult, SessionSettings};
use thiserror::Error;
use tokio::sync::mpsc::UnboundedSender;

pub use lan::LanSessionBackend;
pub use mock::{BackendCall, MockSessionBackend};

/// Name reported by the offline/null backend. The coordinator enables LAN
/// matching exactly when it sees this name.
pub const NULL_BACKEND_NAME: &str = "null";

/// Errors a backend reports synchronously (request not issued). Failures of
/// issued requests arrive asynchronously as events instead.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("backend not started")]
    NotStarted,
    #[error("no active session")]
    NoSession,
    #[error("{0} is not supported by this backend")]
    Unsupported(&'static str),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("announcement codec error: {0}")]
    Codec(#[from] session_shared::discovery::AnnouncementCodecError),
    #[error("backend initialization failed: {0}")]
    Init(String),
    #[error("feature disabled: {0}")]
    Disabled(&'static str),
}

/// Capability set of a transport/session provider.
///
/// Injected into the coordinator at construction; never looked up from
/// ambient global state.
pub trait SessionBackend: Send {
    /// Stable backend identifier ("null", "steam", ...).
    fn name(&self) -> &'static str;

    /// Hands the backend its completion queue. Called once during
    /// coordinator construction; failure is fatal.
    fn start(&mut self, events: UnboundedSender<BackendEvent>) -> Result<(), BackendError>;

    fn create_session(&mut self, settings: &SessionSettings) -> Result<(), BackendError>;

    fn destroy_session(&mut self) -> Result<(), BackendError>;

    fn find_sessions(&mut self, query: &SearchQuery) -> Result<(), BackendError>;

    fn join_session(&mut self, result: &SearchResult) -> Result<(), BackendError>;

    /// Resolves the joined session to a connectable address, if possible.
    fn resolve_connect_string(&self) -> Option<String>;

    /// Marks the current session started/joinable.
    fn start_session(&mut self) -> Result<(), BackendError>;

    /// Opens the platform friends overlay, where the backend has one.
    fn show_friends_ui(&mut self) -> Result<(), BackendError>;

    /// Opens the platform invite dialog, where the backend has one.
    fn show_invite_ui(&mut self) -> Result<(), BackendError>;
}
