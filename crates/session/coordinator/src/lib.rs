//! Session lifecycle coordination.
//!
//! The [`SessionCoordinator`] is the single authority over one named
//! multiplayer session: it drives create/destroy/find/join through a
//! [`backend::SessionBackend`], serializes operations under a
//! one-in-flight rule, and dispatches completions to registered
//! subscribers. Backends stay swappable: a fully functional LAN backend for
//! offline play, a feature-gated Steam presence backend, and an in-memory
//! mock for tests.

pub mod backend;
pub mod coordinator;
pub mod error;
pub mod runtime;
pub mod subscribers;
pub mod travel;

pub use backend::{BackendError, SessionBackend, NULL_BACKEND_NAME};
pub use coordinator::SessionCoordinator;
pub use error::SessionError;
pub use runtime::SessionRuntime;
pub use travel::{LogTravel, RecordingTravel, TravelDriver, TravelKind};
