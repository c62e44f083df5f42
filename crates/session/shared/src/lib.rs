//! Shared types for the multiplayer session layer.
//!
//! This crate hosts the data model shared between the coordinator and its
//! backends:
//! - session: session identity, state machine vocabulary, the managed handle
//! - settings: advertised session settings and custom properties
//! - search: queries, discovered results, the result sequence
//! - invite: externally delivered invitations
//! - events: backend completion events and subscriber notifications
//! - discovery: the LAN announcement payload and its codec
//! - config: coordinator/LAN configuration structures
//!
//! Keep this crate lean: no runtime, no sockets, no engine types.

pub mod config;
pub mod discovery;
pub mod events;
pub mod invite;
pub mod search;
pub mod session;
pub mod settings;

pub use config::{CoordinatorConfig, LanConfig};
pub use events::{BackendEvent, EventKind, JoinOutcome, SessionEvent};
pub use invite::PendingInvite;
pub use search::{PlayerCapacity, SearchQuery, SearchResult, SessionSearch};
pub use session::{SessionHandle, SessionId, SessionState, SESSION_NAME};
pub use settings::{SessionSettings, SettingAdvertisement, SERVER_NAME_KEY};
