//! Session identity and lifecycle vocabulary.
//!
//! Goals:
//! - Provide a compact 16-byte session identifier (`SessionId`).
//! - Human friendly (hex) Display / parsing.
//! - Constructable without an external RNG dependency (monotonic uniqueness
//!   heuristic); good enough for advertising a lobby, not for secrets.
//! - Name the lifecycle states the coordinator is allowed to move through.

use core::{fmt, str::FromStr};
use serde::{Deserialize, Serialize};
use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::SystemTime,
};
use thiserror::Error;

use crate::settings::SessionSettings;

/// Name of the single session this process manages. The coordinator only
/// accepts completions that carry this name.
pub const SESSION_NAME: &str = "game_session";

static SESSION_COUNTER: AtomicU64 = AtomicU64::new(1);

/// 16-byte session identifier.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId([u8; 16]);

impl SessionId {
    /// Creates a new collision-resistant (for practical purposes) id by
    /// mixing the unix timestamp with a rotated process-local counter.
    /// Not cryptographically secure.
    pub fn new() -> Self {
        let counter = SESSION_COUNTER.fetch_add(1, Ordering::Relaxed) as u128;
        let now = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();

        let mixed = now ^ counter.rotate_left(17);
        SessionId(mixed.to_le_bytes())
    }

    pub const fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    pub const fn from_bytes(b: [u8; 16]) -> Self {
        SessionId(b)
    }

    /// Parse from a hex string (strict length = 32 chars).
    pub fn from_hex(s: &str) -> Result<Self, SessionIdParseError> {
        if s.len() != 32 {
            return Err(SessionIdParseError::Length);
        }
        let mut out = [0u8; 16];
        for i in 0..16 {
            let hi = decode_hex_byte(s.as_bytes()[2 * i]).ok_or(SessionIdParseError::Hex)?;
            let lo = decode_hex_byte(s.as_bytes()[2 * i + 1]).ok_or(SessionIdParseError::Hex)?;
            out[i] = (hi << 4) | lo;
        }
        Ok(SessionId(out))
    }

    /// Encode to lowercase hex (32 chars).
    pub fn to_hex(&self) -> String {
        self.to_string()
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in &self.0 {
            write!(f, "{:02x}", b)?;
        }
        Ok(())
    }
}

impl fmt::Debug for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SessionId(")?;
        fmt::Display::fmt(self, f)?;
        write!(f, ")")
    }
}

impl FromStr for SessionId {
    type Err = SessionIdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SessionId::from_hex(s)
    }
}

/// Parsing errors for the hex representation of a [`SessionId`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SessionIdParseError {
    #[error("invalid length (expected 32 hex chars)")]
    Length,
    #[error("invalid hex character")]
    Hex,
}

fn decode_hex_byte(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(10 + (b - b'a')),
        b'A'..=b'F' => Some(10 + (b - b'A')),
        _ => None,
    }
}

/// Lifecycle states of the managed session handle.
///
/// Searching is deliberately *not* a state: a find may overlap a mutating
/// operation, so the coordinator tracks it as an orthogonal flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Creating,
    Active,
    Destroying,
    Joining,
    Joined,
}

impl SessionState {
    /// True while a mutating transition (create/destroy/join) is in flight.
    /// At most one such transition may exist per handle.
    pub const fn is_transitioning(self) -> bool {
        matches!(
            self,
            SessionState::Creating | SessionState::Destroying | SessionState::Joining
        )
    }

    /// True when a session exists that `host()` would have to tear down
    /// before recreating.
    pub const fn has_session(self) -> bool {
        matches!(self, SessionState::Active | SessionState::Joined)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SessionState::Idle => "idle",
            SessionState::Creating => "creating",
            SessionState::Active => "active",
            SessionState::Destroying => "destroying",
            SessionState::Joining => "joining",
            SessionState::Joined => "joined",
        };
        f.write_str(label)
    }
}

/// The one named session handle a process owns.
///
/// Mutated exclusively by the coordinator, either from its own commands or
/// from backend completions.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    pub name: &'static str,
    pub state: SessionState,
    pub settings: Option<SessionSettings>,
    pub created_at: Option<SystemTime>,
    pub started: bool,
}

impl SessionHandle {
    pub fn new() -> Self {
        Self {
            name: SESSION_NAME,
            state: SessionState::Idle,
            settings: None,
            created_at: None,
            started: false,
        }
    }

    /// Records a successful create completion.
    pub fn mark_created(&mut self) {
        self.state = SessionState::Active;
        self.created_at = Some(SystemTime::now());
        self.started = false;
    }

    /// Drops all session-scoped data and returns to `Idle`.
    pub fn reset(&mut self) {
        self.state = SessionState::Idle;
        self.settings = None;
        self.created_at = None;
        self.started = false;
    }
}

impl Default for SessionHandle {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_roundtrip() {
        let id = SessionId::new();
        let h = id.to_hex();
        assert_eq!(h.len(), 32);
        let parsed = SessionId::from_hex(&h).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn parse_rejects_bad_length() {
        assert!(matches!(
            SessionId::from_hex("abcd"),
            Err(SessionIdParseError::Length)
        ));
    }

    #[test]
    fn parse_rejects_bad_chars() {
        let s = "g".repeat(32);
        assert!(matches!(
            SessionId::from_hex(&s),
            Err(SessionIdParseError::Hex)
        ));
    }

    #[test]
    fn transitioning_states() {
        assert!(SessionState::Creating.is_transitioning());
        assert!(SessionState::Destroying.is_transitioning());
        assert!(SessionState::Joining.is_transitioning());
        assert!(!SessionState::Idle.is_transitioning());
        assert!(!SessionState::Active.is_transitioning());
        assert!(!SessionState::Joined.is_transitioning());
    }

    #[test]
    fn handle_reset_clears_session_data() {
        let mut handle = SessionHandle::new();
        handle.mark_created();
        handle.started = true;
        assert_eq!(handle.state, SessionState::Active);

        handle.reset();
        assert_eq!(handle.state, SessionState::Idle);
        assert!(handle.created_at.is_none());
        assert!(!handle.started);
    }
}
