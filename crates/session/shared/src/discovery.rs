//! LAN announcement payload and codec.
//!
//! Hosts broadcast a magic-prefixed, bincode-encoded announcement so that
//! clients on the same network can list joinable sessions without a
//! matchmaking service. Both the broadcaster (host side) and the listener
//! (search side) share this format.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{search::PlayerCapacity, session::SessionId};

/// Magic bytes identifying session discovery packets.
pub const SESSION_DISCOVERY_MAGIC: &[u8; 8] = b"SESDISC1";

/// Announcement format version; listeners skip packets from other versions.
pub const ANNOUNCEMENT_VERSION: u16 = 1;

/// Packet a hosting process periodically broadcasts into the LAN.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionAnnouncement {
    pub version: u16,
    pub session_id: SessionId,
    /// Port on which the host accepts game connections.
    pub port: u16,
    /// Display name for UI lists.
    pub server_name: String,
    pub capacity: Option<PlayerCapacity>,
    /// Whether the session has been marked started/joinable.
    pub started: bool,
}

impl SessionAnnouncement {
    pub fn new(session_id: SessionId, port: u16, server_name: String) -> Self {
        Self {
            version: ANNOUNCEMENT_VERSION,
            session_id,
            port,
            server_name,
            capacity: None,
            started: false,
        }
    }
}

/// Errors raised while encoding or decoding discovery packets.
#[derive(Debug, Error)]
pub enum AnnouncementCodecError {
    #[error("invalid discovery magic")]
    InvalidMagic,
    #[error("encode error: {0}")]
    Encode(#[from] bincode::error::EncodeError),
    #[error("decode error: {0}")]
    Decode(#[from] bincode::error::DecodeError),
}

/// Encodes an announcement including the magic prefix.
pub fn encode_announcement(
    announcement: &SessionAnnouncement,
) -> Result<Vec<u8>, AnnouncementCodecError> {
    let mut payload = Vec::with_capacity(128);
    payload.extend_from_slice(SESSION_DISCOVERY_MAGIC);
    let encoded = bincode::serde::encode_to_vec(announcement, bincode::config::standard())?;
    payload.extend_from_slice(&encoded);
    Ok(payload)
}

/// Decodes a discovery packet, checking the magic prefix first.
pub fn decode_announcement(bytes: &[u8]) -> Result<SessionAnnouncement, AnnouncementCodecError> {
    if bytes.len() < SESSION_DISCOVERY_MAGIC.len()
        || &bytes[..SESSION_DISCOVERY_MAGIC.len()] != SESSION_DISCOVERY_MAGIC
    {
        return Err(AnnouncementCodecError::InvalidMagic);
    }
    let slice = &bytes[SESSION_DISCOVERY_MAGIC.len()..];
    let (announcement, _) = bincode::serde::decode_from_slice(slice, bincode::config::standard())?;
    Ok(announcement)
}
