//! Externally delivered session invitations.

use crate::search::SearchResult;

/// An invitation accepted outside the game (friend list, overlay), queued
/// for processing. At most one is active per accept event.
#[derive(Debug, Clone)]
pub struct PendingInvite {
    /// Local controller that accepted the invite.
    pub controller_id: u32,
    /// Platform identity of the inviting user, when known.
    pub from_user: Option<String>,
    pub result: SearchResult,
}

impl PendingInvite {
    pub fn new(controller_id: u32, from_user: Option<String>, result: SearchResult) -> Self {
        Self {
            controller_id,
            from_user,
            result,
        }
    }
}
