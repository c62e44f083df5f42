use session_shared::{BackendEvent, SearchQuery, SearchResult, SessionSettings};
use tokio::sync::mpsc::UnboundedSender;

use crate::backend::{BackendError, SessionBackend};

use super::STEAM_BACKEND_NAME;

#[derive(Debug)]
pub struct SteamSessionBackend;

impl SteamSessionBackend {
    pub fn new(_app_id: u32) -> Result<Self, BackendError> {
        Err(BackendError::Disabled("steamworks"))
    }
}

impl SessionBackend for SteamSessionBackend {
    fn name(&self) -> &'static str {
        STEAM_BACKEND_NAME
    }

    fn start(&mut self, _events: UnboundedSender<BackendEvent>) -> Result<(), BackendError> {
        Err(BackendError::Disabled("steamworks"))
    }

    fn create_session(&mut self, _settings: &SessionSettings) -> Result<(), BackendError> {
        Err(BackendError::Disabled("steamworks"))
    }

    fn destroy_session(&mut self) -> Result<(), BackendError> {
        Err(BackendError::Disabled("steamworks"))
    }

    fn find_sessions(&mut self, _query: &SearchQuery) -> Result<(), BackendError> {
        Err(BackendError::Disabled("steamworks"))
    }

    fn join_session(&mut self, _result: &SearchResult) -> Result<(), BackendError> {
        Err(BackendError::Disabled("steamworks"))
    }

    fn resolve_connect_string(&self) -> Option<String> {
        None
    }

    fn start_session(&mut self) -> Result<(), BackendError> {
        Err(BackendError::Disabled("steamworks"))
    }

    fn show_friends_ui(&mut self) -> Result<(), BackendError> {
        Err(BackendError::Disabled("steamworks"))
    }

    fn show_invite_ui(&mut self) -> Result<(), BackendError> {
        Err(BackendError::Disabled("steamworks"))
    }
}
