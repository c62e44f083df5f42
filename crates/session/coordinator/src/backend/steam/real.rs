use std::{sync::Arc, time::Duration};

use session_shared::{BackendEvent, SearchQuery, SearchResult, SessionSettings};
use steamworks::{Client, ClientManager, SingleClient};
use tokio::{
    sync::{mpsc::UnboundedSender, oneshot},
    task::JoinHandle,
    time::sleep,
};

use crate::backend::{BackendError, SessionBackend};

use super::STEAM_BACKEND_NAME;

/// Steam presence backend.
///
/// Initializes the SDK and pumps its callbacks on a background task. Lobby
/// create/search/join are not wired up yet; the adapter exists so overlay
/// hooks and backend-name detection work against the real platform.
pub struct SteamSessionBackend {
    client: Arc<Client<ClientManager>>,
    callbacks: Option<JoinHandle<()>>,
    shutdown: Option<oneshot::Sender<()>>,
    events: Option<UnboundedSender<BackendEvent>>,
}

impl SteamSessionBackend {
    pub fn new(app_id: u32) -> Result<Self, BackendError> {
        let (client, single): (Client<ClientManager>, SingleClient<ClientManager>) =
            Client::init_app(app_id).map_err(|err| BackendError::Init(err.to_string()))?;
        let client = Arc::new(client);

        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();
        let callbacks = tokio::spawn(async move {
            loop {
                single.run_callbacks();
                if shutdown_rx.try_recv().is_ok() {
                    break;
                }
                sleep(Duration::from_millis(16)).await;
            }
        });

        Ok(Self {
            client,
            callbacks: Some(callbacks),
            shutdown: Some(shutdown_tx),
            events: None,
        })
    }
}

impl SessionBackend for SteamSessionBackend {
    fn name(&self) -> &'static str {
        STEAM_BACKEND_NAME
    }

    fn start(&mut self, events: UnboundedSender<BackendEvent>) -> Result<(), BackendError> {
        self.events = Some(events);
        Ok(())
    }

    fn create_session(&mut self, _settings: &SessionSettings) -> Result<(), BackendError> {
        Err(BackendError::Unsupported("steam lobby creation"))
    }

    fn destroy_session(&mut self) -> Result<(), BackendError> {
        Err(BackendError::Unsupported("steam lobby teardown"))
    }

    fn find_sessions(&mut self, _query: &SearchQuery) -> Result<(), BackendError> {
        Err(BackendError::Unsupported("steam lobby search"))
    }

    fn join_session(&mut self, _result: &SearchResult) -> Result<(), BackendError> {
        Err(BackendError::Unsupported("steam lobby join"))
    }

    fn resolve_connect_string(&self) -> Option<String> {
        None
    }

    fn start_session(&mut self) -> Result<(), BackendError> {
        Err(BackendError::Unsupported("steam session start"))
    }

    fn show_friends_ui(&mut self) -> Result<(), BackendError> {
        self.client.friends().activate_game_overlay("Friends");
        Ok(())
    }

    fn show_invite_ui(&mut self) -> Result<(), BackendError> {
        Err(BackendError::Unsupported("steam invite dialog"))
    }
}

impl Drop for SteamSessionBackend {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(handle) = self.callbacks.take() {
            handle.abort();
        }
    }
}
