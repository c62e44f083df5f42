//! Offline/null backend: LAN broadcast discovery.
//!
//! Hosting spawns a broadcaster task that periodically announces the
//! session over UDP broadcast; searching spawns a time-boxed listener that
//! collects announcements and reports them as one result sequence. There is
//! no matchmaking service involved, which is exactly why the coordinator
//! switches sessions to LAN mode when it detects this backend.

use std::{
    collections::HashSet,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    sync::{Arc, RwLock},
    time::Duration,
};

use session_shared::{
    discovery::{decode_announcement, encode_announcement, SessionAnnouncement, ANNOUNCEMENT_VERSION},
    BackendEvent, JoinOutcome, LanConfig, PlayerCapacity, SearchQuery, SearchResult, SessionId,
    SessionSettings, SESSION_NAME,
};
use tokio::{net::UdpSocket, sync::mpsc::UnboundedSender, task::JoinHandle, time::Instant};
use tracing::{debug, warn};

use crate::runtime::SessionRuntime;

use super::{BackendError, SessionBackend, NULL_BACKEND_NAME};

const RECV_BUFFER_SIZE: usize = 512;
const RECV_ERROR_BACKOFF: Duration = Duration::from_millis(200);

/// LAN-discovery session backend.
pub struct LanSessionBackend {
    runtime: SessionRuntime,
    config: LanConfig,
    events: Option<UnboundedSender<BackendEvent>>,
    announcement: Arc<RwLock<Option<SessionAnnouncement>>>,
    payload: Arc<RwLock<Vec<u8>>>,
    broadcaster: Option<JoinHandle<()>>,
    finder: Option<JoinHandle<()>>,
    joined: Option<SearchResult>,
}

impl LanSessionBackend {
    pub fn new(runtime: SessionRuntime, config: LanConfig) -> Self {
        Self {
            runtime,
            config,
            events: None,
            announcement: Arc::new(RwLock::new(None)),
            payload: Arc::new(RwLock::new(Vec::new())),
            broadcaster: None,
            finder: None,
            joined: None,
        }
    }

    fn events(&self) -> Result<UnboundedSender<BackendEvent>, BackendError> {
        self.events.clone().ok_or(BackendError::NotStarted)
    }

    fn stop_broadcaster(&mut self) {
        if let Some(handle) = self.broadcaster.take() {
            handle.abort();
        }
    }

    fn stop_finder(&mut self) {
        if let Some(handle) = self.finder.take() {
            handle.abort();
        }
    }

    fn refresh_payload(&self) -> Result<(), BackendError> {
        let encoded = {
            let announcement = self.announcement.read().unwrap();
            match announcement.as_ref() {
                Some(announcement) => encode_announcement(announcement)?,
                None => Vec::new(),
            }
        };
        *self.payload.write().unwrap() = encoded;
        Ok(())
    }
}

impl SessionBackend for LanSessionBackend {
    fn name(&self) -> &'static str {
        NULL_BACKEND_NAME
    }

    fn start(&mut self, events: UnboundedSender<BackendEvent>) -> Result<(), BackendError> {
        self.events = Some(events);
        Ok(())
    }

    fn create_session(&mut self, settings: &SessionSettings) -> Result<(), BackendError> {
        let events = self.events()?;
        self.stop_broadcaster();

        let server_name = settings.server_name().unwrap_or("Unnamed Server").to_owned();
        let mut announcement =
            SessionAnnouncement::new(SessionId::new(), self.config.game_port, server_name);
        announcement.capacity = Some(PlayerCapacity::new(
            1,
            settings.max_public_connections as u16,
        ));
        *self.announcement.write().unwrap() = Some(announcement);
        self.refresh_payload()?;

        let payload = self.payload.clone();
        let discovery_port = self.config.discovery_port;
        let interval = Duration::from_millis(self.config.broadcast_interval_ms);
        let handle = self.runtime.spawn(async move {
            let socket = match bind_broadcast_socket(0).await {
                Ok(socket) => socket,
                Err(err) => {
                    warn!(target = "session::backend::lan", "broadcast socket failed: {err}");
                    let _ = events.send(BackendEvent::CreateComplete {
                        session: SESSION_NAME.into(),
                        success: false,
                    });
                    return;
                }
            };
            let _ = events.send(BackendEvent::CreateComplete {
                session: SESSION_NAME.into(),
                success: true,
            });

            let broadcast_addr =
                SocketAddr::new(IpAddr::V4(Ipv4Addr::BROADCAST), discovery_port);
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                let bytes = payload.read().unwrap().clone();
                if bytes.is_empty() {
                    continue;
                }
                if let Err(err) = socket.send_to(&bytes, broadcast_addr).await {
                    warn!(target = "session::backend::lan", "LAN broadcast failed: {err}");
                }
            }
        });
        self.broadcaster = Some(handle);
        Ok(())
    }

    fn destroy_session(&mut self) -> Result<(), BackendError> {
        let events = self.events()?;
        self.stop_broadcaster();
        *self.announcement.write().unwrap() = None;
        self.payload.write().unwrap().clear();
        self.joined = None;
        let _ = events.send(BackendEvent::DestroyComplete {
            session: SESSION_NAME.into(),
            success: true,
        });
        Ok(())
    }

    fn find_sessions(&mut self, query: &SearchQuery) -> Result<(), BackendError> {
        let events = self.events()?;
        self.stop_finder();

        let own_session = self
            .announcement
            .read()
            .unwrap()
            .as_ref()
            .map(|announcement| announcement.session_id);
        let discovery_port = self.config.discovery_port;
        let window = Duration::from_millis(self.config.find_window_ms);
        let max_results = query.max_results;
        let handle = self.runtime.spawn(async move {
            let socket = match bind_broadcast_socket(discovery_port).await {
                Ok(socket) => socket,
                Err(err) => {
                    warn!(target = "session::backend::lan", "listen socket failed: {err}");
                    let _ = events.send(BackendEvent::FindComplete {
                        success: false,
                        results: Vec::new(),
                    });
                    return;
                }
            };

            let results = collect_announcements(&socket, window, max_results, own_session).await;
            let _ = events.send(BackendEvent::FindComplete {
                success: true,
                results,
            });
        });
        self.finder = Some(handle);
        Ok(())
    }

    fn join_session(&mut self, result: &SearchResult) -> Result<(), BackendError> {
        let events = self.events()?;
        self.joined = Some(result.clone());
        let outcome = if result.endpoint.is_some() {
            JoinOutcome::Success
        } else {
            JoinOutcome::SessionDoesNotExist
        };
        let _ = events.send(BackendEvent::JoinComplete {
            session: SESSION_NAME.into(),
            outcome,
        });
        Ok(())
    }

    fn resolve_connect_string(&self) -> Option<String> {
        self.joined
            .as_ref()
            .and_then(|result| result.endpoint)
            .map(|endpoint| endpoint.to_string())
    }

    fn start_session(&mut self) -> Result<(), BackendError> {
        let mut announcement = self.announcement.write().unwrap();
        match announcement.as_mut() {
            Some(announcement) => announcement.started = true,
            None => {
                debug!(target = "session::backend::lan", "start_session without a session");
                return Ok(());
            }
        }
        drop(announcement);
        self.refresh_payload()
    }

    fn show_friends_ui(&mut self) -> Result<(), BackendError> {
        Err(BackendError::Unsupported("friends overlay"))
    }

    fn show_invite_ui(&mut self) -> Result<(), BackendError> {
        Err(BackendError::Unsupported("invite dialog"))
    }
}

impl Drop for LanSessionBackend {
    fn drop(&mut self) {
        self.stop_broadcaster();
        self.stop_finder();
    }
}

async fn bind_broadcast_socket(port: u16) -> Result<UdpSocket, std::io::Error> {
    let socket =
        UdpSocket::bind(SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), port)).await?;
    socket.set_broadcast(true)?;
    Ok(socket)
}

/// Listens for announcements until the window closes, deduplicating by
/// endpoint and preserving first-seen order.
async fn collect_announcements(
    socket: &UdpSocket,
    window: Duration,
    max_results: usize,
    own_session: Option<SessionId>,
) -> Vec<SearchResult> {
    let deadline = Instant::now() + window;
    let mut results = Vec::new();
    let mut seen: HashSet<SocketAddr> = HashSet::new();
    let mut buf = [0u8; RECV_BUFFER_SIZE];

    while results.len() < max_results {
        let now = Instant::now();
        if now >= deadline {
            break;
        }
        let received =
            tokio::time::timeout(deadline - now, socket.recv_from(&mut buf)).await;
        let (len, source) = match received {
            Ok(Ok(received)) => received,
            Ok(Err(err)) => {
                warn!(target = "session::backend::lan", "discovery recv error: {err}");
                tokio::time::sleep(RECV_ERROR_BACKOFF).await;
                continue;
            }
            Err(_) => break,
        };

        let announcement = match decode_announcement(&buf[..len]) {
            Ok(announcement) => announcement,
            Err(_) => continue,
        };
        if announcement.version != ANNOUNCEMENT_VERSION {
            debug!(
                target = "session::backend::lan",
                "skipping announcement with version {}", announcement.version
            );
            continue;
        }
        if own_session == Some(announcement.session_id) {
            continue;
        }

        let endpoint = SocketAddr::new(source.ip(), announcement.port);
        if !seen.insert(endpoint) {
            continue;
        }
        results.push(SearchResult {
            session_id: announcement.session_id,
            server_name: announcement.server_name,
            endpoint: Some(endpoint),
            ping_ms: None,
            capacity: announcement.capacity,
        });
    }

    results
}
