//! Configuration structures for the coordinator and the LAN backend.

use serde::{Deserialize, Serialize};

use crate::search::DEFAULT_MAX_SEARCH_RESULTS;
use crate::settings::DEFAULT_MAX_PUBLIC_CONNECTIONS;

/// Settings for LAN discovery (broadcast on the host, listen on clients).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanConfig {
    /// UDP port discovery packets are broadcast to and received on.
    pub discovery_port: u16,
    /// Port advertised as the host's game endpoint.
    pub game_port: u16,
    pub broadcast_interval_ms: u64,
    /// How long a single find collects announcements before completing.
    pub find_window_ms: u64,
}

impl Default for LanConfig {
    fn default() -> Self {
        Self {
            discovery_port: 50_000,
            game_port: 7_777,
            broadcast_interval_ms: 750,
            find_window_ms: 1_500,
        }
    }
}

/// Coordinator-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoordinatorConfig {
    /// Map all local controllers travel to after a successful create
    /// (listen travel: this process becomes the host).
    pub listen_map: String,
    /// Neutral map clients fall back to on network failure.
    pub offline_map: String,
    pub max_public_connections: u32,
    pub max_search_results: usize,
    pub lan: LanConfig,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            listen_map: "maps/arena".into(),
            offline_map: "maps/main_menu".into(),
            max_public_connections: DEFAULT_MAX_PUBLIC_CONNECTIONS,
            max_search_results: DEFAULT_MAX_SEARCH_RESULTS,
            lan: LanConfig::default(),
        }
    }
}
