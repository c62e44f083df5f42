//! Advertised session settings.
//!
//! Mirrors what a matchmaking backend needs to know when a session is
//! created: LAN vs presence mode, player capacity, and a small map of custom
//! string properties with per-property advertisement modes. The only
//! property the coordinator owns is the human-readable server name.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Custom-property key under which the server name is advertised.
pub const SERVER_NAME_KEY: &str = "server_name";

/// Default maximum number of public connections for a hosted session.
pub const DEFAULT_MAX_PUBLIC_CONNECTIONS: u32 = 5;

/// How a custom property is exposed to searching clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingAdvertisement {
    DontAdvertise,
    ViaPingOnly,
    ViaService,
    ViaServiceAndPing,
}

/// A single advertised custom property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionProperty {
    pub value: String,
    pub advertisement: SettingAdvertisement,
}

/// Settings attached to a session at creation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSettings {
    /// Restrict discovery to local network broadcast instead of
    /// backend-mediated matchmaking.
    pub lan_match: bool,
    /// Prefer platform lobbies when the backend offers them.
    pub use_lobbies: bool,
    pub max_public_connections: u32,
    pub should_advertise: bool,
    /// Platform-level visibility of the session to a user's friends.
    pub uses_presence: bool,
    pub properties: BTreeMap<String, SessionProperty>,
}

impl SessionSettings {
    /// Builds the fixed settings block the coordinator uses for hosting:
    /// max 5 public connections, advertised, presence-enabled, with the
    /// server name attached network- and ping-visible.
    pub fn hosting(lan_match: bool, server_name: &str) -> Self {
        let mut settings = Self {
            lan_match,
            use_lobbies: true,
            max_public_connections: DEFAULT_MAX_PUBLIC_CONNECTIONS,
            should_advertise: true,
            uses_presence: true,
            properties: BTreeMap::new(),
        };
        settings.set_property(
            SERVER_NAME_KEY,
            server_name,
            SettingAdvertisement::ViaServiceAndPing,
        );
        settings
    }

    pub fn set_property(&mut self, key: &str, value: &str, advertisement: SettingAdvertisement) {
        self.properties.insert(
            key.to_owned(),
            SessionProperty {
                value: value.to_owned(),
                advertisement,
            },
        );
    }

    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(|p| p.value.as_str())
    }

    /// The advertised server name, if one was attached.
    pub fn server_name(&self) -> Option<&str> {
        self.property(SERVER_NAME_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hosting_settings_fixed_block() {
        let settings = SessionSettings::hosting(false, "Alpha");
        assert!(!settings.lan_match);
        assert!(settings.use_lobbies);
        assert_eq!(settings.max_public_connections, 5);
        assert!(settings.should_advertise);
        assert!(settings.uses_presence);
        assert_eq!(settings.server_name(), Some("Alpha"));
        assert_eq!(
            settings.properties[SERVER_NAME_KEY].advertisement,
            SettingAdvertisement::ViaServiceAndPing
        );
    }

    #[test]
    fn lan_flag_follows_argument() {
        assert!(SessionSettings::hosting(true, "x").lan_match);
        assert!(!SessionSettings::hosting(false, "x").lan_match);
    }
}
