//! Travel seam between the coordinator and the surrounding application.
//!
//! "Travel" moves the local player's simulation context: a listen travel
//! makes this process the host of the designated map, an absolute client
//! travel connects to a concrete address or neutral map. The engine side is
//! out of scope here, so the production driver only logs the transition; the
//! recording driver exists for tests and shares its log through an `Arc` so
//! it stays inspectable after being handed to the coordinator.

use std::sync::{Arc, Mutex};

use tracing::info;

/// How a client travel is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TravelKind {
    Absolute,
    Relative,
}

/// Capability to move local controllers between maps/sessions.
pub trait TravelDriver: Send {
    /// Move all local controllers to `map`, becoming a listener (host).
    fn server_travel(&mut self, map: &str);

    /// Move the local controller to `destination` (map or address).
    fn client_travel(&mut self, destination: &str, kind: TravelKind);
}

/// Production driver: the engine integration lives elsewhere, so travels
/// are only logged.
#[derive(Debug, Default, Clone)]
pub struct LogTravel;

impl TravelDriver for LogTravel {
    fn server_travel(&mut self, map: &str) {
        info!(target = "session::travel", "server travel to {map} (listen)");
    }

    fn client_travel(&mut self, destination: &str, kind: TravelKind) {
        info!(target = "session::travel", "client travel to {destination} ({kind:?})");
    }
}

/// One recorded travel action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TravelRecord {
    Server { map: String },
    Client { destination: String, kind: TravelKind },
}

/// Recording driver for tests; cloneable so callers keep a view into the
/// log after the coordinator takes ownership of its twin.
#[derive(Debug, Default, Clone)]
pub struct RecordingTravel {
    records: Arc<Mutex<Vec<TravelRecord>>>,
}

impl RecordingTravel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<TravelRecord> {
        self.records.lock().unwrap().clone()
    }
}

impl TravelDriver for RecordingTravel {
    fn server_travel(&mut self, map: &str) {
        self.records.lock().unwrap().push(TravelRecord::Server {
            map: map.to_owned(),
        });
    }

    fn client_travel(&mut self, destination: &str, kind: TravelKind) {
        self.records.lock().unwrap().push(TravelRecord::Client {
            destination: destination.to_owned(),
            kind,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_travel_is_shared_across_clones() {
        let travel = RecordingTravel::new();
        let mut handed_off = travel.clone();
        handed_off.server_travel("maps/arena");
        handed_off.client_travel("10.0.0.1:7777", TravelKind::Absolute);

        assert_eq!(
            travel.records(),
            vec![
                TravelRecord::Server {
                    map: "maps/arena".into()
                },
                TravelRecord::Client {
                    destination: "10.0.0.1:7777".into(),
                    kind: TravelKind::Absolute
                },
            ]
        );
    }
}
