//! Steam presence backend (feature-gated).
//!
//! With the `steamworks` feature enabled the real adapter initializes the
//! SDK and pumps its callbacks; without it the stub reports the feature as
//! disabled so callers fall back to the LAN backend.

#[cfg(feature = "steamworks")]
mod real;
#[cfg(not(feature = "steamworks"))]
mod stub;

#[cfg(feature = "steamworks")]
pub use real::SteamSessionBackend;
#[cfg(not(feature = "steamworks"))]
pub use stub::SteamSessionBackend;

/// Name reported by the Steam presence backend.
pub const STEAM_BACKEND_NAME: &str = "steam";
