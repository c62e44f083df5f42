//! LAN session demo: host a session or browse for one.
//!
//! Usage:
//!   session-demo host [name]   broadcast a session on the local network
//!   session-demo find          list sessions visible on the local network

use std::time::Duration;

use anyhow::Result;
use session_coordinator::{
    backend::LanSessionBackend, LogTravel, SessionCoordinator, SessionRuntime,
};
use session_shared::{CoordinatorConfig, EventKind, SessionEvent};
use tracing_subscriber::{layer::SubscriberExt as _, util::SubscriberInitExt as _};

#[tokio::main]
async fn main() -> Result<()> {
    let _ = color_eyre::install();
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mode = std::env::args().nth(1).unwrap_or_else(|| "host".into());
    let config = CoordinatorConfig::default();
    let runtime = SessionRuntime::single_worker()?;
    let backend = LanSessionBackend::new(runtime, config.lan.clone());
    let mut coordinator =
        SessionCoordinator::new(Box::new(backend), Box::new(LogTravel), config.clone())?;

    match mode.as_str() {
        "host" => {
            let name = std::env::args()
                .nth(2)
                .unwrap_or_else(|| "LAN Server".into());
            coordinator.subscribe(EventKind::CreateComplete, |event| {
                if let SessionEvent::CreateComplete { success } = event {
                    if *success {
                        println!("Session up, broadcasting on the local network.");
                    } else {
                        println!("Could not create session.");
                    }
                }
            });
            coordinator.host(&name)?;
            println!("Hosting \"{name}\". Press Ctrl+C to stop.");

            loop {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => break,
                    _ = tokio::time::sleep(Duration::from_millis(100)) => {
                        coordinator.pump();
                    }
                }
            }
            println!("Shutting down.");
        }
        "find" => {
            coordinator.subscribe(EventKind::FindComplete, |event| {
                if let SessionEvent::FindComplete { success, results } = event {
                    if !success {
                        println!("Search failed.");
                        return;
                    }
                    if results.is_empty() {
                        println!("No sessions found.");
                    }
                    for (index, result) in results.iter().enumerate() {
                        let endpoint = result
                            .endpoint
                            .map(|endpoint| endpoint.to_string())
                            .unwrap_or_else(|| "<unresolved>".into());
                        println!("[{index}] \"{}\" at {endpoint}", result.server_name);
                    }
                }
            });
            coordinator.find()?;
            println!("Searching...");
            tokio::time::sleep(Duration::from_millis(config.lan.find_window_ms + 250)).await;
            coordinator.pump();
        }
        other => {
            eprintln!("unknown mode \"{other}\"; use: session-demo host [name] | find");
        }
    }

    Ok(())
}
