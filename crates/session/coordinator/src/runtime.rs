//! Tokio runtime shared by backend background tasks.

use std::{future::Future, sync::Arc};

use thiserror::Error;
use tokio::runtime::{Builder, Handle, Runtime};

/// Shared handle to the session runtime.
///
/// Backend tasks (LAN broadcaster/listener, SDK callback pumps) are spawned
/// here so the coordinator itself never blocks.
#[derive(Debug, Clone)]
pub struct SessionRuntime {
    runtime: Arc<Runtime>,
}

impl SessionRuntime {
    /// Builds a multi-thread runtime with a single worker, which is all the
    /// discovery tasks need.
    pub fn single_worker() -> Result<Self, RuntimeError> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .map_err(RuntimeError::Build)?;
        Ok(Self {
            runtime: Arc::new(runtime),
        })
    }

    /// Spawns a future onto the session runtime.
    pub fn spawn<F>(&self, future: F) -> tokio::task::JoinHandle<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        self.runtime.spawn(future)
    }

    /// Returns a clone of the internal [`Handle`].
    pub fn handle(&self) -> Handle {
        self.runtime.handle().clone()
    }
}

/// Errors raised when constructing the runtime.
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("failed to build tokio runtime: {0}")]
    Build(std::io::Error),
}
