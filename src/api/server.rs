//! Inspection Endpoint
//!
//! Owns the HTTP listener serving the inspection routes and drives its
//! `Stopped -> Starting -> Running -> Stopping -> Stopped` lifecycle.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use super::handlers::AppState;
use super::listener::bind_reuseport;
use super::routes::create_router;
use crate::cache::DnsCache;
use crate::config::Config;
use crate::error::{CacheError, Result};

/// Lifecycle state of the inspection endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerState {
    Stopped,
    Starting,
    Running,
    Stopping,
}

struct RunningServer {
    local_addr: SocketAddr,
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<io::Result<()>>,
}

struct Inner {
    state: ServerState,
    running: Option<RunningServer>,
}

// == Inspection Server ==
/// Read-only HTTP surface over a shared cache.
///
/// Dropping a running server starts a graceful shutdown in the background.
pub struct InspectionServer {
    cache: Arc<DnsCache>,
    addr: String,
    request_timeout: Duration,
    shutdown_grace: Duration,
    inner: Mutex<Inner>,
}

impl InspectionServer {
    pub fn new(
        cache: Arc<DnsCache>,
        addr: impl Into<String>,
        request_timeout: Duration,
        shutdown_grace: Duration,
    ) -> Self {
        Self {
            cache,
            addr: addr.into(),
            request_timeout,
            shutdown_grace,
            inner: Mutex::new(Inner {
                state: ServerState::Stopped,
                running: None,
            }),
        }
    }

    pub fn from_config(cache: Arc<DnsCache>, config: &Config) -> Self {
        Self::new(
            cache,
            config.inspect_addr.clone(),
            config.http_timeout(),
            config.shutdown_grace(),
        )
    }

    pub fn state(&self) -> ServerState {
        self.inner.lock().state
    }

    /// Address actually bound, while running.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.inner.lock().running.as_ref().map(|r| r.local_addr)
    }

    // == Start ==
    /// Binds the listener and starts serving in a background task.
    ///
    /// On a bind failure the endpoint stays `Stopped`; no retry is attempted.
    pub async fn start(&self) -> Result<SocketAddr> {
        {
            let mut inner = self.inner.lock();
            if inner.state != ServerState::Stopped {
                return Err(CacheError::AlreadyRunning);
            }
            inner.state = ServerState::Starting;
        }

        let bound = bind_reuseport(&self.addr).and_then(|listener| {
            let local_addr = listener.local_addr()?;
            Ok((listener, local_addr))
        });
        let (listener, local_addr) = match bound {
            Ok(bound) => bound,
            Err(err) => {
                self.inner.lock().state = ServerState::Stopped;
                return Err(err);
            }
        };

        let app = create_router(AppState::new(Arc::clone(&self.cache)), self.request_timeout);
        let (shutdown, signal) = oneshot::channel::<()>();
        let task = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    // a dropped sender also means shut down
                    let _ = signal.await;
                })
                .await
        });

        let mut inner = self.inner.lock();
        inner.running = Some(RunningServer {
            local_addr,
            shutdown,
            task,
        });
        inner.state = ServerState::Running;
        info!(%local_addr, "Inspection endpoint listening");

        Ok(local_addr)
    }

    // == Stop ==
    /// Stops accepting connections and waits up to the grace period for
    /// in-flight requests.
    ///
    /// The endpoint ends `Stopped` even when the grace period runs out, in
    /// which case `ShutdownTimeout` is returned. Stopping a stopped endpoint
    /// is a no-op.
    pub async fn stop(&self) -> Result<()> {
        let mut running = {
            let mut inner = self.inner.lock();
            let Some(running) = inner.running.take() else {
                return Ok(());
            };
            inner.state = ServerState::Stopping;
            running
        };

        let _ = running.shutdown.send(());
        let outcome = tokio::time::timeout(self.shutdown_grace, &mut running.task).await;
        self.inner.lock().state = ServerState::Stopped;

        match outcome {
            Ok(Ok(Ok(()))) => {
                info!(addr = %running.local_addr, "Inspection endpoint stopped");
                Ok(())
            }
            Ok(Ok(Err(err))) => Err(CacheError::Server(err)),
            Ok(Err(join_err)) => Err(CacheError::Server(io::Error::other(join_err))),
            Err(_) => {
                running.task.abort();
                warn!(
                    addr = %running.local_addr,
                    grace = ?self.shutdown_grace,
                    "Inspection endpoint shutdown timed out, connections dropped"
                );
                Err(CacheError::ShutdownTimeout(self.shutdown_grace))
            }
        }
    }
}
