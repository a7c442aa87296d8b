//! TCP Server
//!
//! Accepts connections and serves them one at a time.

use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::config::Config;
use crate::error::Result;
use super::connection::Connection;

/// First pause after a failed `accept`, doubled per consecutive failure
const ACCEPT_BACKOFF_BASE: Duration = Duration::from_millis(10);

/// Longest pause between `accept` retries
const ACCEPT_BACKOFF_MAX: Duration = Duration::from_secs(1);

/// TCP server for brokerwire
pub struct Server {
    config: Config,
    listener: TcpListener,
    shutdown: ShutdownHandle,
}

/// Stops a running `Server` from another thread
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    flag: Arc<AtomicBool>,
    addr: SocketAddr,
}

impl ShutdownHandle {
    /// Set the stop flag and wake a blocked `accept` by connecting to it
    pub fn shutdown(&self) {
        self.flag.store(true, Ordering::Relaxed);
        let _ = TcpStream::connect(self.addr);
    }

    pub fn is_shutdown(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

impl Server {
    /// Validate the config and bind the listen address
    pub fn bind(config: Config) -> Result<Self> {
        config.validate()?;
        let listener = TcpListener::bind(&config.listen_addr)?;
        let addr = listener.local_addr()?;
        tracing::info!("Listening on {}", addr);

        Ok(Self {
            config,
            listener,
            shutdown: ShutdownHandle {
                flag: Arc::new(AtomicBool::new(false)),
                addr,
            },
        })
    }

    /// Address actually bound (useful with port 0)
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Handle that stops `run`, usable after the server moves to another thread
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.shutdown.clone()
    }

    /// Accept and serve connections until shutdown (blocking)
    ///
    /// Connection errors are logged and do not stop the server. Failed
    /// accepts (e.g. out of file descriptors) are retried with backoff.
    pub fn run(&self) -> Result<()> {
        let mut accept_failures = 0u32;
        while !self.shutdown.is_shutdown() {
            let (stream, addr) = match self.listener.accept() {
                Ok(accepted) => {
                    accept_failures = 0;
                    accepted
                }
                Err(e) => {
                    accept_failures = accept_failures.saturating_add(1);
                    let delay = accept_backoff(accept_failures);
                    tracing::warn!(
                        "Accept failed ({} in a row): {}; retrying in {:?}",
                        accept_failures, e, delay
                    );
                    thread::sleep(delay);
                    continue;
                }
            };

            if self.shutdown.is_shutdown() {
                break;
            }

            tracing::info!("Client connected from {}", addr);
            if let Err(e) = self.serve(stream) {
                tracing::warn!("Connection from {} closed with error: {}", addr, e);
            }
        }

        tracing::info!("Server stopped");
        Ok(())
    }

    /// Accept exactly one connection and serve it until it closes
    pub fn accept_one(&self) -> Result<()> {
        let (stream, addr) = self.listener.accept()?;
        tracing::info!("Client connected from {}", addr);
        self.serve(stream)
    }

    /// Signal the server to shutdown
    ///
    /// Wakes a blocked `accept` by connecting to ourselves.
    pub fn shutdown(&self) {
        self.shutdown.shutdown();
    }

    fn serve(&self, stream: TcpStream) -> Result<()> {
        let mut connection = Connection::new(stream, &self.config)?;
        connection.handle()
    }
}

/// Pause before the next `accept` after `failures` consecutive failures
fn accept_backoff(failures: u32) -> Duration {
    let exp = failures.saturating_sub(1).min(16);
    ACCEPT_BACKOFF_BASE
        .saturating_mul(1u32 << exp)
        .min(ACCEPT_BACKOFF_MAX)
}
