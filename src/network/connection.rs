//! Connection Handler
//!
//! Handles individual client connections.

use std::io::{BufReader, ErrorKind};
use std::net::TcpStream;
use std::time::Duration;

use crate::config::Config;
use crate::error::{Result, WireError};
use crate::protocol::{handle_request, read_frame, write_frame, TracingObserver};

/// Handles a single client connection
///
/// Strictly half-duplex: one request is read, answered and flushed before
/// the next one is read.
pub struct Connection {
    /// TCP stream reader (buffered for efficiency)
    reader: BufReader<TcpStream>,

    /// TCP stream writer (unbuffered, so a short write is seen as one)
    writer: TcpStream,

    /// Largest request frame accepted
    max_frame_size: u32,

    /// Peer address for logging
    peer_addr: String,

    observer: TracingObserver,
}

impl Connection {
    /// Create a new connection handler
    ///
    /// Sets up buffered I/O and configures timeouts from the config
    pub fn new(stream: TcpStream, config: &Config) -> Result<Self> {
        // Get peer address for logging before we split the stream
        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        // Disable Nagle's algorithm for low latency
        stream.set_nodelay(true)?;

        if config.read_timeout_ms > 0 {
            stream.set_read_timeout(Some(Duration::from_millis(config.read_timeout_ms)))?;
        }
        if config.write_timeout_ms > 0 {
            stream.set_write_timeout(Some(Duration::from_millis(config.write_timeout_ms)))?;
        }

        // Clone stream for separate read/write handles
        let read_stream = stream.try_clone()?;
        let write_stream = stream;

        Ok(Self {
            reader: BufReader::new(read_stream),
            writer: write_stream,
            max_frame_size: config.max_frame_size,
            peer_addr,
            observer: TracingObserver,
        })
    }

    /// Handle the connection (blocking until closed)
    ///
    /// Reads requests in a loop and sends responses. Returns when the client
    /// disconnects or an error occurs. Requests that cannot be decoded close
    /// the connection without a response.
    pub fn handle(&mut self) -> Result<()> {
        tracing::debug!("Connection established from {}", self.peer_addr);

        loop {
            // Read next request body
            let body = match read_frame(&mut self.reader, self.max_frame_size) {
                Ok(body) => body,
                Err(WireError::Io(ref e)) if is_disconnect(e.kind()) => {
                    tracing::debug!("Client {} disconnected ({:?})", self.peer_addr, e.kind());
                    return Ok(());
                }
                Err(WireError::Io(ref e))
                    if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) =>
                {
                    // WouldBlock on unix, TimedOut on windows
                    tracing::debug!("Read timeout for client {}", self.peer_addr);
                    return Ok(());
                }
                Err(e) => {
                    tracing::warn!("Error reading from {}: {}", self.peer_addr, e);
                    return Err(e);
                }
            };

            tracing::trace!("Received {} byte request from {}", body.len(), self.peer_addr);

            let framed = match handle_request(&body, &self.observer) {
                Ok(framed) => framed,
                Err(e) => {
                    tracing::warn!("Dropping {}: undecodable request: {}", self.peer_addr, e);
                    return Err(e);
                }
            };

            if let Err(e) = write_frame(&mut self.writer, &framed) {
                // Client went away before the response could be sent
                if let WireError::Io(ref io_err) = e {
                    if is_disconnect(io_err.kind()) {
                        tracing::debug!(
                            "Client {} disconnected before response could be sent: {}",
                            self.peer_addr, e
                        );
                        return Ok(());
                    }
                }
                tracing::warn!("Error writing to {}: {}", self.peer_addr, e);
                return Err(e);
            }
        }
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }
}

fn is_disconnect(kind: ErrorKind) -> bool {
    matches!(
        kind,
        ErrorKind::UnexpectedEof
            | ErrorKind::ConnectionReset
            | ErrorKind::ConnectionAborted
            | ErrorKind::BrokenPipe
    )
}
