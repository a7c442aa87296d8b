//! Network Module
//!
//! TCP server and client handling.
//!
//! ## Architecture
//! - Single acceptor loop
//! - One connection served at a time, half-duplex request/response
//! - Requests routed through `protocol::handle_request`

mod server;
mod connection;

pub use server::{Server, ShutdownHandle};
pub use connection::Connection;
