//! # brokerwire
//!
//! Server-side codec for a subset of a Kafka-style binary broker protocol:
//! - Network-order integer and unsigned varint buffer builder
//! - Field-by-field request header decoding
//! - Capability (ApiVersions) and error response encoding
//! - Length-prefixed response framing
//! - A minimal blocking TCP server around the codec
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      TCP Server                              │
//! │            (one connection at a time, half-duplex)           │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ request body
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                 Request Header Decoder                       │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ RequestHeader
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                      Dispatcher                              │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ ResponseVariant
//!          ┌────────────┴────────────┐
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │ Capability  │          │    Error    │
//!   │  Encoder    │          │   Encoder   │
//!   └──────┬──────┘          └──────┬──────┘
//!          └────────────┬───────────┘
//!                       ▼ payload
//!               ┌─────────────┐
//!               │   Framer    │ ──▶ socket write
//!               └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod network;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{WireError, Result};
pub use config::Config;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of brokerwire
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
