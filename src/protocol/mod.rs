//! Protocol Module
//!
//! Server side of a Kafka-style length-prefixed binary protocol. Only
//! capability discovery (ApiVersions, api key 18, versions 0-4) is
//! implemented; every other request gets an `UNSUPPORTED_VERSION` error.
//!
//! ## Request Frame
//! ```text
//! ┌──────────┬─────────┬─────────┬──────────────┬───────────┬──────────┐
//! │ Len (4)  │ Key (2) │ Ver (2) │ Corr. ID (4) │ Client ID │ Tags     │
//! └──────────┴─────────┴─────────┴──────────────┴───────────┴──────────┘
//! ```
//!
//! ## Response Frame
//! ```text
//! ┌──────────┬──────────────┬──────────────────────────────────┐
//! │ Len (4)  │ Corr. ID (4) │ Payload                          │
//! └──────────┴──────────────┴──────────────────────────────────┘
//! ```
//!
//! ### Payloads
//! - Capability: error_code (2) + compact array of
//!   [api_key (2), min (2), max (2), tags] + throttle_time_ms (4) + tags
//! - Error: error_code (2)
//!
//! ### Error Codes
//! - 0: NONE
//! - 35: UNSUPPORTED_VERSION

mod buffer;
mod header;
mod response;
mod dispatch;
mod observer;
mod codec;

pub use buffer::{ByteBuffer, to_hex};
pub use header::{
    RequestHeader, TaggedField,
    decode_request_header, decode_request_header_prefix, encode_request_header,
};
pub use response::{ApiEntry, CapabilityResponse, ErrorCode, ErrorResponse, ResponseVariant};
pub use dispatch::{dispatch, is_supported, API_KEY_API_VERSIONS, SUPPORTED_APIS};
pub use observer::{NoopObserver, Observer, TracingObserver};
pub use codec::{
    frame, handle_request, read_frame, write_frame,
    LENGTH_PREFIX_SIZE, RESPONSE_HEADER_SIZE,
};
