//! Protocol codec
//!
//! Framing, the request pipeline, and stream I/O helpers.
//!
//! ## Wire Format
//!
//! ### Request Frame
//! ```text
//! ┌──────────┬─────────────────────────────────────────┐
//! │ Len (4)  │ Request header + request body           │
//! └──────────┴─────────────────────────────────────────┘
//! ```
//!
//! ### Response Frame
//! ```text
//! ┌──────────┬───────────────┬─────────────────────────┐
//! │ Len (4)  │ Corr. ID (4)  │        Payload          │
//! └──────────┴───────────────┴─────────────────────────┘
//! ```
//!
//! `Len` counts every byte after itself, never itself.

use std::io::{ErrorKind, Read, Write};

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{Result, WireError};
use super::dispatch::dispatch;
use super::header::decode_request_header;
use super::observer::Observer;

/// Size of the length prefix on every frame
pub const LENGTH_PREFIX_SIZE: usize = 4;

/// Length prefix + correlation id on a response frame
pub const RESPONSE_HEADER_SIZE: usize = 8;

// =============================================================================
// Framing
// =============================================================================

/// Frame a response payload for transmission
///
/// Format: length (4) + correlation_id (4) + payload
pub fn frame(correlation_id: u32, payload: &[u8]) -> Bytes {
    let mut message = BytesMut::with_capacity(RESPONSE_HEADER_SIZE + payload.len());
    message.put_u32((4 + payload.len()) as u32);
    message.put_u32(correlation_id);
    message.put_slice(payload);
    message.freeze()
}

// =============================================================================
// Request Pipeline
// =============================================================================

/// Turn one request body into one framed response
///
/// Decode failures are returned as-is and no frame is produced; the
/// caller is expected to drop the connection.
pub fn handle_request(body: &[u8], observer: &dyn Observer) -> Result<Bytes> {
    let header = decode_request_header(body)?;
    observer.request_decoded(&header);

    let correlation_id = header.correlation_id;
    let (api_key, api_version) = (header.api_key, header.api_version);

    let response = dispatch(header);
    observer.response_selected(api_key, api_version, &response);

    let framed = frame(correlation_id, &response.encode());
    observer.frame_encoded(correlation_id, &framed);

    Ok(framed)
}

// =============================================================================
// Stream-based I/O helpers
// =============================================================================

/// Read one request body from a stream
///
/// Blocks until the full frame is received. Returns the body with the
/// length prefix stripped.
pub fn read_frame<R: Read>(reader: &mut R, max_frame_size: u32) -> Result<Vec<u8>> {
    let mut prefix = [0u8; LENGTH_PREFIX_SIZE];
    reader.read_exact(&mut prefix)?;

    let size = u32::from_be_bytes(prefix);
    if size == 0 || size > max_frame_size {
        return Err(WireError::InvalidFrameSize {
            size,
            max: max_frame_size,
        });
    }

    let mut body = vec![0u8; size as usize];
    reader.read_exact(&mut body)?;
    Ok(body)
}

/// Write one framed response to a stream
///
/// The frame goes out in a single write. A short write is reported as
/// `TransportWriteIncomplete` and is not retried; a write interrupted
/// before any byte was accepted is reissued.
pub fn write_frame<W: Write>(writer: &mut W, frame: &[u8]) -> Result<()> {
    let written = loop {
        match writer.write(frame) {
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            result => break result?,
        }
    };
    if written != frame.len() {
        return Err(WireError::TransportWriteIncomplete {
            expected: frame.len(),
            written,
        });
    }
    writer.flush()?;
    Ok(())
}
