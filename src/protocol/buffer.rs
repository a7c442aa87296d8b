//! Byte buffer builder
//!
//! Append-only accumulator for network-order integers and unsigned varints.

use std::fmt::Write as _;

use bytes::{BufMut, Bytes, BytesMut};

/// Write-only builder for outbound protocol bytes
///
/// Each request owns its own buffer. Snapshots are copies, so appending after
/// a snapshot never changes bytes that were already handed out.
#[derive(Debug, Default, Clone)]
pub struct ByteBuffer {
    inner: BytesMut,
}

impl ByteBuffer {
    /// Create an empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty buffer with room for `capacity` bytes
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: BytesMut::with_capacity(capacity),
        }
    }

    pub fn append_u8(&mut self, value: u8) {
        self.inner.put_u8(value);
    }

    /// Append 2 bytes, big-endian
    pub fn append_u16(&mut self, value: u16) {
        self.inner.put_u16(value);
    }

    /// Append 4 bytes, big-endian
    pub fn append_u32(&mut self, value: u32) {
        self.inner.put_u32(value);
    }

    /// Append an unsigned LEB128 varint
    ///
    /// Low 7 bits first, continuation bit on every byte but the last.
    /// Zero encodes as a single `0x00`.
    pub fn append_varuint(&mut self, value: u32) {
        let mut remaining = value;
        loop {
            let mut byte = (remaining & 0x7F) as u8;
            remaining >>= 7;
            if remaining != 0 {
                byte |= 0x80;
            }
            self.inner.put_u8(byte);
            if remaining == 0 {
                break;
            }
        }
    }

    /// Append a compact array length (`count + 1` as a varint)
    ///
    /// Zero is reserved for a null array, which this server never sends.
    pub fn append_compact_array_len(&mut self, count: usize) {
        self.append_varuint((count + 1) as u32);
    }

    /// Append raw bytes as-is
    pub fn append_slice(&mut self, bytes: &[u8]) {
        self.inner.put_slice(bytes);
    }

    /// Copy out the bytes accumulated so far
    pub fn snapshot(&self) -> Bytes {
        Bytes::copy_from_slice(&self.inner)
    }

    /// Consume the buffer without copying
    pub fn freeze(self) -> Bytes {
        self.inner.freeze()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Render the contents as space-separated hex bytes
    pub fn to_hex(&self) -> String {
        to_hex(&self.inner)
    }
}

/// Render bytes as space-separated lowercase hex, e.g. `00 12 ff`
pub fn to_hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 3);
    for (i, byte) in bytes.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let _ = write!(out, "{:02x}", byte);
    }
    out
}
