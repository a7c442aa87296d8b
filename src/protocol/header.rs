//! Request header definitions
//!
//! Decodes the request header that precedes every request body.
//!
//! ## Wire Format (header v2)
//! ```text
//! ┌──────────┬──────────┬───────────────┬────────────────────┬───────────────┐
//! │ Key (2)  │ Ver (2)  │ Corr. ID (4)  │ Client ID (2 + n)  │ Tagged fields │
//! └──────────┴──────────┴───────────────┴────────────────────┴───────────────┘
//! ```
//!
//! - Client ID: i16 length, `-1` for null, then that many UTF-8 bytes
//! - Tagged fields: varuint count, then per field varuint tag, varuint
//!   length and the raw value bytes

use bytes::{Buf, Bytes};

use crate::error::{Result, WireError};
use super::buffer::ByteBuffer;

/// Length value marking a null nullable-string
const NULL_STRING_LEN: i16 = -1;

/// Longest unsigned varint holding a u32
const MAX_VARUINT_BYTES: usize = 5;

/// One entry of a tagged-field trailer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedField {
    pub tag: u32,

    /// Opaque value, preserved but not interpreted
    pub value: Bytes,
}

/// A decoded request header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestHeader {
    pub api_key: u16,
    pub api_version: u16,

    /// Client-chosen token, echoed back unchanged in the response
    pub correlation_id: u32,

    pub client_id: Option<String>,
    pub tagged_fields: Vec<TaggedField>,
}

impl RequestHeader {
    /// Header with no client id and no tagged fields
    pub fn new(api_key: u16, api_version: u16, correlation_id: u32) -> Self {
        Self {
            api_key,
            api_version,
            correlation_id,
            client_id: None,
            tagged_fields: Vec::new(),
        }
    }

    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }
}

// =============================================================================
// Decoding
// =============================================================================

/// Decode a request header from a request body
///
/// The body's own length prefix must already be stripped. Bytes following
/// the header are ignored.
pub fn decode_request_header(body: &[u8]) -> Result<RequestHeader> {
    decode_request_header_prefix(body).map(|(header, _)| header)
}

/// Decode a request header, also returning how many bytes it occupied
pub fn decode_request_header_prefix(body: &[u8]) -> Result<(RequestHeader, usize)> {
    let mut reader = HeaderReader::new(body);

    let api_key = reader.read_u16("api_key")?;
    let api_version = reader.read_u16("api_version")?;
    let correlation_id = reader.read_u32("correlation_id")?;
    let client_id = reader.read_nullable_string("client_id")?;
    let tagged_fields = reader.read_tagged_fields()?;

    let header = RequestHeader {
        api_key,
        api_version,
        correlation_id,
        client_id,
        tagged_fields,
    };
    Ok((header, reader.consumed))
}

/// Cursor over header bytes that checks length before every read
struct HeaderReader<'a> {
    buf: &'a [u8],
    consumed: usize,
}

impl<'a> HeaderReader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf, consumed: 0 }
    }

    fn require(&self, field: &'static str, needed: usize) -> Result<()> {
        if self.buf.remaining() < needed {
            return Err(WireError::TruncatedHeader {
                field,
                needed,
                available: self.buf.remaining(),
            });
        }
        Ok(())
    }

    fn read_u8(&mut self, field: &'static str) -> Result<u8> {
        self.require(field, 1)?;
        self.consumed += 1;
        Ok(self.buf.get_u8())
    }

    fn read_u16(&mut self, field: &'static str) -> Result<u16> {
        self.require(field, 2)?;
        self.consumed += 2;
        Ok(self.buf.get_u16())
    }

    fn read_i16(&mut self, field: &'static str) -> Result<i16> {
        self.require(field, 2)?;
        self.consumed += 2;
        Ok(self.buf.get_i16())
    }

    fn read_u32(&mut self, field: &'static str) -> Result<u32> {
        self.require(field, 4)?;
        self.consumed += 4;
        Ok(self.buf.get_u32())
    }

    fn read_bytes(&mut self, field: &'static str, len: usize) -> Result<&'a [u8]> {
        self.require(field, len)?;
        let buf: &'a [u8] = self.buf;
        let (head, tail) = buf.split_at(len);
        self.buf = tail;
        self.consumed += len;
        Ok(head)
    }

    fn read_varuint(&mut self, field: &'static str) -> Result<u32> {
        let mut value: u32 = 0;
        for i in 0..MAX_VARUINT_BYTES - 1 {
            let byte = self.read_u8(field)?;
            value |= u32::from(byte & 0x7F) << (7 * i);
            if byte & 0x80 == 0 {
                return Ok(value);
            }
        }

        // Last byte may only carry the top 4 bits of a u32, so a set
        // continuation bit is an overflow as well
        let last = self.read_u8(field)?;
        if last > 0x0F {
            return Err(WireError::MalformedHeader(format!(
                "{}: varint overflows u32",
                field
            )));
        }
        Ok(value | u32::from(last) << (7 * (MAX_VARUINT_BYTES - 1)))
    }

    fn read_nullable_string(&mut self, field: &'static str) -> Result<Option<String>> {
        let len = self.read_i16(field)?;
        if len == NULL_STRING_LEN {
            return Ok(None);
        }
        if len < NULL_STRING_LEN {
            return Err(WireError::MalformedHeader(format!(
                "{}: invalid string length {}",
                field, len
            )));
        }

        let raw = self.read_bytes(field, len as usize)?;
        let text = std::str::from_utf8(raw).map_err(|e| {
            WireError::MalformedHeader(format!("{}: not valid UTF-8 ({})", field, e))
        })?;
        Ok(Some(text.to_string()))
    }

    fn read_tagged_fields(&mut self) -> Result<Vec<TaggedField>> {
        let count = self.read_varuint("tagged_fields")?;

        // count comes off the wire; let truncation stop a bogus one
        let mut fields = Vec::new();
        for _ in 0..count {
            let tag = self.read_varuint("tagged_field.tag")?;
            let len = self.read_varuint("tagged_field.len")?;
            let value = self.read_bytes("tagged_field.value", len as usize)?;
            fields.push(TaggedField {
                tag,
                value: Bytes::copy_from_slice(value),
            });
        }
        Ok(fields)
    }
}

// =============================================================================
// Encoding
// =============================================================================

/// Encode a request header in the same layout the decoder reads
///
/// Used by clients of this server (the probe binary, tests, benches).
/// Client ids longer than `i16::MAX` bytes are cut at the last char boundary
/// within that length.
pub fn encode_request_header(header: &RequestHeader) -> Bytes {
    let mut buf = ByteBuffer::new();
    buf.append_u16(header.api_key);
    buf.append_u16(header.api_version);
    buf.append_u32(header.correlation_id);

    match &header.client_id {
        Some(client_id) => {
            let mut end = client_id.len().min(i16::MAX as usize);
            while !client_id.is_char_boundary(end) {
                end -= 1;
            }
            let raw = &client_id.as_bytes()[..end];
            buf.append_u16(raw.len() as u16);
            buf.append_slice(raw);
        }
        None => buf.append_u16(NULL_STRING_LEN as u16),
    }

    buf.append_varuint(header.tagged_fields.len() as u32);
    for field in &header.tagged_fields {
        buf.append_varuint(field.tag);
        buf.append_varuint(field.value.len() as u32);
        buf.append_slice(&field.value);
    }

    buf.freeze()
}
