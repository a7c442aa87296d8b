//! Response definitions
//!
//! The closed set of responses this server produces and their encoders.

use bytes::Bytes;

use super::buffer::ByteBuffer;
use super::header::TaggedField;

/// Protocol error codes this server emits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum ErrorCode {
    None = 0,
    UnsupportedVersion = 35,
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> u16 {
        code as u16
    }
}

/// One supported api key and its version range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApiEntry {
    pub api_key: u16,
    pub min_version: u16,
    pub max_version: u16,
}

impl ApiEntry {
    pub const fn new(api_key: u16, min_version: u16, max_version: u16) -> Self {
        Self {
            api_key,
            min_version,
            max_version,
        }
    }

    /// Whether `version` falls inside this entry's range
    pub fn supports(&self, version: u16) -> bool {
        (self.min_version..=self.max_version).contains(&version)
    }
}

/// Successful capability-discovery (ApiVersions) response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilityResponse {
    /// Always `ErrorCode::None` when this variant is chosen
    pub error_code: u16,
    pub supported_apis: Vec<ApiEntry>,
    pub throttle_time_ms: u32,

    /// Response-level tagged fields; empty for every response this server builds
    pub tagged_fields: Vec<TaggedField>,
}

impl CapabilityResponse {
    pub fn new(supported_apis: Vec<ApiEntry>) -> Self {
        Self {
            error_code: ErrorCode::None.into(),
            supported_apis,
            throttle_time_ms: 0,
            tagged_fields: Vec::new(),
        }
    }

    /// Encode the response payload
    ///
    /// Format: error_code (2) + compact array of entries + throttle (4) + tags.
    /// Entries never carry tagged fields.
    pub fn encode(&self) -> Bytes {
        // 2 + 1 + 7 per entry + 4 + 1 when no tagged fields
        let mut buf = ByteBuffer::with_capacity(8 + 7 * self.supported_apis.len());
        buf.append_u16(self.error_code);
        buf.append_compact_array_len(self.supported_apis.len());
        for entry in &self.supported_apis {
            buf.append_u16(entry.api_key);
            buf.append_u16(entry.min_version);
            buf.append_u16(entry.max_version);
            // per-entry tagged fields (none)
            buf.append_varuint(0);
        }
        buf.append_u32(self.throttle_time_ms);
        buf.append_varuint(self.tagged_fields.len() as u32);
        for field in &self.tagged_fields {
            buf.append_varuint(field.tag);
            buf.append_varuint(field.value.len() as u32);
            buf.append_slice(&field.value);
        }
        buf.freeze()
    }
}

/// Error-only response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorResponse {
    /// Never `ErrorCode::None`
    pub error_code: u16,
}

impl ErrorResponse {
    pub fn new(code: ErrorCode) -> Self {
        Self {
            error_code: code.into(),
        }
    }

    /// Encode the response payload: error_code (2)
    pub fn encode(&self) -> Bytes {
        let mut buf = ByteBuffer::with_capacity(2);
        buf.append_u16(self.error_code);
        buf.freeze()
    }
}

/// Exactly one of these is produced per request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseVariant {
    Capability(CapabilityResponse),
    Error(ErrorResponse),
}

impl ResponseVariant {
    /// Encode the variant's payload (without framing)
    pub fn encode(&self) -> Bytes {
        match self {
            ResponseVariant::Capability(response) => response.encode(),
            ResponseVariant::Error(response) => response.encode(),
        }
    }

    /// The error code the response carries
    pub fn error_code(&self) -> u16 {
        match self {
            ResponseVariant::Capability(response) => response.error_code,
            ResponseVariant::Error(response) => response.error_code,
        }
    }

    /// Short name for logging
    pub fn kind(&self) -> &'static str {
        match self {
            ResponseVariant::Capability(_) => "capability",
            ResponseVariant::Error(_) => "error",
        }
    }
}
