//! Request dispatch
//!
//! Maps a decoded header to the response it gets. This is the only place
//! that knows which api key and version pairs the server implements.

use super::header::RequestHeader;
use super::response::{ApiEntry, CapabilityResponse, ErrorCode, ErrorResponse, ResponseVariant};

/// Api key of the capability-discovery (ApiVersions) request
pub const API_KEY_API_VERSIONS: u16 = 18;

/// Every api this server implements, advertised in capability responses
pub const SUPPORTED_APIS: &[ApiEntry] = &[ApiEntry::new(API_KEY_API_VERSIONS, 0, 4)];

/// Pick the response for a request
///
/// Unknown api keys and unsupported versions are answered with
/// `UnsupportedVersion`; that is a normal protocol outcome, not a failure.
pub fn dispatch(header: RequestHeader) -> ResponseVariant {
    match header.api_key {
        API_KEY_API_VERSIONS if is_supported(header.api_key, header.api_version) => {
            ResponseVariant::Capability(CapabilityResponse::new(SUPPORTED_APIS.to_vec()))
        }
        _ => ResponseVariant::Error(ErrorResponse::new(ErrorCode::UnsupportedVersion)),
    }
}

/// Whether the server implements `api_version` of `api_key`
pub fn is_supported(api_key: u16, api_version: u16) -> bool {
    SUPPORTED_APIS
        .iter()
        .any(|entry| entry.api_key == api_key && entry.supports(api_version))
}
