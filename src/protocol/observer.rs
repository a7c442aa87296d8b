//! Request observers
//!
//! Hooks the request pipeline calls as it goes. The codec never logs on its
//! own; callers pass an observer in.

use super::buffer::to_hex;
use super::header::RequestHeader;
use super::response::ResponseVariant;

/// Receives notifications from `handle_request`
///
/// All methods default to doing nothing.
pub trait Observer {
    /// A request header was decoded
    fn request_decoded(&self, _header: &RequestHeader) {}

    /// The dispatcher picked a response
    fn response_selected(&self, _api_key: u16, _api_version: u16, _response: &ResponseVariant) {}

    /// A response frame is ready to be written
    fn frame_encoded(&self, _correlation_id: u32, _frame: &[u8]) {}
}

/// Observer that ignores everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl Observer for NoopObserver {}

/// Observer that forwards events to `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl Observer for TracingObserver {
    fn request_decoded(&self, header: &RequestHeader) {
        tracing::debug!(
            api_key = header.api_key,
            api_version = header.api_version,
            correlation_id = header.correlation_id,
            client_id = header.client_id.as_deref().unwrap_or("None"),
            tagged_fields = header.tagged_fields.len(),
            "Decoded request header"
        );
    }

    fn response_selected(&self, api_key: u16, api_version: u16, response: &ResponseVariant) {
        tracing::debug!(
            api_key,
            api_version,
            response = response.kind(),
            error_code = response.error_code(),
            "Selected response"
        );
    }

    fn frame_encoded(&self, correlation_id: u32, frame: &[u8]) {
        tracing::trace!(
            correlation_id,
            len = frame.len(),
            "Encoded frame: {}",
            to_hex(frame)
        );
    }
}
