//! Event transports

mod sse;

pub use sse::{SseEventSink, encode_frame, event_payload};
