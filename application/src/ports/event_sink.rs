//! Event sink port
//!
//! The transport that carries [`TurnEvent`]s to the caller.

use parley_domain::TurnEvent;

/// Delivers turn events to the caller.
///
/// `send` is called from inside the agent's token callback, so it must not
/// block. Delivery failures (e.g. a closed connection) are the sink's own
/// concern and are not reported back; it is safe to keep calling `send`
/// after the caller has gone.
pub trait EventSink: Send + Sync {
    fn send(&self, event: TurnEvent);
}

/// Discards every event.
pub struct NoEventSink;

impl EventSink for NoEventSink {
    fn send(&self, _event: TurnEvent) {}
}
