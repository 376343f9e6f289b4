//! Server-Sent Events encoding of turn events.

use parley_application::EventSink;
use parley_domain::TurnEvent;
use std::io::Write;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::debug;

/// Text payload of an event as it goes on the wire.
pub fn event_payload(event: &TurnEvent) -> String {
    match event {
        TurnEvent::ReasoningChunk(text) | TurnEvent::AnswerChunk(text) | TurnEvent::Error(text) => {
            text.clone()
        }
        TurnEvent::ToolCallResult(result) => {
            serde_json::to_string(result).unwrap_or_else(|_| String::from("{}"))
        }
        TurnEvent::Terminal => String::new(),
    }
}

/// Encode one event as an SSE frame: one `data:` line per payload line.
pub fn encode_frame(event: &TurnEvent) -> String {
    let payload = event_payload(event);
    let mut frame = format!("event: {}\n", event.kind());
    for line in payload.split('\n') {
        frame.push_str("data: ");
        frame.push_str(line);
        frame.push('\n');
    }
    frame.push('\n');
    frame
}

/// [`EventSink`] writing SSE frames to any byte stream.
///
/// The first write failure marks the caller as gone; later events are
/// dropped silently.
pub struct SseEventSink {
    writer: Mutex<Box<dyn Write + Send>>,
    closed: AtomicBool,
}

impl SseEventSink {
    pub fn new(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer: Mutex::new(writer),
            closed: AtomicBool::new(false),
        }
    }

    pub fn stdout() -> Self {
        Self::new(Box::new(std::io::stdout()))
    }

    /// Whether a write has failed.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}

impl EventSink for SseEventSink {
    fn send(&self, event: TurnEvent) {
        if self.is_closed() {
            return;
        }
        let frame = encode_frame(&event);
        let Ok(mut writer) = self.writer.lock() else {
            self.closed.store(true, Ordering::Release);
            return;
        };
        let result = writer
            .write_all(frame.as_bytes())
            .and_then(|()| writer.flush());
        if let Err(e) = result {
            debug!("Event stream closed by caller: {}", e);
            self.closed.store(true, Ordering::Release);
        }
    }
}
