//! JSON-lines rendering of turn events

use parley_application::EventSink;
use parley_domain::TurnEvent;
use serde_json::{Value, json};
use std::io::{self, Write};
use std::sync::Mutex;

/// JSON object for one event: `{"event": kind, "data": payload}`.
pub fn event_to_json(event: &TurnEvent) -> Value {
    let data = match event {
        TurnEvent::ReasoningChunk(text) | TurnEvent::AnswerChunk(text) | TurnEvent::Error(text) => {
            Value::String(text.clone())
        }
        TurnEvent::ToolCallResult(result) => json!({
            "name": result.name,
            "result": result.result,
        }),
        TurnEvent::Terminal => Value::Null,
    };
    json!({ "event": event.kind(), "data": data })
}

/// [`EventSink`] writing one JSON object per line.
pub struct JsonLinesEventSink {
    writer: Mutex<Box<dyn Write + Send>>,
}

impl JsonLinesEventSink {
    pub fn new(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    pub fn stdout() -> Self {
        Self::new(Box::new(io::stdout()))
    }
}

impl EventSink for JsonLinesEventSink {
    fn send(&self, event: TurnEvent) {
        let line = event_to_json(&event).to_string();
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{line}").and_then(|()| writer.flush());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::testing::SharedBuffer;
    use parley_domain::ToolCallResult;

    #[test]
    fn test_chunk_event_json() {
        let value = event_to_json(&TurnEvent::AnswerChunk("hi".into()));
        assert_eq!(value, json!({"event": "answer_chunk", "data": "hi"}));
    }

    #[test]
    fn test_terminal_event_json() {
        assert_eq!(
            event_to_json(&TurnEvent::Terminal),
            json!({"event": "terminal", "data": null})
        );
    }

    #[test]
    fn test_tool_result_event_json() {
        let value = event_to_json(&TurnEvent::ToolCallResult(ToolCallResult::new(
            "lookup",
            vec!["x".into()],
        )));
        assert_eq!(value["data"]["name"], "lookup");
        assert_eq!(value["data"]["result"][0], "x");
    }

    #[test]
    fn test_sink_writes_one_line_per_event() {
        let buffer = SharedBuffer::default();
        let sink = JsonLinesEventSink::new(Box::new(buffer.clone()));
        sink.send(TurnEvent::ReasoningChunk("a\nb".into()));
        sink.send(TurnEvent::Terminal);

        let text = buffer.text();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        let first: Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["data"], "a\nb");
    }
}
