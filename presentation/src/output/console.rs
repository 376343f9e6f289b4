//! Console rendering of turn events

use colored::Colorize;
use parley_application::EventSink;
use parley_domain::TurnEvent;
use std::io::{self, Write};
use std::sync::Mutex;

type Writer = Box<dyn Write + Send>;

struct ConsoleState {
    out: Writer,
    err: Writer,
    /// Whether reasoning text is on the current stderr line
    reasoning_open: bool,
    answer_started: bool,
}

/// [`EventSink`] for interactive use.
///
/// Reasoning is written dimmed to stderr so that stdout carries only the
/// answer and can be piped.
pub struct ConsoleEventSink {
    state: Mutex<ConsoleState>,
    show_reasoning: bool,
}

impl ConsoleEventSink {
    pub fn new(out: Writer, err: Writer) -> Self {
        Self {
            state: Mutex::new(ConsoleState {
                out,
                err,
                reasoning_open: false,
                answer_started: false,
            }),
            show_reasoning: true,
        }
    }

    pub fn stdio() -> Self {
        Self::new(Box::new(io::stdout()), Box::new(io::stderr()))
    }

    pub fn with_reasoning(mut self, show: bool) -> Self {
        self.show_reasoning = show;
        self
    }

    fn render(&self, state: &mut ConsoleState, event: TurnEvent) -> io::Result<()> {
        match event {
            TurnEvent::ReasoningChunk(text) => {
                if self.show_reasoning {
                    write!(state.err, "{}", text.dimmed())?;
                    state.err.flush()?;
                    state.reasoning_open = true;
                }
            }
            TurnEvent::AnswerChunk(text) => {
                close_reasoning(state)?;
                state.answer_started = true;
                write!(state.out, "{text}")?;
                state.out.flush()?;
            }
            TurnEvent::ToolCallResult(result) => {
                close_reasoning(state)?;
                writeln!(
                    state.err,
                    "{} {} ({} results)",
                    "tool:".cyan().bold(),
                    result.name,
                    result.result.len()
                )?;
            }
            TurnEvent::Error(message) => {
                close_reasoning(state)?;
                writeln!(state.err, "{} {}", "Error:".red().bold(), message)?;
            }
            TurnEvent::Terminal => {
                close_reasoning(state)?;
                if state.answer_started {
                    writeln!(state.out)?;
                }
                state.out.flush()?;
                state.err.flush()?;
            }
        }
        Ok(())
    }
}

fn close_reasoning(state: &mut ConsoleState) -> io::Result<()> {
    if state.reasoning_open {
        writeln!(state.err)?;
        state.reasoning_open = false;
    }
    Ok(())
}

impl EventSink for ConsoleEventSink {
    fn send(&self, event: TurnEvent) {
        let Ok(mut state) = self.state.lock() else {
            return;
        };
        // a closed terminal is not worth failing the turn over
        let _ = self.render(&mut state, event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::testing::SharedBuffer;
    use parley_domain::ToolCallResult;

    fn sink() -> (ConsoleEventSink, SharedBuffer, SharedBuffer) {
        colored::control::set_override(false);
        let out = SharedBuffer::default();
        let err = SharedBuffer::default();
        let sink = ConsoleEventSink::new(Box::new(out.clone()), Box::new(err.clone()));
        (sink, out, err)
    }

    #[test]
    fn test_answer_on_stdout_reasoning_on_stderr() {
        let (sink, out, err) = sink();
        sink.send(TurnEvent::ReasoningChunk("thinking".into()));
        sink.send(TurnEvent::AnswerChunk("forty".into()));
        sink.send(TurnEvent::AnswerChunk("-two".into()));
        sink.send(TurnEvent::Terminal);

        assert_eq!(out.text(), "forty-two\n");
        assert_eq!(err.text(), "thinking\n");
    }

    #[test]
    fn test_hidden_reasoning() {
        let (sink, out, err) = sink();
        let sink = sink.with_reasoning(false);
        sink.send(TurnEvent::ReasoningChunk("secret".into()));
        sink.send(TurnEvent::AnswerChunk("ok".into()));
        sink.send(TurnEvent::Terminal);

        assert_eq!(out.text(), "ok\n");
        assert_eq!(err.text(), "");
    }

    #[test]
    fn test_error_goes_to_stderr() {
        let (sink, out, err) = sink();
        sink.send(TurnEvent::Error("agent unreachable".into()));
        sink.send(TurnEvent::Terminal);

        assert_eq!(out.text(), "");
        assert_eq!(err.text(), "Error: agent unreachable\n");
    }

    #[test]
    fn test_tool_result_summary_line() {
        let (sink, _out, err) = sink();
        sink.send(TurnEvent::ToolCallResult(ToolCallResult::new(
            "search",
            vec!["a".into(), "b".into()],
        )));
        assert_eq!(err.text(), "tool: search (2 results)\n");
    }
}
