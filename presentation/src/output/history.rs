//! Session history formatting

use colored::Colorize;
use parley_domain::util::preview;
use parley_domain::{Message, Role};

/// Length of the reasoning preview shown under assistant messages.
const REASONING_PREVIEW_CHARS: usize = 80;

/// Formats stored messages for `parley history`
pub struct HistoryFormatter;

impl HistoryFormatter {
    pub fn format(messages: &[Message]) -> String {
        if messages.is_empty() {
            return format!("{}\n", "No messages in this session.".dimmed());
        }

        let mut output = String::new();
        for message in messages {
            output.push_str(&Self::format_message(message));
            output.push('\n');
        }
        output
    }

    fn format_message(message: &Message) -> String {
        let role = match message.role {
            Role::User => "user".green().bold(),
            Role::Assistant => "assistant".yellow().bold(),
            Role::System => "system".blue().bold(),
        };
        let mut out = format!(
            "{} {} {}\n",
            format!("#{}", message.id).dimmed(),
            role,
            message.created_at.format("%Y-%m-%d %H:%M:%S").to_string().dimmed()
        );

        if !message.reasoning_trace.is_empty() {
            out.push_str(&format!(
                "  {} {}\n",
                "reasoning:".dimmed(),
                preview(&message.reasoning_trace, REASONING_PREVIEW_CHARS).dimmed()
            ));
        }
        if let Some(results) = &message.tool_call_results {
            for result in results {
                out.push_str(&format!(
                    "  {} {} ({} results)\n",
                    "tool:".cyan(),
                    result.name,
                    result.result.len()
                ));
            }
        }

        for line in message.content.lines() {
            out.push_str(&format!("  {line}\n"));
        }
        if let Some(summary) = message.summary.as_deref().filter(|s| !s.is_empty()) {
            out.push_str(&format!("  {} {}\n", "[summarized]".magenta(), summary));
        }
        out
    }

    /// JSON array of the messages, as stored.
    pub fn format_json(messages: &[Message]) -> String {
        serde_json::to_string_pretty(messages).unwrap_or_else(|_| "[]".to_string())
    }
}
