//! Prompt template for message summarization

use crate::message::entities::Role;

/// Templates for summarization prompts
pub struct SummaryPromptTemplate;

impl SummaryPromptTemplate {
    pub fn render(role: Role, content: &str) -> String {
        let speaker = match role {
            Role::User => "the user",
            Role::Assistant => "the assistant",
            Role::System => "the system",
        };
        format!(
            r#"Summarize the following message written by {speaker} in a conversation.

Keep every fact, number, measurement, and recommendation that later turns may refer to.
Drop greetings, repetition, and formatting. Write in the same language as the message.
Reply with the summary only.

Message ({role}):
{content}"#
        )
    }
}
