//! Prompt templates for the conversational agent

/// Templates for generating agent prompts
pub struct AgentPromptTemplate;

impl AgentPromptTemplate {
    /// System prompt instructing the agent to think first and then introduce
    /// its final answer with `marker`.
    pub fn system(marker: &str) -> String {
        format!(
            r#"You are a careful health assistant holding a conversation with a user.

## How to Respond

1. Think through the question step by step. Write your reasoning as plain text.
   You may mention which information you would look up and why.
2. When you are ready to answer, write the marker `{marker}` followed by your final answer.

## Rules

- Write the marker `{marker}` exactly once, and only in front of the final answer.
- Everything after the marker is shown to the user as the answer.
- Keep the final answer concise and grounded in the conversation so far.
- If you are unsure, say so in the final answer instead of guessing."#
        )
    }

    /// User prompt wrapping the raw query.
    pub fn query(query: &str) -> String {
        query.trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_prompt_names_marker() {
        let prompt = AgentPromptTemplate::system("AI:");
        assert!(prompt.contains("`AI:`"));
        assert!(prompt.contains("exactly once"));
    }

    #[test]
    fn test_query_is_trimmed() {
        assert_eq!(AgentPromptTemplate::query("  hi \n"), "hi");
    }
}
