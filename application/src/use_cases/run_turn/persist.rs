//! Durable write of a concluded turn.
//!
//! Runs on its own spawned task so that dropping the caller's future cannot
//! interrupt it. Every store call races the persistence token only. The
//! summary task is registered here, after both rows exist.

use crate::ports::message_store::{MessageStore, MessageUpdate, StorageError};
use crate::ports::summary_dispatch::SummaryTaskDispatcher;
use parley_domain::{MessageId, NewMessage, SummaryTask, TurnTranscript};
use std::future::Future;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Row ids written for one turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct SavedTurn {
    pub user: MessageId,
    pub assistant: Option<MessageId>,
}

pub(super) struct PersistJob {
    pub store: Arc<dyn MessageStore>,
    pub dispatcher: Arc<dyn SummaryTaskDispatcher>,
    pub token: CancellationToken,
    pub transcript: TurnTranscript,
}

impl PersistJob {
    pub async fn run(self) -> Result<SavedTurn, StorageError> {
        let dispatcher = self.dispatcher.clone();
        let saved = self.save().await?;
        dispatcher.register(SummaryTask::for_turn(saved.user, saved.assistant));
        Ok(saved)
    }

    async fn save(self) -> Result<SavedTurn, StorageError> {
        let PersistJob {
            store,
            token,
            transcript,
            ..
        } = self;
        let session = transcript.session_id.clone();

        let user = guarded(
            &token,
            store.create_message(NewMessage::user(session.clone(), transcript.query.clone())),
        )
        .await?;
        debug!(session_id = %session, message_id = %user, "User message saved");

        if !transcript.has_answer() {
            return Ok(SavedTurn {
                user,
                assistant: None,
            });
        }

        let assistant = guarded(
            &token,
            store.create_message(NewMessage::assistant(
                session.clone(),
                transcript.answer.clone(),
            )),
        )
        .await?;
        debug!(session_id = %session, message_id = %assistant, "Assistant message saved");

        let mut updates = Vec::new();
        if !transcript.reasoning_trace.is_empty() {
            updates.push(MessageUpdate::ReasoningTrace(transcript.reasoning_trace));
        }
        if !transcript.tool_call_results.is_empty() {
            updates.push(MessageUpdate::ToolCallResults(transcript.tool_call_results));
        }
        for update in updates {
            let field = update.field();
            if let Err(e) = guarded(&token, store.update_message(assistant, update)).await {
                warn!(
                    session_id = %session,
                    message_id = %assistant,
                    field,
                    error = %e,
                    "Failed to save turn field"
                );
            }
        }

        Ok(SavedTurn {
            user,
            assistant: Some(assistant),
        })
    }
}

async fn guarded<T>(
    token: &CancellationToken,
    op: impl Future<Output = Result<T, StorageError>>,
) -> Result<T, StorageError> {
    tokio::select! {
        biased;
        _ = token.cancelled() => Err(StorageError::Aborted),
        result = op => result,
    }
}
