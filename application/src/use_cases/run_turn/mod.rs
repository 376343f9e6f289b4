//! Run Turn use case.
//!
//! Drives one conversational turn: the query goes to the agent, the agent's
//! raw output is split live into reasoning and answer events, and the turn
//! is persisted even if the caller goes away mid-stream.
//!
//! # Flow
//!
//! 1. Load the session's conversation memory (work scope)
//! 2. Call the agent, feeding every chunk through the turn's demultiplexer
//!    and forwarding the resulting events (work scope, bounded by a timeout)
//! 3. Resolve the outcome:
//!    - completed or cancellation: keep what was streamed
//!    - parse failure: keep the streamed answer, or the raw output if no
//!      answer was streamed
//!    - anything else: fail the turn, persist nothing
//! 4. Persist the user row, then the assistant row if there is answer text,
//!    then the reasoning trace and tool results (persistence scope, spawned)
//! 5. Register one [`SummaryTask`] for the saved rows
//! 6. Emit `Error` (fatal paths only) and then exactly one `Terminal`

mod persist;
mod types;

pub use types::{FailureKind, RunTurnError, RunTurnInput, RunTurnOutput, TurnScopes};

use crate::config::TurnParams;
use crate::ports::agent::{AgentError, AgentPort, AgentRequest, TokenSink};
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::event_sink::EventSink;
use crate::ports::message_store::MessageStore;
use crate::ports::summary_dispatch::{NoSummaryDispatch, SummaryTaskDispatcher};
use parley_domain::util::preview;
use parley_domain::{ConversationMemory, ToolCallResult, Turn, TurnEvent, TurnOutcome};
use persist::PersistJob;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// How the agent call ended.
enum AgentCall {
    Finished(Result<String, AgentError>),
    /// The work scope was cancelled first.
    Cancelled,
}

/// Token sink that feeds the turn and forwards what it releases.
struct TurnStream<'a> {
    turn: &'a mut Turn,
    events: &'a dyn EventSink,
}

impl TokenSink for TurnStream<'_> {
    fn on_token(&mut self, chunk: &str) {
        for event in self.turn.push_chunk(chunk) {
            self.events.send(event);
        }
    }

    fn on_tool_result(&mut self, result: ToolCallResult) {
        if let Some(event) = self.turn.record_tool_result(result) {
            self.events.send(event);
        }
    }
}

/// Use case for running one conversational turn.
pub struct RunTurnUseCase {
    agent: Arc<dyn AgentPort>,
    store: Arc<dyn MessageStore>,
    dispatcher: Arc<dyn SummaryTaskDispatcher>,
    conversation_logger: Arc<dyn ConversationLogger>,
    params: TurnParams,
}

impl Clone for RunTurnUseCase {
    fn clone(&self) -> Self {
        Self {
            agent: self.agent.clone(),
            store: self.store.clone(),
            dispatcher: self.dispatcher.clone(),
            conversation_logger: self.conversation_logger.clone(),
            params: self.params.clone(),
        }
    }
}

impl RunTurnUseCase {
    pub fn new(agent: Arc<dyn AgentPort>, store: Arc<dyn MessageStore>) -> Self {
        Self {
            agent,
            store,
            dispatcher: Arc::new(NoSummaryDispatch),
            conversation_logger: Arc::new(NoConversationLogger),
            params: TurnParams::default(),
        }
    }

    /// Set the summary task dispatcher.
    pub fn with_dispatcher(mut self, dispatcher: Arc<dyn SummaryTaskDispatcher>) -> Self {
        self.dispatcher = dispatcher;
        self
    }

    /// Create with a conversation logger.
    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    pub fn with_params(mut self, params: TurnParams) -> Self {
        self.params = params;
        self
    }

    /// Run the turn, forwarding events to `events`.
    ///
    /// `events` receives exactly one [`TurnEvent::Terminal`] as the last
    /// event, whatever the result.
    pub async fn execute(
        &self,
        input: RunTurnInput,
        scopes: &TurnScopes,
        events: &dyn EventSink,
    ) -> Result<RunTurnOutput, RunTurnError> {
        let session_id = input.session_id.clone();
        let result = self.run(input, scopes, events).await;
        if let Err(e) = &result {
            let kind = e.failure_kind().as_str();
            error!(session_id = %session_id, kind, error = %e, "Turn failed");
            self.conversation_logger.log(ConversationEvent::TurnFailed {
                session_id,
                kind,
                error: e.to_string(),
            });
            events.send(TurnEvent::Error(e.to_string()));
        }
        events.send(TurnEvent::Terminal);
        result
    }

    async fn run(
        &self,
        input: RunTurnInput,
        scopes: &TurnScopes,
        events: &dyn EventSink,
    ) -> Result<RunTurnOutput, RunTurnError> {
        let demux = self.params.demultiplexer()?;
        let mut turn = Turn::new(input.session_id, input.query, demux)?;
        info!(
            session_id = %turn.session_id(),
            "Starting turn: {}",
            preview(turn.query(), 100)
        );

        let call = self.call_agent(&mut turn, &scopes.work, events).await?;
        let outcome = resolve(&mut turn, call, events)?;

        let transcript = turn.conclude(outcome);
        let session_id = transcript.session_id.clone();
        let answer = transcript.answer.clone();
        let reasoning_bytes = transcript.reasoning_trace.len();

        let job = PersistJob {
            store: self.store.clone(),
            dispatcher: self.dispatcher.clone(),
            token: scopes.persist.clone(),
            transcript,
        };
        let saved = tokio::spawn(job.run())
            .await
            .map_err(|e| RunTurnError::PersistTask(e.to_string()))?
            .map_err(RunTurnError::Persist)?;

        self.conversation_logger.log(ConversationEvent::TurnCompleted {
            session_id: session_id.clone(),
            outcome,
            user_message_id: saved.user,
            assistant_message_id: saved.assistant,
            answer_bytes: answer.len(),
            reasoning_bytes,
        });
        info!(
            session_id = %session_id,
            outcome = outcome.as_str(),
            answer_bytes = answer.len(),
            "Turn finished"
        );

        Ok(RunTurnOutput {
            outcome,
            user_message_id: saved.user,
            assistant_message_id: saved.assistant,
            answer,
        })
    }

    /// Load memory and run the agent, both inside the work scope.
    async fn call_agent(
        &self,
        turn: &mut Turn,
        work: &CancellationToken,
        events: &dyn EventSink,
    ) -> Result<AgentCall, RunTurnError> {
        let session_id = turn.session_id().clone();
        let query = turn.query().to_string();
        let mut stream = TurnStream { turn, events };

        let call = async {
            let history = self
                .store
                .session_messages(&session_id, self.params.history_limit)
                .await
                .map_err(RunTurnError::MemoryUnavailable)?;
            let request = AgentRequest {
                session_id: session_id.clone(),
                query,
                memory: ConversationMemory::from_messages(&history),
                answer_marker: self.params.answer_marker.clone(),
            };
            debug!(
                session_id = %session_id,
                memory = request.memory.len(),
                "Calling agent"
            );

            let result = tokio::time::timeout(
                self.params.agent_timeout,
                self.agent.run(&request, &mut stream),
            )
            .await
            .unwrap_or(Err(AgentError::Timeout));
            Ok::<_, RunTurnError>(result)
        };

        tokio::select! {
            biased;
            _ = work.cancelled() => Ok(AgentCall::Cancelled),
            result = call => result.map(AgentCall::Finished),
        }
    }
}

/// Decide what survives the agent call.
fn resolve(
    turn: &mut Turn,
    call: AgentCall,
    events: &dyn EventSink,
) -> Result<TurnOutcome, RunTurnError> {
    match call {
        AgentCall::Cancelled | AgentCall::Finished(Err(AgentError::Cancelled)) => {
            turn.cancel();
            warn!(
                session_id = %turn.session_id(),
                answer_bytes = turn.answer().len(),
                "Turn cancelled, keeping streamed output"
            );
            Ok(TurnOutcome::Cancelled)
        }
        AgentCall::Finished(Ok(output)) => {
            if let Some(event) = turn.finish() {
                events.send(event);
            }
            if let Some(event) = turn.adopt_answer(&output) {
                events.send(event);
            }
            Ok(TurnOutcome::Completed)
        }
        AgentCall::Finished(Err(AgentError::UnableToParseOutput { partial })) => {
            if let Some(event) = turn.finish() {
                events.send(event);
            }
            // no marker streamed: the raw output becomes the answer
            if let Some(event) = turn.adopt_answer(&partial) {
                events.send(event);
            }
            warn!(
                session_id = %turn.session_id(),
                output_bytes = partial.len(),
                answer_bytes = turn.answer().len(),
                "Unable to parse agent output, keeping it as the answer"
            );
            Ok(TurnOutcome::ParseFailure)
        }
        AgentCall::Finished(Err(e)) => Err(RunTurnError::Agent(e)),
    }
}
