//! Hand-written port doubles shared by use case and scheduler tests.

use crate::ports::agent::{AgentError, AgentPort, AgentRequest, TokenSink};
use crate::ports::event_sink::EventSink;
use crate::ports::message_store::{MessageStore, MessageUpdate, StorageError};
use crate::ports::session_store::SessionStore;
use crate::ports::summary_dispatch::SummaryTaskDispatcher;
use crate::ports::summary_model::{SummaryModel, SummaryModelError};
use async_trait::async_trait;
use chrono::Utc;
use parley_domain::{
    Message, MessageId, NewMessage, Role, Session, SessionId, SessionTitle, SummaryTask,
    SummaryUpdate, ToolCallResult, TurnEvent,
};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

// ==================== Message store ====================

#[derive(Default)]
pub struct InMemoryMessageStore {
    rows: Mutex<Vec<Message>>,
    sessions: Mutex<Vec<Session>>,
    pub fail_history: AtomicBool,
    pub fail_create: AtomicBool,
    pub fail_updates: AtomicBool,
    pub fail_apply: AtomicBool,
    pub create_delay: Option<Duration>,
    pub apply_calls: AtomicUsize,
}

impl InMemoryMessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_create_delay(mut self, delay: Duration) -> Self {
        self.create_delay = Some(delay);
        self
    }

    /// Insert a row directly, bypassing the port.
    pub fn seed(&self, session: &str, role: Role, content: &str, summary: Option<&str>) -> MessageId {
        let mut rows = self.rows.lock().unwrap();
        let id = MessageId::new(rows.len() as i64 + 1);
        rows.push(Message {
            id,
            session_id: SessionId::new(session).unwrap(),
            role,
            content: content.to_string(),
            reasoning_trace: String::new(),
            tool_call_results: None,
            summary: summary.map(str::to_string),
            created_at: Utc::now(),
        });
        id
    }

    pub fn rows(&self) -> Vec<Message> {
        self.rows.lock().unwrap().clone()
    }

    pub fn row(&self, id: MessageId) -> Option<Message> {
        self.rows.lock().unwrap().iter().find(|m| m.id == id).cloned()
    }
}

#[async_trait]
impl MessageStore for InMemoryMessageStore {
    async fn create_message(&self, message: NewMessage) -> Result<MessageId, StorageError> {
        if let Some(delay) = self.create_delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(StorageError::Backend("insert failed".to_string()));
        }
        let mut rows = self.rows.lock().unwrap();
        let id = MessageId::new(rows.len() as i64 + 1);
        rows.push(Message {
            id,
            session_id: message.session_id,
            role: message.role,
            content: message.content,
            reasoning_trace: String::new(),
            tool_call_results: None,
            summary: None,
            created_at: Utc::now(),
        });
        Ok(id)
    }

    async fn update_message(
        &self,
        id: MessageId,
        update: MessageUpdate,
    ) -> Result<(), StorageError> {
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(StorageError::Backend("update failed".to_string()));
        }
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or(StorageError::NotFound(id))?;
        match update {
            MessageUpdate::ReasoningTrace(trace) => row.reasoning_trace = trace,
            MessageUpdate::ToolCallResults(results) => row.tool_call_results = Some(results),
        }
        Ok(())
    }

    async fn get_message(&self, id: MessageId) -> Result<Message, StorageError> {
        self.row(id).ok_or(StorageError::NotFound(id))
    }

    async fn session_messages(
        &self,
        session_id: &SessionId,
        limit: usize,
    ) -> Result<Vec<Message>, StorageError> {
        if self.fail_history.load(Ordering::SeqCst) {
            return Err(StorageError::Backend("history unavailable".to_string()));
        }
        let rows = self.rows.lock().unwrap();
        let matching: Vec<_> = rows.iter().filter(|m| &m.session_id == session_id).cloned().collect();
        let skip = matching.len().saturating_sub(limit);
        Ok(matching.into_iter().skip(skip).collect())
    }

    async fn apply_summaries(&self, updates: &[SummaryUpdate]) -> Result<usize, StorageError> {
        self.apply_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_apply.load(Ordering::SeqCst) {
            return Err(StorageError::Backend("batch update failed".to_string()));
        }
        let mut rows = self.rows.lock().unwrap();
        let mut written = 0;
        for update in updates {
            if let Some(row) = rows.iter_mut().find(|m| m.id == update.message_id)
                && row.summary.is_none()
            {
                row.summary = Some(update.summary.clone());
                written += 1;
            }
        }
        Ok(written)
    }
}

#[async_trait]
impl SessionStore for InMemoryMessageStore {
    async fn create_session(
        &self,
        id: &SessionId,
        title: &SessionTitle,
    ) -> Result<Session, StorageError> {
        let mut sessions = self.sessions.lock().unwrap();
        if let Some(existing) = sessions.iter().find(|s| &s.id == id) {
            return Ok(existing.clone());
        }
        let session = Session {
            id: id.clone(),
            title: title.clone(),
            created_at: Utc::now(),
        };
        sessions.push(session.clone());
        Ok(session)
    }

    async fn get_session(&self, id: &SessionId) -> Result<Option<Session>, StorageError> {
        Ok(self.sessions.lock().unwrap().iter().find(|s| &s.id == id).cloned())
    }

    async fn list_sessions(&self) -> Result<Vec<Session>, StorageError> {
        let mut sessions = self.sessions.lock().unwrap().clone();
        sessions.reverse();
        Ok(sessions)
    }

    async fn rename_session(
        &self,
        id: &SessionId,
        title: &SessionTitle,
    ) -> Result<(), StorageError> {
        let mut sessions = self.sessions.lock().unwrap();
        let session = sessions
            .iter_mut()
            .find(|s| &s.id == id)
            .ok_or_else(|| StorageError::SessionNotFound(id.clone()))?;
        session.title = title.clone();
        Ok(())
    }

    async fn delete_session(&self, id: &SessionId) -> Result<usize, StorageError> {
        let mut sessions = self.sessions.lock().unwrap();
        let before = sessions.len();
        sessions.retain(|s| &s.id != id);
        if sessions.len() == before {
            return Err(StorageError::SessionNotFound(id.clone()));
        }
        let mut rows = self.rows.lock().unwrap();
        let count = rows.len();
        rows.retain(|m| &m.session_id != id);
        Ok(count - rows.len())
    }
}

// ==================== Event sink ====================

#[derive(Default)]
pub struct RecordingEventSink {
    events: Mutex<Vec<TurnEvent>>,
}

impl RecordingEventSink {
    pub fn events(&self) -> Vec<TurnEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn answer_text(&self) -> String {
        self.events()
            .iter()
            .filter_map(|e| match e {
                TurnEvent::AnswerChunk(s) => Some(s.as_str().to_owned()),
                _ => None,
            })
            .collect()
    }

    pub fn kinds(&self) -> Vec<&'static str> {
        self.events().iter().map(TurnEvent::kind).collect()
    }
}

impl EventSink for RecordingEventSink {
    fn send(&self, event: TurnEvent) {
        self.events.lock().unwrap().push(event);
    }
}

// ==================== Dispatcher ====================

#[derive(Default)]
pub struct RecordingDispatcher {
    tasks: Mutex<Vec<SummaryTask>>,
}

impl RecordingDispatcher {
    pub fn tasks(&self) -> Vec<SummaryTask> {
        self.tasks.lock().unwrap().clone()
    }
}

impl SummaryTaskDispatcher for RecordingDispatcher {
    fn register(&self, task: SummaryTask) {
        self.tasks.lock().unwrap().push(task);
    }
}

// ==================== Agent ====================

/// What a [`ScriptedAgent`] does after streaming its chunks.
pub enum AgentEnding {
    Return(Result<String, AgentError>),
    /// Cancel the given token, then never finish.
    CancelAndHang(CancellationToken),
    /// Never finish.
    Hang,
}

pub struct ScriptedAgent {
    chunks: Vec<String>,
    tool_results: Vec<ToolCallResult>,
    ending: Mutex<Option<AgentEnding>>,
    requests: Mutex<Vec<AgentRequest>>,
}

impl ScriptedAgent {
    pub fn new(chunks: &[&str], ending: AgentEnding) -> Self {
        Self {
            chunks: chunks.iter().map(|c| c.to_string()).collect(),
            tool_results: Vec::new(),
            ending: Mutex::new(Some(ending)),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_tool_result(mut self, result: ToolCallResult) -> Self {
        self.tool_results.push(result);
        self
    }

    pub fn requests(&self) -> Vec<AgentRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl AgentPort for ScriptedAgent {
    async fn run(
        &self,
        request: &AgentRequest,
        sink: &mut dyn TokenSink,
    ) -> Result<String, AgentError> {
        self.requests.lock().unwrap().push(request.clone());
        for result in &self.tool_results {
            sink.on_tool_result(result.clone());
        }
        for chunk in &self.chunks {
            sink.on_token(chunk);
            tokio::task::yield_now().await;
        }
        let ending = self.ending.lock().unwrap().take();
        match ending {
            Some(AgentEnding::Return(result)) => result,
            Some(AgentEnding::CancelAndHang(token)) => {
                token.cancel();
                std::future::pending().await
            }
            Some(AgentEnding::Hang) | None => std::future::pending().await,
        }
    }
}

// ==================== Summary model ====================

pub struct FakeSummaryModel {
    pub calls: AtomicUsize,
    /// Requests whose content contains this text fail.
    pub fail_on: Option<String>,
    pub empty_output: bool,
    pub delay: Option<Duration>,
}

impl FakeSummaryModel {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail_on: None,
            empty_output: false,
            delay: None,
        }
    }
}

#[async_trait]
impl SummaryModel for FakeSummaryModel {
    async fn summarize(&self, role: Role, content: &str) -> Result<String, SummaryModelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(marker) = &self.fail_on
            && content.contains(marker.as_str())
        {
            return Err(SummaryModelError::RequestFailed("model unavailable".to_string()));
        }
        if self.empty_output {
            return Ok(String::new());
        }
        Ok(format!("{role} summary of {} bytes", content.len()))
    }
}
