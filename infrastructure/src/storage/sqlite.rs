//! SQLite-backed message store.

use super::db::{Database, backend};
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use parley_application::{MessageStore, MessageUpdate, StorageError};
use parley_domain::{Message, MessageId, NewMessage, Role, SessionId, SummaryUpdate, ToolCallResult};
use rusqlite::{Connection, OptionalExtension, params};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

const SELECT_COLUMNS: &str = "id, session_id, role, content, reasoning_trace, \
                              tool_call_results, summary, created_at";

/// [`MessageStore`] over a local SQLite file.
///
/// Every call runs on the blocking thread pool; the connection is shared
/// behind the [`Database`] mutex.
#[derive(Debug, Clone)]
pub struct SqliteMessageStore {
    db: Arc<Database>,
}

impl SqliteMessageStore {
    pub fn new(db: Database) -> Self {
        Self { db: Arc::new(db) }
    }

    pub fn open(path: &Path) -> Result<Self, StorageError> {
        Ok(Self::new(Database::open(path)?))
    }

    pub fn in_memory() -> Result<Self, StorageError> {
        Ok(Self::new(Database::in_memory()?))
    }

    pub(super) async fn blocking<F, T>(&self, f: F) -> Result<T, StorageError>
    where
        F: FnOnce(&Connection) -> Result<T, StorageError> + Send + 'static,
        T: Send + 'static,
    {
        let db = Arc::clone(&self.db);
        tokio::task::spawn_blocking(move || db.with_conn(f))
            .await
            .map_err(|e| backend("storage task", e))?
    }
}

/// Raw column values, converted to a [`Message`] outside the row callback.
struct MessageRow {
    id: i64,
    session_id: String,
    role: String,
    content: String,
    reasoning_trace: String,
    tool_call_results: Option<String>,
    summary: Option<String>,
    created_at: i64,
}

impl MessageRow {
    fn read(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            session_id: row.get(1)?,
            role: row.get(2)?,
            content: row.get(3)?,
            reasoning_trace: row.get(4)?,
            tool_call_results: row.get(5)?,
            summary: row.get(6)?,
            created_at: row.get(7)?,
        })
    }

    fn into_message(self) -> Result<Message, StorageError> {
        let role: Role = self
            .role
            .parse()
            .map_err(|e| backend("decode role", e))?;
        let session_id = SessionId::new(self.session_id).map_err(|e| backend("decode session", e))?;
        let tool_call_results = self
            .tool_call_results
            .map(|json| serde_json::from_str::<Vec<ToolCallResult>>(&json))
            .transpose()
            .map_err(|e| backend("decode tool_call_results", e))?;

        Ok(Message {
            id: MessageId::new(self.id),
            session_id,
            role,
            content: self.content,
            reasoning_trace: self.reasoning_trace,
            tool_call_results,
            summary: self.summary,
            created_at: from_millis(self.created_at),
        })
    }
}

pub(super) fn from_millis(ms: i64) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(ms).single().unwrap_or_default()
}

#[async_trait]
impl MessageStore for SqliteMessageStore {
    async fn create_message(&self, message: NewMessage) -> Result<MessageId, StorageError> {
        self.blocking(move |conn| {
            conn.execute(
                "INSERT INTO chat_message (session_id, role, content, created_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    message.session_id.as_str(),
                    message.role.as_str(),
                    message.content,
                    Utc::now().timestamp_millis(),
                ],
            )
            .map_err(|e| backend("insert message", e))?;
            let id = MessageId::new(conn.last_insert_rowid());
            debug!(%id, session_id = %message.session_id, role = %message.role, "Message created");
            Ok(id)
        })
        .await
    }

    async fn update_message(
        &self,
        id: MessageId,
        update: MessageUpdate,
    ) -> Result<(), StorageError> {
        self.blocking(move |conn| {
            let changed = match &update {
                MessageUpdate::ReasoningTrace(trace) => conn.execute(
                    "UPDATE chat_message SET reasoning_trace = ?2 WHERE id = ?1",
                    params![id.get(), trace],
                ),
                MessageUpdate::ToolCallResults(results) => {
                    let json = serde_json::to_string(results)
                        .map_err(|e| backend("encode tool_call_results", e))?;
                    conn.execute(
                        "UPDATE chat_message SET tool_call_results = ?2 WHERE id = ?1",
                        params![id.get(), json],
                    )
                }
            }
            .map_err(|e| backend("update message", e))?;

            if changed == 0 {
                return Err(StorageError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn get_message(&self, id: MessageId) -> Result<Message, StorageError> {
        self.blocking(move |conn| {
            let sql = format!("SELECT {SELECT_COLUMNS} FROM chat_message WHERE id = ?1");
            conn.query_row(&sql, params![id.get()], MessageRow::read)
                .optional()
                .map_err(|e| backend("get message", e))?
                .ok_or(StorageError::NotFound(id))?
                .into_message()
        })
        .await
    }

    async fn session_messages(
        &self,
        session_id: &SessionId,
        limit: usize,
    ) -> Result<Vec<Message>, StorageError> {
        let session_id = session_id.clone();
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        self.blocking(move |conn| {
            let sql = format!(
                "SELECT {SELECT_COLUMNS} FROM (
                     SELECT {SELECT_COLUMNS} FROM chat_message
                     WHERE session_id = ?1
                     ORDER BY created_at DESC, id DESC
                     LIMIT ?2
                 ) ORDER BY created_at ASC, id ASC"
            );
            let mut stmt = conn
                .prepare(&sql)
                .map_err(|e| backend("prepare history query", e))?;
            let rows = stmt
                .query_map(params![session_id.as_str(), limit], MessageRow::read)
                .map_err(|e| backend("query history", e))?
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| backend("read history row", e))?;
            rows.into_iter().map(MessageRow::into_message).collect()
        })
        .await
    }

    async fn apply_summaries(&self, updates: &[SummaryUpdate]) -> Result<usize, StorageError> {
        if updates.is_empty() {
            return Ok(0);
        }
        let updates = updates.to_vec();
        self.blocking(move |conn| {
            let tx = conn
                .unchecked_transaction()
                .map_err(|e| backend("begin summary batch", e))?;
            let mut written = 0;
            {
                let mut stmt = tx
                    .prepare(
                        "UPDATE chat_message SET summary = ?2
                         WHERE id = ?1 AND summary IS NULL",
                    )
                    .map_err(|e| backend("prepare summary update", e))?;
                for update in &updates {
                    written += stmt
                        .execute(params![update.message_id.get(), update.summary])
                        .map_err(|e| backend("write summary", e))?;
                }
            }
            tx.commit().map_err(|e| backend("commit summary batch", e))?;
            Ok(written)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(id: &str) -> SessionId {
        SessionId::new(id).unwrap()
    }

    async fn insert(store: &SqliteMessageStore, session_id: &str, role: Role, content: &str) -> MessageId {
        store
            .create_message(NewMessage {
                session_id: session(session_id),
                role,
                content: content.to_string(),
            })
            .await
            .unwrap()
    }

    // ==================== Create / Get ====================

    #[tokio::test]
    async fn test_create_and_get_message() {
        let store = SqliteMessageStore::in_memory().unwrap();
        let id = insert(&store, "s-1", Role::User, "how do I lower my A1c?").await;

        let message = store.get_message(id).await.unwrap();
        assert_eq!(message.id, id);
        assert_eq!(message.role, Role::User);
        assert_eq!(message.content, "how do I lower my A1c?");
        assert_eq!(message.reasoning_trace, "");
        assert!(message.tool_call_results.is_none());
        assert!(message.summary.is_none());
    }

    #[tokio::test]
    async fn test_get_missing_message() {
        let store = SqliteMessageStore::in_memory().unwrap();
        let err = store.get_message(MessageId::new(42)).await.unwrap_err();
        assert_eq!(err, StorageError::NotFound(MessageId::new(42)));
    }

    // ==================== Update ====================

    #[tokio::test]
    async fn test_update_reasoning_and_tool_results() {
        let store = SqliteMessageStore::in_memory().unwrap();
        let id = insert(&store, "s-1", Role::Assistant, "eat more fiber").await;

        store
            .update_message(id, MessageUpdate::ReasoningTrace("thinking...".into()))
            .await
            .unwrap();
        let results = vec![ToolCallResult::new("search", vec!["fiber helps".into()])];
        store
            .update_message(id, MessageUpdate::ToolCallResults(results.clone()))
            .await
            .unwrap();

        let message = store.get_message(id).await.unwrap();
        assert_eq!(message.reasoning_trace, "thinking...");
        assert_eq!(message.tool_call_results, Some(results));
    }

    #[tokio::test]
    async fn test_update_missing_row() {
        let store = SqliteMessageStore::in_memory().unwrap();
        let err = store
            .update_message(MessageId::new(7), MessageUpdate::ReasoningTrace("x".into()))
            .await
            .unwrap_err();
        assert_eq!(err, StorageError::NotFound(MessageId::new(7)));
    }

    // ==================== History ====================

    #[tokio::test]
    async fn test_session_messages_returns_latest_in_order() {
        let store = SqliteMessageStore::in_memory().unwrap();
        for i in 0..5 {
            insert(&store, "s-1", Role::User, &format!("q{i}")).await;
        }
        insert(&store, "s-2", Role::User, "other session").await;

        let history = store.session_messages(&session("s-1"), 3).await.unwrap();
        let contents: Vec<_> = history.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["q2", "q3", "q4"]);
    }

    #[tokio::test]
    async fn test_session_messages_unknown_session() {
        let store = SqliteMessageStore::in_memory().unwrap();
        assert!(store.session_messages(&session("nobody"), 10).await.unwrap().is_empty());
    }

    // ==================== Summaries ====================

    #[tokio::test]
    async fn test_apply_summaries_only_fills_empty() {
        let store = SqliteMessageStore::in_memory().unwrap();
        let a = insert(&store, "s-1", Role::User, "long question").await;
        let b = insert(&store, "s-1", Role::Assistant, "long answer").await;

        let first = store
            .apply_summaries(&[SummaryUpdate {
                message_id: a,
                summary: "first".into(),
            }])
            .await
            .unwrap();
        assert_eq!(first, 1);

        let second = store
            .apply_summaries(&[
                SummaryUpdate {
                    message_id: a,
                    summary: "overwrite".into(),
                },
                SummaryUpdate {
                    message_id: b,
                    summary: "answer summary".into(),
                },
            ])
            .await
            .unwrap();
        assert_eq!(second, 1);

        assert_eq!(store.get_message(a).await.unwrap().summary.as_deref(), Some("first"));
        assert_eq!(
            store.get_message(b).await.unwrap().summary.as_deref(),
            Some("answer summary")
        );
    }

    #[tokio::test]
    async fn test_apply_summaries_empty_batch() {
        let store = SqliteMessageStore::in_memory().unwrap();
        assert_eq!(store.apply_summaries(&[]).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_file_store_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("messages.db");

        let id = {
            let store = SqliteMessageStore::open(&path).unwrap();
            insert(&store, "s-1", Role::User, "remember me").await
        };

        let store = SqliteMessageStore::open(&path).unwrap();
        assert_eq!(store.get_message(id).await.unwrap().content, "remember me");
    }
}
