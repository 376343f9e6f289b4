//! SQLite-backed session store.

use super::db::backend;
use super::sqlite::{SqliteMessageStore, from_millis};
use async_trait::async_trait;
use chrono::Utc;
use parley_application::{SessionStore, StorageError};
use parley_domain::{Session, SessionId, SessionTitle};
use rusqlite::{Connection, OptionalExtension, params};
use tracing::debug;

fn read_session(row: &rusqlite::Row<'_>) -> rusqlite::Result<(String, String, i64)> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?))
}

fn into_session((id, title, created_at): (String, String, i64)) -> Result<Session, StorageError> {
    Ok(Session {
        id: SessionId::new(id).map_err(|e| backend("decode session id", e))?,
        title: SessionTitle::new(title).map_err(|e| backend("decode session title", e))?,
        created_at: from_millis(created_at),
    })
}

fn select_session(conn: &Connection, id: &SessionId) -> Result<Option<Session>, StorageError> {
    conn.query_row(
        "SELECT session_id, title, created_at FROM chat_session WHERE session_id = ?1",
        params![id.as_str()],
        read_session,
    )
    .optional()
    .map_err(|e| backend("get session", e))?
    .map(into_session)
    .transpose()
}

#[async_trait]
impl SessionStore for SqliteMessageStore {
    async fn create_session(
        &self,
        id: &SessionId,
        title: &SessionTitle,
    ) -> Result<Session, StorageError> {
        let id = id.clone();
        let title = title.clone();
        self.blocking(move |conn| {
            let inserted = conn
                .execute(
                    "INSERT OR IGNORE INTO chat_session (session_id, title, created_at)
                     VALUES (?1, ?2, ?3)",
                    params![id.as_str(), title.as_str(), Utc::now().timestamp_millis()],
                )
                .map_err(|e| backend("insert session", e))?;
            if inserted > 0 {
                debug!(session_id = %id, "Session created");
            }
            select_session(conn, &id)?.ok_or(StorageError::SessionNotFound(id))
        })
        .await
    }

    async fn get_session(&self, id: &SessionId) -> Result<Option<Session>, StorageError> {
        let id = id.clone();
        self.blocking(move |conn| select_session(conn, &id)).await
    }

    async fn list_sessions(&self) -> Result<Vec<Session>, StorageError> {
        self.blocking(|conn| {
            let mut stmt = conn
                .prepare(
                    "SELECT session_id, title, created_at FROM chat_session
                     ORDER BY created_at DESC, rowid DESC",
                )
                .map_err(|e| backend("prepare session list", e))?;
            let rows = stmt
                .query_map([], read_session)
                .map_err(|e| backend("list sessions", e))?
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| backend("read session row", e))?;
            rows.into_iter().map(into_session).collect()
        })
        .await
    }

    async fn rename_session(
        &self,
        id: &SessionId,
        title: &SessionTitle,
    ) -> Result<(), StorageError> {
        let id = id.clone();
        let title = title.clone();
        self.blocking(move |conn| {
            let changed = conn
                .execute(
                    "UPDATE chat_session SET title = ?2 WHERE session_id = ?1",
                    params![id.as_str(), title.as_str()],
                )
                .map_err(|e| backend("rename session", e))?;
            if changed == 0 {
                return Err(StorageError::SessionNotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn delete_session(&self, id: &SessionId) -> Result<usize, StorageError> {
        let id = id.clone();
        self.blocking(move |conn| {
            let tx = conn
                .unchecked_transaction()
                .map_err(|e| backend("begin session delete", e))?;
            let sessions = tx
                .execute(
                    "DELETE FROM chat_session WHERE session_id = ?1",
                    params![id.as_str()],
                )
                .map_err(|e| backend("delete session", e))?;
            if sessions == 0 {
                return Err(StorageError::SessionNotFound(id));
            }
            let messages = tx
                .execute(
                    "DELETE FROM chat_message WHERE session_id = ?1",
                    params![id.as_str()],
                )
                .map_err(|e| backend("delete session messages", e))?;
            tx.commit().map_err(|e| backend("commit session delete", e))?;
            debug!(session_id = %id, messages, "Session deleted");
            Ok(messages)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_application::MessageStore;
    use parley_domain::{DEFAULT_SESSION_TITLE, NewMessage, Role};

    fn sid(id: &str) -> SessionId {
        SessionId::new(id).unwrap()
    }

    fn title(text: &str) -> SessionTitle {
        SessionTitle::new(text).unwrap()
    }

    async fn message(store: &SqliteMessageStore, session: &str, content: &str) {
        store
            .create_message(NewMessage {
                session_id: sid(session),
                role: Role::User,
                content: content.to_string(),
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_create_and_get_session() {
        let store = SqliteMessageStore::in_memory().unwrap();
        let created = store
            .create_session(&sid("s-1"), &SessionTitle::default())
            .await
            .unwrap();
        assert_eq!(created.title.as_str(), DEFAULT_SESSION_TITLE);

        let fetched = store.get_session(&sid("s-1")).await.unwrap().unwrap();
        assert_eq!(fetched, created);
        assert!(store.get_session(&sid("missing")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_existing_session_keeps_original() {
        let store = SqliteMessageStore::in_memory().unwrap();
        store.create_session(&sid("s-1"), &title("First")).await.unwrap();
        let again = store.create_session(&sid("s-1"), &title("Second")).await.unwrap();
        assert_eq!(again.title.as_str(), "First");
        assert_eq!(store.list_sessions().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_list_sessions_newest_first() {
        let store = SqliteMessageStore::in_memory().unwrap();
        for id in ["a", "b", "c"] {
            store.create_session(&sid(id), &title(id)).await.unwrap();
        }
        let ids: Vec<_> = store
            .list_sessions()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.id.to_string())
            .collect();
        assert_eq!(ids, vec!["c", "b", "a"]);
    }

    #[tokio::test]
    async fn test_rename_session() {
        let store = SqliteMessageStore::in_memory().unwrap();
        store.create_session(&sid("s-1"), &SessionTitle::default()).await.unwrap();
        store.rename_session(&sid("s-1"), &title("Diet plan")).await.unwrap();
        let session = store.get_session(&sid("s-1")).await.unwrap().unwrap();
        assert_eq!(session.title.as_str(), "Diet plan");

        let err = store.rename_session(&sid("nope"), &title("x")).await.unwrap_err();
        assert_eq!(err, StorageError::SessionNotFound(sid("nope")));
    }

    #[tokio::test]
    async fn test_delete_session_removes_its_messages() {
        let store = SqliteMessageStore::in_memory().unwrap();
        store.create_session(&sid("a"), &SessionTitle::default()).await.unwrap();
        store.create_session(&sid("b"), &SessionTitle::default()).await.unwrap();
        message(&store, "a", "one").await;
        message(&store, "a", "two").await;
        message(&store, "b", "kept").await;

        assert_eq!(store.delete_session(&sid("a")).await.unwrap(), 2);
        assert!(store.get_session(&sid("a")).await.unwrap().is_none());
        assert!(store.session_messages(&sid("a"), 10).await.unwrap().is_empty());
        assert_eq!(store.session_messages(&sid("b"), 10).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_unknown_session() {
        let store = SqliteMessageStore::in_memory().unwrap();
        let err = store.delete_session(&sid("ghost")).await.unwrap_err();
        assert_eq!(err, StorageError::SessionNotFound(sid("ghost")));
    }
}
