//! Session management use case.
//!
//! Opens, lists, renames and deletes sessions. A session that is used
//! without being created first gets the default title.

use crate::ports::message_store::StorageError;
use crate::ports::session_store::SessionStore;
use parley_domain::{DomainError, Session, SessionId, SessionTitle};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Invalid session request: {0}")]
    Invalid(#[from] DomainError),

    #[error("Session storage failed: {0}")]
    Storage(#[from] StorageError),
}

pub struct ManageSessionsUseCase {
    store: Arc<dyn SessionStore>,
}

impl ManageSessionsUseCase {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// Return the session `id`, creating it with `title` (or the default
    /// title) if it does not exist yet.
    pub async fn open(&self, id: &SessionId, title: Option<&str>) -> Result<Session, SessionError> {
        if let Some(session) = self.store.get_session(id).await? {
            return Ok(session);
        }
        let title = match title {
            Some(title) => SessionTitle::new(title)?,
            None => SessionTitle::default(),
        };
        let session = self.store.create_session(id, &title).await?;
        info!(session_id = %session.id, title = %session.title, "Session created");
        Ok(session)
    }

    /// All sessions, newest first.
    pub async fn list(&self) -> Result<Vec<Session>, SessionError> {
        Ok(self.store.list_sessions().await?)
    }

    pub async fn rename(&self, id: &SessionId, title: &str) -> Result<SessionTitle, SessionError> {
        let title = SessionTitle::new(title)?;
        self.store.rename_session(id, &title).await?;
        info!(session_id = %id, title = %title, "Session renamed");
        Ok(title)
    }

    /// Delete the session and its messages; returns how many messages went.
    pub async fn delete(&self, id: &SessionId) -> Result<usize, SessionError> {
        let removed = self.store.delete_session(id).await?;
        info!(session_id = %id, messages = removed, "Session deleted");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::InMemoryMessageStore;
    use parley_domain::{DEFAULT_SESSION_TITLE, Role};

    fn sid(id: &str) -> SessionId {
        SessionId::new(id).unwrap()
    }

    fn setup() -> (Arc<InMemoryMessageStore>, ManageSessionsUseCase) {
        let store = Arc::new(InMemoryMessageStore::new());
        let use_case = ManageSessionsUseCase::new(store.clone());
        (store, use_case)
    }

    #[tokio::test]
    async fn test_open_creates_with_default_title() {
        let (_, sessions) = setup();
        let session = sessions.open(&sid("a"), None).await.unwrap();
        assert_eq!(session.title.as_str(), DEFAULT_SESSION_TITLE);
    }

    #[tokio::test]
    async fn test_open_existing_keeps_title() {
        let (_, sessions) = setup();
        sessions.open(&sid("a"), Some("Hydration")).await.unwrap();
        let again = sessions.open(&sid("a"), Some("Other")).await.unwrap();
        assert_eq!(again.title.as_str(), "Hydration");
        assert_eq!(sessions.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_open_rejects_blank_title() {
        let (_, sessions) = setup();
        let err = sessions.open(&sid("a"), Some("  ")).await.unwrap_err();
        assert!(matches!(err, SessionError::Invalid(DomainError::InvalidTitle(_))));
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let (_, sessions) = setup();
        sessions.open(&sid("first"), None).await.unwrap();
        sessions.open(&sid("second"), None).await.unwrap();
        let ids: Vec<_> = sessions
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.id.to_string())
            .collect();
        assert_eq!(ids, vec!["second", "first"]);
    }

    #[tokio::test]
    async fn test_rename() {
        let (_, sessions) = setup();
        sessions.open(&sid("a"), None).await.unwrap();
        let title = sessions.rename(&sid("a"), " Water intake ").await.unwrap();
        assert_eq!(title.as_str(), "Water intake");
        assert_eq!(sessions.list().await.unwrap()[0].title, title);
    }

    #[tokio::test]
    async fn test_rename_unknown_session() {
        let (_, sessions) = setup();
        let err = sessions.rename(&sid("ghost"), "x").await.unwrap_err();
        assert!(matches!(err, SessionError::Storage(StorageError::SessionNotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_removes_messages_of_that_session_only() {
        let (store, sessions) = setup();
        sessions.open(&sid("a"), None).await.unwrap();
        sessions.open(&sid("b"), None).await.unwrap();
        store.seed("a", Role::User, "q", None);
        store.seed("a", Role::Assistant, "r", None);
        store.seed("b", Role::User, "keep me", None);

        assert_eq!(sessions.delete(&sid("a")).await.unwrap(), 2);
        let rows = store.rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].content, "keep me");
        assert_eq!(sessions.list().await.unwrap().len(), 1);
    }
}
