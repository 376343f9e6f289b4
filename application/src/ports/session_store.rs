//! Session store port
//!
//! Durable session records. Deleting a session also deletes its messages.

use crate::ports::message_store::StorageError;
use async_trait::async_trait;
use parley_domain::{Session, SessionId, SessionTitle};

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Insert a session; an existing id is left untouched and returned as is.
    async fn create_session(
        &self,
        id: &SessionId,
        title: &SessionTitle,
    ) -> Result<Session, StorageError>;

    async fn get_session(&self, id: &SessionId) -> Result<Option<Session>, StorageError>;

    /// All sessions, newest first.
    async fn list_sessions(&self) -> Result<Vec<Session>, StorageError>;

    async fn rename_session(
        &self,
        id: &SessionId,
        title: &SessionTitle,
    ) -> Result<(), StorageError>;

    /// Remove the session and its messages; returns the number of messages removed.
    async fn delete_session(&self, id: &SessionId) -> Result<usize, StorageError>;
}
