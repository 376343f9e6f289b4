//! Database schema migrations.

use super::db::backend;
use parley_application::StorageError;
use parley_domain::DEFAULT_SESSION_TITLE;
use rusqlite::Connection;
use tracing::info;

/// Run all pending database migrations.
pub fn run_migrations(conn: &Connection) -> Result<(), StorageError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version     INTEGER PRIMARY KEY NOT NULL,
            name        TEXT NOT NULL,
            applied_at  INTEGER NOT NULL DEFAULT (strftime('%s', 'now'))
        );",
    )
    .map_err(|e| backend("create migrations table", e))?;

    let current_version: i64 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .map_err(|e| backend("query migration version", e))?;

    if current_version < 1 {
        apply_v1(conn)?;
        info!("Applied migration v1: chat_message");
    }

    if current_version < 2 {
        apply_v2(conn)?;
        info!("Applied migration v2: chat_session");
    }

    Ok(())
}

/// Version 1: message table.
fn apply_v1(conn: &Connection) -> Result<(), StorageError> {
    conn.execute_batch(
        "
        BEGIN;

        CREATE TABLE IF NOT EXISTS chat_message (
            id                INTEGER PRIMARY KEY AUTOINCREMENT,
            session_id        TEXT NOT NULL,
            role              TEXT NOT NULL
                              CHECK (role IN ('user', 'assistant', 'system')),
            content           TEXT NOT NULL DEFAULT '',
            reasoning_trace   TEXT NOT NULL DEFAULT '',
            tool_call_results TEXT,
            summary           TEXT,
            created_at        INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_chat_message_session
            ON chat_message (session_id, created_at);

        INSERT INTO schema_migrations (version, name) VALUES (1, 'chat_message');

        COMMIT;
        ",
    )
    .map_err(|e| backend("apply migration v1", e))
}

/// Version 2: session table, backfilled from existing messages.
fn apply_v2(conn: &Connection) -> Result<(), StorageError> {
    conn.execute_batch(&format!(
        "
        BEGIN;

        CREATE TABLE IF NOT EXISTS chat_session (
            session_id  TEXT PRIMARY KEY NOT NULL,
            title       TEXT NOT NULL,
            created_at  INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_chat_session_created
            ON chat_session (created_at);

        INSERT OR IGNORE INTO chat_session (session_id, title, created_at)
            SELECT session_id, '{title}', MIN(created_at)
            FROM chat_message
            GROUP BY session_id;

        INSERT INTO schema_migrations (version, name) VALUES (2, 'chat_session');

        COMMIT;
        ",
        title = DEFAULT_SESSION_TITLE.replace('\'', "''"),
    ))
    .map_err(|e| backend("apply migration v2", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();

        let versions: i64 = conn
            .query_row("SELECT COUNT(*) FROM schema_migrations", [], |row| row.get(0))
            .unwrap();
        assert_eq!(versions, 2);
    }

    #[test]
    fn test_v2_backfills_sessions_from_messages() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE schema_migrations (
                version INTEGER PRIMARY KEY NOT NULL,
                name TEXT NOT NULL,
                applied_at INTEGER NOT NULL DEFAULT 0
            );",
        )
        .unwrap();
        apply_v1(&conn).unwrap();
        conn.execute_batch(
            "INSERT INTO chat_message (session_id, role, created_at) VALUES ('old', 'user', 5);
             INSERT INTO chat_message (session_id, role, created_at) VALUES ('old', 'assistant', 9);",
        )
        .unwrap();

        run_migrations(&conn).unwrap();

        let (title, created_at): (String, i64) = conn
            .query_row(
                "SELECT title, created_at FROM chat_session WHERE session_id = 'old'",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .unwrap();
        assert_eq!(title, DEFAULT_SESSION_TITLE);
        assert_eq!(created_at, 5);
    }

    #[test]
    fn test_role_check_constraint() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        let result = conn.execute(
            "INSERT INTO chat_message (session_id, role, created_at) VALUES ('s', 'tool', 0)",
            [],
        );
        assert!(result.is_err());
    }
}
