//! Message and session persistence (SQLite).

mod db;
mod migrations;
mod session;
mod sqlite;

pub use db::Database;
pub use sqlite::SqliteMessageStore;
