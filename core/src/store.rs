//! SQLite persistence layer.
//!
//! RULE: Only store.rs talks to the database.
//! The session reaches it through the FileStore trait; the runner uses
//! the session and event log methods directly.

use crate::{
    error::SimResult,
    event::{EventLogEntry, GameEvent},
    file_store::FileStore,
    types::Seconds,
};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

pub struct SimStore {
    conn: Connection,
}

impl SimStore {
    /// Open (or create) the database at `path`.
    pub fn open(path: &str) -> SimResult<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> SimResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> SimResult<()> {
        self.conn
            .execute_batch(include_str!("../../migrations/001_foundation.sql"))?;
        Ok(())
    }

    // ── Session ────────────────────────────────────────────────

    pub fn insert_session(&self, session_id: &str, seed: u64, version: &str) -> SimResult<()> {
        self.conn.execute(
            "INSERT INTO session (session_id, seed, version, started_at) VALUES (?1, ?2, ?3, ?4)",
            params![session_id, seed as i64, version, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    // ── Event log ──────────────────────────────────────────────

    pub fn append_event(&self, session_id: &str, elapsed: Seconds, event: &GameEvent) -> SimResult<()> {
        self.conn.execute(
            "INSERT INTO event_log (session_id, elapsed, event_type, payload)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                session_id,
                elapsed,
                event.type_name(),
                serde_json::to_string(event)?,
            ],
        )?;
        Ok(())
    }

    pub fn events_for_session(&self, session_id: &str) -> SimResult<Vec<EventLogEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, session_id, elapsed, event_type, payload
             FROM event_log WHERE session_id = ?1
             ORDER BY id ASC",
        )?;
        let entries = stmt
            .query_map(params![session_id], |row| {
                Ok(EventLogEntry {
                    id:         Some(row.get(0)?),
                    session_id: row.get(1)?,
                    elapsed:    row.get(2)?,
                    event_type: row.get(3)?,
                    payload:    row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    pub fn event_count(&self, session_id: &str, event_type: &str) -> SimResult<i64> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM event_log WHERE session_id = ?1 AND event_type = ?2",
            params![session_id, event_type],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

// ── Stored documents ───────────────────────────────────────────

impl FileStore for SimStore {
    fn read_file(&self, path: &str) -> SimResult<Option<Vec<u8>>> {
        let contents = self
            .conn
            .query_row(
                "SELECT contents FROM save_file WHERE path = ?1",
                params![path],
                |row| row.get::<_, Vec<u8>>(0),
            )
            .optional()?;
        Ok(contents)
    }

    fn write_file(&self, path: &str, bytes: &[u8]) -> SimResult<()> {
        self.conn.execute(
            "INSERT INTO save_file (path, contents, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(path) DO UPDATE SET contents = excluded.contents,
                                             updated_at = excluded.updated_at",
            params![path, bytes, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }
}
