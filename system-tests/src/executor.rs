// system-tests/src/executor.rs
// ============================================================================
// Module: Simulated Editor Executor
// Description: Plays the Unity Editor's role against the shared database.
// Purpose: Claim pending requests in priority order and write the executor
//          side of the protocol so end-to-end waits can be exercised.
// Dependencies: editor-relay-core, rusqlite
// ============================================================================

//! ## Overview
//! The real executor runs inside the Unity Editor process and polls the
//! shared database. This stand-in reproduces its observable behavior over a
//! second `SQLite` connection: claim the best pending row, move it through
//! an intermediate status, and land it on a terminal status with results.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use editor_relay_core::RequestKind;
use rusqlite::Connection;
use rusqlite::OptionalExtension;
use rusqlite::params;

// ============================================================================
// SECTION: Executor
// ============================================================================

/// Simulated Unity-side executor over its own database connection.
///
/// # Invariants
/// - Claims only `pending` rows, atomically, in claim order.
/// - Writes `started_at` on claim and `completed_at` on terminal statuses.
pub struct SimulatedExecutor {
    /// Executor-side connection, independent of the client's.
    connection: Connection,
}

impl SimulatedExecutor {
    /// Opens an executor connection to the shared database.
    ///
    /// # Errors
    ///
    /// Returns [`rusqlite::Error`] when the database cannot be opened.
    pub fn open(path: &Path) -> rusqlite::Result<Self> {
        let connection = Connection::open(path)?;
        connection.busy_timeout(std::time::Duration::from_millis(5_000))?;
        Ok(Self {
            connection,
        })
    }

    /// Claims the best pending request of one kind, returning its row id.
    ///
    /// Claim order is priority descending, then creation time ascending. The
    /// claim is conditional on the row still being `pending`, so a
    /// concurrently cancelled request is never picked up.
    ///
    /// # Errors
    ///
    /// Returns [`rusqlite::Error`] when the claim statements fail.
    pub fn claim_next(&self, kind: RequestKind) -> rusqlite::Result<Option<i64>> {
        let select = format!(
            "SELECT id FROM {} WHERE status = 'pending' ORDER BY priority DESC, created_at ASC, \
             id ASC LIMIT 1",
            kind.table_name()
        );
        let Some(id) = self
            .connection
            .query_row(&select, params![], |row| row.get::<_, i64>(0))
            .optional()?
        else {
            return Ok(None);
        };
        let update = format!(
            "UPDATE {} SET status = 'running', started_at = ?2 WHERE id = ?1 AND status = \
             'pending'",
            kind.table_name()
        );
        let changed = self.connection.execute(&update, params![id, now_millis()])?;
        Ok((changed > 0).then_some(id))
    }

    /// Moves a claimed request through an intermediate status label.
    ///
    /// # Errors
    ///
    /// Returns [`rusqlite::Error`] when the update fails.
    pub fn advance(&self, kind: RequestKind, id: i64, status: &str) -> rusqlite::Result<()> {
        let update = format!("UPDATE {} SET status = ?2 WHERE id = ?1", kind.table_name());
        self.connection.execute(&update, params![id, status])?;
        Ok(())
    }

    /// Completes a test run with counters and a summary.
    ///
    /// # Errors
    ///
    /// Returns [`rusqlite::Error`] when the update fails.
    pub fn complete_test(
        &self,
        id: i64,
        passed: i64,
        failed: i64,
        skipped: i64,
        duration_seconds: f64,
        summary: &str,
    ) -> rusqlite::Result<()> {
        self.connection.execute(
            "UPDATE test_requests SET status = 'completed', completed_at = ?2, total_tests = ?3, \
             passed_tests = ?4, failed_tests = ?5, skipped_tests = ?6, duration_seconds = ?7, \
             result_summary = ?8 WHERE id = ?1",
            params![
                id,
                now_millis(),
                passed + failed + skipped,
                passed,
                failed,
                skipped,
                duration_seconds,
                summary
            ],
        )?;
        Ok(())
    }

    /// Completes a menu execution with a result string.
    ///
    /// # Errors
    ///
    /// Returns [`rusqlite::Error`] when the update fails.
    pub fn complete_menu(&self, id: i64, duration_seconds: f64, result: &str) -> rusqlite::Result<()> {
        self.connection.execute(
            "UPDATE menu_item_requests SET status = 'completed', completed_at = ?2, \
             duration_seconds = ?3, result = ?4 WHERE id = ?1",
            params![id, now_millis(), duration_seconds, result],
        )?;
        Ok(())
    }

    /// Completes a hierarchy export with the output file path.
    ///
    /// # Errors
    ///
    /// Returns [`rusqlite::Error`] when the update fails.
    pub fn complete_hierarchy(&self, id: i64, output_file: &str) -> rusqlite::Result<()> {
        self.connection.execute(
            "UPDATE scene_hierarchy_requests SET status = 'completed', completed_at = ?2, \
             output_file = ?3 WHERE id = ?1",
            params![id, now_millis(), output_file],
        )?;
        Ok(())
    }

    /// Completes an asset refresh with a result message.
    ///
    /// # Errors
    ///
    /// Returns [`rusqlite::Error`] when the update fails.
    pub fn complete_refresh(
        &self,
        id: i64,
        duration_seconds: f64,
        message: &str,
    ) -> rusqlite::Result<()> {
        self.connection.execute(
            "UPDATE asset_refresh_requests SET status = 'completed', completed_at = ?2, \
             duration_seconds = ?3, result_message = ?4 WHERE id = ?1",
            params![id, now_millis(), duration_seconds, message],
        )?;
        Ok(())
    }

    /// Fails a request with an error message.
    ///
    /// # Errors
    ///
    /// Returns [`rusqlite::Error`] when the update fails.
    pub fn fail(&self, kind: RequestKind, id: i64, message: &str) -> rusqlite::Result<()> {
        let update = format!(
            "UPDATE {} SET status = 'failed', completed_at = ?2, error_message = ?3 WHERE id = ?1",
            kind.table_name()
        );
        self.connection.execute(&update, params![id, now_millis(), message])?;
        Ok(())
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns the current unix epoch in milliseconds.
fn now_millis() -> i64 {
    let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default();
    i64::try_from(now.as_millis()).unwrap_or(i64::MAX)
}
