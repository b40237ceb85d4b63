// system-tests/tests/store_persistence.rs
// ============================================================================
// Module: Store Persistence Suite
// Description: End-to-end tests for store durability across reopen and reset.
// Purpose: Prove queue rows and history survive process restarts.
// Dependencies: editor-relay-core, editor-relay-store-sqlite, executor
// ============================================================================

//! ## Overview
//! The client and the executor run in separate processes, so every protocol
//! guarantee rides on the database file. These tests reopen the same file
//! with fresh connections and check that rows, statuses, and results are
//! exactly where the previous connection left them.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use std::path::PathBuf;

use editor_relay_core::MenuItemPayload;
use editor_relay_core::RequestKind;
use editor_relay_core::RequestPayload;
use editor_relay_core::RequestQueueStore;
use editor_relay_core::RequestResult;
use editor_relay_core::RequestStatus;
use editor_relay_store_sqlite::SqliteQueueConfig;
use editor_relay_store_sqlite::SqliteQueueStore;
use system_tests::executor::SimulatedExecutor;
use tempfile::TempDir;

type TestResult = Result<(), Box<dyn std::error::Error>>;

fn store_at(path: &PathBuf) -> Result<SqliteQueueStore, Box<dyn std::error::Error>> {
    Ok(SqliteQueueStore::new(SqliteQueueConfig::new(path.clone()))?)
}

fn menu_payload(menu_path: &str) -> RequestPayload {
    RequestPayload::MenuItem(MenuItemPayload {
        menu_path: menu_path.to_string(),
    })
}

#[test]
fn pending_rows_survive_a_reopen() -> TestResult {
    let dir = TempDir::new()?;
    let db_path = dir.path().join("coordination.db");

    let id = {
        let store = store_at(&db_path)?;
        store.insert(&menu_payload("Tools/Persisted Item"), 3)?
    };

    let reopened = store_at(&db_path)?;
    let snapshot = reopened
        .fetch(RequestKind::MenuItem, id)?
        .ok_or("row should survive the reopen")?;
    assert_eq!(snapshot.status, RequestStatus::Pending);
    assert_eq!(snapshot.priority, 3);
    let RequestPayload::MenuItem(payload) = snapshot.payload else {
        return Err("expected a menu payload".into());
    };
    assert_eq!(payload.menu_path, "Tools/Persisted Item");
    Ok(())
}

#[test]
fn completed_results_survive_a_reopen() -> TestResult {
    let dir = TempDir::new()?;
    let db_path = dir.path().join("coordination.db");

    let id = {
        let store = store_at(&db_path)?;
        let id = store.insert(&menu_payload("Tools/Finished Item"), 0)?;
        let executor = SimulatedExecutor::open(&db_path)?;
        let row = executor
            .claim_next(RequestKind::MenuItem)?
            .ok_or("executor should claim the pending row")?;
        executor.complete_menu(row, 1.5, "done")?;
        id
    };

    let reopened = store_at(&db_path)?;
    let snapshot = reopened
        .fetch(RequestKind::MenuItem, id)?
        .ok_or("completed row should survive the reopen")?;
    assert_eq!(snapshot.status, RequestStatus::Completed);
    assert_eq!(snapshot.result, RequestResult::MenuItem {
        duration_seconds: 1.5,
        result: Some("done".to_string()),
    });
    Ok(())
}

#[test]
fn verify_counts_rows_across_connections() -> TestResult {
    let dir = TempDir::new()?;
    let db_path = dir.path().join("coordination.db");

    {
        let store = store_at(&db_path)?;
        store.insert(&menu_payload("Tools/First"), 0)?;
        store.insert(&menu_payload("Tools/Second"), 0)?;
    }

    let reopened = store_at(&db_path)?;
    let report = reopened.verify()?;
    assert!(report.is_healthy());
    assert_eq!(report.table_counts.get("menu_item_requests"), Some(&2));
    assert_eq!(report.table_counts.get("test_requests"), Some(&0));
    Ok(())
}

#[test]
fn reset_discards_every_row_and_restarts_identifiers() -> TestResult {
    let dir = TempDir::new()?;
    let db_path = dir.path().join("coordination.db");
    let config = SqliteQueueConfig::new(db_path.clone());

    {
        let store = SqliteQueueStore::new(config.clone())?;
        store.insert(&menu_payload("Tools/Short Lived"), 0)?;
        store.insert(&menu_payload("Tools/Also Short Lived"), 0)?;
    }

    let reset = SqliteQueueStore::reset(config)?;
    let report = reset.verify()?;
    assert!(report.is_healthy());
    assert_eq!(report.table_counts.get("menu_item_requests"), Some(&0));

    let id = reset.insert(&menu_payload("Tools/Fresh Start"), 0)?;
    assert_eq!(id.get(), 1);
    Ok(())
}
