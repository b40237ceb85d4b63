// crates/editor-relay-store-sqlite/src/store.rs
// ============================================================================
// Module: SQLite Request Queue Store
// Description: Durable RequestQueueStore backed by SQLite WAL.
// Purpose: Persist queued editor requests in the shared database the
//          external executor polls, one table per request kind.
// Dependencies: editor-relay-core, rusqlite, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! This module implements [`RequestQueueStore`] over `SQLite`. The database
//! is shared with the external Unity Editor executor: this side inserts
//! `pending` rows and performs the conditional `pending` to `cancelled`
//! update; the executor claims rows in priority order and writes every other
//! transition. WAL journal mode and a busy timeout keep the cross-process
//! access safe. Schema versioning fails closed: an unknown persisted version
//! is an error, never a silent migration.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use editor_relay_core::AssetRefreshPayload;
use editor_relay_core::HierarchyRequestType;
use editor_relay_core::ImportOptions;
use editor_relay_core::LogLevel;
use editor_relay_core::MenuItemPayload;
use editor_relay_core::RefreshType;
use editor_relay_core::RequestId;
use editor_relay_core::RequestKind;
use editor_relay_core::RequestPayload;
use editor_relay_core::RequestQueueStore;
use editor_relay_core::RequestResult;
use editor_relay_core::RequestSnapshot;
use editor_relay_core::RequestStatus;
use editor_relay_core::SceneHierarchyPayload;
use editor_relay_core::StoreError;
use editor_relay_core::TestPlatform;
use editor_relay_core::TestRequestType;
use editor_relay_core::TestRunPayload;
use editor_relay_core::Timestamp;
use rusqlite::Connection;
use rusqlite::ErrorCode;
use rusqlite::OpenFlags;
use rusqlite::OptionalExtension;
use rusqlite::Row;
use rusqlite::params;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// `SQLite` schema version for the queue store.
pub const SCHEMA_VERSION: i64 = 1;
/// Default busy timeout (ms).
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;
/// Maximum length of a single path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;

/// Tables expected in a healthy store, queue tables first.
const EXPECTED_TABLES: [&str; 6] = [
    "test_requests",
    "menu_item_requests",
    "scene_hierarchy_requests",
    "asset_refresh_requests",
    "execution_log",
    "store_meta",
];

// ============================================================================
// SECTION: Config
// ============================================================================

/// `SQLite` journal mode configuration.
///
/// # Invariants
/// - Values map 1:1 to `SQLite` `journal_mode` pragma settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteStoreMode {
    /// WAL journal mode (required for cross-process polling).
    #[default]
    Wal,
    /// Delete journal mode (legacy).
    Delete,
}

impl SqliteStoreMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Wal => "wal",
            Self::Delete => "delete",
        }
    }
}

/// `SQLite` sync mode configuration.
///
/// # Invariants
/// - Values map 1:1 to `SQLite` `synchronous` pragma settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteSyncMode {
    /// Full synchronous mode (safest).
    #[default]
    Full,
    /// Normal synchronous mode (balanced).
    Normal,
}

impl SqliteSyncMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Normal => "normal",
        }
    }
}

/// Configuration for the `SQLite` queue store.
///
/// # Invariants
/// - `path` must resolve to a file path (not a directory).
/// - `busy_timeout_ms` is interpreted as milliseconds.
#[derive(Debug, Clone, Deserialize)]
pub struct SqliteQueueConfig {
    /// Path to the `SQLite` database file.
    pub path: PathBuf,
    /// Busy timeout in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// `SQLite` journal mode.
    #[serde(default)]
    pub journal_mode: SqliteStoreMode,
    /// `SQLite` sync mode.
    #[serde(default)]
    pub sync_mode: SqliteSyncMode,
}

impl SqliteQueueConfig {
    /// Creates a config with defaults for the given database path.
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            journal_mode: SqliteStoreMode::default(),
            sync_mode: SqliteSyncMode::default(),
        }
    }
}

/// Default busy timeout in milliseconds.
const fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// `SQLite` queue store errors.
///
/// # Invariants
/// - Error messages avoid embedding row payloads.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SqliteQueueError {
    /// Store I/O error.
    #[error("sqlite queue io error: {0}")]
    Io(String),
    /// `SQLite` engine error.
    #[error("sqlite queue db error: {0}")]
    Db(String),
    /// Store is locked or busy; the caller should retry.
    #[error("sqlite queue busy: {0}")]
    Busy(String),
    /// Store corruption or malformed row data.
    #[error("sqlite queue corruption: {0}")]
    Corrupt(String),
    /// Store schema version mismatch.
    #[error("sqlite queue version mismatch: {0}")]
    VersionMismatch(String),
    /// Invalid store input.
    #[error("sqlite queue invalid data: {0}")]
    Invalid(String),
}

impl From<SqliteQueueError> for StoreError {
    fn from(error: SqliteQueueError) -> Self {
        match error {
            SqliteQueueError::Io(message) => Self::Io(message),
            SqliteQueueError::Db(message) => Self::Db(message),
            SqliteQueueError::Busy(message) => Self::Unavailable(message),
            SqliteQueueError::Corrupt(message) => Self::Corrupt(message),
            SqliteQueueError::VersionMismatch(message) => Self::VersionMismatch(message),
            SqliteQueueError::Invalid(message) => Self::Invalid(message),
        }
    }
}

/// Classifies a `rusqlite` error, separating retryable lock contention.
fn map_db_error(error: &rusqlite::Error) -> SqliteQueueError {
    if let rusqlite::Error::SqliteFailure(failure, _) = error
        && matches!(failure.code, ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked)
    {
        return SqliteQueueError::Busy(error.to_string());
    }
    SqliteQueueError::Db(error.to_string())
}

// ============================================================================
// SECTION: Verify Report
// ============================================================================

/// Health report produced by [`SqliteQueueStore::verify`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerifyReport {
    /// Persisted schema version.
    pub schema_version: i64,
    /// Expected tables absent from the database.
    pub missing_tables: Vec<String>,
    /// Row counts per present queue table.
    pub table_counts: BTreeMap<String, i64>,
}

impl VerifyReport {
    /// Reports whether the store is structurally healthy.
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.missing_tables.is_empty() && self.schema_version == SCHEMA_VERSION
    }
}

// ============================================================================
// SECTION: Store
// ============================================================================

/// `SQLite`-backed request queue store with WAL support.
///
/// # Invariants
/// - Inserts write status `pending` with null claim/terminal timestamps.
/// - The only update this side performs is the conditional cancel.
/// - Connection access is serialized through a mutex; cross-process
///   concurrency is `SQLite`'s responsibility under WAL.
#[derive(Debug, Clone)]
pub struct SqliteQueueStore {
    /// Store configuration.
    config: SqliteQueueConfig,
    /// Shared connection guarded by a mutex.
    connection: Arc<Mutex<Connection>>,
}

impl SqliteQueueStore {
    /// Opens or creates the queue database at the configured path.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteQueueError`] when the path is invalid, the database
    /// cannot be opened, or the persisted schema version is unsupported.
    pub fn new(config: SqliteQueueConfig) -> Result<Self, SqliteQueueError> {
        validate_store_path(&config.path)?;
        ensure_parent_dir(&config.path)?;
        let mut connection = open_connection(&config)?;
        initialize_schema(&mut connection)?;
        Ok(Self {
            config,
            connection: Arc::new(Mutex::new(connection)),
        })
    }

    /// Deletes the database (including WAL sidecar files) and recreates it.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteQueueError`] when removal or re-initialization fails.
    pub fn reset(config: SqliteQueueConfig) -> Result<Self, SqliteQueueError> {
        validate_store_path(&config.path)?;
        remove_db_file(&config.path)?;
        for suffix in ["-wal", "-shm"] {
            let mut sidecar = config.path.clone().into_os_string();
            sidecar.push(suffix);
            remove_db_file(Path::new(&sidecar))?;
        }
        Self::new(config)
    }

    /// Returns the store configuration.
    #[must_use]
    pub fn config(&self) -> &SqliteQueueConfig {
        &self.config
    }

    /// Checks the store's structure and reports per-table row counts.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteQueueError`] when the database cannot be read.
    pub fn verify(&self) -> Result<VerifyReport, SqliteQueueError> {
        let connection = self.lock_connection()?;
        let mut missing_tables = Vec::new();
        let mut table_counts = BTreeMap::new();
        for table in EXPECTED_TABLES {
            let present: Option<String> = connection
                .query_row(
                    "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?1",
                    params![table],
                    |row| row.get(0),
                )
                .optional()
                .map_err(|err| map_db_error(&err))?;
            if present.is_none() {
                missing_tables.push(table.to_string());
                continue;
            }
            if table != "store_meta" {
                let count: i64 = connection
                    .query_row(&format!("SELECT COUNT(1) FROM {table}"), params![], |row| row.get(0))
                    .map_err(|err| map_db_error(&err))?;
                table_counts.insert(table.to_string(), count);
            }
        }
        let schema_version: i64 = if missing_tables.iter().any(|name| name == "store_meta") {
            0
        } else {
            connection
                .query_row("SELECT version FROM store_meta LIMIT 1", params![], |row| row.get(0))
                .optional()
                .map_err(|err| map_db_error(&err))?
                .unwrap_or(0)
        };
        Ok(VerifyReport {
            schema_version,
            missing_tables,
            table_counts,
        })
    }

    /// Acquires the connection guard.
    fn lock_connection(&self) -> Result<MutexGuard<'_, Connection>, SqliteQueueError> {
        self.connection
            .lock()
            .map_err(|_| SqliteQueueError::Db("connection mutex poisoned".to_string()))
    }
}

// ============================================================================
// SECTION: RequestQueueStore Implementation
// ============================================================================

impl RequestQueueStore for SqliteQueueStore {
    fn insert(&self, payload: &RequestPayload, priority: i64) -> Result<RequestId, StoreError> {
        let connection = self.lock_connection()?;
        let created_at = unix_millis();
        match payload {
            RequestPayload::TestRun(test) => {
                connection
                    .execute(
                        "INSERT INTO test_requests (request_type, test_filter, test_platform, \
                         status, priority, created_at)
                         VALUES (?1, ?2, ?3, 'pending', ?4, ?5)",
                        params![
                            test.request_type.as_str(),
                            test.test_filter,
                            test.test_platform.as_str(),
                            priority,
                            created_at
                        ],
                    )
                    .map_err(|err| StoreError::from(map_db_error(&err)))?;
            }
            RequestPayload::MenuItem(menu) => {
                connection
                    .execute(
                        "INSERT INTO menu_item_requests (menu_path, status, priority, created_at)
                         VALUES (?1, 'pending', ?2, ?3)",
                        params![menu.menu_path, priority, created_at],
                    )
                    .map_err(|err| StoreError::from(map_db_error(&err)))?;
            }
            RequestPayload::SceneHierarchy(hierarchy) => {
                connection
                    .execute(
                        "INSERT INTO scene_hierarchy_requests (request_type, target_path, \
                         include_inactive, include_components, status, priority, created_at)
                         VALUES (?1, ?2, ?3, ?4, 'pending', ?5, ?6)",
                        params![
                            hierarchy.request_type.as_str(),
                            hierarchy.target_path,
                            i64::from(hierarchy.include_inactive),
                            i64::from(hierarchy.include_components),
                            priority,
                            created_at
                        ],
                    )
                    .map_err(|err| StoreError::from(map_db_error(&err)))?;
            }
            RequestPayload::AssetRefresh(refresh) => {
                let paths_json = serde_json::to_string(&refresh.paths)
                    .map_err(|err| StoreError::Invalid(format!("paths not serializable: {err}")))?;
                connection
                    .execute(
                        "INSERT INTO asset_refresh_requests (refresh_type, paths, import_options, \
                         status, priority, created_at)
                         VALUES (?1, ?2, ?3, 'pending', ?4, ?5)",
                        params![
                            refresh.refresh_type.as_str(),
                            paths_json,
                            refresh.import_options.as_str(),
                            priority,
                            created_at
                        ],
                    )
                    .map_err(|err| StoreError::from(map_db_error(&err)))?;
            }
        }
        let raw_id = connection.last_insert_rowid();
        let raw_id = u64::try_from(raw_id)
            .map_err(|_| StoreError::Corrupt(format!("negative rowid: {raw_id}")))?;
        RequestId::from_raw(raw_id).ok_or_else(|| StoreError::Corrupt("zero rowid".to_string()))
    }

    fn fetch(&self, kind: RequestKind, id: RequestId) -> Result<Option<RequestSnapshot>, StoreError> {
        let connection = self.lock_connection()?;
        let sql = format!("SELECT * FROM {} WHERE id = ?1", kind.table_name());
        let mut statement = connection.prepare(&sql).map_err(|err| StoreError::from(map_db_error(&err)))?;
        let mut rows = statement
            .query(params![to_row_id(id)?])
            .map_err(|err| StoreError::from(map_db_error(&err)))?;
        let Some(row) = rows.next().map_err(|err| StoreError::from(map_db_error(&err)))? else {
            return Ok(None);
        };
        Ok(Some(snapshot_from_row(kind, row)?))
    }

    fn cancel_pending(&self, kind: RequestKind, id: RequestId) -> Result<bool, StoreError> {
        let connection = self.lock_connection()?;
        let sql = format!(
            "UPDATE {} SET status = 'cancelled', completed_at = ?2 WHERE id = ?1 AND status = \
             'pending'",
            kind.table_name()
        );
        let changed = connection
            .execute(&sql, params![to_row_id(id)?, unix_millis()])
            .map_err(|err| StoreError::from(map_db_error(&err)))?;
        Ok(changed > 0)
    }

    fn list_pending(&self, kind: RequestKind) -> Result<Vec<RequestSnapshot>, StoreError> {
        let connection = self.lock_connection()?;
        let sql = format!(
            "SELECT * FROM {} WHERE status = 'pending' ORDER BY priority DESC, created_at ASC, id \
             ASC",
            kind.table_name()
        );
        let mut statement = connection.prepare(&sql).map_err(|err| StoreError::from(map_db_error(&err)))?;
        let mut rows = statement.query(params![]).map_err(|err| StoreError::from(map_db_error(&err)))?;
        let mut snapshots = Vec::new();
        while let Some(row) = rows.next().map_err(|err| StoreError::from(map_db_error(&err)))? {
            snapshots.push(snapshot_from_row(kind, row)?);
        }
        Ok(snapshots)
    }

    fn append_log(
        &self,
        kind: RequestKind,
        id: RequestId,
        level: LogLevel,
        source: &str,
        message: &str,
    ) -> Result<(), StoreError> {
        let connection = self.lock_connection()?;
        connection
            .execute(
                "INSERT INTO execution_log (request_kind, request_id, log_level, source, message, \
                 logged_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![kind.as_str(), to_row_id(id)?, level.as_str(), source, message, unix_millis()],
            )
            .map_err(|err| StoreError::from(map_db_error(&err)))?;
        Ok(())
    }

    fn readiness(&self) -> Result<(), StoreError> {
        let connection = self.lock_connection()?;
        connection
            .query_row("SELECT 1", params![], |_| Ok(()))
            .map_err(|err| StoreError::from(map_db_error(&err)))
    }
}

// ============================================================================
// SECTION: Row Mapping
// ============================================================================

/// Converts a request identifier into an `SQLite` row id.
fn to_row_id(id: RequestId) -> Result<i64, StoreError> {
    i64::try_from(id.get()).map_err(|_| StoreError::Invalid(format!("request id out of range: {id}")))
}

/// Reads a named column, mapping access failures to corruption.
fn column<T: rusqlite::types::FromSql>(row: &Row<'_>, name: &str) -> Result<T, StoreError> {
    row.get(name).map_err(|err| StoreError::Corrupt(format!("column '{name}': {err}")))
}

/// Rebuilds a snapshot from one queue row.
fn snapshot_from_row(kind: RequestKind, row: &Row<'_>) -> Result<RequestSnapshot, StoreError> {
    let raw_id: i64 = column(row, "id")?;
    let raw_id = u64::try_from(raw_id)
        .map_err(|_| StoreError::Corrupt(format!("negative rowid: {raw_id}")))?;
    let id = RequestId::from_raw(raw_id).ok_or_else(|| StoreError::Corrupt("zero rowid".to_string()))?;
    let status = RequestStatus::parse(&column::<String>(row, "status")?);
    let (payload, result) = match kind {
        RequestKind::TestRun => {
            let request_type_label: String = column(row, "request_type")?;
            let request_type = TestRequestType::parse(&request_type_label).ok_or_else(|| {
                StoreError::Corrupt(format!("unknown test request_type: {request_type_label}"))
            })?;
            let platform_label: String = column(row, "test_platform")?;
            let test_platform = TestPlatform::parse(&platform_label).ok_or_else(|| {
                StoreError::Corrupt(format!("unknown test_platform: {platform_label}"))
            })?;
            (
                RequestPayload::TestRun(TestRunPayload {
                    request_type,
                    test_filter: column(row, "test_filter")?,
                    test_platform,
                }),
                RequestResult::TestRun {
                    total_tests: column(row, "total_tests")?,
                    passed_tests: column(row, "passed_tests")?,
                    failed_tests: column(row, "failed_tests")?,
                    skipped_tests: column(row, "skipped_tests")?,
                    duration_seconds: column(row, "duration_seconds")?,
                    result_summary: column(row, "result_summary")?,
                },
            )
        }
        RequestKind::MenuItem => (
            RequestPayload::MenuItem(MenuItemPayload {
                menu_path: column(row, "menu_path")?,
            }),
            RequestResult::MenuItem {
                duration_seconds: column(row, "duration_seconds")?,
                result: column(row, "result")?,
            },
        ),
        RequestKind::SceneHierarchy => {
            let request_type_label: String = column(row, "request_type")?;
            let request_type = HierarchyRequestType::parse(&request_type_label).ok_or_else(|| {
                StoreError::Corrupt(format!("unknown hierarchy request_type: {request_type_label}"))
            })?;
            (
                RequestPayload::SceneHierarchy(SceneHierarchyPayload {
                    request_type,
                    target_path: column(row, "target_path")?,
                    include_inactive: column::<i64>(row, "include_inactive")? != 0,
                    include_components: column::<i64>(row, "include_components")? != 0,
                }),
                RequestResult::SceneHierarchy {
                    output_file: column(row, "output_file")?,
                },
            )
        }
        RequestKind::AssetRefresh => {
            let refresh_label: String = column(row, "refresh_type")?;
            let refresh_type = RefreshType::parse(&refresh_label)
                .ok_or_else(|| StoreError::Corrupt(format!("unknown refresh_type: {refresh_label}")))?;
            let options_label: String = column(row, "import_options")?;
            let import_options = ImportOptions::parse(&options_label).ok_or_else(|| {
                StoreError::Corrupt(format!("unknown import_options: {options_label}"))
            })?;
            let paths_json: Option<String> = column(row, "paths")?;
            let paths = match paths_json.as_deref() {
                None | Some("") => Vec::new(),
                Some(json) => serde_json::from_str(json)
                    .map_err(|err| StoreError::Corrupt(format!("malformed paths json: {err}")))?,
            };
            (
                RequestPayload::AssetRefresh(AssetRefreshPayload {
                    refresh_type,
                    paths,
                    import_options,
                }),
                RequestResult::AssetRefresh {
                    duration_seconds: column(row, "duration_seconds")?,
                    result_message: column(row, "result_message")?,
                },
            )
        }
    };
    Ok(RequestSnapshot {
        id,
        payload,
        priority: column(row, "priority")?,
        status,
        created_at: Timestamp::from_unix_millis(column(row, "created_at")?),
        started_at: column::<Option<i64>>(row, "started_at")?.map(Timestamp::from_unix_millis),
        completed_at: column::<Option<i64>>(row, "completed_at")?.map(Timestamp::from_unix_millis),
        result,
        error_message: column(row, "error_message")?,
    })
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Ensures the parent directory for the store exists.
fn ensure_parent_dir(path: &Path) -> Result<(), SqliteQueueError> {
    let Some(parent) = path.parent() else {
        return Err(SqliteQueueError::Io("store path missing parent directory".to_string()));
    };
    std::fs::create_dir_all(parent).map_err(|err| SqliteQueueError::Io(err.to_string()))
}

/// Validates store paths for safety limits.
fn validate_store_path(path: &Path) -> Result<(), SqliteQueueError> {
    if path.as_os_str().is_empty() {
        return Err(SqliteQueueError::Invalid("store path must not be empty".to_string()));
    }
    let path_string = path.display().to_string();
    if path_string.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(SqliteQueueError::Invalid("store path exceeds length limit".to_string()));
    }
    for component in path.components() {
        let name = component.as_os_str().to_string_lossy();
        if name.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(SqliteQueueError::Invalid(
                "store path contains an overlong component".to_string(),
            ));
        }
    }
    if path.exists() && path.is_dir() {
        return Err(SqliteQueueError::Invalid(
            "store path must be a file, not a directory".to_string(),
        ));
    }
    Ok(())
}

/// Removes a database file if it exists.
fn remove_db_file(path: &Path) -> Result<(), SqliteQueueError> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(SqliteQueueError::Io(err.to_string())),
    }
}

/// Opens an `SQLite` connection with secure defaults.
fn open_connection(config: &SqliteQueueConfig) -> Result<Connection, SqliteQueueError> {
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_CREATE
        | OpenFlags::SQLITE_OPEN_FULL_MUTEX;
    let connection =
        Connection::open_with_flags(&config.path, flags).map_err(|err| map_db_error(&err))?;
    apply_pragmas(&connection, config)?;
    Ok(connection)
}

/// Applies `SQLite` pragmas required for cross-process durability.
fn apply_pragmas(
    connection: &Connection,
    config: &SqliteQueueConfig,
) -> Result<(), SqliteQueueError> {
    connection
        .execute_batch("PRAGMA foreign_keys = ON;")
        .map_err(|err| map_db_error(&err))?;
    connection
        .execute_batch(&format!("PRAGMA journal_mode = {};", config.journal_mode.pragma_value()))
        .map_err(|err| map_db_error(&err))?;
    connection
        .execute_batch(&format!("PRAGMA synchronous = {};", config.sync_mode.pragma_value()))
        .map_err(|err| map_db_error(&err))?;
    connection
        .busy_timeout(std::time::Duration::from_millis(config.busy_timeout_ms))
        .map_err(|err| map_db_error(&err))?;
    Ok(())
}

/// Initializes the `SQLite` schema or validates the existing version.
fn initialize_schema(connection: &mut Connection) -> Result<(), SqliteQueueError> {
    let tx = connection.transaction().map_err(|err| map_db_error(&err))?;
    tx.execute_batch("CREATE TABLE IF NOT EXISTS store_meta (version INTEGER NOT NULL);")
        .map_err(|err| map_db_error(&err))?;
    let version: Option<i64> = tx
        .query_row("SELECT version FROM store_meta LIMIT 1", params![], |row| row.get(0))
        .optional()
        .map_err(|err| map_db_error(&err))?;
    match version {
        None => {
            tx.execute("INSERT INTO store_meta (version) VALUES (?1)", params![SCHEMA_VERSION])
                .map_err(|err| map_db_error(&err))?;
            tx.execute_batch(
                "CREATE TABLE IF NOT EXISTS test_requests (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    request_type TEXT NOT NULL
                        CHECK (request_type IN ('all', 'class', 'method', 'category')),
                    test_filter TEXT,
                    test_platform TEXT NOT NULL DEFAULT 'EditMode'
                        CHECK (test_platform IN ('EditMode', 'PlayMode', 'Both')),
                    status TEXT NOT NULL DEFAULT 'pending'
                        CHECK (status IN ('pending', 'running', 'processing', 'executing',
                                          'finalizing', 'completed', 'failed', 'timeout',
                                          'cancelled')),
                    priority INTEGER NOT NULL DEFAULT 0,
                    created_at INTEGER NOT NULL,
                    started_at INTEGER,
                    completed_at INTEGER,
                    total_tests INTEGER NOT NULL DEFAULT 0,
                    passed_tests INTEGER NOT NULL DEFAULT 0,
                    failed_tests INTEGER NOT NULL DEFAULT 0,
                    skipped_tests INTEGER NOT NULL DEFAULT 0,
                    duration_seconds REAL NOT NULL DEFAULT 0,
                    result_summary TEXT,
                    error_message TEXT
                );
                CREATE INDEX IF NOT EXISTS idx_test_requests_claim
                    ON test_requests (status, priority DESC, created_at ASC);
                CREATE TABLE IF NOT EXISTS menu_item_requests (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    menu_path TEXT NOT NULL,
                    status TEXT NOT NULL DEFAULT 'pending'
                        CHECK (status IN ('pending', 'running', 'processing', 'executing',
                                          'finalizing', 'completed', 'failed', 'timeout',
                                          'cancelled')),
                    priority INTEGER NOT NULL DEFAULT 0,
                    created_at INTEGER NOT NULL,
                    started_at INTEGER,
                    completed_at INTEGER,
                    duration_seconds REAL NOT NULL DEFAULT 0,
                    result TEXT,
                    error_message TEXT
                );
                CREATE INDEX IF NOT EXISTS idx_menu_item_requests_claim
                    ON menu_item_requests (status, priority DESC, created_at ASC);
                CREATE TABLE IF NOT EXISTS scene_hierarchy_requests (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    request_type TEXT NOT NULL DEFAULT 'full'
                        CHECK (request_type IN ('full', 'path')),
                    target_path TEXT,
                    include_inactive INTEGER NOT NULL DEFAULT 1,
                    include_components INTEGER NOT NULL DEFAULT 1,
                    status TEXT NOT NULL DEFAULT 'pending'
                        CHECK (status IN ('pending', 'running', 'processing', 'executing',
                                          'finalizing', 'completed', 'failed', 'timeout',
                                          'cancelled')),
                    priority INTEGER NOT NULL DEFAULT 0,
                    created_at INTEGER NOT NULL,
                    started_at INTEGER,
                    completed_at INTEGER,
                    output_file TEXT,
                    error_message TEXT
                );
                CREATE INDEX IF NOT EXISTS idx_scene_hierarchy_requests_claim
                    ON scene_hierarchy_requests (status, priority DESC, created_at ASC);
                CREATE TABLE IF NOT EXISTS asset_refresh_requests (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    refresh_type TEXT NOT NULL DEFAULT 'full'
                        CHECK (refresh_type IN ('full', 'selective')),
                    paths TEXT,
                    import_options TEXT NOT NULL DEFAULT 'default'
                        CHECK (import_options IN ('default', 'synchronous', 'force_update')),
                    status TEXT NOT NULL DEFAULT 'pending'
                        CHECK (status IN ('pending', 'running', 'processing', 'executing',
                                          'finalizing', 'completed', 'failed', 'timeout',
                                          'cancelled')),
                    priority INTEGER NOT NULL DEFAULT 0,
                    created_at INTEGER NOT NULL,
                    started_at INTEGER,
                    completed_at INTEGER,
                    duration_seconds REAL NOT NULL DEFAULT 0,
                    result_message TEXT,
                    error_message TEXT
                );
                CREATE INDEX IF NOT EXISTS idx_asset_refresh_requests_claim
                    ON asset_refresh_requests (status, priority DESC, created_at ASC);
                CREATE TABLE IF NOT EXISTS execution_log (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    request_kind TEXT NOT NULL,
                    request_id INTEGER NOT NULL,
                    log_level TEXT NOT NULL
                        CHECK (log_level IN ('DEBUG', 'INFO', 'WARNING', 'ERROR')),
                    source TEXT NOT NULL,
                    message TEXT NOT NULL,
                    logged_at INTEGER NOT NULL
                );
                CREATE INDEX IF NOT EXISTS idx_execution_log_request
                    ON execution_log (request_kind, request_id);",
            )
            .map_err(|err| map_db_error(&err))?;
        }
        Some(value) if value == SCHEMA_VERSION => {}
        Some(value) => {
            return Err(SqliteQueueError::VersionMismatch(format!(
                "unsupported schema version: {value}"
            )));
        }
    }
    tx.commit().map_err(|err| map_db_error(&err))?;
    Ok(())
}

/// Returns the current unix epoch in milliseconds.
fn unix_millis() -> i64 {
    let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default();
    i64::try_from(now.as_millis()).unwrap_or(i64::MAX)
}
