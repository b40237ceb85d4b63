// crates/editor-relay-core/src/core/request.rs
// ============================================================================
// Module: Editor Relay Request Model
// Description: Request kinds, payloads, statuses, and row snapshots.
// Purpose: Capture the per-kind payload contracts and the protocol state
//          machine shared by every queue table.
// Dependencies: crate::core::{identifiers, time}, serde, thiserror
// ============================================================================

//! ## Overview
//! Each request kind maps to one queue table with its own payload columns.
//! The status vocabulary is shared: `pending`, an open set of in-flight
//! labels written by the external executor, and the four terminal statuses.
//! Payload validation rejects contract violations before any store write.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::identifiers::RequestId;
use crate::core::time::Timestamp;

// ============================================================================
// SECTION: Request Kinds
// ============================================================================

/// Category of queued request, one queue table per kind.
///
/// # Invariants
/// - Wire labels and table names are stable for serialization and SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestKind {
    /// Unity test run (EditMode/PlayMode).
    TestRun,
    /// Unity menu item execution.
    MenuItem,
    /// Scene hierarchy export.
    SceneHierarchy,
    /// Asset database refresh.
    AssetRefresh,
}

impl RequestKind {
    /// All request kinds in presentation order.
    pub const ALL: [Self; 4] = [Self::TestRun, Self::MenuItem, Self::SceneHierarchy, Self::AssetRefresh];

    /// Returns the stable wire label for the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TestRun => "test_run",
            Self::MenuItem => "menu_item",
            Self::SceneHierarchy => "scene_hierarchy",
            Self::AssetRefresh => "asset_refresh",
        }
    }

    /// Returns the queue table name for the kind.
    #[must_use]
    pub const fn table_name(self) -> &'static str {
        match self {
            Self::TestRun => "test_requests",
            Self::MenuItem => "menu_item_requests",
            Self::SceneHierarchy => "scene_hierarchy_requests",
            Self::AssetRefresh => "asset_refresh_requests",
        }
    }

    /// Attempts to parse a wire label into a kind.
    #[must_use]
    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "test_run" => Some(Self::TestRun),
            "menu_item" => Some(Self::MenuItem),
            "scene_hierarchy" => Some(Self::SceneHierarchy),
            "asset_refresh" => Some(Self::AssetRefresh),
            _ => None,
        }
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Request Status
// ============================================================================

/// Terminal status label for `completed`.
const STATUS_COMPLETED: &str = "completed";
/// Terminal status label for `failed`.
const STATUS_FAILED: &str = "failed";
/// Terminal status label for `cancelled`.
const STATUS_CANCELLED: &str = "cancelled";
/// Terminal status label for executor-side `timeout`.
const STATUS_TIMEOUT: &str = "timeout";
/// Initial status label for `pending`.
const STATUS_PENDING: &str = "pending";

/// Request lifecycle status.
///
/// # Invariants
/// - Only the terminal set is hardcoded; any other label observed in the
///   store is carried as [`RequestStatus::InFlight`] and treated as still
///   running. The executor's intermediate vocabulary (`running`,
///   `processing`, `executing`, `finalizing`, ...) has grown over time and
///   must not be enumerated here.
/// - Transitions are monotonic; no request regresses from a terminal status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RequestStatus {
    /// Submitted and not yet claimed by the executor.
    Pending,
    /// Claimed by the executor; the label is the executor's own vocabulary.
    InFlight(String),
    /// Executor finished the request successfully.
    Completed,
    /// Executor reported a failure.
    Failed,
    /// Cancelled before any executor claim.
    Cancelled,
    /// Executor-side execution budget exceeded.
    Timeout,
}

impl RequestStatus {
    /// Parses a stored status label.
    #[must_use]
    pub fn parse(label: &str) -> Self {
        match label {
            STATUS_PENDING => Self::Pending,
            STATUS_COMPLETED => Self::Completed,
            STATUS_FAILED => Self::Failed,
            STATUS_CANCELLED => Self::Cancelled,
            STATUS_TIMEOUT => Self::Timeout,
            other => Self::InFlight(other.to_string()),
        }
    }

    /// Returns the stored status label.
    #[must_use]
    pub fn as_label(&self) -> &str {
        match self {
            Self::Pending => STATUS_PENDING,
            Self::InFlight(label) => label,
            Self::Completed => STATUS_COMPLETED,
            Self::Failed => STATUS_FAILED,
            Self::Cancelled => STATUS_CANCELLED,
            Self::Timeout => STATUS_TIMEOUT,
        }
    }

    /// Reports whether the status is terminal.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Cancelled | Self::Timeout)
    }
}

impl From<String> for RequestStatus {
    fn from(label: String) -> Self {
        Self::parse(&label)
    }
}

impl From<RequestStatus> for String {
    fn from(status: RequestStatus) -> Self {
        status.as_label().to_string()
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

// ============================================================================
// SECTION: Payload Vocabulary
// ============================================================================

/// Scope of a test run request.
///
/// # Invariants
/// - Wire labels match the `request_type` column CHECK constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestRequestType {
    /// Run every test.
    All,
    /// Run a single test class.
    Class,
    /// Run a single test method.
    Method,
    /// Run a test category.
    Category,
}

impl TestRequestType {
    /// Returns the stored column label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Class => "class",
            Self::Method => "method",
            Self::Category => "category",
        }
    }

    /// Attempts to parse a stored column label.
    #[must_use]
    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "all" => Some(Self::All),
            "class" => Some(Self::Class),
            "method" => Some(Self::Method),
            "category" => Some(Self::Category),
            _ => None,
        }
    }
}

/// Unity test platform selection.
///
/// # Invariants
/// - Wire labels match the `test_platform` column CHECK constraint, which
///   uses Unity's own casing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TestPlatform {
    /// Edit mode tests.
    EditMode,
    /// Play mode tests.
    PlayMode,
    /// Both platforms.
    Both,
}

impl TestPlatform {
    /// Returns the stored column label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EditMode => "EditMode",
            Self::PlayMode => "PlayMode",
            Self::Both => "Both",
        }
    }

    /// Attempts to parse a stored column label.
    #[must_use]
    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "EditMode" => Some(Self::EditMode),
            "PlayMode" => Some(Self::PlayMode),
            "Both" => Some(Self::Both),
            _ => None,
        }
    }
}

/// Scope of a scene hierarchy export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HierarchyRequestType {
    /// Export the full scene hierarchy.
    Full,
    /// Export a single object path and its children.
    Path,
}

impl HierarchyRequestType {
    /// Returns the stored column label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Path => "path",
        }
    }

    /// Attempts to parse a stored column label.
    #[must_use]
    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "full" => Some(Self::Full),
            "path" => Some(Self::Path),
            _ => None,
        }
    }
}

/// Scope of an asset database refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshType {
    /// Refresh the whole asset database.
    Full,
    /// Refresh an explicit set of paths.
    Selective,
}

impl RefreshType {
    /// Returns the stored column label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Selective => "selective",
        }
    }

    /// Attempts to parse a stored column label.
    #[must_use]
    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "full" => Some(Self::Full),
            "selective" => Some(Self::Selective),
            _ => None,
        }
    }
}

/// Import options applied during an asset refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportOptions {
    /// Unity's default import behavior.
    Default,
    /// Force a synchronous import.
    Synchronous,
    /// Force a full reimport of touched assets.
    ForceUpdate,
}

impl ImportOptions {
    /// Returns the stored column label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Synchronous => "synchronous",
            Self::ForceUpdate => "force_update",
        }
    }

    /// Attempts to parse a stored column label.
    #[must_use]
    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "default" => Some(Self::Default),
            "synchronous" => Some(Self::Synchronous),
            "force_update" => Some(Self::ForceUpdate),
            _ => None,
        }
    }
}

// ============================================================================
// SECTION: Payloads
// ============================================================================

/// Payload for a test run request.
///
/// # Invariants
/// - `test_filter` is required and non-empty unless `request_type` is
///   [`TestRequestType::All`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestRunPayload {
    /// Scope of the run.
    pub request_type: TestRequestType,
    /// Class, method, or category filter.
    pub test_filter: Option<String>,
    /// Target test platform.
    pub test_platform: TestPlatform,
}

/// Payload for a menu item execution request.
///
/// # Invariants
/// - `menu_path` is non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItemPayload {
    /// Full Unity menu path, e.g. `Assets/Refresh`.
    pub menu_path: String,
}

/// Payload for a scene hierarchy export request.
///
/// # Invariants
/// - `target_path` is required and non-empty when `request_type` is
///   [`HierarchyRequestType::Path`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneHierarchyPayload {
    /// Export scope.
    pub request_type: HierarchyRequestType,
    /// Object path for scoped exports.
    pub target_path: Option<String>,
    /// Whether inactive objects are included.
    pub include_inactive: bool,
    /// Whether component lists are included.
    pub include_components: bool,
}

/// Payload for an asset refresh request.
///
/// # Invariants
/// - `paths` is non-empty when `refresh_type` is [`RefreshType::Selective`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRefreshPayload {
    /// Refresh scope.
    pub refresh_type: RefreshType,
    /// Project-relative paths for selective refreshes.
    pub paths: Vec<String>,
    /// Import options applied by the executor.
    pub import_options: ImportOptions,
}

/// Kind-discriminated request payload.
///
/// # Invariants
/// - The variant determines the queue table the request is written to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RequestPayload {
    /// Unity test run.
    TestRun(TestRunPayload),
    /// Unity menu item execution.
    MenuItem(MenuItemPayload),
    /// Scene hierarchy export.
    SceneHierarchy(SceneHierarchyPayload),
    /// Asset database refresh.
    AssetRefresh(AssetRefreshPayload),
}

impl RequestPayload {
    /// Returns the request kind for the payload variant.
    #[must_use]
    pub const fn kind(&self) -> RequestKind {
        match self {
            Self::TestRun(_) => RequestKind::TestRun,
            Self::MenuItem(_) => RequestKind::MenuItem,
            Self::SceneHierarchy(_) => RequestKind::SceneHierarchy,
            Self::AssetRefresh(_) => RequestKind::AssetRefresh,
        }
    }

    /// Validates the kind's required-field contract.
    ///
    /// Runs before any store write; a rejected payload leaves the queue
    /// untouched.
    ///
    /// # Errors
    ///
    /// Returns [`PayloadError`] when a required field is missing or empty.
    pub fn validate(&self) -> Result<(), PayloadError> {
        match self {
            Self::TestRun(payload) => {
                if payload.request_type != TestRequestType::All
                    && payload.test_filter.as_deref().is_none_or(|filter| filter.trim().is_empty())
                {
                    return Err(PayloadError::MissingTestFilter {
                        request_type: payload.request_type.as_str(),
                    });
                }
                Ok(())
            }
            Self::MenuItem(payload) => {
                if payload.menu_path.trim().is_empty() {
                    return Err(PayloadError::EmptyMenuPath);
                }
                Ok(())
            }
            Self::SceneHierarchy(payload) => {
                if payload.request_type == HierarchyRequestType::Path
                    && payload.target_path.as_deref().is_none_or(|path| path.trim().is_empty())
                {
                    return Err(PayloadError::MissingTargetPath);
                }
                Ok(())
            }
            Self::AssetRefresh(payload) => {
                if payload.refresh_type == RefreshType::Selective && payload.paths.is_empty() {
                    return Err(PayloadError::EmptyRefreshPaths);
                }
                Ok(())
            }
        }
    }
}

/// Payload contract violations rejected before any store write.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayloadError {
    /// A scoped test run was submitted without a filter.
    #[error("test filter is required for '{request_type}' runs")]
    MissingTestFilter {
        /// Scope label that required the filter.
        request_type: &'static str,
    },
    /// Menu execution requires a non-empty menu path.
    #[error("menu path must not be empty")]
    EmptyMenuPath,
    /// A path-scoped hierarchy export was submitted without a target.
    #[error("target path is required for 'path' exports")]
    MissingTargetPath,
    /// A selective refresh was submitted without paths.
    #[error("at least one path is required for selective refreshes")]
    EmptyRefreshPaths,
}

// ============================================================================
// SECTION: Results and Snapshots
// ============================================================================

/// Kind-specific result fields populated by the external executor.
///
/// # Invariants
/// - Meaningful only once the request reached a terminal status; until then
///   the fields hold the column defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RequestResult {
    /// Test run counters and summary.
    TestRun {
        /// Total tests executed.
        total_tests: i64,
        /// Tests that passed.
        passed_tests: i64,
        /// Tests that failed.
        failed_tests: i64,
        /// Tests that were skipped.
        skipped_tests: i64,
        /// Wall-clock run duration in seconds.
        duration_seconds: f64,
        /// Free-form result summary written by the executor.
        result_summary: Option<String>,
    },
    /// Menu execution result.
    MenuItem {
        /// Wall-clock execution duration in seconds.
        duration_seconds: f64,
        /// Free-form result written by the executor.
        result: Option<String>,
    },
    /// Scene hierarchy export result.
    SceneHierarchy {
        /// Path of the exported hierarchy file.
        output_file: Option<String>,
    },
    /// Asset refresh result.
    AssetRefresh {
        /// Wall-clock refresh duration in seconds.
        duration_seconds: f64,
        /// Free-form result message written by the executor.
        result_message: Option<String>,
    },
}

/// Read-only snapshot of one queue row.
///
/// # Invariants
/// - `started_at` is set only once the status first left `pending`;
///   `completed_at` only once a terminal status was entered.
/// - `error_message` is populated only in terminal states.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestSnapshot {
    /// Store-assigned identifier.
    pub id: RequestId,
    /// Payload echo reconstructed from the row's kind columns.
    pub payload: RequestPayload,
    /// Scheduling priority; higher executes first.
    pub priority: i64,
    /// Current lifecycle status.
    pub status: RequestStatus,
    /// Insertion timestamp stamped by the store.
    pub created_at: Timestamp,
    /// Timestamp of the executor's claim, if any.
    pub started_at: Option<Timestamp>,
    /// Timestamp of the terminal transition, if any.
    pub completed_at: Option<Timestamp>,
    /// Kind-specific result fields.
    pub result: RequestResult,
    /// Error detail for unsuccessful terminal states.
    pub error_message: Option<String>,
}

impl RequestSnapshot {
    /// Returns the request kind for the snapshot.
    #[must_use]
    pub const fn kind(&self) -> RequestKind {
        self.payload.kind()
    }
}
