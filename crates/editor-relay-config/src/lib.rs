// crates/editor-relay-config/src/lib.rs
// ============================================================================
// Module: Editor Relay Config
// Description: Configuration loading, validation, and store discovery.
// Purpose: Resolve the shared database location and wait policy from an
//          optional TOML file with strict, fail-closed input guards.
// Dependencies: editor-relay-core, editor-relay-store-sqlite, serde,
//               thiserror, toml
// ============================================================================

//! ## Overview
//! Configuration is optional: with no file present every setting falls back
//! to a default, and the database location is discovered by walking up from
//! the working directory to the Unity project root (the directory containing
//! `Assets/`). File input is treated as untrusted and guarded for path
//! length, file size, and encoding before parsing.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use editor_relay_core::WaitPolicy;
use editor_relay_store_sqlite::SqliteQueueConfig;
use editor_relay_store_sqlite::SqliteStoreMode;
use editor_relay_store_sqlite::SqliteSyncMode;
use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default config file probed in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "editor-relay.toml";
/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "EDITOR_RELAY_CONFIG";
/// Directory under the project root holding the shared database.
pub const STORE_DIR_NAME: &str = "EditorRelay";
/// Shared database file name.
pub const STORE_FILE_NAME: &str = "coordination.db";

/// Maximum config file size accepted by the loader.
const MAX_CONFIG_BYTES: u64 = 1_048_576;
/// Maximum total config path length.
const MAX_PATH_LENGTH: usize = 4096;
/// Maximum length of a single path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Default busy timeout in milliseconds.
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;
/// Default poll interval in milliseconds.
const DEFAULT_POLL_INTERVAL_MS: u64 = 500;
/// Default wait budget in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 300;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config input rejected by a guard or semantic check.
    #[error("invalid config: {0}")]
    Invalid(String),
    /// Config file could not be read.
    #[error("config io error: {0}")]
    Io(String),
    /// Config file could not be parsed as TOML.
    #[error("config parse error: {0}")]
    Parse(String),
}

// ============================================================================
// SECTION: Config Model
// ============================================================================

/// Root configuration for the relay CLI and libraries.
///
/// # Invariants
/// - All fields have defaults; an absent file yields a valid config.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EditorRelayConfig {
    /// Store backend settings.
    #[serde(default)]
    pub store: StoreSection,
    /// Wait-loop settings.
    #[serde(default)]
    pub wait: WaitSection,
}

/// `[store]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreSection {
    /// Explicit database path; discovery is skipped when set.
    #[serde(default)]
    pub path: Option<PathBuf>,
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

impl Default for StoreSection {
    fn default() -> Self {
        Self {
            path: None,
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            journal_mode: SqliteStoreMode::default(),
            sync_mode: SqliteSyncMode::default(),
        }
    }
}

/// `[wait]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WaitSection {
    /// Delay between status polls in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Wait budget in seconds when no `--timeout` flag is given.
    #[serde(default = "default_timeout_secs")]
    pub default_timeout_secs: u64,
}

impl Default for WaitSection {
    fn default() -> Self {
        Self {
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            default_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Default busy timeout in milliseconds.
const fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

/// Default poll interval in milliseconds.
const fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL_MS
}

/// Default wait budget in seconds.
const fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

// ============================================================================
// SECTION: Loading
// ============================================================================

impl EditorRelayConfig {
    /// Loads configuration from an explicit path or the default probe.
    ///
    /// With `None`, `editor-relay.toml` is probed in the working directory
    /// and defaults are used when it is absent. An explicit path must exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a guard rejects the path or file, the
    /// file cannot be read, or parsing or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = match path {
            Some(explicit) => explicit.to_path_buf(),
            None => {
                let probe = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !probe.exists() {
                    return Ok(Self::default());
                }
                probe
            }
        };
        validate_config_path(&resolved)?;
        let metadata =
            std::fs::metadata(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if metadata.len() > MAX_CONFIG_BYTES {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let bytes = std::fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        let text = String::from_utf8(bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        let config: Self =
            toml::from_str(&text).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates semantic constraints after parsing.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.wait.poll_interval_ms == 0 {
            return Err(ConfigError::Invalid("poll_interval_ms must be greater than zero".to_string()));
        }
        if self.wait.default_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "default_timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Returns the wait policy derived from `[wait]`.
    #[must_use]
    pub fn wait_policy(&self) -> WaitPolicy {
        WaitPolicy {
            poll_interval: Duration::from_millis(self.wait.poll_interval_ms),
        }
    }

    /// Returns the wait budget used when no timeout flag is given.
    #[must_use]
    pub const fn default_timeout(&self) -> Duration {
        Duration::from_secs(self.wait.default_timeout_secs)
    }

    /// Builds the store config, discovering the database path if unset.
    #[must_use]
    pub fn sqlite_config(&self, start_dir: &Path) -> SqliteQueueConfig {
        let path = self
            .store
            .path
            .clone()
            .unwrap_or_else(|| resolve_store_path(&project_root(start_dir)));
        SqliteQueueConfig {
            path,
            busy_timeout_ms: self.store.busy_timeout_ms,
            journal_mode: self.store.journal_mode,
            sync_mode: self.store.sync_mode,
        }
    }
}

/// Validates config paths for safety limits.
fn validate_config_path(path: &Path) -> Result<(), ConfigError> {
    let path_string = path.display().to_string();
    if path_string.len() > MAX_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let name = component.as_os_str().to_string_lossy();
        if name.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

// ============================================================================
// SECTION: Store Discovery
// ============================================================================

/// Finds the Unity project root by walking up from the start directory.
///
/// The project root is the first ancestor (including the start directory
/// itself) that contains an `Assets` directory. When no ancestor qualifies
/// the start directory is returned unchanged.
#[must_use]
pub fn project_root(start: &Path) -> PathBuf {
    let mut current = Some(start);
    while let Some(dir) = current {
        if dir.join("Assets").is_dir() {
            return dir.to_path_buf();
        }
        current = dir.parent();
    }
    start.to_path_buf()
}

/// Returns the shared database path under the project root.
#[must_use]
pub fn resolve_store_path(root: &Path) -> PathBuf {
    root.join(STORE_DIR_NAME).join(STORE_FILE_NAME)
}
