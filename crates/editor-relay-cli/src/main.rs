// crates/editor-relay-cli/src/main.rs
// ============================================================================
// Module: Editor Relay CLI Entry Point
// Description: Command dispatcher for queued Unity Editor requests.
// Purpose: Provide a safe, localized CLI for submitting, watching, and
//          cancelling editor requests over the shared coordination database.
// Dependencies: clap, editor-relay-config, editor-relay-core,
//               editor-relay-store-sqlite, serde, serde_json, thiserror.
// ============================================================================

//! ## Overview
//! The Editor Relay CLI drives an externally running Unity Editor through a
//! shared `SQLite` queue: it submits requests, optionally waits for the
//! editor to complete them, and administers the database itself. All
//! user-facing strings are routed through the i18n catalog to prepare for
//! future localization.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::ArgAction;
use clap::Args;
use clap::CommandFactory;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use editor_relay_cli::i18n::Locale;
use editor_relay_cli::i18n::set_locale;
use editor_relay_cli::t;
use editor_relay_config::CONFIG_ENV;
use editor_relay_config::EditorRelayConfig;
use editor_relay_core::AssetRefreshPayload;
use editor_relay_core::HierarchyRequestType;
use editor_relay_core::ImportOptions;
use editor_relay_core::MenuItemPayload;
use editor_relay_core::RefreshType;
use editor_relay_core::RequestCoordinator;
use editor_relay_core::RequestId;
use editor_relay_core::RequestKind;
use editor_relay_core::RequestPayload;
use editor_relay_core::RequestResult;
use editor_relay_core::RequestSnapshot;
use editor_relay_core::RequestStatus;
use editor_relay_core::SceneHierarchyPayload;
use editor_relay_core::TestPlatform;
use editor_relay_core::TestRequestType;
use editor_relay_core::TestRunPayload;
use editor_relay_core::WaitOutcome;
use editor_relay_store_sqlite::SqliteQueueConfig;
use editor_relay_store_sqlite::SqliteQueueStore;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Environment variable for CLI locale selection.
const LANG_ENV: &str = "EDITOR_RELAY_LANG";

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "editor-relay", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue, global = true)]
    show_version: bool,
    /// Preferred output language (overrides `EDITOR_RELAY_LANG`).
    #[arg(long, value_enum, value_name = "LANG", global = true)]
    lang: Option<LangArg>,
    /// Config file path (overrides `EDITOR_RELAY_CONFIG`).
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Unity test run requests.
    Test {
        /// Selected test subcommand.
        #[command(subcommand)]
        command: TestCommand,
    },
    /// Unity menu item execution requests.
    Menu {
        /// Selected menu subcommand.
        #[command(subcommand)]
        command: MenuCommand,
    },
    /// Scene hierarchy export requests.
    Hierarchy {
        /// Selected hierarchy subcommand.
        #[command(subcommand)]
        command: HierarchyCommand,
    },
    /// Asset database refresh requests.
    Refresh {
        /// Selected refresh subcommand.
        #[command(subcommand)]
        command: RefreshCommand,
    },
    /// Coordination database administration.
    Db {
        /// Selected database subcommand.
        #[command(subcommand)]
        command: DbCommand,
    },
}

/// Test run subcommands.
#[derive(Subcommand, Debug)]
enum TestCommand {
    /// Queue a test run.
    Submit(TestSubmitCommand),
    /// Show the status of a test run request.
    Status(StatusCommand),
    /// Cancel a still-pending test run request.
    Cancel(CancelCommand),
    /// List pending test run requests in claim order.
    Pending(PendingCommand),
}

/// Menu execution subcommands.
#[derive(Subcommand, Debug)]
enum MenuCommand {
    /// Queue a menu item execution.
    Submit(MenuSubmitCommand),
    /// Show the status of a menu request.
    Status(StatusCommand),
    /// Cancel a still-pending menu request.
    Cancel(CancelCommand),
    /// List pending menu requests in claim order.
    Pending(PendingCommand),
}

/// Scene hierarchy subcommands.
#[derive(Subcommand, Debug)]
enum HierarchyCommand {
    /// Queue a scene hierarchy export.
    Submit(HierarchySubmitCommand),
    /// Show the status of a hierarchy request.
    Status(StatusCommand),
    /// Cancel a still-pending hierarchy request.
    Cancel(CancelCommand),
    /// List pending hierarchy requests in claim order.
    Pending(PendingCommand),
}

/// Asset refresh subcommands.
#[derive(Subcommand, Debug)]
enum RefreshCommand {
    /// Queue an asset database refresh.
    Submit(RefreshSubmitCommand),
    /// Show the status of a refresh request.
    Status(StatusCommand),
    /// Cancel a still-pending refresh request.
    Cancel(CancelCommand),
    /// List pending refresh requests in claim order.
    Pending(PendingCommand),
}

/// Database administration subcommands.
#[derive(Subcommand, Debug)]
enum DbCommand {
    /// Create the database and schema if absent.
    Init,
    /// Check schema structure and report row counts.
    Verify(VerifyCommand),
    /// Delete and recreate the database.
    Reset(ResetCommand),
}

/// Flags shared by every submit command.
#[derive(Args, Debug)]
struct SubmitCommonArgs {
    /// Scheduling priority; higher executes first.
    #[arg(long, default_value_t = 0)]
    priority: i64,
    /// Block until the editor finishes the request.
    #[arg(long, action = ArgAction::SetTrue)]
    wait: bool,
    /// Wait budget in seconds (defaults to configuration).
    #[arg(long, value_name = "SECONDS")]
    timeout: Option<u64>,
}

/// Arguments for `test submit`.
#[derive(Args, Debug)]
struct TestSubmitCommand {
    /// Scope of the run.
    #[arg(long, value_enum, default_value_t = TestScopeArg::All)]
    scope: TestScopeArg,
    /// Class, method, or category filter (required for scoped runs).
    #[arg(long, value_name = "FILTER")]
    filter: Option<String>,
    /// Target test platform.
    #[arg(long, value_enum, default_value_t = PlatformArg::EditMode)]
    platform: PlatformArg,
    /// Shared submit flags.
    #[command(flatten)]
    common: SubmitCommonArgs,
}

/// Arguments for `menu submit`.
#[derive(Args, Debug)]
struct MenuSubmitCommand {
    /// Full Unity menu path, e.g. `Assets/Refresh`.
    #[arg(value_name = "MENU_PATH")]
    menu_path: String,
    /// Shared submit flags.
    #[command(flatten)]
    common: SubmitCommonArgs,
}

/// Arguments for `hierarchy submit`.
#[derive(Args, Debug)]
struct HierarchySubmitCommand {
    /// Export scope.
    #[arg(long, value_enum, default_value_t = HierarchyScopeArg::Full)]
    scope: HierarchyScopeArg,
    /// Object path for scoped exports.
    #[arg(long, value_name = "OBJECT_PATH")]
    target: Option<String>,
    /// Omit inactive objects from the export.
    #[arg(long, action = ArgAction::SetTrue)]
    no_inactive: bool,
    /// Omit component lists from the export.
    #[arg(long, action = ArgAction::SetTrue)]
    no_components: bool,
    /// Shared submit flags.
    #[command(flatten)]
    common: SubmitCommonArgs,
}

/// Arguments for `refresh submit`.
#[derive(Args, Debug)]
struct RefreshSubmitCommand {
    /// Refresh scope.
    #[arg(long, value_enum, default_value_t = RefreshScopeArg::Full)]
    scope: RefreshScopeArg,
    /// Project-relative path to refresh (repeatable).
    #[arg(long = "path", value_name = "PATH")]
    paths: Vec<String>,
    /// Import options applied by the editor.
    #[arg(long, value_enum, default_value_t = ImportArg::Default)]
    import: ImportArg,
    /// Shared submit flags.
    #[command(flatten)]
    common: SubmitCommonArgs,
}

/// Arguments for status commands.
#[derive(Args, Debug)]
struct StatusCommand {
    /// Request identifier; lists the kind's pending requests when omitted.
    #[arg(value_name = "ID")]
    id: Option<u64>,
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormatArg::Text)]
    format: OutputFormatArg,
}

/// Arguments for cancel commands.
#[derive(Args, Debug)]
struct CancelCommand {
    /// Request identifier.
    #[arg(value_name = "ID")]
    id: u64,
}

/// Arguments for pending listings.
#[derive(Args, Debug)]
struct PendingCommand {
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormatArg::Text)]
    format: OutputFormatArg,
}

/// Arguments for `db verify`.
#[derive(Args, Debug)]
struct VerifyCommand {
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormatArg::Text)]
    format: OutputFormatArg,
}

/// Arguments for `db reset`.
#[derive(Args, Debug)]
struct ResetCommand {
    /// Confirm the destructive reset.
    #[arg(long, action = ArgAction::SetTrue)]
    yes: bool,
}

// ============================================================================
// SECTION: Value Enums
// ============================================================================

/// CLI locale flag values.
#[derive(ValueEnum, Debug, Clone, Copy)]
enum LangArg {
    /// English.
    En,
    /// Catalan.
    Ca,
}

impl From<LangArg> for Locale {
    fn from(lang: LangArg) -> Self {
        match lang {
            LangArg::En => Self::En,
            LangArg::Ca => Self::Ca,
        }
    }
}

/// Test run scope flag values.
#[derive(ValueEnum, Debug, Clone, Copy)]
enum TestScopeArg {
    /// Run every test.
    All,
    /// Run a single test class.
    Class,
    /// Run a single test method.
    Method,
    /// Run a test category.
    Category,
}

impl From<TestScopeArg> for TestRequestType {
    fn from(scope: TestScopeArg) -> Self {
        match scope {
            TestScopeArg::All => Self::All,
            TestScopeArg::Class => Self::Class,
            TestScopeArg::Method => Self::Method,
            TestScopeArg::Category => Self::Category,
        }
    }
}

/// Test platform flag values.
#[derive(ValueEnum, Debug, Clone, Copy)]
enum PlatformArg {
    /// Edit mode tests.
    EditMode,
    /// Play mode tests.
    PlayMode,
    /// Both platforms.
    Both,
}

impl From<PlatformArg> for TestPlatform {
    fn from(platform: PlatformArg) -> Self {
        match platform {
            PlatformArg::EditMode => Self::EditMode,
            PlatformArg::PlayMode => Self::PlayMode,
            PlatformArg::Both => Self::Both,
        }
    }
}

/// Hierarchy export scope flag values.
#[derive(ValueEnum, Debug, Clone, Copy)]
enum HierarchyScopeArg {
    /// Export the full scene hierarchy.
    Full,
    /// Export a single object path.
    Path,
}

impl From<HierarchyScopeArg> for HierarchyRequestType {
    fn from(scope: HierarchyScopeArg) -> Self {
        match scope {
            HierarchyScopeArg::Full => Self::Full,
            HierarchyScopeArg::Path => Self::Path,
        }
    }
}

/// Asset refresh scope flag values.
#[derive(ValueEnum, Debug, Clone, Copy)]
enum RefreshScopeArg {
    /// Refresh the whole asset database.
    Full,
    /// Refresh an explicit set of paths.
    Selective,
}

impl From<RefreshScopeArg> for RefreshType {
    fn from(scope: RefreshScopeArg) -> Self {
        match scope {
            RefreshScopeArg::Full => Self::Full,
            RefreshScopeArg::Selective => Self::Selective,
        }
    }
}

/// Import option flag values.
#[derive(ValueEnum, Debug, Clone, Copy)]
enum ImportArg {
    /// Unity's default import behavior.
    Default,
    /// Force a synchronous import.
    Synchronous,
    /// Force a full reimport of touched assets.
    ForceUpdate,
}

impl From<ImportArg> for ImportOptions {
    fn from(import: ImportArg) -> Self {
        match import {
            ImportArg::Default => Self::Default,
            ImportArg::Synchronous => Self::Synchronous,
            ImportArg::ForceUpdate => Self::ForceUpdate,
        }
    }
}

/// Output format flag values.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormatArg {
    /// Localized human-readable lines.
    Text,
    /// One JSON document on stdout.
    Json,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for localized error messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a localized message.
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    let env_lang = std::env::var(LANG_ENV).ok();
    let locale = resolve_locale(cli.lang, env_lang.as_deref())?;
    set_locale(locale);
    if locale != Locale::En {
        write_stderr_line(&t!("i18n.disclaimer.machine_translated"))
            .map_err(|err| CliError::new(output_error("stderr", &err)))?;
    }

    if cli.show_version {
        let version = env!("CARGO_PKG_VERSION");
        write_stdout_line(&t!("main.version", version = version))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    }

    let Some(command) = cli.command else {
        show_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    let config_path = cli.config;
    match command {
        Commands::Test {
            command,
        } => command_test(config_path.as_deref(), command),
        Commands::Menu {
            command,
        } => command_menu(config_path.as_deref(), command),
        Commands::Hierarchy {
            command,
        } => command_hierarchy(config_path.as_deref(), command),
        Commands::Refresh {
            command,
        } => command_refresh(config_path.as_deref(), command),
        Commands::Db {
            command,
        } => command_db(config_path.as_deref(), command),
    }
}

/// Prints top-level help.
fn show_help() -> CliResult<()> {
    let mut command = Cli::command();
    command.print_help().map_err(|err| CliError::new(output_error("stdout", &err)))?;
    write_stdout_line("").map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(())
}

// ============================================================================
// SECTION: Context
// ============================================================================

/// Loaded configuration plus an open coordinator.
struct RelayContext {
    /// Protocol driver over the shared database.
    coordinator: RequestCoordinator<SqliteQueueStore>,
    /// Loaded configuration.
    config: EditorRelayConfig,
}

/// Resolves the config file path from the flag or environment.
fn resolve_config_path(flag: Option<&Path>) -> Option<PathBuf> {
    flag.map(Path::to_path_buf).or_else(|| std::env::var(CONFIG_ENV).ok().map(PathBuf::from))
}

/// Loads configuration and the store config for the working directory.
fn load_store_config(flag: Option<&Path>) -> CliResult<(EditorRelayConfig, SqliteQueueConfig)> {
    let config = EditorRelayConfig::load(resolve_config_path(flag).as_deref())
        .map_err(|err| CliError::new(t!("config.load_failed", error = err)))?;
    let cwd = std::env::current_dir()
        .map_err(|err| CliError::new(t!("store.cwd_failed", error = err)))?;
    let sqlite = config.sqlite_config(&cwd);
    Ok((config, sqlite))
}

/// Opens the coordination database and builds a coordinator.
fn open_context(flag: Option<&Path>) -> CliResult<RelayContext> {
    let (config, sqlite) = load_store_config(flag)?;
    let store = SqliteQueueStore::new(sqlite)
        .map_err(|err| CliError::new(t!("store.open_failed", error = err)))?;
    let coordinator = RequestCoordinator::with_clock(
        store,
        editor_relay_core::SystemClock,
        config.wait_policy(),
    );
    Ok(RelayContext {
        coordinator,
        config,
    })
}

// ============================================================================
// SECTION: Kind Dispatchers
// ============================================================================

/// Executes `test` subcommands.
fn command_test(config_path: Option<&Path>, command: TestCommand) -> CliResult<ExitCode> {
    match command {
        TestCommand::Submit(submit) => {
            let payload = build_test_payload(&submit);
            command_submit(config_path, payload, &submit.common)
        }
        TestCommand::Status(status) => command_status(config_path, RequestKind::TestRun, &status),
        TestCommand::Cancel(cancel) => command_cancel(config_path, RequestKind::TestRun, &cancel),
        TestCommand::Pending(pending) => {
            command_pending(config_path, RequestKind::TestRun, &pending)
        }
    }
}

/// Executes `menu` subcommands.
fn command_menu(config_path: Option<&Path>, command: MenuCommand) -> CliResult<ExitCode> {
    match command {
        MenuCommand::Submit(submit) => {
            let payload = RequestPayload::MenuItem(MenuItemPayload {
                menu_path: submit.menu_path.clone(),
            });
            command_submit(config_path, payload, &submit.common)
        }
        MenuCommand::Status(status) => command_status(config_path, RequestKind::MenuItem, &status),
        MenuCommand::Cancel(cancel) => command_cancel(config_path, RequestKind::MenuItem, &cancel),
        MenuCommand::Pending(pending) => {
            command_pending(config_path, RequestKind::MenuItem, &pending)
        }
    }
}

/// Executes `hierarchy` subcommands.
fn command_hierarchy(config_path: Option<&Path>, command: HierarchyCommand) -> CliResult<ExitCode> {
    match command {
        HierarchyCommand::Submit(submit) => {
            let payload = build_hierarchy_payload(&submit);
            command_submit(config_path, payload, &submit.common)
        }
        HierarchyCommand::Status(status) => {
            command_status(config_path, RequestKind::SceneHierarchy, &status)
        }
        HierarchyCommand::Cancel(cancel) => {
            command_cancel(config_path, RequestKind::SceneHierarchy, &cancel)
        }
        HierarchyCommand::Pending(pending) => {
            command_pending(config_path, RequestKind::SceneHierarchy, &pending)
        }
    }
}

/// Executes `refresh` subcommands.
fn command_refresh(config_path: Option<&Path>, command: RefreshCommand) -> CliResult<ExitCode> {
    match command {
        RefreshCommand::Submit(submit) => {
            let payload = build_refresh_payload(&submit);
            command_submit(config_path, payload, &submit.common)
        }
        RefreshCommand::Status(status) => {
            command_status(config_path, RequestKind::AssetRefresh, &status)
        }
        RefreshCommand::Cancel(cancel) => {
            command_cancel(config_path, RequestKind::AssetRefresh, &cancel)
        }
        RefreshCommand::Pending(pending) => {
            command_pending(config_path, RequestKind::AssetRefresh, &pending)
        }
    }
}

// ============================================================================
// SECTION: Payload Builders
// ============================================================================

/// Builds a test run payload from submit flags.
fn build_test_payload(command: &TestSubmitCommand) -> RequestPayload {
    RequestPayload::TestRun(TestRunPayload {
        request_type: command.scope.into(),
        test_filter: command.filter.clone(),
        test_platform: command.platform.into(),
    })
}

/// Builds a hierarchy export payload from submit flags.
fn build_hierarchy_payload(command: &HierarchySubmitCommand) -> RequestPayload {
    RequestPayload::SceneHierarchy(SceneHierarchyPayload {
        request_type: command.scope.into(),
        target_path: command.target.clone(),
        include_inactive: !command.no_inactive,
        include_components: !command.no_components,
    })
}

/// Builds an asset refresh payload from submit flags.
fn build_refresh_payload(command: &RefreshSubmitCommand) -> RequestPayload {
    RequestPayload::AssetRefresh(AssetRefreshPayload {
        refresh_type: command.scope.into(),
        paths: command.paths.clone(),
        import_options: command.import.into(),
    })
}

// ============================================================================
// SECTION: Shared Commands
// ============================================================================

/// Submits a request and optionally waits for completion.
fn command_submit(
    config_path: Option<&Path>,
    payload: RequestPayload,
    common: &SubmitCommonArgs,
) -> CliResult<ExitCode> {
    let context = open_context(config_path)?;
    let kind = payload.kind();
    let id = context
        .coordinator
        .submit(&payload, common.priority)
        .map_err(|err| CliError::new(t!("request.failed", error = err)))?;
    write_stdout_line(&t!("submit.ok", kind = kind, id = id))
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    if !common.wait {
        return Ok(ExitCode::SUCCESS);
    }
    let timeout = resolve_timeout(common.timeout, &context.config);
    let outcome = context
        .coordinator
        .wait_for_completion(kind, id, timeout)
        .map_err(|err| CliError::new(t!("wait.store_failed", error = err)))?;
    match outcome {
        WaitOutcome::Terminal(snapshot) => {
            let succeeded = snapshot.status == RequestStatus::Completed;
            print_snapshot(&snapshot)?;
            Ok(if succeeded { ExitCode::SUCCESS } else { ExitCode::FAILURE })
        }
        WaitOutcome::LocalTimeout {
            waited,
        } => {
            write_stdout_line(&t!("wait.timeout", seconds = waited.as_secs(), id = id))
                .map_err(|err| CliError::new(output_error("stdout", &err)))?;
            Ok(ExitCode::FAILURE)
        }
        WaitOutcome::NotFound => {
            write_stdout_line(&t!("wait.not_found", id = id))
                .map_err(|err| CliError::new(output_error("stdout", &err)))?;
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Resolves the wait budget from the flag or configuration.
fn resolve_timeout(flag_secs: Option<u64>, config: &EditorRelayConfig) -> Duration {
    flag_secs.map_or_else(|| config.default_timeout(), Duration::from_secs)
}

/// Shows the current status of one request, or lists pending requests when
/// no identifier is given.
fn command_status(
    config_path: Option<&Path>,
    kind: RequestKind,
    command: &StatusCommand,
) -> CliResult<ExitCode> {
    let context = open_context(config_path)?;
    let Some(raw_id) = command.id else {
        return render_pending(&context, kind, command.format);
    };
    let Some(id) = RequestId::from_raw(raw_id) else {
        write_stdout_line(&t!("status.missing", kind = kind, id = raw_id))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::FAILURE);
    };
    let snapshot = context
        .coordinator
        .status(kind, id)
        .map_err(|err| CliError::new(t!("request.failed", error = err)))?;
    let Some(snapshot) = snapshot else {
        write_stdout_line(&t!("status.missing", kind = kind, id = raw_id))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::FAILURE);
    };
    match command.format {
        OutputFormatArg::Json => write_json(&snapshot)?,
        OutputFormatArg::Text => print_snapshot(&snapshot)?,
    }
    Ok(ExitCode::SUCCESS)
}

/// Cancels a still-pending request.
fn command_cancel(
    config_path: Option<&Path>,
    kind: RequestKind,
    command: &CancelCommand,
) -> CliResult<ExitCode> {
    let context = open_context(config_path)?;
    let cancelled = match RequestId::from_raw(command.id) {
        Some(id) => context
            .coordinator
            .cancel(kind, id)
            .map_err(|err| CliError::new(t!("request.failed", error = err)))?,
        None => false,
    };
    if cancelled {
        write_stdout_line(&t!("cancel.ok", kind = kind, id = command.id))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        Ok(ExitCode::SUCCESS)
    } else {
        write_stdout_line(&t!("cancel.denied", id = command.id))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        Ok(ExitCode::FAILURE)
    }
}

/// Lists pending requests of one kind in claim order.
fn command_pending(
    config_path: Option<&Path>,
    kind: RequestKind,
    command: &PendingCommand,
) -> CliResult<ExitCode> {
    let context = open_context(config_path)?;
    render_pending(&context, kind, command.format)
}

/// Renders the pending listing for one kind.
fn render_pending(
    context: &RelayContext,
    kind: RequestKind,
    format: OutputFormatArg,
) -> CliResult<ExitCode> {
    let pending = context
        .coordinator
        .list_pending(kind)
        .map_err(|err| CliError::new(t!("request.failed", error = err)))?;
    if format == OutputFormatArg::Json {
        write_json(&pending)?;
        return Ok(ExitCode::SUCCESS);
    }
    if pending.is_empty() {
        write_stdout_line(&t!("pending.empty", kind = kind))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    }
    for snapshot in &pending {
        write_stdout_line(&t!(
            "pending.line",
            id = snapshot.id,
            priority = snapshot.priority,
            created = snapshot.created_at
        ))
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    }
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Db Commands
// ============================================================================

/// Executes `db` subcommands.
fn command_db(config_path: Option<&Path>, command: DbCommand) -> CliResult<ExitCode> {
    match command {
        DbCommand::Init => {
            let context = open_context(config_path)?;
            let path = context.coordinator.store().config().path.display().to_string();
            write_stdout_line(&t!("db.init.ok", path = path))
                .map_err(|err| CliError::new(output_error("stdout", &err)))?;
            Ok(ExitCode::SUCCESS)
        }
        DbCommand::Verify(verify) => command_db_verify(config_path, &verify),
        DbCommand::Reset(reset) => command_db_reset(config_path, &reset),
    }
}

/// Executes `db verify`.
fn command_db_verify(config_path: Option<&Path>, command: &VerifyCommand) -> CliResult<ExitCode> {
    let context = open_context(config_path)?;
    let report = context
        .coordinator
        .store()
        .verify()
        .map_err(|err| CliError::new(t!("request.failed", error = err)))?;
    if command.format == OutputFormatArg::Json {
        write_json(&report)?;
        return Ok(if report.is_healthy() { ExitCode::SUCCESS } else { ExitCode::FAILURE });
    }
    write_stdout_line(&t!("db.verify.version", version = report.schema_version))
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    for (table, rows) in &report.table_counts {
        write_stdout_line(&t!("db.verify.count", table = table, rows = rows))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    }
    if report.is_healthy() {
        write_stdout_line(&t!("db.verify.ok"))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        Ok(ExitCode::SUCCESS)
    } else {
        if !report.missing_tables.is_empty() {
            write_stdout_line(&t!("db.verify.missing", tables = report.missing_tables.join(", ")))
                .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        }
        write_stdout_line(&t!("db.verify.failed"))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        Ok(ExitCode::FAILURE)
    }
}

/// Executes `db reset`.
fn command_db_reset(config_path: Option<&Path>, command: &ResetCommand) -> CliResult<ExitCode> {
    if !command.yes {
        write_stdout_line(&t!("db.reset.refused"))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::FAILURE);
    }
    let (_, sqlite) = load_store_config(config_path)?;
    let path = sqlite.path.display().to_string();
    SqliteQueueStore::reset(sqlite)
        .map_err(|err| CliError::new(t!("store.open_failed", error = err)))?;
    write_stdout_line(&t!("db.reset.ok", path = path))
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Snapshot Rendering
// ============================================================================

/// Prints one request snapshot as localized text lines.
fn print_snapshot(snapshot: &RequestSnapshot) -> CliResult<()> {
    let mut lines = Vec::new();
    lines.push(t!(
        "status.header",
        id = snapshot.id,
        kind = snapshot.kind(),
        status = snapshot.status
    ));
    lines.push(t!("status.priority", priority = snapshot.priority));
    lines.push(t!("status.created", created = snapshot.created_at));
    if let Some(started) = snapshot.started_at {
        lines.push(t!("status.started", started = started));
    }
    if let Some(completed) = snapshot.completed_at {
        lines.push(t!("status.finished", completed = completed));
    }
    if snapshot.status.is_terminal() {
        append_result_lines(&mut lines, &snapshot.result);
    }
    if let Some(error) = &snapshot.error_message {
        lines.push(t!("status.error_message", error = error));
    }
    for line in lines {
        write_stdout_line(&line).map_err(|err| CliError::new(output_error("stdout", &err)))?;
    }
    Ok(())
}

/// Appends the kind-specific result lines to the rendered output.
fn append_result_lines(lines: &mut Vec<String>, result: &RequestResult) {
    match result {
        RequestResult::TestRun {
            total_tests,
            passed_tests,
            failed_tests,
            skipped_tests,
            duration_seconds,
            result_summary,
        } => {
            lines.push(t!(
                "summary.test.counts",
                passed = passed_tests,
                failed = failed_tests,
                skipped = skipped_tests,
                total = total_tests
            ));
            lines.push(t!("summary.duration", seconds = duration_seconds));
            if let Some(summary) = result_summary {
                lines.push(t!("summary.test.summary", summary = summary));
            }
        }
        RequestResult::MenuItem {
            duration_seconds,
            result,
        } => {
            lines.push(t!("summary.duration", seconds = duration_seconds));
            if let Some(result) = result {
                lines.push(t!("summary.menu.result", result = result));
            }
        }
        RequestResult::SceneHierarchy {
            output_file,
        } => {
            if let Some(path) = output_file {
                lines.push(t!("summary.hierarchy.output", path = path));
            }
        }
        RequestResult::AssetRefresh {
            duration_seconds,
            result_message,
        } => {
            lines.push(t!("summary.duration", seconds = duration_seconds));
            if let Some(message) = result_message {
                lines.push(t!("summary.refresh.result", result = message));
            }
        }
    }
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Resolves the CLI locale from flags or environment.
fn resolve_locale(lang: Option<LangArg>, env_lang: Option<&str>) -> CliResult<Locale> {
    if let Some(lang) = lang {
        return Ok(lang.into());
    }
    if let Some(value) = env_lang {
        return Locale::parse(value).ok_or_else(|| {
            CliError::new(t!("i18n.lang.invalid_env", env = LANG_ENV, value = value))
        });
    }
    Ok(Locale::En)
}

/// Writes a value as one JSON line on stdout.
fn write_json<T: serde::Serialize>(value: &T) -> CliResult<()> {
    let rendered = serde_json::to_string(value)
        .map_err(|err| CliError::new(t!("json.serialize_failed", error = err)))?;
    write_stdout_line(&rendered).map_err(|err| CliError::new(output_error("stdout", &err)))
}

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats a localized output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    let stream_label = match stream {
        "stdout" => t!("output.stream.stdout"),
        "stderr" => t!("output.stream.stderr"),
        _ => t!("output.stream.unknown"),
    };
    t!("output.write_failed", stream = stream_label, error = error)
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
