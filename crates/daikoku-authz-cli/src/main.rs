// crates/daikoku-authz-cli/src/main.rs
// ============================================================================
// Module: Daikoku Authz CLI Entry Point
// Description: Command dispatcher for permission checks and config tooling.
// Purpose: Evaluate Daikoku access requests offline with localized output.
// Dependencies: clap, daikoku-authz-config, daikoku-authz-core, serde, thiserror.
// ============================================================================

//! ## Overview
//! `daikoku-authz` evaluates access requests read from JSON files through the
//! render guard, prints the effective permission table, and validates config.
//! All user-facing strings are routed through the i18n catalog. Request files
//! are untrusted and read under a hard size limit.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs::File;
use std::io::Read;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::ArgAction;
use clap::Args;
use clap::CommandFactory;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use daikoku_authz_cli::i18n::Locale;
use daikoku_authz_cli::i18n::set_locale;
use daikoku_authz_cli::t;
use daikoku_authz_config::AuditSinkKind;
use daikoku_authz_config::AuthzConfig;
use daikoku_authz_config::CONFIG_ENV_VAR;
use daikoku_authz_config::DEFAULT_CONFIG_NAME;
use daikoku_authz_core::Action;
use daikoku_authz_core::AuditSink;
use daikoku_authz_core::ErrorDispatcher;
use daikoku_authz_core::ErrorEnvelope;
use daikoku_authz_core::FileAuditSink;
use daikoku_authz_core::Guard;
use daikoku_authz_core::GuardRequest;
use daikoku_authz_core::NoopAuditSink;
use daikoku_authz_core::PermissionEvaluator;
use daikoku_authz_core::SessionContext;
use daikoku_authz_core::StderrAuditSink;
use daikoku_authz_core::Subject;
use daikoku_authz_core::Team;
use daikoku_authz_core::Tenant;
use daikoku_authz_core::UnauthorizedError;
use daikoku_authz_core::User;
use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum size of a check request JSON input.
const MAX_REQUEST_BYTES: usize = 1024 * 1024;
/// Environment variable for CLI locale selection.
const LANG_ENV: &str = "DAIKOKU_AUTHZ_LANG";
/// Exit code for a denied check.
const EXIT_DENIED: u8 = 1;
/// Exit code for usage, input, and config failures.
const EXIT_ERROR: u8 = 2;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "daikoku-authz", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue, global = true)]
    show_version: bool,
    /// Preferred output language (overrides `DAIKOKU_AUTHZ_LANG`).
    #[arg(long, value_enum, value_name = "LANG", global = true)]
    lang: Option<LangArg>,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Evaluate an access request read from a JSON file.
    Check(CheckCommand),
    /// Print the effective permission table as JSON.
    Table(TableCommand),
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Arguments for the `check` command.
#[derive(Args, Debug)]
struct CheckCommand {
    /// Path to the access request JSON file.
    #[arg(long, value_name = "PATH")]
    input: PathBuf,
    /// Optional config file path (defaults to daikoku-authz.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Write an unauthorized error to stderr when the check is denied.
    #[arg(long, action = ArgAction::SetTrue)]
    dispatch_error: bool,
}

/// Arguments for the `table` command.
#[derive(Args, Debug)]
struct TableCommand {
    /// Optional config file path (defaults to daikoku-authz.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Validate a daikoku-authz configuration file.
    Validate(ConfigValidateCommand),
}

/// Arguments for config validation.
#[derive(Args, Debug)]
struct ConfigValidateCommand {
    /// Optional config file path (defaults to daikoku-authz.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Supported CLI language selections.
#[derive(ValueEnum, Copy, Clone, Debug)]
enum LangArg {
    /// English.
    En,
    /// French.
    Fr,
}

impl From<LangArg> for Locale {
    fn from(value: LangArg) -> Self {
        match value {
            LangArg::En => Self::En,
            LangArg::Fr => Self::Fr,
        }
    }
}

/// Access request accepted by `check`, using Daikoku field names.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct CheckRequest {
    /// Connected user.
    user: User,
    /// Requested action.
    action: Action,
    /// Targeted subject.
    subject: Subject,
    /// Single team context.
    #[serde(default)]
    team: Option<Team>,
    /// Candidate teams for an any-team check.
    #[serde(default)]
    teams: Option<Vec<Team>>,
    /// Explicit tenant admin flag; derived from `tenant.admins` when absent.
    #[serde(default)]
    is_tenant_admin: Option<bool>,
    /// Tenant being acted upon; defaults to `tenant`.
    #[serde(default)]
    which_one: Option<Tenant>,
    /// Session tenant.
    #[serde(default)]
    tenant: Option<Tenant>,
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
    let env_lang = env::var(LANG_ENV).ok();
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

    match command {
        Commands::Check(command) => command_check(&command),
        Commands::Table(command) => command_table(&command),
        Commands::Config {
            command,
        } => command_config(command),
    }
}

/// Emits the top-level help message for the CLI.
fn show_help() -> CliResult<()> {
    let mut command = Cli::command();
    command.print_help().map_err(|err| CliError::new(output_error("stdout", &err)))?;
    write_stdout_line("").map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(())
}

// ============================================================================
// SECTION: Check Command
// ============================================================================

/// Executes the `check` command.
fn command_check(command: &CheckCommand) -> CliResult<ExitCode> {
    let config = load_config_or_default(command.config.as_deref())?;
    let request = read_check_request(&command.input)?;
    if request.team.is_some() && request.teams.is_some() {
        return Err(CliError::new(t!("input.team_and_teams")));
    }

    let guard = build_guard(&config)?;
    let mut session = SessionContext::new(&request.user);
    if let Some(tenant) = &request.tenant {
        session = session.with_tenant(tenant);
    }
    if let Some(is_tenant_admin) = request.is_tenant_admin {
        session.is_tenant_admin = is_tenant_admin;
    }

    let mut guard_request = GuardRequest::new(request.action, request.subject)
        .dispatch_error(command.dispatch_error || config.guard.dispatch_error);
    if let Some(team) = &request.team {
        guard_request = guard_request.on_team(team);
    }
    if let Some(teams) = &request.teams {
        guard_request = guard_request.on_teams(teams);
    }
    if let Some(which_one) = &request.which_one {
        guard_request = guard_request.which_one(which_one);
    }

    let decision = guard.check(&session, &guard_request);
    let output = serde_json::to_string(&decision)
        .map_err(|err| CliError::new(t!("output.serialize_failed", error = err)))?;
    write_stdout_line(&output).map_err(|err| CliError::new(output_error("stdout", &err)))?;
    if decision.allowed { Ok(ExitCode::SUCCESS) } else { Ok(ExitCode::from(EXIT_DENIED)) }
}

/// Reads and parses a check request under the request size limit.
fn read_check_request(path: &Path) -> CliResult<CheckRequest> {
    let bytes = read_bytes_with_limit(path, MAX_REQUEST_BYTES).map_err(|err| match err {
        ReadLimitError::Io(err) => {
            CliError::new(t!("input.read_failed", path = path.display(), error = err))
        }
        ReadLimitError::TooLarge {
            size,
            limit,
        } => CliError::new(t!("input.too_large", path = path.display(), size = size, limit = limit)),
    })?;
    serde_json::from_slice(&bytes)
        .map_err(|err| CliError::new(t!("input.parse_failed", path = path.display(), error = err)))
}

/// Builds the render guard described by the config.
fn build_guard(config: &AuthzConfig) -> CliResult<Guard> {
    let table = config
        .permission_table()
        .map_err(|err| CliError::new(t!("config.table_failed", error = err)))?;
    let audit: Arc<dyn AuditSink> = match config.audit.sink {
        AuditSinkKind::None => Arc::new(NoopAuditSink),
        AuditSinkKind::Stderr => Arc::new(StderrAuditSink),
        AuditSinkKind::File => {
            let Some(path) = config.audit.path.as_deref() else {
                return Err(CliError::new(t!("audit.path_missing")));
            };
            let sink = FileAuditSink::new(Path::new(path.trim())).map_err(|err| {
                CliError::new(t!("audit.open_failed", path = path, error = err))
            })?;
            Arc::new(sink)
        }
    };
    Ok(Guard::new(PermissionEvaluator::new(table))
        .with_audit(audit)
        .with_dispatcher(Arc::new(StderrErrorDispatcher)))
}

/// Dispatcher writing the unauthorized error envelope to stderr as JSON.
struct StderrErrorDispatcher;

impl ErrorDispatcher for StderrErrorDispatcher {
    fn dispatch(&self, error: &UnauthorizedError) {
        let envelope = ErrorEnvelope {
            error: error.clone(),
        };
        if let Ok(payload) = serde_json::to_string(&envelope) {
            let _ = write_stderr_line(&payload);
        }
    }
}

// ============================================================================
// SECTION: Table Command
// ============================================================================

/// Executes the `table` command.
fn command_table(command: &TableCommand) -> CliResult<ExitCode> {
    let config = load_config_or_default(command.config.as_deref())?;
    let table = config
        .permission_table()
        .map_err(|err| CliError::new(t!("config.table_failed", error = err)))?;
    let output = serde_json::to_string_pretty(&table)
        .map_err(|err| CliError::new(t!("output.serialize_failed", error = err)))?;
    write_stdout_line(&output).map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Config Commands
// ============================================================================

/// Dispatches config subcommands.
fn command_config(command: ConfigCommand) -> CliResult<ExitCode> {
    match command {
        ConfigCommand::Validate(command) => command_config_validate(&command),
    }
}

/// Executes the config validation command.
fn command_config_validate(command: &ConfigValidateCommand) -> CliResult<ExitCode> {
    let _config = AuthzConfig::load(command.config.as_deref())
        .map_err(|err| CliError::new(t!("config.load_failed", error = err)))?;
    write_stdout_line(&t!("config.validate.ok"))
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Loads config, falling back to defaults when no config source exists.
///
/// An explicit path or env override must load; only the implicit default
/// file may be absent.
fn load_config_or_default(path: Option<&Path>) -> CliResult<AuthzConfig> {
    if path.is_none()
        && env::var_os(CONFIG_ENV_VAR).is_none()
        && !Path::new(DEFAULT_CONFIG_NAME).exists()
    {
        return Ok(AuthzConfig::default());
    }
    AuthzConfig::load(path).map_err(|err| CliError::new(t!("config.load_failed", error = err)))
}

// ============================================================================
// SECTION: Input Helpers
// ============================================================================

/// Errors returned by bounded file reads.
#[derive(Debug)]
enum ReadLimitError {
    /// File I/O failure.
    Io(std::io::Error),
    /// File size exceeds the configured limit.
    TooLarge {
        /// Actual size in bytes.
        size: u64,
        /// Allowed limit in bytes.
        limit: usize,
    },
}

/// Reads a file from disk while enforcing a hard size limit.
fn read_bytes_with_limit(path: &Path, max_bytes: usize) -> Result<Vec<u8>, ReadLimitError> {
    let file = File::open(path).map_err(ReadLimitError::Io)?;
    let size = file.metadata().map_err(ReadLimitError::Io)?.len();
    let limit = u64::try_from(max_bytes).unwrap_or(u64::MAX);
    if size > limit {
        return Err(ReadLimitError::TooLarge {
            size,
            limit: max_bytes,
        });
    }

    let mut bytes = Vec::new();
    file.take(limit.saturating_add(1)).read_to_end(&mut bytes).map_err(ReadLimitError::Io)?;
    if bytes.len() > max_bytes {
        return Err(ReadLimitError::TooLarge {
            size: u64::try_from(bytes.len()).unwrap_or(u64::MAX),
            limit: max_bytes,
        });
    }
    Ok(bytes)
}

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

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

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

/// Emits an error message to stderr and returns the error exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::from(EXIT_ERROR)
}
