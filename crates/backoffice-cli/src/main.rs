// crates/backoffice-cli/src/main.rs
// ============================================================================
// Module: Backoffice CLI Entry Point
// Description: Command dispatcher for serving and store administration.
// Purpose: Run the HTTP service and prepare its database from one binary.
// Dependencies: clap, backoffice-config, backoffice-server, serde, tokio.
// ============================================================================

//! ## Overview
//! The `backoffice` binary loads the TOML configuration, then either serves
//! HTTP or performs one administrative task against the configured store:
//! creating the content schema, reseeding tables from JSON, or rotating a
//! user's secret. Secrets are read from the environment, never from argv.

// ============================================================================
// SECTION: Modules
// ============================================================================

mod seed;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::File;
use std::io::Read;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;

use backoffice_config::BackofficeConfig;
use backoffice_core::RecordStore;
use backoffice_server::BackofficeServer;
use backoffice_server::digest_secret;
use backoffice_store_sqlite::SqliteRecordStore;
use clap::Args;
use clap::Parser;
use clap::Subcommand;
use thiserror::Error;

use crate::seed::SeedFile;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Environment variable carrying the secret for `user set-password`.
const PASSWORD_ENV: &str = "BACKOFFICE_PASSWORD";
/// Maximum accepted seed file size in bytes.
const MAX_SEED_BYTES: u64 = 16 * 1024 * 1024;
/// Minimum accepted user secret length.
const MIN_PASSWORD_CHARS: usize = 8;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "backoffice", version, disable_help_subcommand = true)]
struct Cli {
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP server.
    Serve(ConfigArgs),
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
    /// Database utilities.
    Db {
        /// Selected database subcommand.
        #[command(subcommand)]
        command: DbCommand,
    },
    /// User credential utilities.
    User {
        /// Selected user subcommand.
        #[command(subcommand)]
        command: UserCommand,
    },
}

/// Shared config file selection.
#[derive(Args, Debug)]
struct ConfigArgs {
    /// Optional config file path (defaults to backoffice.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Configuration subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Validate a configuration file.
    Validate(ConfigArgs),
}

/// Database subcommands.
#[derive(Subcommand, Debug)]
enum DbCommand {
    /// Create the content tables when missing.
    Init(ConfigArgs),
    /// Replace table contents from a JSON seed file.
    Seed(DbSeedCommand),
}

/// Arguments for `db seed`.
#[derive(Args, Debug)]
struct DbSeedCommand {
    /// Config file selection.
    #[command(flatten)]
    config: ConfigArgs,
    /// Seed file: a JSON object mapping table names to record arrays.
    #[arg(long, value_name = "FILE")]
    file: PathBuf,
}

/// User subcommands.
#[derive(Subcommand, Debug)]
enum UserCommand {
    /// Create a user or rotate its secret (read from `BACKOFFICE_PASSWORD`).
    SetPassword(SetPasswordCommand),
}

/// Arguments for `user set-password`.
#[derive(Args, Debug)]
struct SetPasswordCommand {
    /// Config file selection.
    #[command(flatten)]
    config: ConfigArgs,
    /// Login name.
    #[arg(long, value_name = "NAME")]
    username: String,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`].
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
#[tokio::main(flavor = "multi_thread")]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
async fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Serve(command) => command_serve(command).await,
        Commands::Config {
            command: ConfigCommand::Validate(command),
        } => command_config_validate(&command),
        Commands::Db {
            command,
        } => match command {
            DbCommand::Init(command) => command_db_init(&command),
            DbCommand::Seed(command) => command_db_seed(&command),
        },
        Commands::User {
            command: UserCommand::SetPassword(command),
        } => command_user_set_password(&command),
    }
}

// ============================================================================
// SECTION: Commands
// ============================================================================

/// Executes the `serve` command.
async fn command_serve(command: ConfigArgs) -> CliResult<ExitCode> {
    let config = load_config(&command)?;
    let bind = config.server.bind.clone();
    let server = tokio::task::spawn_blocking(move || BackofficeServer::from_config(config))
        .await
        .map_err(|err| CliError::new(format!("server init failed: init join failed: {err}")))?
        .map_err(|err| CliError::new(format!("server init failed: {err}")))?;
    write_stderr_line(&format!("backoffice listening on {bind}"))
        .map_err(|err| CliError::new(output_error("stderr", &err)))?;
    server.serve().await.map_err(|err| CliError::new(format!("server failed: {err}")))?;
    Ok(ExitCode::SUCCESS)
}

/// Executes `config validate`.
fn command_config_validate(command: &ConfigArgs) -> CliResult<ExitCode> {
    let _config = load_config(command)?;
    write_stdout_line("config ok").map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Executes `db init`.
fn command_db_init(command: &ConfigArgs) -> CliResult<ExitCode> {
    let config = load_config(command)?;
    let store = open_store(&config)?;
    store
        .initialize_content_schema()
        .map_err(|err| CliError::new(format!("schema init failed: {err}")))?;
    write_stdout_line(&format!("initialized {}", config.database.path.display()))
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Executes `db seed`.
fn command_db_seed(command: &DbSeedCommand) -> CliResult<ExitCode> {
    let config = load_config(&command.config)?;
    let bytes = read_bytes_with_limit(&command.file, MAX_SEED_BYTES)?;
    let seed: SeedFile = serde_json::from_slice(&bytes)
        .map_err(|err| CliError::new(format!("invalid seed file: {err}")))?;
    let tables = seed.into_tables();
    let counts: Vec<(String, usize)> =
        tables.iter().map(|(table, records)| (table.clone(), records.len())).collect();
    let store = open_store(&config)?;
    store.replace_tables(tables).map_err(|err| CliError::new(format!("seed failed: {err}")))?;
    for (table, count) in counts {
        write_stdout_line(&format!("seeded {table}: {count} records"))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    }
    Ok(ExitCode::SUCCESS)
}

/// Executes `user set-password`.
fn command_user_set_password(command: &SetPasswordCommand) -> CliResult<ExitCode> {
    let config = load_config(&command.config)?;
    let secret = std::env::var(PASSWORD_ENV)
        .map_err(|_| CliError::new(format!("{PASSWORD_ENV} must be set")))?;
    validate_password(&secret)?;
    let store = open_store(&config)?;
    store
        .set_user_secret(&command.username, &digest_secret(&secret))
        .map_err(|err| CliError::new(format!("set-password failed: {err}")))?;
    write_stdout_line(&format!("password set for {}", command.username.trim()))
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Loads and validates the selected configuration.
fn load_config(command: &ConfigArgs) -> CliResult<BackofficeConfig> {
    BackofficeConfig::load(command.config.as_deref())
        .map_err(|err| CliError::new(format!("failed to load config: {err}")))
}

/// Opens the configured store.
fn open_store(config: &BackofficeConfig) -> CliResult<SqliteRecordStore> {
    let store = SqliteRecordStore::open(&config.database.store_config())
        .map_err(|err| CliError::new(format!("failed to open database: {err}")))?;
    Ok(store.with_identifier_rule(config.data.identifier_rule()))
}

/// Rejects secrets too short to be useful.
fn validate_password(secret: &str) -> CliResult<()> {
    if secret.chars().count() < MIN_PASSWORD_CHARS {
        return Err(CliError::new(format!(
            "{PASSWORD_ENV} must be at least {MIN_PASSWORD_CHARS} characters"
        )));
    }
    Ok(())
}

/// Reads a file, failing once it exceeds the limit.
fn read_bytes_with_limit(path: &Path, max_bytes: u64) -> CliResult<Vec<u8>> {
    let file = File::open(path)
        .map_err(|err| CliError::new(format!("failed to read {}: {err}", path.display())))?;
    let mut bytes = Vec::new();
    file.take(max_bytes + 1)
        .read_to_end(&mut bytes)
        .map_err(|err| CliError::new(format!("failed to read {}: {err}", path.display())))?;
    if u64::try_from(bytes.len()).unwrap_or(u64::MAX) > max_bytes {
        return Err(CliError::new(format!(
            "{} exceeds the {max_bytes} byte limit",
            path.display()
        )));
    }
    Ok(bytes)
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

/// Formats an output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    format!("failed to write to {stream}: {error}")
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
