// crates/tenant-policy-cli/src/main.rs
// ============================================================================
// Module: Tenant Policy CLI Entry Point
// Description: Command dispatcher for tenant configuration workflows.
// Purpose: Validate config, list and update tenant properties, show server properties.
// Dependencies: clap, tenant-policy-config, tenant-policy-service, serde_json, thiserror.
// ============================================================================

//! ## Overview
//! The tenant policy CLI loads the service configuration, builds the
//! configuration service, and runs one operation on behalf of a configured
//! principal. The principal's tenant comes from the `[[principals]]` section.
//! Results are written to stdout as JSON; errors go to stderr with a failure
//! exit code. A rejected update prints its outcome and exits with failure.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::File;
use std::io::Read;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::ArgAction;
use clap::Args;
use clap::CommandFactory;
use clap::Parser;
use clap::Subcommand;
use serde::Serialize;
use tenant_policy_cli::t;
use tenant_policy_config::TenantPolicyConfig;
use tenant_policy_core::Principal;
use tenant_policy_core::TenantId;
use tenant_policy_service::ServerConfigService;
use thiserror::Error;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum size of a value file passed to `update --value-file`.
const MAX_VALUE_FILE_BYTES: usize = 1024 * 1024;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "tenant-policy", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue, global = true)]
    show_version: bool,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
    /// List the caller's editable tenant properties.
    Show(ShowCommand),
    /// Update one tenant property.
    Update(UpdateCommand),
    /// List masked server properties.
    Properties(PropertiesCommand),
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Validate a tenant policy configuration file.
    Validate(ConfigValidateCommand),
}

/// Arguments for config validation.
#[derive(Args, Debug)]
struct ConfigValidateCommand {
    /// Optional config file path (defaults to tenant-policy.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Arguments for `show`.
#[derive(Args, Debug)]
struct ShowCommand {
    /// Subject of the calling principal.
    #[arg(long, value_name = "SUBJECT")]
    subject: String,
    /// Optional config file path (defaults to tenant-policy.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Arguments for `update`.
#[derive(Args, Debug)]
struct UpdateCommand {
    /// Subject of the calling principal.
    #[arg(long, value_name = "SUBJECT")]
    subject: String,
    /// Property key to update.
    #[arg(long, value_name = "KEY")]
    key: String,
    /// Inline property value.
    #[arg(long, value_name = "VALUE", conflicts_with = "value_file")]
    value: Option<String>,
    /// File holding the property value.
    #[arg(long, value_name = "PATH")]
    value_file: Option<PathBuf>,
    /// Optional config file path (defaults to tenant-policy.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Arguments for `properties`.
#[derive(Args, Debug)]
struct PropertiesCommand {
    /// Subject of the calling principal.
    #[arg(long, value_name = "SUBJECT")]
    subject: String,
    /// Optional config file path (defaults to tenant-policy.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for catalog messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a catalog message.
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

/// Bounded file read failures.
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
        Commands::Config {
            command,
        } => command_config(command),
        Commands::Show(command) => command_show(&command),
        Commands::Update(command) => command_update(&command),
        Commands::Properties(command) => command_properties(&command),
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
// SECTION: Config Commands
// ============================================================================

/// Dispatches config subcommands.
fn command_config(command: ConfigCommand) -> CliResult<ExitCode> {
    match command {
        ConfigCommand::Validate(command) => command_config_validate(&command),
    }
}

/// Executes `config validate`.
fn command_config_validate(command: &ConfigValidateCommand) -> CliResult<ExitCode> {
    let _config = load_config(command.config.as_deref())?;
    write_stdout_line(&t!("config.validate.ok"))
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Service Commands
// ============================================================================

/// Executes `show`.
fn command_show(command: &ShowCommand) -> CliResult<ExitCode> {
    let config = load_config(command.config.as_deref())?;
    let tenant_id = principal_tenant(&config, &command.subject)?;
    let service = build_service(&config)?;
    let listed = service
        .get_editable_configurations(tenant_id, &Principal::new(command.subject.as_str()))
        .map_err(|err| CliError::new(t!("show.failed", tenant = tenant_id, error = err)))?;
    write_json(&listed)?;
    Ok(ExitCode::SUCCESS)
}

/// Executes `update`.
fn command_update(command: &UpdateCommand) -> CliResult<ExitCode> {
    let value = resolve_update_value(command.value.as_deref(), command.value_file.as_deref())?;
    let config = load_config(command.config.as_deref())?;
    let tenant_id = principal_tenant(&config, &command.subject)?;
    let service = build_service(&config)?;
    let outcome = service.update_configuration(
        tenant_id,
        &Principal::new(command.subject.as_str()),
        &command.key,
        &value,
    );
    write_json(&outcome)?;
    Ok(if outcome.success { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

/// Executes `properties`.
fn command_properties(command: &PropertiesCommand) -> CliResult<ExitCode> {
    let config = load_config(command.config.as_deref())?;
    let service = build_service(&config)?;
    let listed = service.get_server_properties(&Principal::new(command.subject.as_str()));
    write_json(&listed)?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Loads configuration from the CLI path or the environment defaults.
fn load_config(path: Option<&Path>) -> CliResult<TenantPolicyConfig> {
    TenantPolicyConfig::load(path)
        .map_err(|err| CliError::new(t!("config.load_failed", error = err)))
}

/// Builds the configuration service.
fn build_service(config: &TenantPolicyConfig) -> CliResult<ServerConfigService> {
    ServerConfigService::from_config(config)
        .map_err(|err| CliError::new(t!("service.init_failed", error = err)))
}

/// Returns the tenant a configured principal acts for.
fn principal_tenant(config: &TenantPolicyConfig, subject: &str) -> CliResult<TenantId> {
    config
        .principal(subject)
        .map(|principal| TenantId::new(principal.tenant_id))
        .ok_or_else(|| CliError::new(t!("principal.unknown", subject = subject)))
}

/// Returns the update value from exactly one of the inline or file sources.
fn resolve_update_value(inline: Option<&str>, file: Option<&Path>) -> CliResult<String> {
    match (inline, file) {
        (Some(value), None) => Ok(value.to_string()),
        (None, Some(path)) => {
            let bytes = read_bytes_with_limit(path, MAX_VALUE_FILE_BYTES).map_err(|err| {
                let message = match err {
                    ReadLimitError::Io(error) => {
                        t!("update.value.read_failed", path = path.display(), error = error)
                    }
                    ReadLimitError::TooLarge {
                        size,
                        limit,
                    } => t!(
                        "update.value.too_large",
                        path = path.display(),
                        size = size,
                        limit = limit
                    ),
                };
                CliError::new(message)
            })?;
            String::from_utf8(bytes)
                .map_err(|_| CliError::new(t!("update.value.not_utf8", path = path.display())))
        }
        _ => Err(CliError::new(t!("update.value.missing"))),
    }
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
    let mut limited = file.take(limit.saturating_add(1));
    let mut bytes = Vec::new();
    limited.read_to_end(&mut bytes).map_err(ReadLimitError::Io)?;
    if bytes.len() > max_bytes {
        return Err(ReadLimitError::TooLarge {
            size: u64::try_from(bytes.len()).unwrap_or(u64::MAX),
            limit: max_bytes,
        });
    }
    Ok(bytes)
}

/// Writes a value to stdout as pretty JSON.
fn write_json<T: Serialize>(value: &T) -> CliResult<()> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|err| CliError::new(t!("output.serialize_failed", error = err)))?;
    write_stdout_line(&text).map_err(|err| CliError::new(output_error("stdout", &err)))
}

/// Writes a line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats an output error message.
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
