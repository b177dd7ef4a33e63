// # clouddns - single-record Cloud DNS upsert
//
// This binary is the thin shell around clouddns-core:
// 1. Parse flags and resolve environment defaults (once, here)
// 2. Build the zone descriptor and desired record
// 3. Pick a recorder from the registry
// 4. Run the reconciler and print the result
//
// ## Configuration
//
// - `DNS_DOMAIN`, `DNS_ZONE`, `GOOGLE_CLOUD_PROJECT`: defaults for -domain, -zone, -project
// - `CLOUDDNS_ACCESS_TOKEN`: OAuth2 token (otherwise the metadata server is used)
// - `CLOUDDNS_DRY_RUN`: skip create/replace
// - `CLOUDDNS_LOG_LEVEL`: trace, debug, info, warn, error (default: warn)
//
// ## Example
//
// ```bash
// clouddns -zone w-uname-link -domain w.uname.link. -key api.w.uname.link. -data 10.10.10.10
// # Updated: {"RType":"A","RData":["10.10.10.10"],"RKey":"api.w.uname.link.","TTL":60}
// ```

mod cli;

use anyhow::Result;
use clap::Parser;
use clap::error::ErrorKind;
use clouddns_core::{reconcile, Defaults, RecorderRegistry};
use std::env;
use std::io::Write;
use std::process::ExitCode;
use tracing::{Level, debug, error};
use tracing_subscriber::FmtSubscriber;

use crate::cli::{Cli, USAGE};

/// Exit codes for the different ways a run can end
///
/// - 0: Record reconciled, or nothing to reconcile (`-env`, `-help`)
/// - 1: Configuration or usage error, no backend call made
/// - 2: Backend error during reconciliation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClouddnsExitCode {
    /// Normal exit
    Success = 0,
    /// Configuration error or missing zone
    ConfigError = 1,
    /// Reconciliation failed
    RuntimeError = 2,
}

impl From<ClouddnsExitCode> for ExitCode {
    fn from(code: ClouddnsExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

fn main() -> ExitCode {
    let cli = match parse_cli(env::args_os()) {
        Ok(cli) => cli,
        Err(code) => return code.into(),
    };

    let log_level = match log_level(env::var("CLOUDDNS_LOG_LEVEL").ok(), cli.verbose) {
        Ok(level) => level,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ClouddnsExitCode::ConfigError.into();
        }
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return ClouddnsExitCode::ConfigError.into();
    }

    // The only place the process environment is consulted for zone defaults
    let defaults = Defaults::from_lookup(|name| env::var(name).ok());

    let registry = RecorderRegistry::with_builtin();
    #[cfg(feature = "gcp")]
    clouddns_provider_gcp::register(&registry);

    let mut stdout = std::io::stdout().lock();
    execute(&cli, &defaults, &registry, &mut stdout).into()
}

/// Parse arguments, mapping clap's own exit paths onto [`ClouddnsExitCode`]
///
/// Help and version output exit through clap as usual; any other parse
/// failure is reported on stderr as a usage error.
fn parse_cli<I>(args: I) -> std::result::Result<Cli, ClouddnsExitCode>
where
    I: IntoIterator<Item = std::ffi::OsString>,
{
    match Cli::try_parse_from(cli::normalize_args(args)) {
        Ok(cli) => Ok(cli),
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => e.exit(),
            _ => {
                let _ = e.print();
                Err(ClouddnsExitCode::ConfigError)
            }
        },
    }
}

/// Resolve the log level from `CLOUDDNS_LOG_LEVEL` and `-v` flags
///
/// `-v` flags win over the environment variable.
fn log_level(from_env: Option<String>, verbose: u8) -> Result<Level> {
    match verbose {
        0 => {}
        1 => return Ok(Level::INFO),
        2 => return Ok(Level::DEBUG),
        _ => return Ok(Level::TRACE),
    }

    let Some(value) = from_env else {
        return Ok(Level::WARN);
    };

    match value.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => anyhow::bail!(
            "CLOUDDNS_LOG_LEVEL '{}' is not valid. \
            Valid levels: trace, debug, info, warn, error",
            value
        ),
    }
}

/// Run one invocation, writing user-facing output to `out`
///
/// Startup and configuration errors go to stderr; the `Updated:` line, the
/// `-env` dump, usage text and reconciliation errors go to `out`.
fn execute<W: Write>(
    cli: &Cli,
    defaults: &Defaults,
    registry: &RecorderRegistry,
    out: &mut W,
) -> ClouddnsExitCode {
    match try_execute(cli, defaults, registry, out) {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ClouddnsExitCode::ConfigError
        }
    }
}

fn try_execute<W: Write>(
    cli: &Cli,
    defaults: &Defaults,
    registry: &RecorderRegistry,
    out: &mut W,
) -> Result<ClouddnsExitCode> {
    if cli.env {
        writeln!(out, "{}", cli.env_info(defaults).to_json()?)?;
        return Ok(ClouddnsExitCode::Success);
    }

    let zone = cli.zone_descriptor(defaults);
    if zone.managed_zone.is_empty() {
        writeln!(out, "{}", USAGE)?;
        return Ok(ClouddnsExitCode::ConfigError);
    }

    let desired = cli.desired_record()?;
    desired.validate()?;

    let recorder = registry.create_recorder(&cli.backend_config(), zone)?;
    debug!(
        "Reconciling {} (type: {}) in zone {} via {}",
        desired.key,
        desired.record_type,
        recorder.zone().managed_zone,
        recorder.backend_name()
    );

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    match runtime.block_on(reconcile(recorder.as_ref(), desired)) {
        Ok(record) => {
            writeln!(out, "Updated: {}", serde_json::to_string(&record)?)?;
            Ok(ClouddnsExitCode::Success)
        }
        Err(e) => {
            writeln!(out, "{}", e)?;
            Ok(ClouddnsExitCode::RuntimeError)
        }
    }
}
