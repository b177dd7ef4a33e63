//! Command-line surface
//!
//! Flags are accepted both in clap's `--zone` form and the single-dash
//! `-zone` form that existing scripts use; [`normalize_args`] rewrites the
//! latter before clap sees them.

use std::ffi::OsString;

use clap::{ArgAction, Parser, ValueEnum};
use clouddns_core::record::DEFAULT_TTL;
use clouddns_core::{BackendConfig, Defaults, EnvInfo, Record, RecordType, ZoneDescriptor};

/// Printed instead of reconciling when no zone is configured
pub const USAGE: &str = "
View configuration:
  $ clouddns -env
Usage:
  $ clouddns -zone ZONE_NAME -domain DOMAIN_NAME -key RECORD -data DATA
Example:
  $ clouddns -zone w-uname-link -domain w.uname.link. -key api.w.uname.link. -data 10.10.10.10
";

/// Long flag names that may be written with a single dash
const LONG_FLAGS: &[&str] = &[
    "domain",
    "zone",
    "key",
    "data",
    "type",
    "ttl",
    "project",
    "env",
    "help",
    "version",
    "backend",
    "dry-run",
    "access-token",
    "verbose",
];

/// Backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Backend {
    /// Google Cloud DNS
    Gcp,
    /// In-process zone, discarded on exit
    Memory,
}

/// Upsert a single resource record in a Google Cloud DNS managed zone
#[derive(Debug, Parser)]
#[command(name = "clouddns", version, after_help = USAGE)]
pub struct Cli {
    /// DNS domain served by the zone, e.g. example.com. [default: $DNS_DOMAIN]
    #[arg(long)]
    pub domain: Option<String>,

    /// Managed zone name, e.g. example-com [default: $DNS_ZONE]
    #[arg(long)]
    pub zone: Option<String>,

    /// Fully-qualified record name, e.g. api.example.com.
    #[arg(long, default_value = "")]
    pub key: String,

    /// Record data; repeat the flag for multiple values
    #[arg(long, allow_hyphen_values = true)]
    pub data: Vec<String>,

    /// Record type
    #[arg(long = "type", default_value = "A")]
    pub record_type: String,

    /// Time-to-live in seconds
    #[arg(long, default_value_t = DEFAULT_TTL)]
    pub ttl: u32,

    /// Cloud project owning the zone [default: $GOOGLE_CLOUD_PROJECT]
    #[arg(long)]
    pub project: Option<String>,

    /// Print the resolved project, domain and zone as JSON and exit
    #[arg(long)]
    pub env: bool,

    /// DNS backend
    #[arg(long, value_enum, default_value = "gcp")]
    pub backend: Backend,

    /// Look records up but do not create or replace anything
    #[arg(long, env = "CLOUDDNS_DRY_RUN")]
    pub dry_run: bool,

    /// OAuth2 access token; the metadata server is used when omitted
    #[arg(long, env = "CLOUDDNS_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: Option<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Resolved configuration for `-env`
    pub fn env_info(&self, defaults: &Defaults) -> EnvInfo {
        let zone = self.zone_descriptor(defaults);
        EnvInfo {
            project: zone.project,
            domain: zone.domain,
            zone: zone.managed_zone,
        }
    }

    /// Target zone, falling back to `defaults` for omitted flags
    pub fn zone_descriptor(&self, defaults: &Defaults) -> ZoneDescriptor {
        ZoneDescriptor::new(
            self.domain.clone().unwrap_or_else(|| defaults.domain.clone()),
            self.project.clone().unwrap_or_else(|| defaults.project.clone()),
            self.zone.clone().unwrap_or_else(|| defaults.zone.clone()),
        )
    }

    /// The record to reconcile
    ///
    /// The type code is normalized (`aaaa` → `AAAA`). Data values are kept
    /// verbatim; only empty ones are dropped.
    pub fn desired_record(&self) -> clouddns_core::Result<Record> {
        let record_type: RecordType = self.record_type.parse()?;
        let data = self
            .data
            .iter()
            .filter(|value| !value.is_empty())
            .cloned()
            .collect();

        Ok(Record::new(
            self.key.clone(),
            record_type.to_string(),
            data,
            self.ttl,
        ))
    }

    /// Backend configuration for the registry
    pub fn backend_config(&self) -> BackendConfig {
        match self.backend {
            Backend::Gcp => BackendConfig::Gcp {
                access_token: self.access_token.clone(),
                dry_run: self.dry_run,
            },
            Backend::Memory => BackendConfig::Memory,
        }
    }
}

/// Rewrite single-dash long flags (`-zone x`, `-ttl=30`) to `--zone x`, `--ttl=30`
///
/// Arguments after a bare `--` and values that are not known flag names are
/// left alone.
pub fn normalize_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    let mut passthrough = false;
    args.into_iter()
        .map(|arg| {
            if passthrough {
                return arg;
            }
            let Some(text) = arg.to_str() else {
                return arg;
            };
            if text == "--" {
                passthrough = true;
                return arg;
            }
            match text.strip_prefix('-') {
                Some(rest) if !rest.starts_with('-') => {
                    let name = rest.split_once('=').map_or(rest, |(name, _)| name);
                    if LONG_FLAGS.contains(&name) {
                        OsString::from(format!("-{}", text))
                    } else {
                        arg
                    }
                }
                _ => arg,
            }
        })
        .collect()
}
