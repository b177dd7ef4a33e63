//! Configuration types for clouddns
//!
//! Environment-derived defaults are resolved exactly once by the binary and
//! passed down as plain values. Nothing in this crate reads the process
//! environment itself.

use serde::{Deserialize, Serialize};

/// Environment variable supplying the default domain
pub const DOMAIN_ENV: &str = "DNS_DOMAIN";

/// Environment variable supplying the default managed zone
pub const ZONE_ENV: &str = "DNS_ZONE";

/// Environment variable supplying the default project
pub const PROJECT_ENV: &str = "GOOGLE_CLOUD_PROJECT";

/// Defaults for zone selection, used when the corresponding flag is omitted
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Defaults {
    /// Default DNS domain
    pub domain: String,
    /// Default managed zone
    pub zone: String,
    /// Default cloud project
    pub project: String,
}

impl Defaults {
    /// Build defaults from a variable lookup (normally `std::env::var`)
    ///
    /// # Example
    ///
    /// ```rust
    /// use clouddns_core::config::Defaults;
    ///
    /// let defaults = Defaults::from_lookup(|name| match name {
    ///     "DNS_ZONE" => Some("w-uname-link".to_string()),
    ///     _ => None,
    /// });
    /// assert_eq!(defaults.zone, "w-uname-link");
    /// assert!(defaults.project.is_empty());
    /// ```
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            domain: lookup(DOMAIN_ENV).unwrap_or_default(),
            zone: lookup(ZONE_ENV).unwrap_or_default(),
            project: lookup(PROJECT_ENV).unwrap_or_default(),
        }
    }
}

/// Resolved configuration as printed by `clouddns -env`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvInfo {
    /// Cloud project
    pub project: String,
    /// DNS domain
    pub domain: String,
    /// Managed zone
    pub zone: String,
}

impl EnvInfo {
    /// Serialize to a single-line JSON object
    pub fn to_json(&self) -> Result<String, crate::Error> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Backend configuration
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BackendConfig {
    /// Google Cloud DNS
    Gcp {
        /// OAuth2 access token; fetched from the metadata server when absent
        #[serde(default)]
        access_token: Option<String>,
        /// Perform lookups but skip create/replace
        #[serde(default)]
        dry_run: bool,
    },

    /// In-memory recorder (nothing leaves the process)
    Memory,
}

impl BackendConfig {
    /// Validate the backend configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            BackendConfig::Gcp {
                access_token: Some(token),
                ..
            } if token.trim().is_empty() => {
                Err(crate::Error::config("access token cannot be empty when provided"))
            }
            _ => Ok(()),
        }
    }

    /// Get the backend type name
    pub fn type_name(&self) -> &'static str {
        match self {
            BackendConfig::Gcp { .. } => "gcp",
            BackendConfig::Memory => "memory",
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        BackendConfig::Gcp {
            access_token: None,
            dry_run: false,
        }
    }
}

// Custom Debug implementation that hides the access token
impl std::fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendConfig::Gcp {
                access_token,
                dry_run,
            } => f
                .debug_struct("Gcp")
                .field("access_token", &access_token.as_ref().map(|_| "<REDACTED>"))
                .field("dry_run", dry_run)
                .finish(),
            BackendConfig::Memory => f.write_str("Memory"),
        }
    }
}
