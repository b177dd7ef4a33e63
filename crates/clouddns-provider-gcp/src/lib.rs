// # Google Cloud DNS Recorder
//
// This crate provides a Recorder backed by the Cloud DNS REST API v1.
//
// - ✅ One HTTP request per Recorder call (plus a token fetch when using the metadata server)
// - ✅ Full error propagation (the reconciler decides, the recorder only reports)
// - ✅ HTTP timeout configured (30 seconds)
// - ✅ Specific error handling for HTTP status codes (401, 403, 404, 409, 429, 5xx)
// - ✅ Dry-run mode for safe testing
// - ❌ NO retry or backoff logic
// - ❌ NO caching of records or tokens
//
// ## Security Requirements
//
// - Access token NEVER appears in logs or Debug output
//
// ## API Reference
//
// - Cloud DNS API v1: https://cloud.google.com/dns/docs/reference/rest/v1
// - Get record set:    GET   `/projects/:project/managedZones/:zone/rrsets/:name/:type`
// - Create record set: POST  `/projects/:project/managedZones/:zone/rrsets`
// - Patch record set:  PATCH `/projects/:project/managedZones/:zone/rrsets/:name/:type`

use async_trait::async_trait;
use clouddns_core::config::BackendConfig;
use clouddns_core::traits::{Recorder, RecorderFactory};
use clouddns_core::{Error, Record, Result, ZoneDescriptor};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Cloud DNS API base URL
pub const CLOUD_DNS_API_BASE: &str = "https://dns.googleapis.com/dns/v1";

/// GCE metadata server endpoint for the default service account token
pub const METADATA_TOKEN_URL: &str =
    "http://metadata.google.internal/computeMetadata/v1/instance/service-accounts/default/token";

/// Default HTTP timeout for API requests (30 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

const BACKEND_NAME: &str = "gcp";

/// Where the OAuth2 access token comes from
#[derive(Clone, PartialEq, Eq)]
pub enum TokenSource {
    /// A token supplied up front (e.g. `gcloud auth print-access-token`)
    Static(String),
    /// The GCE/GKE/Cloud Run metadata server
    MetadataServer {
        /// Token endpoint
        url: String,
    },
}

impl TokenSource {
    /// The default metadata server token source
    pub fn metadata() -> Self {
        TokenSource::MetadataServer {
            url: METADATA_TOKEN_URL.to_string(),
        }
    }
}

// Custom Debug implementation that hides the token
impl std::fmt::Debug for TokenSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenSource::Static(_) => f.write_str("Static(<REDACTED>)"),
            TokenSource::MetadataServer { url } => f
                .debug_struct("MetadataServer")
                .field("url", url)
                .finish(),
        }
    }
}

/// Cloud DNS resource record set, as sent and received on the wire
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRecordSet {
    /// Fully-qualified record name
    pub name: String,
    /// Record type code
    #[serde(rename = "type")]
    pub record_type: String,
    /// Time-to-live in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,
    /// Record data
    #[serde(default)]
    pub rrdatas: Vec<String>,
}

impl From<&Record> for ResourceRecordSet {
    fn from(record: &Record) -> Self {
        Self {
            name: record.key.clone(),
            record_type: record.record_type.clone(),
            ttl: Some(record.ttl),
            rrdatas: record.data.clone(),
        }
    }
}

impl From<ResourceRecordSet> for Record {
    fn from(rrset: ResourceRecordSet) -> Self {
        Record::new(rrset.name, rrset.record_type, rrset.rrdatas, rrset.ttl.unwrap_or(0))
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Google Cloud DNS recorder
///
/// Bound to one managed zone. Stateless between calls.
///
/// # Dry-Run Mode
///
/// When `dry_run` is true the recorder performs lookups normally, logs the
/// request it would send for `create`/`replace`, and reports success without
/// modifying the zone.
pub struct GcpRecorder {
    zone: ZoneDescriptor,
    token_source: TokenSource,
    client: reqwest::Client,
    base_url: String,
    dry_run: bool,
}

// Custom Debug implementation that hides the access token
impl std::fmt::Debug for GcpRecorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GcpRecorder")
            .field("zone", &self.zone)
            .field("token_source", &self.token_source)
            .field("base_url", &self.base_url)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl GcpRecorder {
    /// Create a new Cloud DNS recorder
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the zone has no project or managed
    /// zone, or if the HTTP client cannot be built.
    pub fn new(zone: ZoneDescriptor, token_source: TokenSource, dry_run: bool) -> Result<Self> {
        zone.validate()?;
        if zone.project.is_empty() {
            return Err(Error::config("Cloud DNS requires a project"));
        }
        if let TokenSource::Static(token) = &token_source
            && token.trim().is_empty()
        {
            return Err(Error::config("Cloud DNS access token cannot be empty"));
        }

        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            zone,
            token_source,
            client,
            base_url: CLOUD_DNS_API_BASE.to_string(),
            dry_run,
        })
    }

    /// Point the recorder at a different API base (e.g. a local mock server)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Whether writes are skipped
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    fn rrsets_url(&self) -> String {
        format!(
            "{}/projects/{}/managedZones/{}/rrsets",
            self.base_url, self.zone.project, self.zone.managed_zone
        )
    }

    fn rrset_url(&self, key: &str, record_type: &str) -> String {
        format!("{}/{}/{}", self.rrsets_url(), key, record_type)
    }

    /// Resolve an access token for this request
    ///
    /// # API Call (metadata server only)
    ///
    /// ```http
    /// GET /computeMetadata/v1/instance/service-accounts/default/token
    /// Metadata-Flavor: Google
    /// ```
    async fn access_token(&self) -> Result<String> {
        match &self.token_source {
            TokenSource::Static(token) => Ok(token.clone()),
            TokenSource::MetadataServer { url } => {
                tracing::debug!("Fetching access token from metadata server");

                let response = self
                    .client
                    .get(url)
                    .header("Metadata-Flavor", "Google")
                    .send()
                    .await
                    .map_err(|e| {
                        Error::backend(BACKEND_NAME, format!("Metadata server unreachable: {}", e))
                    })?;

                if !response.status().is_success() {
                    let status = response.status();
                    return Err(Error::backend(
                        BACKEND_NAME,
                        format!("Metadata server refused token request. Status: {}", status),
                    ));
                }

                let token: TokenResponse = response.json().await.map_err(|e| {
                    Error::backend(BACKEND_NAME, format!("Failed to parse token response: {}", e))
                })?;

                Ok(token.access_token)
            }
        }
    }

    /// Map a non-success response to an error
    ///
    /// 404 is only the NotFound sentinel when `absent_is_not_found` is set
    /// and the missing resource is the record set itself, not the zone.
    async fn error_for(
        &self,
        operation: &str,
        response: reqwest::Response,
        key: &str,
        record_type: &str,
        absent_is_not_found: bool,
    ) -> Error {
        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read error response".to_string());
        let message = serde_json::from_str::<ApiErrorBody>(&body)
            .map(|parsed| parsed.error.message)
            .unwrap_or(body);

        match status.as_u16() {
            401 | 403 => Error::backend(
                BACKEND_NAME,
                format!(
                    "Authentication failed: invalid token or insufficient permissions. Status: {} - {}",
                    status, message
                ),
            ),
            404 if absent_is_not_found && !message.contains("managedZone") => {
                Error::not_found(format!("{} (type: {})", key, record_type))
            }
            404 => Error::backend(
                BACKEND_NAME,
                format!("{} failed, resource not found: {}", operation, message),
            ),
            409 => Error::backend(
                BACKEND_NAME,
                format!(
                    "Conflict: {} (type: {}) already exists. Status: {}",
                    key, record_type, status
                ),
            ),
            429 => Error::backend(
                BACKEND_NAME,
                format!("Rate limit exceeded. Please retry later. Status: {}", status),
            ),
            500..=599 => Error::backend(
                BACKEND_NAME,
                format!("Cloud DNS server error (transient): {} - {}", status, message),
            ),
            _ => Error::backend(
                BACKEND_NAME,
                format!("{} failed: {} - {}", operation, status, message),
            ),
        }
    }

    async fn write(&self, request: reqwest::RequestBuilder, operation: &str, record: &Record) -> Result<()> {
        let response = request
            .send()
            .await
            .map_err(|e| Error::backend(BACKEND_NAME, format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(self
                .error_for(operation, response, &record.key, &record.record_type, false)
                .await);
        }

        tracing::info!(
            "{} {} (type: {}) in zone {}",
            operation,
            record.key,
            record.record_type,
            self.zone.managed_zone
        );
        Ok(())
    }
}

#[async_trait]
impl Recorder for GcpRecorder {
    /// ```http
    /// GET /projects/:project/managedZones/:zone/rrsets/:name/:type
    /// Authorization: Bearer <token>
    /// ```
    async fn lookup(&self, key: &str, record_type: &str) -> Result<Record> {
        tracing::debug!("Looking up record set: {} (type: {})", key, record_type);

        let token = self.access_token().await?;
        let response = self
            .client
            .get(self.rrset_url(key, record_type))
            .bearer_auth(&token)
            .send()
            .await
            .map_err(|e| Error::backend(BACKEND_NAME, format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(self
                .error_for("Record lookup", response, key, record_type, true)
                .await);
        }

        let rrset: ResourceRecordSet = response.json().await.map_err(|e| {
            Error::backend(BACKEND_NAME, format!("Failed to parse response: {}", e))
        })?;

        Ok(rrset.into())
    }

    /// ```http
    /// POST /projects/:project/managedZones/:zone/rrsets
    /// { "name": ..., "type": ..., "ttl": ..., "rrdatas": [...] }
    /// ```
    async fn create(&self, record: &Record) -> Result<()> {
        let payload = ResourceRecordSet::from(record);

        if self.dry_run {
            tracing::info!(
                "[DRY-RUN] Would send POST request to {} with payload: {}",
                self.rrsets_url(),
                serde_json::to_string(&payload)?
            );
            return Ok(());
        }

        let token = self.access_token().await?;
        let request = self
            .client
            .post(self.rrsets_url())
            .bearer_auth(&token)
            .json(&payload);

        self.write(request, "Created", record).await
    }

    /// ```http
    /// PATCH /projects/:project/managedZones/:zone/rrsets/:name/:type
    /// { "name": ..., "type": ..., "ttl": ..., "rrdatas": [...] }
    /// ```
    async fn replace(&self, record: &Record) -> Result<()> {
        let payload = ResourceRecordSet::from(record);
        let url = self.rrset_url(&record.key, &record.record_type);

        if self.dry_run {
            tracing::info!(
                "[DRY-RUN] Would send PATCH request to {} with payload: {}",
                url,
                serde_json::to_string(&payload)?
            );
            return Ok(());
        }

        let token = self.access_token().await?;
        let request = self.client.patch(url).bearer_auth(&token).json(&payload);

        self.write(request, "Replaced", record).await
    }

    fn zone(&self) -> &ZoneDescriptor {
        &self.zone
    }

    fn backend_name(&self) -> &'static str {
        BACKEND_NAME
    }
}

/// Factory for creating Cloud DNS recorders
pub struct GcpFactory;

impl RecorderFactory for GcpFactory {
    fn create(&self, config: &BackendConfig, zone: ZoneDescriptor) -> Result<Box<dyn Recorder>> {
        match config {
            BackendConfig::Gcp {
                access_token,
                dry_run,
            } => {
                let token_source = match access_token {
                    Some(token) => TokenSource::Static(token.clone()),
                    None => TokenSource::metadata(),
                };

                if *dry_run {
                    tracing::warn!("Cloud DNS recorder running in DRY-RUN mode - no changes will be made");
                }

                Ok(Box::new(GcpRecorder::new(zone, token_source, *dry_run)?))
            }
            _ => Err(Error::config("Invalid config for Cloud DNS recorder")),
        }
    }
}

/// Register the Cloud DNS recorder with a registry
///
/// # Example
///
/// ```rust
/// use clouddns_core::RecorderRegistry;
///
/// let registry = RecorderRegistry::with_builtin();
/// clouddns_provider_gcp::register(&registry);
/// assert!(registry.has("gcp"));
/// ```
pub fn register(registry: &clouddns_core::RecorderRegistry) {
    registry.register(BACKEND_NAME, Box::new(GcpFactory));
}
