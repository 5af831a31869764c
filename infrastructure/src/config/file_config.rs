//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! Every section uses `#[serde(default)]` so a partial file is valid.
//!
//! ```toml
//! [azure]
//! tenant_id = "00000000-0000-0000-0000-000000000000"
//! client_id = "11111111-1111-1111-1111-111111111111"
//! client_secret_env = "AZURE_CLIENT_SECRET"
//! subscription_id = "22222222-2222-2222-2222-222222222222"
//! resource_group = "storage-rg"
//!
//! [http]
//! timeout_seconds = 60
//!
//! [server]
//! include_stubs = false
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("timeout_seconds cannot be 0")]
    InvalidTimeout,

    #[error("{field} must be an http(s) URL, got '{value}'")]
    InvalidUrl { field: &'static str, value: String },

    #[error("azure.tenant_id is not set (config file, ANF_MCP_AZURE__TENANT_ID or AZURE_TENANT_ID)")]
    MissingTenantId,

    #[error("azure.client_id is not set (config file, ANF_MCP_AZURE__CLIENT_ID or AZURE_CLIENT_ID)")]
    MissingClientId,

    #[error("client secret is not set (azure.client_secret or ${env})")]
    MissingClientSecret { env: String },
}

/// Conventional Azure SDK environment variables used when the config leaves
/// a field unset
pub const AZURE_TENANT_ID: &str = "AZURE_TENANT_ID";
pub const AZURE_CLIENT_ID: &str = "AZURE_CLIENT_ID";
pub const AZURE_CLIENT_SECRET: &str = "AZURE_CLIENT_SECRET";
pub const AZURE_SUBSCRIPTION_ID: &str = "AZURE_SUBSCRIPTION_ID";
pub const AZURE_RESOURCE_GROUP: &str = "AZURE_RESOURCE_GROUP";

/// Azure identity and endpoint configuration (`[azure]`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAzureConfig {
    pub tenant_id: Option<String>,
    pub client_id: Option<String>,
    /// Direct client secret (prefer client_secret_env)
    pub client_secret: Option<String>,
    /// Environment variable holding the client secret
    pub client_secret_env: String,
    /// Default subscription for operations that omit `subscriptionId`
    pub subscription_id: Option<String>,
    /// Default resource group for operations that omit `resourceGroupName`
    pub resource_group: Option<String>,
    /// OAuth2 authority, without tenant
    pub authority_host: String,
    /// Management API base URL
    pub management_url: String,
    /// OAuth2 scope requested for management tokens
    pub scope: String,
}

impl Default for FileAzureConfig {
    fn default() -> Self {
        Self {
            tenant_id: None,
            client_id: None,
            client_secret: None,
            client_secret_env: AZURE_CLIENT_SECRET.to_string(),
            subscription_id: None,
            resource_group: None,
            authority_host: "https://login.microsoftonline.com".to_string(),
            management_url: "https://management.azure.com".to_string(),
            scope: "https://management.azure.com/.default".to_string(),
        }
    }
}

/// Client-credentials identity, fully resolved
#[derive(Clone, PartialEq, Eq)]
pub struct ClientCredentials {
    pub tenant_id: String,
    pub client_id: String,
    pub client_secret: String,
}

impl std::fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

impl FileAzureConfig {
    /// Fill unset fields from the conventional `AZURE_*` variables
    pub fn with_env_fallbacks(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let fill = |slot: &mut Option<String>, var: &str| {
            if slot.is_none() {
                *slot = lookup(var).filter(|v| !v.trim().is_empty());
            }
        };
        fill(&mut self.tenant_id, AZURE_TENANT_ID);
        fill(&mut self.client_id, AZURE_CLIENT_ID);
        fill(&mut self.subscription_id, AZURE_SUBSCRIPTION_ID);
        fill(&mut self.resource_group, AZURE_RESOURCE_GROUP);
        if self.client_secret.is_none() {
            self.client_secret = lookup(&self.client_secret_env).filter(|v| !v.is_empty());
        }
        self
    }

    /// Resolve the identity used for the token exchange
    pub fn credentials(&self) -> Result<ClientCredentials, ConfigValidationError> {
        let tenant_id = non_empty(&self.tenant_id).ok_or(ConfigValidationError::MissingTenantId)?;
        let client_id = non_empty(&self.client_id).ok_or(ConfigValidationError::MissingClientId)?;
        let client_secret = non_empty(&self.client_secret).ok_or_else(|| {
            ConfigValidationError::MissingClientSecret {
                env: self.client_secret_env.clone(),
            }
        })?;
        Ok(ClientCredentials {
            tenant_id,
            client_id,
            client_secret,
        })
    }

    /// Token endpoint for the configured tenant
    pub fn token_endpoint(&self, tenant_id: &str) -> String {
        format!(
            "{}/{}/oauth2/v2.0/token",
            self.authority_host.trim_end_matches('/'),
            tenant_id
        )
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// HTTP client configuration (`[http]`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileHttpConfig {
    /// Per-request timeout; unset means no timeout
    pub timeout_seconds: Option<u64>,
    pub user_agent: String,
}

impl Default for FileHttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: None,
            user_agent: concat!("anf-mcp/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Tool server configuration (`[server]`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileServerConfig {
    /// Expose placeholder operations in tools/list
    pub include_stubs: bool,
    /// Expose only operations that do not modify resources
    pub read_only: bool,
}

impl Default for FileServerConfig {
    fn default() -> Self {
        Self {
            include_stubs: true,
            read_only: false,
        }
    }
}

/// Complete file configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub azure: FileAzureConfig,
    pub http: FileHttpConfig,
    pub server: FileServerConfig,
}

impl FileConfig {
    /// Validate the configuration
    ///
    /// Credentials are checked separately by [`FileAzureConfig::credentials`]
    /// because listing operations works without them.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        // Timeout of 0 seconds doesn't make sense
        if let Some(0) = self.http.timeout_seconds {
            return Err(ConfigValidationError::InvalidTimeout);
        }

        for (field, value) in [
            ("azure.authority_host", &self.azure.authority_host),
            ("azure.management_url", &self.azure.management_url),
        ] {
            if !(value.starts_with("https://") || value.starts_with("http://")) {
                return Err(ConfigValidationError::InvalidUrl {
                    field,
                    value: value.clone(),
                });
            }
        }

        Ok(())
    }

    /// Copy with secrets masked, for `--show-config`
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if copy.azure.client_secret.is_some() {
            copy.azure.client_secret = Some("********".to_string());
        }
        copy
    }
}
