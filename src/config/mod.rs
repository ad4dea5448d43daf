use crate::utils::{DEFAULT_CONCURRENCY, DEFAULT_PUBLIC_DIR};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Missing required settings: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("Concurrency must be at least 1")]
    InvalidConcurrency,
}

fn default_public_dir() -> PathBuf {
    PathBuf::from(DEFAULT_PUBLIC_DIR)
}

fn default_concurrency() -> usize {
    DEFAULT_CONCURRENCY
}

/// Deployer configuration
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployConfig {
    #[serde(default)]
    pub secret_id: String,
    #[serde(default)]
    pub secret_key: String,
    #[serde(default)]
    pub bucket: String,
    #[serde(default)]
    pub region: String,
    /// Key prefix every published object lives under
    #[serde(default)]
    pub path_prefix: String,
    /// Local directory mirrored into the bucket
    #[serde(default = "default_public_dir")]
    pub public_dir: PathBuf,
    /// Upper bound on uploads in flight
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    /// Override for the S3-compatible endpoint. Defaults to the regional COS endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            secret_id: String::new(),
            secret_key: String::new(),
            bucket: String::new(),
            region: String::new(),
            path_prefix: String::new(),
            public_dir: default_public_dir(),
            concurrency: default_concurrency(),
            endpoint: None,
        }
    }
}

impl fmt::Debug for DeployConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeployConfig")
            .field("secret_id", &self.secret_id)
            .field("secret_key", &"<redacted>")
            .field("bucket", &self.bucket)
            .field("region", &self.region)
            .field("path_prefix", &self.path_prefix)
            .field("public_dir", &self.public_dir)
            .field("concurrency", &self.concurrency)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

/// Bucket address handed to the storage transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketConfig {
    pub bucket: String,
    pub region: String,
}

/// Values supplied on the command line or through the environment.
/// Any `Some` wins over the file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub secret_id: Option<String>,
    pub secret_key: Option<String>,
    pub bucket: Option<String>,
    pub region: Option<String>,
    pub path_prefix: Option<String>,
    pub public_dir: Option<PathBuf>,
    pub concurrency: Option<usize>,
    pub endpoint: Option<String>,
}

impl DeployConfig {
    /// Apply command-line and environment overrides on top of file values
    pub fn merge(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(v) = overrides.secret_id {
            self.secret_id = v;
        }
        if let Some(v) = overrides.secret_key {
            self.secret_key = v;
        }
        if let Some(v) = overrides.bucket {
            self.bucket = v;
        }
        if let Some(v) = overrides.region {
            self.region = v;
        }
        if let Some(v) = overrides.path_prefix {
            self.path_prefix = v;
        }
        if let Some(v) = overrides.public_dir {
            self.public_dir = v;
        }
        if let Some(v) = overrides.concurrency {
            self.concurrency = v;
        }
        if overrides.endpoint.is_some() {
            self.endpoint = overrides.endpoint;
        }
        self
    }

    /// Check that every required setting is present. All missing fields are
    /// reported together.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let required: [(&'static str, &str); 5] = [
            ("secretId", self.secret_id.as_str()),
            ("secretKey", self.secret_key.as_str()),
            ("bucket", self.bucket.as_str()),
            ("region", self.region.as_str()),
            ("pathPrefix", self.path_prefix.as_str()),
        ];

        let missing: Vec<&'static str> = required
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| *name)
            .collect();

        if !missing.is_empty() {
            return Err(ConfigError::MissingFields(missing));
        }

        if self.concurrency == 0 {
            return Err(ConfigError::InvalidConcurrency);
        }

        Ok(())
    }

    pub fn bucket_config(&self) -> BucketConfig {
        BucketConfig {
            bucket: self.bucket.clone(),
            region: self.region.clone(),
        }
    }
}

/// Help text shown when the configuration is incomplete
pub fn config_help() -> String {
    [
        "Ohh~We have a little trouble!",
        "Please check if you have made the following settings",
        "deploy:",
        "  type: cos",
        "  secretId: yourSecretId",
        "  secretKey: yourSecretKey",
        "  bucket: yourBucket",
        "  region: yourRegion",
        "  pathPrefix: yourPathPrefix",
        "",
        "Need more help? You can check the Tencent cloud document: https://www.qcloud.com/document/product/436",
    ]
    .join("\n")
}

/// Read the configuration file, if it exists
pub async fn read_config(config_path: &Path) -> Result<Option<DeployConfig>, ConfigError> {
    if !config_path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(config_path).await?;
    let config: DeployConfig = serde_json::from_str(&content)?;
    Ok(Some(config))
}

/// Read the file (if any), apply overrides and validate the result
pub async fn load_config(
    config_path: &Path,
    overrides: ConfigOverrides,
) -> Result<DeployConfig, ConfigError> {
    let config = read_config(config_path)
        .await?
        .unwrap_or_default()
        .merge(overrides);
    config.validate()?;
    Ok(config)
}
