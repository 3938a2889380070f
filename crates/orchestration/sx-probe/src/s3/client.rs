//! S3 client configuration and creation.

use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_credential_types::provider::ProvideCredentials;
use aws_sdk_s3::Client;
use aws_sdk_s3::error::DisplayErrorContext;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use sx_error::{Result, ScanError};
use tracing::{debug, info};

use super::api::S3BucketApi;

/// Configuration for S3 access.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3Config {
    /// AWS region the probes are scoped to
    pub region: String,

    /// AWS profile name (the identity every probe is made as)
    pub profile: Option<String>,

    /// Custom endpoint URL (for LocalStack)
    pub endpoint: Option<String>,

    /// Explicit AWS access key (optional, mainly for LocalStack)
    pub access_key: Option<String>,

    /// Explicit AWS secret key (optional, mainly for LocalStack)
    pub secret_key: Option<String>,

    /// Per-attempt timeout in seconds enforced by the SDK
    pub timeout_secs: u64,
}

impl Default for S3Config {
    fn default() -> Self {
        Self {
            region: "us-east-1".to_string(),
            profile: None,
            endpoint: None,
            access_key: None,
            secret_key: None,
            timeout_secs: 30,
        }
    }
}

impl S3Config {
    /// Create a new S3Config for the given region.
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            ..Default::default()
        }
    }

    /// Set the AWS profile.
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }

    /// Set a custom endpoint (for LocalStack).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set explicit credentials.
    pub fn with_credentials(
        mut self,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        self.access_key = Some(access_key.into());
        self.secret_key = Some(secret_key.into());
        self
    }

    /// Set the request timeout in seconds.
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    fn identity_label(&self) -> String {
        match (&self.profile, &self.access_key) {
            (Some(profile), _) => format!("profile '{profile}'"),
            (None, Some(_)) => "static credentials".to_string(),
            (None, None) => "default credential chain".to_string(),
        }
    }
}

/// Load the AWS session for the configured identity and region.
///
/// Credentials are resolved eagerly so that an unknown profile or missing
/// keys fail here, once, before any probe is dispatched. Whether the service
/// accepts them is checked by [`create_s3_client`].
pub async fn load_session(config: &S3Config) -> Result<SdkConfig> {
    let mut loader = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(config.region.clone()))
        // Retries are owned by the probe client
        .retry_config(aws_config::retry::RetryConfig::disabled())
        .timeout_config(
            aws_config::timeout::TimeoutConfig::builder()
                .operation_attempt_timeout(Duration::from_secs(config.timeout_secs))
                .build(),
        );

    if let Some(endpoint) = &config.endpoint {
        loader = loader.endpoint_url(endpoint);
    }

    if let (Some(access_key), Some(secret_key)) = (&config.access_key, &config.secret_key) {
        let credentials = aws_sdk_s3::config::Credentials::new(
            access_key,
            secret_key,
            None,
            None,
            "s3xist",
        );
        loader = loader.credentials_provider(credentials);
    }

    if let Some(profile) = &config.profile {
        loader = loader.profile_name(profile);
    }

    let session = loader.load().await;
    verify_identity(&session, config).await?;

    Ok(session)
}

async fn verify_identity(session: &SdkConfig, config: &S3Config) -> Result<()> {
    let identity = config.identity_label();
    let provider = session
        .credentials_provider()
        .ok_or_else(|| ScanError::Auth(format!("no credentials available for {identity}")))?;

    let credentials = provider.provide_credentials().await.map_err(|e| {
        ScanError::Auth(format!(
            "failed to resolve credentials for {identity}: {}",
            DisplayErrorContext(&e)
        ))
    })?;

    debug!(
        access_key_id = credentials.access_key_id(),
        has_session_token = credentials.session_token().is_some(),
        "Resolved credentials"
    );

    Ok(())
}

/// Create an S3 client from configuration.
///
/// The credentials are checked with the service before the client is
/// returned; a rejected identity is a [`ScanError::Auth`].
pub async fn create_s3_client(config: &S3Config) -> Result<Client> {
    let session = load_session(config).await?;

    let s3_config_builder = aws_sdk_s3::config::Builder::from(&session);

    // Path-style addressing for custom endpoints (LocalStack)
    let s3_config = if config.endpoint.is_some() {
        s3_config_builder.force_path_style(true).build()
    } else {
        s3_config_builder.build()
    };

    let client = Client::from_conf(s3_config);

    S3BucketApi::new(client.clone())
        .verify_credentials()
        .await
        .map_err(|e| {
            ScanError::Auth(format!(
                "{} was rejected by the service: {e}",
                config.identity_label()
            ))
        })?;
    info!(region = %config.region, identity = %config.identity_label(), "Session ready");

    Ok(client)
}
