//! AWS S3 implementation of the core [`ObjectStoreClient`] contract.
//!
//! Bridges the pipeline's store trait to aws-sdk-s3: paginated
//! `ListObjectsV2`, `HeadObject` metadata, and `PutObject` writes. SDK
//! failures map onto the core [`StoreError`] taxonomy; service rejections
//! keep their HTTP status and request id for diagnosis.

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::error::SdkError;
use aws_sdk_s3::operation::RequestId;
use aws_sdk_s3::primitives::{ByteStream, DateTime};
use aws_sdk_s3::Client;
use chrono::SecondsFormat;
use tracing::{debug, info};

use s3_index_core::contract::{ListPage, ObjectEntry, ObjectStoreClient, StoreError};
use s3_index_core::model::{FileMetadata, SEPARATOR};

/// Connection configuration for S3 access.
#[derive(Debug, Clone, Default)]
pub struct StoreConfig {
    /// AWS region
    pub region: Option<String>,

    /// Custom endpoint URL (for LocalStack); implies path-style addressing
    pub endpoint: Option<String>,

    /// Explicit AWS access key (optional)
    pub access_key: Option<String>,

    /// Explicit AWS secret key (optional)
    pub secret_key: Option<String>,

    /// AWS profile name (optional)
    pub profile: Option<String>,
}

impl StoreConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the AWS region.
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
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

    /// Set the AWS profile.
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }
}

/// The one S3 client reused across all calls within a run.
pub struct S3Store {
    client: Client,
}

impl S3Store {
    /// Build the SDK client from configuration and the ambient provider
    /// chain.
    pub async fn connect(config: &StoreConfig) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());

        if let Some(region) = &config.region {
            loader = loader.region(Region::new(region.clone()));
        }

        if let Some(endpoint) = &config.endpoint {
            loader = loader.endpoint_url(endpoint);
        }

        if let (Some(access_key), Some(secret_key)) = (&config.access_key, &config.secret_key) {
            let credentials =
                aws_sdk_s3::config::Credentials::new(access_key, secret_key, None, None, "s3-index");
            loader = loader.credentials_provider(credentials);
        }

        if let Some(profile) = &config.profile {
            loader = loader.profile_name(profile);
        }

        let shared = loader.load().await;
        let builder = aws_sdk_s3::config::Builder::from(&shared);

        // Path-style access for custom endpoints (LocalStack compatibility).
        let s3_config = if config.endpoint.is_some() {
            builder.force_path_style(true).build()
        } else {
            builder.build()
        };

        info!(
            endpoint = config.endpoint.as_deref().unwrap_or("default"),
            "Connected S3 client"
        );
        S3Store {
            client: Client::from_conf(s3_config),
        }
    }
}

/// Render an SDK timestamp for verbatim pass-through into the tree.
fn format_timestamp(ts: DateTime) -> Option<String> {
    chrono::DateTime::from_timestamp(ts.secs(), ts.subsec_nanos())
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Secs, true))
}

#[async_trait]
impl ObjectStoreClient for S3Store {
    async fn list_page<'a>(
        &self,
        bucket: &str,
        prefix: &str,
        continuation_token: Option<&'a str>,
    ) -> Result<ListPage, StoreError> {
        debug!(bucket, prefix, token = ?continuation_token, "Listing page");

        let mut req = self.client.list_objects_v2().bucket(bucket);
        if !prefix.is_empty() {
            req = req.prefix(prefix);
        }
        if let Some(token) = continuation_token {
            req = req.continuation_token(token);
        }

        let resp = req.send().await.map_err(|err| match err {
            SdkError::ServiceError(ctx) => StoreError::service(
                ctx.err().to_string(),
                Some(ctx.raw().status().as_u16()),
                ctx.err().request_id().map(str::to_string),
            ),
            other => StoreError::transport(other.to_string()),
        })?;

        let entries = resp
            .contents
            .unwrap_or_default()
            .into_iter()
            .map(|obj| {
                let key = obj.key.unwrap_or_default();
                let is_folder_marker = key.ends_with(SEPARATOR);
                ObjectEntry {
                    is_folder_marker,
                    size: obj.size.map(|s| s.max(0) as u64),
                    last_modified: obj.last_modified.and_then(format_timestamp),
                    key,
                }
            })
            .collect();

        let truncated = resp.is_truncated == Some(true);
        Ok(ListPage {
            entries,
            next_token: resp.next_continuation_token,
            truncated,
        })
    }

    async fn get_metadata(&self, bucket: &str, key: &str) -> Result<FileMetadata, StoreError> {
        debug!(bucket, key, "Fetching object metadata");

        let resp = self
            .client
            .head_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|err| match err {
                SdkError::ServiceError(ctx) => StoreError::service(
                    ctx.err().to_string(),
                    Some(ctx.raw().status().as_u16()),
                    ctx.err().request_id().map(str::to_string),
                ),
                other => StoreError::transport(other.to_string()),
            })?;

        Ok(FileMetadata {
            size: resp.content_length.map(|v| v.max(0) as u64).unwrap_or(0),
            last_modified: resp.last_modified.and_then(format_timestamp),
            content_type: resp.content_type,
            cache_control: resp.cache_control,
        })
    }

    async fn put_object<'a>(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
        cache_control: Option<&'a str>,
    ) -> Result<(), StoreError> {
        debug!(bucket, key, content_type, bytes = body.len(), "Writing object");

        let mut req = self
            .client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(body))
            .content_type(content_type);
        if let Some(cache) = cache_control {
            req = req.cache_control(cache);
        }

        req.send().await.map_err(|err| match err {
            SdkError::ServiceError(ctx) => StoreError::service(
                ctx.err().to_string(),
                Some(ctx.raw().status().as_u16()),
                ctx.err().request_id().map(str::to_string),
            ),
            other => StoreError::transport(other.to_string()),
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_config_builder() {
        let config = StoreConfig::new()
            .with_endpoint("http://localhost:4566")
            .with_region("us-east-1")
            .with_credentials("access", "secret");

        assert_eq!(config.endpoint, Some("http://localhost:4566".to_string()));
        assert_eq!(config.region, Some("us-east-1".to_string()));
        assert_eq!(config.access_key, Some("access".to_string()));
        assert_eq!(config.secret_key, Some("secret".to_string()));
        assert!(config.profile.is_none());
    }

    #[test]
    fn timestamp_formats_as_rfc3339() {
        let ts = DateTime::from_secs(1_700_000_000);
        let formatted = format_timestamp(ts).unwrap();
        assert_eq!(formatted, "2023-11-14T22:13:20Z");
    }
}
