//! COS transport over the S3-compatible API.
//!
//! Credentials are the static `secretId`/`secretKey` pair from the deploy
//! configuration; the endpoint defaults to the bucket region's COS endpoint.

use super::{DeleteResponse, KeyError, ListPage, ObjectStorage, StorageError};
use crate::config::{BucketConfig, DeployConfig};
use crate::manifest::RemoteEntry;
use crate::utils::cos_endpoint;
use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{Delete, ObjectIdentifier};
use aws_sdk_s3::Client as S3Client;
use chrono::{DateTime, Utc};
use tracing::debug;

pub struct CosStorage {
    client: S3Client,
}

impl CosStorage {
    pub fn new(config: &DeployConfig) -> Self {
        let credentials = aws_credential_types::Credentials::new(
            &config.secret_id,
            &config.secret_key,
            None,
            None,
            "cos-deployer",
        );

        let endpoint = config
            .endpoint
            .clone()
            .unwrap_or_else(|| cos_endpoint(&config.region));

        let s3_config = aws_sdk_s3::Config::builder()
            .region(aws_types::region::Region::new(config.region.clone()))
            .credentials_provider(credentials)
            .endpoint_url(endpoint)
            .behavior_version_latest()
            .build();

        Self {
            client: S3Client::from_conf(s3_config),
        }
    }
}

fn to_chrono(ts: &aws_sdk_s3::primitives::DateTime) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(ts.secs(), ts.subsec_nanos())
}

#[async_trait]
impl ObjectStorage for CosStorage {
    async fn list_objects(
        &self,
        bucket: &BucketConfig,
        prefix: &str,
        continuation: Option<String>,
    ) -> Result<ListPage, StorageError> {
        let resp = self
            .client
            .list_objects_v2()
            .bucket(&bucket.bucket)
            .prefix(prefix)
            .set_continuation_token(continuation)
            .send()
            .await
            .map_err(|e| StorageError::List {
                prefix: prefix.to_string(),
                message: e.to_string(),
            })?;

        let entries = resp
            .contents()
            .iter()
            .filter_map(|obj| {
                obj.key().map(|key| RemoteEntry {
                    key: key.to_string(),
                    etag: obj.e_tag().unwrap_or_default().to_string(),
                    size: obj.size().unwrap_or_default(),
                    last_modified: obj.last_modified().and_then(to_chrono),
                })
            })
            .collect::<Vec<_>>();

        let next_continuation = if resp.is_truncated().unwrap_or(false) {
            resp.next_continuation_token().map(|t| t.to_string())
        } else {
            None
        };

        debug!(
            "listed {} objects under s3://{}/{prefix}",
            entries.len(),
            bucket.bucket
        );

        Ok(ListPage {
            entries,
            next_continuation,
        })
    }

    async fn put_object(
        &self,
        bucket: &BucketConfig,
        key: &str,
        body: tokio::fs::File,
        content_length: u64,
    ) -> Result<(), StorageError> {
        let put_error = |message: String| StorageError::Put {
            key: key.to_string(),
            message,
        };

        let stream = ByteStream::read_from()
            .file(body)
            .build()
            .await
            .map_err(|e| put_error(e.to_string()))?;

        self.client
            .put_object()
            .bucket(&bucket.bucket)
            .key(key)
            .content_length(content_length as i64)
            .body(stream)
            .send()
            .await
            .map_err(|e| put_error(e.to_string()))?;

        debug!("uploaded {content_length} bytes to s3://{}/{key}", bucket.bucket);
        Ok(())
    }

    async fn delete_objects(
        &self,
        bucket: &BucketConfig,
        keys: &[String],
    ) -> Result<DeleteResponse, StorageError> {
        let objects = keys
            .iter()
            .map(|key| ObjectIdentifier::builder().key(key).build())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| StorageError::Delete(e.to_string()))?;

        let delete = Delete::builder()
            .set_objects(Some(objects))
            .quiet(true)
            .build()
            .map_err(|e| StorageError::Delete(e.to_string()))?;

        let resp = self
            .client
            .delete_objects()
            .bucket(&bucket.bucket)
            .delete(delete)
            .send()
            .await
            .map_err(|e| StorageError::Delete(e.to_string()))?;

        let errors = resp
            .errors()
            .iter()
            .filter_map(|err| {
                err.key().map(|key| KeyError {
                    key: key.to_string(),
                    message: match (err.code(), err.message()) {
                        (Some(code), Some(message)) => format!("{code}: {message}"),
                        (Some(code), None) => code.to_string(),
                        (None, Some(message)) => message.to_string(),
                        (None, None) => "unknown error".to_string(),
                    },
                })
            })
            .collect();

        debug!("deleted batch of {} keys from s3://{}", keys.len(), bucket.bucket);
        Ok(DeleteResponse { errors })
    }
}
