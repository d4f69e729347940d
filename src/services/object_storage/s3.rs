//! S3 兼容对象存储

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::Client as S3Client;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use tracing::info;
use url::Url;

use super::provider::{ObjectStorage, UploadedFile, validate_object_name};
use crate::config::ObjectStorageConfig;
use crate::errors::{BlogError, Result};

pub struct S3ObjectStorage {
    client: S3Client,
    bucket: String,
    key_prefix: String,
    public_base: Url,
}

impl S3ObjectStorage {
    pub async fn from_config(config: &ObjectStorageConfig) -> Result<Self> {
        if config.s3.bucket.is_empty() {
            return Err(BlogError::object_storage("storage.s3.bucket is not set"));
        }

        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.s3.region.clone()));
        if let Some(ref endpoint) = config.s3.endpoint {
            loader = loader.endpoint_url(endpoint);
        }
        let sdk_config = loader.load().await;

        let public_base = if config.public_base_url.ends_with('/') {
            config.public_base_url.clone()
        } else {
            format!("{}/", config.public_base_url)
        };
        let public_base = Url::parse(&public_base).map_err(|e| {
            BlogError::object_storage(format!(
                "Invalid public_base_url '{}': {}",
                config.public_base_url, e
            ))
        })?;

        Ok(Self {
            client: S3Client::new(&sdk_config),
            bucket: config.s3.bucket.clone(),
            key_prefix: config.s3.key_prefix.clone(),
            public_base,
        })
    }

    fn key(&self, object_name: &str) -> Result<String> {
        validate_object_name(object_name)?;
        Ok(format!("{}{}", self.key_prefix, object_name))
    }
}

#[async_trait]
impl ObjectStorage for S3ObjectStorage {
    async fn put(
        &self,
        object_name: &str,
        data: Bytes,
        content_type: &str,
    ) -> Result<UploadedFile> {
        let key = self.key(object_name)?;
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .content_type(content_type)
            .body(ByteStream::from(data))
            .send()
            .await
            .map_err(|e| BlogError::object_storage(format!("Failed to write to S3: {}", e)))?;

        info!("Stored object s3://{}/{}", self.bucket, key);
        let public_url = self
            .public_base
            .join(&key)
            .map_err(|e| BlogError::object_storage(format!("Failed to build public URL: {}", e)))?;
        Ok(UploadedFile {
            object_name: object_name.to_string(),
            public_url: public_url.to_string(),
        })
    }

    async fn get(&self, object_name: &str) -> Result<Option<Bytes>> {
        let key = self.key(object_name)?;
        let resp = match self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(&key)
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(err) => {
                let service_err = err.into_service_error();
                if service_err.is_no_such_key() {
                    return Ok(None);
                }
                return Err(BlogError::object_storage(format!(
                    "Failed to read from S3: {}",
                    service_err
                )));
            }
        };

        let data = resp
            .body
            .collect()
            .await
            .map_err(|e| BlogError::object_storage(format!("Failed to collect S3 data: {}", e)))?;
        Ok(Some(data.into_bytes()))
    }

    async fn delete(&self, object_name: &str) -> Result<()> {
        let key = self.key(object_name)?;
        // S3 删除不存在的 key 同样返回成功
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(&key)
            .send()
            .await
            .map_err(|e| BlogError::object_storage(format!("Failed to delete from S3: {}", e)))?;

        info!("Deleted object s3://{}/{}", self.bucket, key);
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "s3"
    }
}
