//! Object storage abstraction
//!
//! 根据 `storage.backend` 选择实现：
//! - "local" → LocalObjectStorage
//! - "s3"    → S3ObjectStorage（需要 s3 feature）

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::local::LocalObjectStorage;
use crate::config::ObjectStorageConfig;
use crate::errors::{BlogError, Result};

/// 上传完成的文件
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    /// 存储中的对象名，删除时使用
    pub object_name: String,
    /// 对外可访问的 URL
    pub public_url: String,
}

/// 对象名只允许单层文件名
pub fn validate_object_name(object_name: &str) -> Result<()> {
    let invalid = object_name.is_empty()
        || object_name == "."
        || object_name.contains("..")
        || object_name.contains(['/', '\\'])
        || object_name.chars().any(char::is_control);
    if invalid {
        return Err(BlogError::validation(format!(
            "Invalid object name: '{}'",
            object_name
        )));
    }
    Ok(())
}

/// 根据扩展名推断 Content-Type
pub fn guess_content_type(object_name: &str) -> &'static str {
    let ext = object_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "avif" => "image/avif",
        _ => "application/octet-stream",
    }
}

/// 外部文件存储 trait
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// 写入对象并返回其 public URL
    async fn put(&self, object_name: &str, data: Bytes, content_type: &str)
    -> Result<UploadedFile>;

    /// 读取对象，不存在时返回 `None`
    async fn get(&self, object_name: &str) -> Result<Option<Bytes>>;

    /// 删除对象；对象不存在不视为错误
    async fn delete(&self, object_name: &str) -> Result<()>;

    /// 获取 backend 名称（用于日志和健康检查）
    fn backend_name(&self) -> &'static str;
}

pub struct ObjectStorageFactory;

impl ObjectStorageFactory {
    pub async fn create(config: &ObjectStorageConfig) -> Result<Arc<dyn ObjectStorage>> {
        let storage: Arc<dyn ObjectStorage> = match config.backend.as_str() {
            "local" => Arc::new(LocalObjectStorage::new(
                &config.local_root,
                &config.public_base_url,
            )?),
            #[cfg(feature = "s3")]
            "s3" => Arc::new(super::s3::S3ObjectStorage::from_config(config).await?),
            other => {
                return Err(BlogError::object_storage(format!(
                    "Unsupported object storage backend: '{}'",
                    other
                )));
            }
        };

        info!("Object storage initialized with {} backend", storage.backend_name());
        Ok(storage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_object_name() {
        assert!(validate_object_name("1700000000000-abc-poster.png").is_ok());
        assert!(validate_object_name("").is_err());
        assert!(validate_object_name("../secret").is_err());
        assert!(validate_object_name("dir/file.png").is_err());
        assert!(validate_object_name("dir\\file.png").is_err());
    }

    #[test]
    fn test_guess_content_type() {
        assert_eq!(guess_content_type("a.PNG"), "image/png");
        assert_eq!(guess_content_type("a.jpeg"), "image/jpeg");
        assert_eq!(guess_content_type("noext"), "application/octet-stream");
    }

    #[tokio::test]
    async fn test_factory_rejects_unknown_backend() {
        let config = ObjectStorageConfig {
            backend: "ftp".to_string(),
            ..Default::default()
        };

        let err = ObjectStorageFactory::create(&config)
            .await
            .err()
            .expect("ftp backend should be rejected");
        assert!(err.message().contains("ftp"));
    }

    #[tokio::test]
    async fn test_factory_builds_local_backend() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = ObjectStorageConfig {
            backend: "local".to_string(),
            local_root: dir.path().display().to_string(),
            public_base_url: "https://cdn.example.com/".to_string(),
            ..Default::default()
        };

        let storage = ObjectStorageFactory::create(&config).await.unwrap();
        assert_eq!(storage.backend_name(), "local");
    }
}
