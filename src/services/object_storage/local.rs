//! 本地文件系统对象存储

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tracing::{debug, info};
use url::Url;

use super::provider::{ObjectStorage, UploadedFile, validate_object_name};
use crate::errors::{BlogError, Result};

pub struct LocalObjectStorage {
    root: PathBuf,
    public_base: Url,
}

impl LocalObjectStorage {
    /// `public_base_url` 缺少结尾 `/` 时自动补齐，保证 join 时不吞掉最后一段路径
    pub fn new(root: impl AsRef<Path>, public_base_url: &str) -> Result<Self> {
        let normalized = if public_base_url.ends_with('/') {
            public_base_url.to_string()
        } else {
            format!("{}/", public_base_url)
        };
        let public_base = Url::parse(&normalized).map_err(|e| {
            BlogError::object_storage(format!(
                "Invalid public_base_url '{}': {}",
                public_base_url, e
            ))
        })?;

        Ok(Self {
            root: root.as_ref().to_path_buf(),
            public_base,
        })
    }

    fn object_path(&self, object_name: &str) -> Result<PathBuf> {
        validate_object_name(object_name)?;
        Ok(self.root.join(object_name))
    }

    pub fn public_url(&self, object_name: &str) -> Result<String> {
        self.public_base
            .join(object_name)
            .map(|url| url.to_string())
            .map_err(|e| BlogError::object_storage(format!("Failed to build public URL: {}", e)))
    }
}

#[async_trait]
impl ObjectStorage for LocalObjectStorage {
    async fn put(
        &self,
        object_name: &str,
        data: Bytes,
        _content_type: &str,
    ) -> Result<UploadedFile> {
        let path = self.object_path(object_name)?;
        tokio::fs::create_dir_all(&self.root).await.map_err(|e| {
            BlogError::object_storage(format!(
                "Failed to create storage directory {}: {}",
                self.root.display(),
                e
            ))
        })?;
        tokio::fs::write(&path, &data).await.map_err(|e| {
            BlogError::object_storage(format!("Failed to write object '{}': {}", object_name, e))
        })?;

        info!("Stored object '{}' ({} bytes)", object_name, data.len());
        Ok(UploadedFile {
            object_name: object_name.to_string(),
            public_url: self.public_url(object_name)?,
        })
    }

    async fn get(&self, object_name: &str) -> Result<Option<Bytes>> {
        let path = self.object_path(object_name)?;
        match tokio::fs::read(&path).await {
            Ok(data) => Ok(Some(Bytes::from(data))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(BlogError::object_storage(format!(
                "Failed to read object '{}': {}",
                object_name, e
            ))),
        }
    }

    async fn delete(&self, object_name: &str) -> Result<()> {
        let path = self.object_path(object_name)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                info!("Deleted object '{}'", object_name);
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("Object '{}' already absent", object_name);
                Ok(())
            }
            Err(e) => Err(BlogError::object_storage(format!(
                "Failed to delete object '{}': {}",
                object_name, e
            ))),
        }
    }

    fn backend_name(&self) -> &'static str {
        "local"
    }
}
