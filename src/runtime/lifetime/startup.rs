use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{debug, info};

use crate::api::SiteSettings;
use crate::api::middleware::AdminAuth;
use crate::config::get_config;
use crate::services::{BlogService, BlogSettings, ObjectStorage, ObjectStorageFactory};
use crate::storage::{SeaOrmStorage, StorageFactory};

pub struct StartupContext {
    pub storage: Arc<SeaOrmStorage>,
    pub objects: Arc<dyn ObjectStorage>,
    pub blog_service: Arc<BlogService>,
    pub settings: SiteSettings,
    pub admin_auth: AdminAuth,
}

/// 准备服务器启动的上下文：存储、对象存储、服务
pub async fn prepare_server_startup() -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    let config = get_config();

    let storage = StorageFactory::create()
        .await
        .context("Failed to create storage backend")?;
    info!(
        "Using storage backend: {}",
        storage.get_backend_config().storage_type
    );

    let objects = ObjectStorageFactory::create(&config.storage)
        .await
        .context("Failed to create object storage")?;

    let blog_service = Arc::new(BlogService::new(
        storage.clone(),
        objects.clone(),
        BlogSettings::from_config(&config.blog),
    ));

    let admin_auth = AdminAuth::from_config();
    if config.api.admin_token.is_empty() {
        info!("Admin API is disabled (api.admin_token not set)");
    } else {
        info!("Admin API available at: /admin");
    }

    debug!("Pre-startup processing completed in {:?}", start_time.elapsed());

    Ok(StartupContext {
        storage,
        objects,
        blog_service,
        settings: SiteSettings::from_config(&config),
        admin_auth,
    })
}
