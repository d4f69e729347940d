//! HTTP 层：路由、middleware、HTML 页面

pub mod middleware;
pub mod services;
pub mod views;

use actix_web::{guard, web};
use std::sync::Arc;

use crate::config::StaticConfig;
use crate::services::{BlogService, ObjectStorage};
use crate::storage::SeaOrmStorage;

use middleware::AdminAuth;
use services::{AppStartTime, admin, admin_routes, blog_routes, health_routes, upload_routes};

/// handler 共享的站点参数
#[derive(Debug, Clone)]
pub struct SiteSettings {
    pub site_title: String,
    pub list_limit: u64,
    pub max_upload_size: usize,
}

impl SiteSettings {
    pub fn from_config(config: &StaticConfig) -> Self {
        Self {
            site_title: config.blog.title.clone(),
            list_limit: config.blog.list_limit,
            max_upload_size: config.server.max_upload_size,
        }
    }
}

/// 注册到每个 worker App 上的共享状态
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<SeaOrmStorage>,
    pub objects: Arc<dyn ObjectStorage>,
    pub blog_service: Arc<BlogService>,
    pub settings: SiteSettings,
    pub admin_auth: AdminAuth,
    pub start_time: AppStartTime,
}

/// 注册 app data 与全部路由
///
/// 注册顺序：/health、/uploads、/admin、DELETE /{id}，最后是公开页面
pub fn configure(cfg: &mut web::ServiceConfig, state: &AppState) {
    cfg.app_data(web::Data::new(state.storage.clone()))
        .app_data(web::Data::new(state.objects.clone()))
        .app_data(web::Data::new(state.blog_service.clone()))
        .app_data(web::Data::new(state.settings.clone()))
        .app_data(web::Data::new(state.start_time.clone()))
        .service(health_routes())
        .service(upload_routes())
        .service(admin_routes().wrap(state.admin_auth.clone()))
        .service(
            web::resource("/{id}")
                .guard(guard::Delete())
                .wrap(state.admin_auth.clone())
                .route(web::delete().to(admin::delete_post)),
        )
        .configure(blog_routes);
}
