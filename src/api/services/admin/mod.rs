//! Admin API：文章写操作（需要 Bearer token）

pub mod helpers;
pub mod multipart;
pub mod posts;

use actix_web::web;

pub use helpers::{ErrorBody, api_result, error_from_blog, json_response};
pub use multipart::{FilePart, PostForm, parse_post_form};
pub use posts::{create_post, delete_post, get_post, update_post};

/// 管理路由 `/admin`，由调用方包上 `AdminAuth`
///
/// - POST /admin/posts - 创建文章
/// - GET /admin/posts/{id} - 获取文章
/// - PUT /admin/posts/{id} - 更新文章
pub fn admin_routes() -> actix_web::Scope {
    web::scope("/admin")
        .route("/posts", web::post().to(create_post))
        .route("/posts/{id}", web::get().to(get_post))
        .route("/posts/{id}", web::put().to(update_post))
}
