//! 公开页面与评论接口

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Responder, Result as ActixResult, web};
use maud::Markup;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, trace, warn};

use crate::api::SiteSettings;
use crate::api::views;
use crate::services::{BlogService, CommentDraft};

use super::admin::{api_result, error_from_blog, json_response};

/// 评论请求体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentRequest {
    pub name: String,
    #[serde(default)]
    pub website: Option<String>,
    pub comment: String,
}

impl From<CommentRequest> for CommentDraft {
    fn from(req: CommentRequest) -> Self {
        Self {
            name: req.name,
            website: req.website,
            comment: req.comment,
        }
    }
}

fn html_response(status: StatusCode, markup: Markup) -> HttpResponse {
    HttpResponse::build(status)
        .content_type("text/html; charset=utf-8")
        .body(markup.into_string())
}

/// GET /
///
/// 读取失败时仍返回首页，只是列表为空并带错误提示
pub async fn index(
    service: web::Data<Arc<BlogService>>,
    settings: web::Data<SiteSettings>,
) -> ActixResult<impl Responder> {
    trace!("Rendering index");
    let markup = match service.get_posts(settings.list_limit, 0).await {
        Ok(posts) => views::index(&settings.site_title, &posts, None),
        Err(e) => {
            error!("Failed to load posts for index: {}", e);
            views::index(&settings.site_title, &[], Some("Failed to load posts."))
        }
    };
    Ok(html_response(StatusCode::OK, markup))
}

/// GET /{id}
pub async fn detail(
    path: web::Path<i64>,
    service: web::Data<Arc<BlogService>>,
    settings: web::Data<SiteSettings>,
) -> ActixResult<impl Responder> {
    let id = path.into_inner();
    let loader = service.loader();

    let loaded = match service.get_post(id, &loader).await {
        Ok(post) => service
            .list_comments(id)
            .await
            .map(|comments| (post, comments)),
        Err(e) => Err(e),
    };

    Ok(match loaded {
        Ok((post, comments)) => html_response(
            StatusCode::OK,
            views::detail(&settings.site_title, &post, &comments),
        ),
        Err(e) if e.is_not_found() => {
            trace!("Post {} not found", id);
            html_response(StatusCode::NOT_FOUND, views::not_found(&settings.site_title))
        }
        Err(e) => {
            error!("Failed to render post {}: {}", id, e);
            html_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                views::error_page(&settings.site_title, "Failed to load the post."),
            )
        }
    })
}

/// GET /{id}/comments
pub async fn list_comments(
    path: web::Path<i64>,
    service: web::Data<Arc<BlogService>>,
) -> ActixResult<impl Responder> {
    let id = path.into_inner();
    let loader = service.loader();

    if let Err(e) = service.get_post(id, &loader).await {
        return Ok(error_from_blog(&e));
    }
    Ok(match service.list_comments(id).await {
        Ok(comments) => json_response(StatusCode::OK, &comments),
        Err(e) => {
            error!("Failed to list comments for post {}: {}", id, e);
            error_from_blog(&e)
        }
    })
}

/// POST /{id}/comments
pub async fn add_comment(
    path: web::Path<i64>,
    body: web::Json<CommentRequest>,
    service: web::Data<Arc<BlogService>>,
) -> ActixResult<impl Responder> {
    let id = path.into_inner();
    let loader = service.loader();

    let result = service
        .add_comment(id, body.into_inner().into(), &loader)
        .await;
    if let Err(e) = &result {
        warn!("Failed to add comment to post {}: {}", id, e);
    }
    Ok(api_result(StatusCode::CREATED, result))
}

/// 公开页面路由（路径参数为数字 id，需最后注册）
pub fn blog_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index))
        .route("/{id}/comments", web::get().to(list_comments))
        .route("/{id}/comments", web::post().to(add_comment))
        .route("/{id}", web::get().to(detail));
}
