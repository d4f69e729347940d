//! Admin 文章写操作

use actix_multipart::Multipart;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Responder, Result as ActixResult, web};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::api::SiteSettings;
use crate::errors::Result;
use crate::services::{BlogService, PostDraft, UploadedFile};

use super::helpers::{ErrorBody, api_result, error_from_blog, json_response};
use super::multipart::{PostForm, parse_post_form};

/// 上传表单中的文件并转换为 PostDraft
async fn into_draft(service: &BlogService, form: PostForm) -> Result<PostDraft> {
    let file = match form.file {
        Some(part) => Some(
            service
                .upload_poster(&part.filename, part.data, &part.content_type)
                .await?,
        ),
        None => None,
    };

    Ok(PostDraft {
        title: form.title,
        content: form.content,
        poster_uri: form.poster_uri,
        file,
    })
}

/// 保存失败时清理本次上传
async fn discard_on_error<T>(
    service: &BlogService,
    uploaded: Option<UploadedFile>,
    result: Result<T>,
) -> Result<T> {
    if result.is_err()
        && let Some(file) = uploaded
    {
        service.discard_upload(&file).await;
    }
    result
}

/// POST /admin/posts
pub async fn create_post(
    payload: Multipart,
    service: web::Data<Arc<BlogService>>,
    settings: web::Data<SiteSettings>,
) -> ActixResult<impl Responder> {
    info!("Admin API: create post request");

    let result = async {
        let form = parse_post_form(payload, settings.max_upload_size).await?;
        let draft = into_draft(&service, form).await?;
        let uploaded = draft.file.clone();
        let saved = service.create_post(draft).await;
        discard_on_error(&service, uploaded, saved).await
    }
    .await;

    if let Err(e) = &result {
        warn!("Admin API: create post failed: {}", e);
    }
    Ok(api_result(StatusCode::CREATED, result))
}

/// PUT /admin/posts/{id}
pub async fn update_post(
    path: web::Path<i64>,
    payload: Multipart,
    service: web::Data<Arc<BlogService>>,
    settings: web::Data<SiteSettings>,
) -> ActixResult<impl Responder> {
    let id = path.into_inner();
    info!("Admin API: update post {} request", id);

    let loader = service.loader();
    let result = async {
        let form = parse_post_form(payload, settings.max_upload_size).await?;
        let draft = into_draft(&service, form).await?;
        let uploaded = draft.file.clone();
        let saved = service.update_post(id, draft, &loader).await;
        discard_on_error(&service, uploaded, saved).await
    }
    .await;

    if let Err(e) = &result {
        warn!("Admin API: update post {} failed: {}", id, e);
    }
    Ok(api_result(StatusCode::OK, result))
}

/// DELETE /{id}
///
/// - 删除成功 → 200 `{success, id}`
/// - 没有行被删除 → 400，响应体相同
/// - 删除过程中出错 → 401 `{error}`
pub async fn delete_post(
    path: web::Path<i64>,
    service: web::Data<Arc<BlogService>>,
) -> ActixResult<impl Responder> {
    let id = path.into_inner();
    info!("Admin API: delete post {} request", id);

    let response: HttpResponse = match service.delete_post(id).await {
        Ok(result) if result.success => json_response(StatusCode::OK, &result),
        Ok(result) => json_response(StatusCode::BAD_REQUEST, &result),
        Err(e) => {
            error!("Admin API: delete post {} failed: {}", id, e);
            json_response(StatusCode::UNAUTHORIZED, &ErrorBody::from(&e))
        }
    };
    Ok(response)
}

/// GET /admin/posts/{id}，返回包含 cloudStorageObject 的完整 JSON
pub async fn get_post(
    path: web::Path<i64>,
    service: web::Data<Arc<BlogService>>,
) -> ActixResult<impl Responder> {
    let id = path.into_inner();
    let loader = service.loader();
    Ok(match service.get_post(id, &loader).await {
        Ok(post) => json_response(StatusCode::OK, &post),
        Err(e) => error_from_blog(&e),
    })
}
