//! GET /uploads/{name}：从对象存储读取海报文件
//!
//! local 后端的 public URL 指向这里；S3 后端一般直接使用 bucket 的 URL。

use actix_web::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use actix_web::{HttpResponse, Responder, Result as ActixResult, web};
use std::sync::Arc;
use tracing::{error, trace};

use crate::services::ObjectStorage;
use crate::services::object_storage::{guess_content_type, validate_object_name};

pub async fn serve_upload(
    path: web::Path<String>,
    objects: web::Data<Arc<dyn ObjectStorage>>,
) -> ActixResult<impl Responder> {
    let name = path.into_inner();
    if validate_object_name(&name).is_err() {
        return Ok(HttpResponse::NotFound().finish());
    }

    Ok(match objects.get(&name).await {
        Ok(Some(data)) => HttpResponse::Ok()
            .insert_header((CONTENT_TYPE, guess_content_type(&name)))
            .insert_header((CACHE_CONTROL, "public, max-age=31536000, immutable"))
            .body(data),
        Ok(None) => {
            trace!("Upload '{}' not found", name);
            HttpResponse::NotFound().finish()
        }
        Err(e) => {
            error!("Failed to read upload '{}': {}", name, e);
            HttpResponse::InternalServerError().finish()
        }
    })
}

pub fn upload_routes() -> actix_web::Scope {
    web::scope("/uploads").route("/{name}", web::get().to(serve_upload))
}
