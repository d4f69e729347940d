//! API 帮助函数

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::errors::BlogError;

/// JSON 错误响应体 `{ "error": ... }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            code: None,
        }
    }
}

impl From<&BlogError> for ErrorBody {
    fn from(err: &BlogError) -> Self {
        Self {
            error: err.message().to_string(),
            code: Some(err.code().to_string()),
        }
    }
}

/// 构建 JSON 响应
pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> HttpResponse {
    HttpResponse::build(status)
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(body)
}

/// 从 BlogError 构建错误响应（自动映射 HTTP 状态码）
pub fn error_from_blog(err: &BlogError) -> HttpResponse {
    json_response(err.http_status(), &ErrorBody::from(err))
}

/// 统一 Result → HttpResponse 转换
pub fn api_result<T: Serialize>(status: StatusCode, result: Result<T, BlogError>) -> HttpResponse {
    match result {
        Ok(data) => json_response(status, &data),
        Err(e) => error_from_blog(&e),
    }
}
