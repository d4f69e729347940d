//! 文章表单（multipart/form-data）解析

use actix_multipart::{Field, Multipart};
use bytes::{Bytes, BytesMut};
use futures_util::stream::StreamExt;
use tracing::debug;

use crate::errors::{BlogError, Result};
use crate::services::FieldPatch;
use crate::services::object_storage::guess_content_type;

/// 上传的海报文件（尚未写入对象存储）
#[derive(Debug, Clone)]
pub struct FilePart {
    pub filename: String,
    pub content_type: String,
    pub data: Bytes,
}

/// 解析后的文章表单
#[derive(Debug, Clone, Default)]
pub struct PostForm {
    pub title: Option<String>,
    pub content: Option<String>,
    pub poster_uri: FieldPatch<String>,
    pub file: Option<FilePart>,
}

/// `posterUri` 的取值：`null` 或空串表示清空
pub fn parse_poster_uri(value: String) -> FieldPatch<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("null") {
        FieldPatch::Null
    } else {
        FieldPatch::Value(trimmed.to_string())
    }
}

/// 读取整个字段，累计超过 `limit` 字节时报错
async fn read_field(field: &mut Field, limit: usize) -> Result<Bytes> {
    let mut data = BytesMut::new();
    while let Some(chunk) = field.next().await {
        let bytes = chunk?;
        if data.len() + bytes.len() > limit {
            return Err(BlogError::file_too_large(format!(
                "Field exceeds maximum size of {} bytes",
                limit
            )));
        }
        data.extend_from_slice(&bytes);
    }
    Ok(data.freeze())
}

async fn read_text(field: &mut Field, limit: usize) -> Result<String> {
    let data = read_field(field, limit).await?;
    String::from_utf8(data.to_vec())
        .map_err(|_| BlogError::invalid_multipart_data("Form field is not valid UTF-8"))
}

/// 解析 `title`、`content`、`posterUri`、`file` 字段，其余字段忽略
pub async fn parse_post_form(mut payload: Multipart, max_upload_size: usize) -> Result<PostForm> {
    let mut form = PostForm::default();

    while let Some(item) = payload.next().await {
        let mut field = item?;
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "title" => form.title = Some(read_text(&mut field, max_upload_size).await?),
            "content" => form.content = Some(read_text(&mut field, max_upload_size).await?),
            "posterUri" => {
                form.poster_uri = parse_poster_uri(read_text(&mut field, max_upload_size).await?)
            }
            "file" => {
                let filename = field
                    .content_disposition()
                    .and_then(|cd| cd.get_filename())
                    .unwrap_or("")
                    .to_string();
                let declared_type = field.content_type().map(|mime| mime.essence_str().to_string());
                let data = read_field(&mut field, max_upload_size).await?;

                // 浏览器未选择文件时也会提交一个空的 file 字段
                if filename.is_empty() && data.is_empty() {
                    continue;
                }
                if data.is_empty() {
                    return Err(BlogError::invalid_multipart_data("Uploaded file is empty"));
                }

                let content_type = declared_type
                    .filter(|t| t != "application/octet-stream")
                    .unwrap_or_else(|| guess_content_type(&filename).to_string());
                debug!(
                    "Post form: received file '{}' ({} bytes, {})",
                    filename,
                    data.len(),
                    content_type
                );
                form.file = Some(FilePart {
                    filename,
                    content_type,
                    data,
                });
            }
            other => debug!("Post form: ignoring field '{}'", other),
        }
    }

    Ok(form)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_poster_uri() {
        assert_eq!(parse_poster_uri("null".to_string()), FieldPatch::Null);
        assert_eq!(parse_poster_uri("NULL".to_string()), FieldPatch::Null);
        assert_eq!(parse_poster_uri("  ".to_string()), FieldPatch::Null);
        assert_eq!(
            parse_poster_uri(" https://cdn.example.com/a.png ".to_string()),
            FieldPatch::Value("https://cdn.example.com/a.png".to_string())
        );
    }
}
