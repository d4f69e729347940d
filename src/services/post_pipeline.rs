//! Pre-save data preparation for blog posts
//!
//! Incoming post data flows through three pure steps before it is merged
//! into a stored entity:
//!
//! ```text
//! create_excerpt( sanitize( add_poster_uri(data) ) )
//! ```

use chrono::{DateTime, Utc};

use crate::errors::{BlogError, Result};
use crate::services::object_storage::UploadedFile;
use crate::storage::BlogPost;
use crate::utils::create_excerpt;

/// 标题最大长度（字符）
pub const MAX_TITLE_LEN: usize = 200;

/// 三态字段：未提供 / 显式置空 / 新值
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FieldPatch<T> {
    #[default]
    Unchanged,
    Null,
    Value(T),
}

impl<T> FieldPatch<T> {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldPatch::Null)
    }

    /// 合并到已有值上
    pub fn apply(self, current: Option<T>) -> Option<T> {
        match self {
            FieldPatch::Unchanged => current,
            FieldPatch::Null => None,
            FieldPatch::Value(v) => Some(v),
        }
    }
}

/// 客户端提交的文章数据
#[derive(Debug, Clone, Default)]
pub struct PostDraft {
    pub title: Option<String>,
    pub content: Option<String>,
    pub poster_uri: FieldPatch<String>,
    /// 随请求上传、已写入对象存储的海报
    pub file: Option<UploadedFile>,
}

/// 流经 pre-save 步骤的数据
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityData {
    pub title: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub poster_uri: FieldPatch<String>,
    pub cloud_storage_object: FieldPatch<String>,
    pub file: Option<UploadedFile>,
}

impl From<PostDraft> for EntityData {
    fn from(draft: PostDraft) -> Self {
        Self {
            title: draft.title,
            content: draft.content,
            excerpt: None,
            poster_uri: draft.poster_uri,
            cloud_storage_object: FieldPatch::Unchanged,
            file: draft.file,
        }
    }
}

/// 上传了文件时记录其 public URL 与对象名；
/// 显式清空 poster_uri 时同时清空对象名
pub fn add_poster_uri(data: EntityData) -> EntityData {
    if let Some(file) = data.file.clone() {
        EntityData {
            poster_uri: FieldPatch::Value(file.public_url),
            cloud_storage_object: FieldPatch::Value(file.object_name),
            ..data
        }
    } else if data.poster_uri.is_null() {
        EntityData {
            cloud_storage_object: FieldPatch::Null,
            ..data
        }
    } else {
        data
    }
}

/// 规范化可写字段：去掉 file 载荷，标题去首尾空白并校验
pub fn sanitize(data: EntityData) -> Result<EntityData> {
    let title = match data.title {
        Some(title) => {
            let trimmed = title.trim();
            if trimmed.is_empty() {
                return Err(BlogError::validation("Title must not be empty"));
            }
            if trimmed.chars().count() > MAX_TITLE_LEN {
                return Err(BlogError::validation(format!(
                    "Title must be at most {} characters",
                    MAX_TITLE_LEN
                )));
            }
            Some(trimmed.to_string())
        }
        None => None,
    };

    let poster_uri = match data.poster_uri {
        FieldPatch::Value(uri) if uri.trim().is_empty() => FieldPatch::Null,
        FieldPatch::Value(uri) => FieldPatch::Value(uri.trim().to_string()),
        other => other,
    };
    let cloud_storage_object = match (&poster_uri, data.cloud_storage_object) {
        (FieldPatch::Null, _) => FieldPatch::Null,
        (_, other) => other,
    };

    Ok(EntityData {
        title,
        poster_uri,
        cloud_storage_object,
        file: None,
        ..data
    })
}

/// 根据正文生成摘要；未提交正文时保持原摘要
pub fn add_excerpt(data: EntityData, max_len: usize) -> EntityData {
    let excerpt = data
        .content
        .as_deref()
        .map(|content| create_excerpt(content, max_len));
    EntityData { excerpt, ..data }
}

/// 完整的 pre-save 数据准备
pub fn prepare_entity_data(data: EntityData, excerpt_len: usize) -> Result<EntityData> {
    let data = add_poster_uri(data);
    let data = sanitize(data)?;
    Ok(add_excerpt(data, excerpt_len))
}

impl EntityData {
    /// 构建新文章（id 由数据库生成）
    pub fn into_new_post(self, blog: &str, now: DateTime<Utc>, excerpt_len: usize) -> Result<BlogPost> {
        let title = self
            .title
            .ok_or_else(|| BlogError::validation("Title is required"))?;
        let content = self.content.unwrap_or_default();
        let excerpt = self
            .excerpt
            .unwrap_or_else(|| create_excerpt(&content, excerpt_len));

        Ok(BlogPost {
            id: 0,
            blog: blog.to_string(),
            title,
            created_on: now,
            modified_on: now,
            content,
            excerpt,
            poster_uri: self.poster_uri.apply(None),
            cloud_storage_object: self.cloud_storage_object.apply(None),
        })
    }

    /// 合并到已存储的文章上，created_on 保持不变
    pub fn merge_into(self, existing: BlogPost, now: DateTime<Utc>) -> BlogPost {
        BlogPost {
            title: self.title.unwrap_or(existing.title),
            content: self.content.unwrap_or(existing.content),
            excerpt: self.excerpt.unwrap_or(existing.excerpt),
            poster_uri: self.poster_uri.apply(existing.poster_uri),
            cloud_storage_object: self
                .cloud_storage_object
                .apply(existing.cloud_storage_object),
            modified_on: now,
            ..existing
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uploaded() -> UploadedFile {
        UploadedFile {
            object_name: "1700-abc-poster.png".to_string(),
            public_url: "https://cdn.example.com/1700-abc-poster.png".to_string(),
        }
    }

    fn stored_post() -> BlogPost {
        let then = Utc::now() - chrono::Duration::days(3);
        BlogPost {
            id: 7,
            blog: "default".to_string(),
            title: "Old title".to_string(),
            created_on: then,
            modified_on: then,
            content: "Old content".to_string(),
            excerpt: "Old content".to_string(),
            poster_uri: Some("https://cdn.example.com/old.png".to_string()),
            cloud_storage_object: Some("old.png".to_string()),
        }
    }

    #[test]
    fn test_add_poster_uri_from_file() {
        let data = EntityData {
            file: Some(uploaded()),
            ..Default::default()
        };

        let data = add_poster_uri(data);
        assert_eq!(
            data.poster_uri,
            FieldPatch::Value("https://cdn.example.com/1700-abc-poster.png".to_string())
        );
        assert_eq!(
            data.cloud_storage_object,
            FieldPatch::Value("1700-abc-poster.png".to_string())
        );
    }

    #[test]
    fn test_add_poster_uri_null_clears_object() {
        let data = EntityData {
            poster_uri: FieldPatch::Null,
            ..Default::default()
        };

        let data = add_poster_uri(data);
        assert_eq!(data.cloud_storage_object, FieldPatch::Null);
    }

    #[test]
    fn test_add_poster_uri_untouched_without_file_or_null() {
        let data = EntityData {
            title: Some("T".to_string()),
            ..Default::default()
        };
        assert_eq!(add_poster_uri(data.clone()), data);
    }

    #[test]
    fn test_sanitize_trims_title_and_drops_file() {
        let data = EntityData {
            title: Some("  Hello  ".to_string()),
            file: Some(uploaded()),
            ..Default::default()
        };

        let data = sanitize(data).unwrap();
        assert_eq!(data.title.as_deref(), Some("Hello"));
        assert!(data.file.is_none());
    }

    #[test]
    fn test_sanitize_rejects_blank_title() {
        let data = EntityData {
            title: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(matches!(sanitize(data), Err(BlogError::Validation(_))));
    }

    #[test]
    fn test_sanitize_blank_poster_uri_means_null() {
        let data = EntityData {
            poster_uri: FieldPatch::Value(" ".to_string()),
            ..Default::default()
        };

        let data = sanitize(data).unwrap();
        assert_eq!(data.poster_uri, FieldPatch::Null);
        assert_eq!(data.cloud_storage_object, FieldPatch::Null);
    }

    #[test]
    fn test_excerpt_follows_content() {
        let data = EntityData {
            content: Some("<p>Some content</p>".to_string()),
            ..Default::default()
        };
        let data = add_excerpt(data, 300);
        assert_eq!(data.excerpt.as_deref(), Some("Some content"));

        let no_content = add_excerpt(EntityData::default(), 300);
        assert!(no_content.excerpt.is_none());
    }

    #[test]
    fn test_new_post_requires_title() {
        let data = prepare_entity_data(EntityData::default(), 300).unwrap();
        assert!(data.into_new_post("default", Utc::now(), 300).is_err());
    }

    #[test]
    fn test_new_post_with_file() {
        let draft = PostDraft {
            title: Some("Launch".to_string()),
            content: Some("We shipped it.".to_string()),
            file: Some(uploaded()),
            ..Default::default()
        };
        let now = Utc::now();

        let post = prepare_entity_data(draft.into(), 300)
            .unwrap()
            .into_new_post("default", now, 300)
            .unwrap();

        assert_eq!(post.title, "Launch");
        assert_eq!(post.excerpt, "We shipped it.");
        assert_eq!(post.created_on, now);
        assert_eq!(post.cloud_storage_object.as_deref(), Some("1700-abc-poster.png"));
    }

    #[test]
    fn test_merge_null_poster_clears_both_fields() {
        let draft = PostDraft {
            poster_uri: FieldPatch::Null,
            ..Default::default()
        };
        let existing = stored_post();
        let created_on = existing.created_on;
        let now = Utc::now();

        let merged = prepare_entity_data(draft.into(), 300)
            .unwrap()
            .merge_into(existing, now);

        assert!(merged.poster_uri.is_none());
        assert!(merged.cloud_storage_object.is_none());
        assert_eq!(merged.title, "Old title");
        assert_eq!(merged.created_on, created_on);
        assert_eq!(merged.modified_on, now);
    }

    #[test]
    fn test_merge_without_poster_keeps_existing() {
        let draft = PostDraft {
            content: Some("New content".to_string()),
            ..Default::default()
        };

        let merged = prepare_entity_data(draft.into(), 300)
            .unwrap()
            .merge_into(stored_post(), Utc::now());

        assert_eq!(merged.content, "New content");
        assert_eq!(merged.excerpt, "New content");
        assert_eq!(merged.cloud_storage_object.as_deref(), Some("old.png"));
    }
}
