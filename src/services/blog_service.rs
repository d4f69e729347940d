//! Blog post service
//!
//! Owns the post lifecycle: the pre-save hooks (previous image cleanup and
//! entity data preparation), the pre-delete external file cleanup and the
//! post-delete comment cascade. HTTP handlers only talk to this service.

use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::BlogConfig;
use crate::errors::{BlogError, Result};
use crate::services::object_storage::{ObjectStorage, UploadedFile};
use crate::services::post_pipeline::{EntityData, FieldPatch, PostDraft, prepare_entity_data};
use crate::storage::{BlogPost, BlogPostLoader, Comment, DeleteResult, SeaOrmStorage};
use crate::utils::generate_object_name;

/// 评论作者名最大长度
pub const MAX_COMMENT_NAME_LEN: usize = 100;
/// 评论正文最大长度
pub const MAX_COMMENT_LEN: usize = 5000;

/// BlogService 运行参数
#[derive(Debug, Clone)]
pub struct BlogSettings {
    /// 文章所属 blog 分组
    pub blog_name: String,
    pub excerpt_length: usize,
    pub comments_limit: u64,
}

impl BlogSettings {
    pub fn from_config(config: &BlogConfig) -> Self {
        Self {
            blog_name: config.name.clone(),
            excerpt_length: config.excerpt_length,
            comments_limit: config.comments_limit,
        }
    }
}

impl Default for BlogSettings {
    fn default() -> Self {
        Self::from_config(&BlogConfig::default())
    }
}

/// 新评论
#[derive(Debug, Clone, Default)]
pub struct CommentDraft {
    pub name: String,
    pub website: Option<String>,
    pub comment: String,
}

pub struct BlogService {
    storage: Arc<SeaOrmStorage>,
    objects: Arc<dyn ObjectStorage>,
    settings: BlogSettings,
}

impl BlogService {
    pub fn new(
        storage: Arc<SeaOrmStorage>,
        objects: Arc<dyn ObjectStorage>,
        settings: BlogSettings,
    ) -> Self {
        Self {
            storage,
            objects,
            settings,
        }
    }

    /// 为单个请求创建 loader
    pub fn loader(&self) -> BlogPostLoader {
        BlogPostLoader::new(self.storage.clone())
    }

    pub fn object_storage(&self) -> &Arc<dyn ObjectStorage> {
        &self.objects
    }

    pub fn settings(&self) -> &BlogSettings {
        &self.settings
    }

    // ============ Queries ============

    pub async fn get_posts(&self, limit: u64, offset: u64) -> Result<Vec<BlogPost>> {
        self.storage
            .list_posts(&self.settings.blog_name, limit.clamp(1, 100), offset)
            .await
    }

    pub async fn get_post(&self, id: i64, loader: &BlogPostLoader) -> Result<BlogPost> {
        loader
            .load(id)
            .await?
            .ok_or_else(|| BlogError::not_found(format!("Blog post {} not found", id)))
    }

    pub async fn list_comments(&self, post_id: i64) -> Result<Vec<Comment>> {
        self.storage
            .list_comments(post_id, self.settings.comments_limit)
            .await
    }

    // ============ Save ============

    /// 新建文章；新实体没有 id，不触发旧图清理
    pub async fn create_post(&self, draft: PostDraft) -> Result<BlogPost> {
        let data = prepare_entity_data(EntityData::from(draft), self.settings.excerpt_length)?;
        let post = data.into_new_post(
            &self.settings.blog_name,
            Utc::now(),
            self.settings.excerpt_length,
        )?;

        let saved = self.storage.insert_post(&post).await?;
        info!("BlogService: created post {} '{}'", saved.id, saved.title);
        Ok(saved)
    }

    /// 更新文章，未提交的字段保留原值
    ///
    /// 校验与加载都在删除旧图之前完成，被拒绝的更新不会动到已存储的对象。
    pub async fn update_post(
        &self,
        id: i64,
        draft: PostDraft,
        loader: &BlogPostLoader,
    ) -> Result<BlogPost> {
        let data = prepare_entity_data(EntityData::from(draft), self.settings.excerpt_length)?;
        let existing = self.get_post(id, loader).await?;

        self.delete_previous_image(id, &data, loader).await?;

        let merged = data.merge_into(existing, Utc::now());
        let saved = self.storage.update_post(&merged).await?;
        loader.prime(saved.clone()).await;

        info!("BlogService: updated post {}", saved.id);
        Ok(saved)
    }

    /// pre-save hook：已存在的实体清空海报或换了新文件时，
    /// 读取旧实体（不与本次数据合并），删除它引用的外部对象
    ///
    /// 以规范化后的 `cloud_storage_object` 判断，空白 poster_uri 与 null 等价。
    async fn delete_previous_image(
        &self,
        id: i64,
        data: &EntityData,
        loader: &BlogPostLoader,
    ) -> Result<()> {
        if data.cloud_storage_object == FieldPatch::Unchanged {
            return Ok(());
        }

        let Some(previous) = loader.load(id).await? else {
            return Ok(());
        };
        match previous.cloud_storage_object {
            Some(ref object_name) => {
                debug!(
                    "BlogService: post {} replaces poster object '{}'",
                    id, object_name
                );
                self.objects.delete(object_name).await
            }
            None => Ok(()),
        }
    }

    /// 将上传的海报写入对象存储，对象名带时间戳与随机串
    pub async fn upload_poster(
        &self,
        filename: &str,
        data: Bytes,
        content_type: &str,
    ) -> Result<UploadedFile> {
        let object_name = generate_object_name(filename);
        let uploaded = self.objects.put(&object_name, data, content_type).await?;
        debug!("BlogService: stored poster object '{}'", uploaded.object_name);
        Ok(uploaded)
    }

    /// 保存失败后清理刚上传的对象，失败只记录日志
    pub async fn discard_upload(&self, file: &UploadedFile) {
        if let Err(e) = self.objects.delete(&file.object_name).await {
            warn!(
                "BlogService: failed to discard upload '{}': {}",
                file.object_name, e
            );
        }
    }

    // ============ Delete ============

    /// 删除文章
    ///
    /// 顺序：删除外部对象 → 删除文章 → 删除成功后级联删除评论
    pub async fn delete_post(&self, id: i64) -> Result<DeleteResult> {
        self.delete_cloud_storage_object(id).await?;

        let result = self.storage.delete_post(id).await?;
        if !result.success {
            warn!("BlogService: delete of post {} affected no rows", id);
            return Ok(result);
        }

        let removed = self.delete_comments(id).await?;
        info!(
            "BlogService: deleted post {} and {} comments",
            id, removed
        );
        Ok(result)
    }

    /// pre-delete hook：文章引用了外部对象时先删除对象
    async fn delete_cloud_storage_object(&self, id: i64) -> Result<()> {
        let Some(post) = self.storage.get_post(id).await? else {
            return Ok(());
        };
        match post.cloud_storage_object {
            Some(ref object_name) => self.objects.delete(object_name).await,
            None => Ok(()),
        }
    }

    /// post-delete hook：只查询 key，再一次性批量删除
    async fn delete_comments(&self, post_id: i64) -> Result<u64> {
        let ids = self.storage.comment_ids_for_post(post_id).await?;
        if ids.is_empty() {
            return Ok(0);
        }
        self.storage.delete_comments(&ids).await
    }

    // ============ Comments ============

    pub async fn add_comment(
        &self,
        post_id: i64,
        draft: CommentDraft,
        loader: &BlogPostLoader,
    ) -> Result<Comment> {
        self.get_post(post_id, loader).await?;

        let name = draft.name.trim();
        let text = draft.comment.trim();
        if name.is_empty() {
            return Err(BlogError::validation("Name is required"));
        }
        if text.is_empty() {
            return Err(BlogError::validation("Comment is required"));
        }
        if name.chars().count() > MAX_COMMENT_NAME_LEN {
            return Err(BlogError::validation(format!(
                "Name must be at most {} characters",
                MAX_COMMENT_NAME_LEN
            )));
        }
        if text.chars().count() > MAX_COMMENT_LEN {
            return Err(BlogError::validation(format!(
                "Comment must be at most {} characters",
                MAX_COMMENT_LEN
            )));
        }
        let website = match draft.website.as_deref().map(str::trim) {
            Some(w) if !w.is_empty() => Some(normalize_website(w)?),
            _ => None,
        };

        let comment = Comment {
            id: 0,
            blog_post: post_id,
            name: name.to_string(),
            website,
            comment: text.to_string(),
            created_on: Utc::now(),
        };

        let saved = self.storage.insert_comment(&comment).await?;
        info!("BlogService: comment {} added to post {}", saved.id, post_id);
        Ok(saved)
    }
}

/// 评论网址只接受 http/https，其他 scheme（如 `javascript:`）会被拒绝
fn normalize_website(raw: &str) -> Result<String> {
    let url = Url::parse(raw)
        .map_err(|_| BlogError::validation(format!("Invalid website URL: {}", raw)))?;
    match url.scheme() {
        "http" | "https" if url.host_str().is_some() => Ok(url.to_string()),
        _ => Err(BlogError::validation(
            "Website must be an http or https URL",
        )),
    }
}
