//! Mutation operations for SeaOrmStorage
//!
//! Write database operations. Lifecycle hooks live in `BlogService`;
//! these methods only touch the rows they are asked to.

use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter};
use tracing::info;

use super::converters::{
    blog_post_to_active_model, comment_to_active_model, model_to_blog_post, model_to_comment,
};
use super::{SeaOrmStorage, retry};
use crate::errors::{BlogError, Result};
use crate::storage::{BlogPost, Comment, DeleteResult};

use migration::entities::{blog_post, comment};

impl SeaOrmStorage {
    /// 插入新文章，返回带生成 id 的文章
    pub async fn insert_post(&self, post: &BlogPost) -> Result<BlogPost> {
        let model = blog_post_to_active_model(post, true)
            .insert(&self.db)
            .await
            .map_err(|e| BlogError::database_operation(format!("创建文章失败: {}", e)))?;

        info!("Blog post created: {}", model.id);
        Ok(model_to_blog_post(model))
    }

    pub async fn update_post(&self, post: &BlogPost) -> Result<BlogPost> {
        let db = &self.db;

        let model = retry::with_retry(
            &format!("update_post({})", post.id),
            self.retry_config,
            || async { blog_post_to_active_model(post, false).update(db).await },
        )
        .await
        .map_err(|e| match e {
            sea_orm::DbErr::RecordNotUpdated => {
                BlogError::not_found(format!("Blog post {} not found", post.id))
            }
            other => BlogError::database_operation(format!("更新文章失败: {}", other)),
        })?;

        info!("Blog post updated: {}", model.id);
        Ok(model_to_blog_post(model))
    }

    /// 删除文章，不存在时返回 `success = false`
    pub async fn delete_post(&self, id: i64) -> Result<DeleteResult> {
        let db = &self.db;

        let result = retry::with_retry(&format!("delete_post({})", id), self.retry_config, || async {
            blog_post::Entity::delete_by_id(id).exec(db).await
        })
        .await
        .map_err(|e| BlogError::database_operation(format!("删除文章失败: {}", e)))?;

        let success = result.rows_affected > 0;
        if success {
            info!("Blog post deleted: {}", id);
        }
        Ok(DeleteResult { success, id })
    }

    /// 按 id 批量删除评论，返回删除行数
    pub async fn delete_comments(&self, ids: &[i64]) -> Result<u64> {
        if ids.is_empty() {
            return Ok(0);
        }

        let result = comment::Entity::delete_many()
            .filter(comment::Column::Id.is_in(ids.iter().copied()))
            .exec(&self.db)
            .await
            .map_err(|e| BlogError::database_operation(format!("批量删除评论失败: {}", e)))?;

        info!("Batch deleted {} comments", result.rows_affected);
        Ok(result.rows_affected)
    }

    pub async fn insert_comment(&self, comment: &Comment) -> Result<Comment> {
        let model = comment_to_active_model(comment)
            .insert(&self.db)
            .await
            .map_err(|e| BlogError::database_operation(format!("创建评论失败: {}", e)))?;

        Ok(model_to_comment(model))
    }
}
