//! Query operations for SeaOrmStorage
//!
//! Read-only database operations.

use sea_orm::{
    ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};
use tracing::debug;

use super::converters::{model_to_blog_post, model_to_comment};
use super::{SeaOrmStorage, retry};
use crate::errors::{BlogError, Result};
use crate::storage::{BlogPost, Comment};

use migration::entities::{blog_post, comment};

impl SeaOrmStorage {
    /// 按 modified_on 倒序列出某个 blog 下的文章
    pub async fn list_posts(&self, blog: &str, limit: u64, offset: u64) -> Result<Vec<BlogPost>> {
        let db = &self.db;

        let models = retry::with_retry("list_posts", self.retry_config, || async {
            blog_post::Entity::find()
                .filter(blog_post::Column::Blog.eq(blog))
                .order_by_desc(blog_post::Column::ModifiedOn)
                .limit(limit)
                .offset(offset)
                .all(db)
                .await
        })
        .await
        .map_err(|e| BlogError::database_operation(format!("查询文章列表失败: {}", e)))?;

        debug!("list_posts(blog={}) returned {} rows", blog, models.len());
        Ok(models.into_iter().map(model_to_blog_post).collect())
    }

    pub async fn get_post(&self, id: i64) -> Result<Option<BlogPost>> {
        let db = &self.db;

        let model = retry::with_retry(&format!("get_post({})", id), self.retry_config, || async {
            blog_post::Entity::find_by_id(id).one(db).await
        })
        .await
        .map_err(|e| BlogError::database_operation(format!("查询文章失败: {}", e)))?;

        Ok(model.map(model_to_blog_post))
    }

    /// 批量获取文章（单次 IN 查询），不存在的 id 不出现在结果中
    pub async fn get_posts(&self, ids: &[i64]) -> Result<Vec<BlogPost>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let db = &self.db;
        let models = retry::with_retry("get_posts", self.retry_config, || async {
            blog_post::Entity::find()
                .filter(blog_post::Column::Id.is_in(ids.iter().copied()))
                .all(db)
                .await
        })
        .await
        .map_err(|e| BlogError::database_operation(format!("批量查询文章失败: {}", e)))?;

        Ok(models.into_iter().map(model_to_blog_post).collect())
    }

    /// 只查询引用某篇文章的评论 id
    pub async fn comment_ids_for_post(&self, post_id: i64) -> Result<Vec<i64>> {
        let db = &self.db;

        retry::with_retry(
            &format!("comment_ids_for_post({})", post_id),
            self.retry_config,
            || async {
                comment::Entity::find()
                    .select_only()
                    .column(comment::Column::Id)
                    .filter(comment::Column::BlogPost.eq(post_id))
                    .into_tuple::<i64>()
                    .all(db)
                    .await
            },
        )
        .await
        .map_err(|e| BlogError::database_operation(format!("查询评论 id 失败: {}", e)))
    }

    /// 按创建时间正序列出文章的评论
    pub async fn list_comments(&self, post_id: i64, limit: u64) -> Result<Vec<Comment>> {
        let db = &self.db;

        let models = retry::with_retry(
            &format!("list_comments({})", post_id),
            self.retry_config,
            || async {
                comment::Entity::find()
                    .filter(comment::Column::BlogPost.eq(post_id))
                    .order_by_asc(comment::Column::CreatedOn)
                    .order_by_asc(comment::Column::Id)
                    .limit(limit)
                    .all(db)
                    .await
            },
        )
        .await
        .map_err(|e| BlogError::database_operation(format!("查询评论失败: {}", e)))?;

        Ok(models.into_iter().map(model_to_comment).collect())
    }

    /// 文章总数（健康检查使用）
    pub async fn count_posts(&self) -> Result<u64> {
        blog_post::Entity::find()
            .count(&self.db)
            .await
            .map_err(|e| BlogError::database_operation(format!("统计文章失败: {}", e)))
    }
}
