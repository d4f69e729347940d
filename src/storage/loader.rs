//! Per-request batching loader for blog posts
//!
//! A loader lives for one HTTP request. Repeated or concurrent loads of the
//! same id reach the datastore once, and `load_many` fetches every miss in a
//! single query.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use moka::future::Cache;
use tracing::trace;

use crate::errors::{BlogError, Result};
use crate::storage::{BlogPost, SeaOrmStorage};

/// 单个请求内最多缓存的文章数
const LOADER_CAPACITY: u64 = 1024;

/// 文章批量读取来源
#[async_trait]
pub trait PostSource: Send + Sync {
    /// 返回存在的文章，顺序不限
    async fn fetch_posts(&self, ids: &[i64]) -> Result<Vec<BlogPost>>;
}

#[async_trait]
impl PostSource for SeaOrmStorage {
    async fn fetch_posts(&self, ids: &[i64]) -> Result<Vec<BlogPost>> {
        self.get_posts(ids).await
    }
}

#[derive(Clone)]
pub struct BlogPostLoader {
    source: Arc<dyn PostSource>,
    cache: Cache<i64, Option<BlogPost>>,
}

impl BlogPostLoader {
    pub fn new(source: Arc<dyn PostSource>) -> Self {
        Self {
            source,
            cache: Cache::builder().max_capacity(LOADER_CAPACITY).build(),
        }
    }

    /// 加载单篇文章，不存在时返回 `None`（同样会被缓存）
    pub async fn load(&self, id: i64) -> Result<Option<BlogPost>> {
        let source = self.source.clone();
        self.cache
            .try_get_with(id, async move {
                trace!("BlogPostLoader: fetching post {}", id);
                let mut posts = source.fetch_posts(&[id]).await?;
                Ok::<_, BlogError>(posts.pop().filter(|p| p.id == id))
            })
            .await
            .map_err(|e| (*e).clone())
    }

    /// 批量加载，结果顺序与 `ids` 一致
    pub async fn load_many(&self, ids: &[i64]) -> Result<Vec<Option<BlogPost>>> {
        let mut misses: Vec<i64> = ids
            .iter()
            .copied()
            .filter(|id| !self.cache.contains_key(id))
            .collect();
        misses.sort_unstable();
        misses.dedup();

        let mut fetched: HashMap<i64, Option<BlogPost>> = HashMap::with_capacity(misses.len());
        if !misses.is_empty() {
            trace!("BlogPostLoader: batch fetching {} posts", misses.len());
            let mut by_id: HashMap<i64, BlogPost> = self
                .source
                .fetch_posts(&misses)
                .await?
                .into_iter()
                .map(|post| (post.id, post))
                .collect();
            for id in misses {
                let post = by_id.remove(&id);
                self.cache.insert(id, post.clone()).await;
                fetched.insert(id, post);
            }
        }

        let mut results = Vec::with_capacity(ids.len());
        for id in ids {
            let post = match fetched.get(id) {
                Some(post) => post.clone(),
                None => match self.cache.get(id).await {
                    Some(cached) => cached,
                    None => self.load(*id).await?,
                },
            };
            results.push(post);
        }
        Ok(results)
    }

    /// 写入后更新缓存
    pub async fn prime(&self, post: BlogPost) {
        self.cache.insert(post.id, Some(post)).await;
    }

    pub async fn clear(&self, id: i64) {
        self.cache.invalidate(&id).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::sync::Mutex;

    /// 记录每次 fetch 的 id 列表
    struct CountingSource {
        posts: HashMap<i64, BlogPost>,
        calls: Mutex<Vec<Vec<i64>>>,
    }

    impl CountingSource {
        fn with_ids(ids: &[i64]) -> Arc<Self> {
            let now = Utc::now();
            let posts = ids
                .iter()
                .map(|&id| {
                    (
                        id,
                        BlogPost {
                            id,
                            blog: "default".to_string(),
                            title: format!("Post {}", id),
                            created_on: now,
                            modified_on: now,
                            content: String::new(),
                            excerpt: String::new(),
                            poster_uri: None,
                            cloud_storage_object: None,
                        },
                    )
                })
                .collect();
            Arc::new(Self {
                posts,
                calls: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> Vec<Vec<i64>> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PostSource for CountingSource {
        async fn fetch_posts(&self, ids: &[i64]) -> Result<Vec<BlogPost>> {
            self.calls.lock().unwrap().push(ids.to_vec());
            Ok(ids.iter().filter_map(|id| self.posts.get(id).cloned()).collect())
        }
    }

    #[tokio::test]
    async fn test_repeated_load_hits_source_once() {
        let source = CountingSource::with_ids(&[1]);
        let loader = BlogPostLoader::new(source.clone());

        let first = loader.load(1).await.unwrap();
        let second = loader.load(1).await.unwrap();

        assert_eq!(first.unwrap().title, "Post 1");
        assert_eq!(second.unwrap().title, "Post 1");
        assert_eq!(source.calls(), vec![vec![1]]);
    }

    #[tokio::test]
    async fn test_concurrent_loads_are_deduplicated() {
        let source = CountingSource::with_ids(&[5]);
        let loader = BlogPostLoader::new(source.clone());

        let (a, b) = tokio::join!(loader.load(5), loader.load(5));
        assert!(a.unwrap().is_some());
        assert!(b.unwrap().is_some());
        assert_eq!(source.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_post_is_cached_as_none() {
        let source = CountingSource::with_ids(&[]);
        let loader = BlogPostLoader::new(source.clone());

        assert!(loader.load(9).await.unwrap().is_none());
        assert!(loader.load(9).await.unwrap().is_none());
        assert_eq!(source.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_load_many_batches_misses_and_keeps_order() {
        let source = CountingSource::with_ids(&[1, 2, 3]);
        let loader = BlogPostLoader::new(source.clone());
        loader.load(2).await.unwrap();

        let posts = loader.load_many(&[3, 2, 4, 1, 3]).await.unwrap();
        let ids: Vec<Option<i64>> = posts.iter().map(|p| p.as_ref().map(|p| p.id)).collect();

        assert_eq!(ids, vec![Some(3), Some(2), None, Some(1), Some(3)]);
        assert_eq!(source.calls(), vec![vec![2], vec![1, 3, 4]]);
    }

    #[tokio::test]
    async fn test_clear_forces_refetch() {
        let source = CountingSource::with_ids(&[1]);
        let loader = BlogPostLoader::new(source.clone());

        loader.load(1).await.unwrap();
        loader.clear(1).await;
        loader.load(1).await.unwrap();

        assert_eq!(source.calls().len(), 2);
    }
}
