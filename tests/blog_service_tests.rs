//! BlogService tests
//!
//! Save and delete hooks against a temporary SQLite database and an
//! in-memory object storage that records every call.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use quillpress::config::init_config;
use quillpress::errors::{BlogError, Result};
use quillpress::services::{
    BlogService, BlogSettings, CommentDraft, FieldPatch, ObjectStorage, PostDraft, UploadedFile,
};
use quillpress::storage::{BlogPost, BlogPostLoader, Comment, PostSource, SeaOrmStorage};
use tempfile::TempDir;

// =============================================================================
// Test Setup
// =============================================================================

static INIT: Once = Once::new();

fn init_test_config() {
    INIT.call_once(|| {
        init_config();
    });
}

/// 记录 put/delete 调用的内存对象存储
#[derive(Default)]
struct RecordingObjectStorage {
    objects: Mutex<HashMap<String, Bytes>>,
    deleted: Mutex<Vec<String>>,
}

impl RecordingObjectStorage {
    fn deleted(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }

    fn contains(&self, name: &str) -> bool {
        self.objects.lock().unwrap().contains_key(name)
    }

    fn seed(&self, name: &str) {
        self.objects
            .lock()
            .unwrap()
            .insert(name.to_string(), Bytes::from_static(b"png"));
    }
}

#[async_trait]
impl ObjectStorage for RecordingObjectStorage {
    async fn put(&self, object_name: &str, data: Bytes, _content_type: &str) -> Result<UploadedFile> {
        self.objects
            .lock()
            .unwrap()
            .insert(object_name.to_string(), data);
        Ok(UploadedFile {
            object_name: object_name.to_string(),
            public_url: format!("https://cdn.test/{}", object_name),
        })
    }

    async fn get(&self, object_name: &str) -> Result<Option<Bytes>> {
        Ok(self.objects.lock().unwrap().get(object_name).cloned())
    }

    async fn delete(&self, object_name: &str) -> Result<()> {
        self.deleted.lock().unwrap().push(object_name.to_string());
        self.objects.lock().unwrap().remove(object_name);
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "recording"
    }
}

/// 统计 loader 访问数据库次数
struct CountingSource {
    inner: Arc<SeaOrmStorage>,
    calls: AtomicUsize,
}

#[async_trait]
impl PostSource for CountingSource {
    async fn fetch_posts(&self, ids: &[i64]) -> Result<Vec<BlogPost>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.get_posts(ids).await
    }
}

struct TestEnv {
    _dir: TempDir,
    storage: Arc<SeaOrmStorage>,
    objects: Arc<RecordingObjectStorage>,
    service: BlogService,
}

async fn setup() -> TestEnv {
    init_test_config();
    let dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = dir.path().join("blog_service_test.db");
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());

    let storage = Arc::new(
        SeaOrmStorage::new(&db_url, "sqlite")
            .await
            .expect("Failed to create storage"),
    );
    let objects = Arc::new(RecordingObjectStorage::default());
    let service = BlogService::new(storage.clone(), objects.clone(), BlogSettings::default());

    TestEnv {
        _dir: dir,
        storage,
        objects,
        service,
    }
}

fn draft(title: &str, content: &str) -> PostDraft {
    PostDraft {
        title: Some(title.to_string()),
        content: Some(content.to_string()),
        ..Default::default()
    }
}

fn comment(post_id: i64, name: &str) -> Comment {
    Comment {
        id: 0,
        blog_post: post_id,
        name: name.to_string(),
        website: None,
        comment: "hello".to_string(),
        created_on: Utc::now(),
    }
}

/// 创建带海报对象的文章
async fn create_post_with_poster(env: &TestEnv, title: &str) -> BlogPost {
    let uploaded = env
        .service
        .upload_poster("poster.png", Bytes::from_static(b"png"), "image/png")
        .await
        .unwrap();
    let draft = PostDraft {
        file: Some(uploaded),
        ..draft(title, "With a poster")
    };
    env.service.create_post(draft).await.unwrap()
}

// =============================================================================
// Save pipeline
// =============================================================================

#[tokio::test]
async fn test_create_post_prepares_entity() {
    let env = setup().await;

    let post = env
        .service
        .create_post(draft("  Hello  ", "<p>Some <b>bold</b> text</p>"))
        .await
        .unwrap();

    assert!(post.id > 0);
    assert_eq!(post.title, "Hello");
    assert_eq!(post.excerpt, "Some bold text");
    assert_eq!(post.blog, "default");
    assert!(post.poster_uri.is_none());
    assert!(env.objects.deleted().is_empty());
}

#[tokio::test]
async fn test_create_post_with_file_sets_poster() {
    let env = setup().await;

    let post = create_post_with_poster(&env, "Launch").await;

    let object = post.cloud_storage_object.clone().unwrap();
    assert!(object.ends_with("-poster.png"));
    assert_eq!(
        post.poster_uri.as_deref(),
        Some(format!("https://cdn.test/{}", object).as_str())
    );
    assert!(env.objects.contains(&object));
}

#[tokio::test]
async fn test_create_post_requires_title() {
    let env = setup().await;

    let err = env
        .service
        .create_post(PostDraft {
            content: Some("no title".to_string()),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, BlogError::Validation(_)));
    assert_eq!(env.storage.count_posts().await.unwrap(), 0);
}

#[tokio::test]
async fn test_null_poster_clears_reference_and_deletes_object() {
    let env = setup().await;
    let post = create_post_with_poster(&env, "Poster").await;
    let old_object = post.cloud_storage_object.clone().unwrap();

    let loader = env.service.loader();
    let updated = env
        .service
        .update_post(
            post.id,
            PostDraft {
                poster_uri: FieldPatch::Null,
                ..Default::default()
            },
            &loader,
        )
        .await
        .unwrap();

    assert!(updated.poster_uri.is_none());
    assert!(updated.cloud_storage_object.is_none());
    assert_eq!(updated.title, "Poster");
    assert_eq!(env.objects.deleted(), vec![old_object]);

    let stored = env.storage.get_post(post.id).await.unwrap().unwrap();
    assert!(stored.cloud_storage_object.is_none());
}

#[tokio::test]
async fn test_new_file_replaces_previous_object() {
    let env = setup().await;
    let post = create_post_with_poster(&env, "Poster").await;
    let old_object = post.cloud_storage_object.clone().unwrap();

    let replacement = env
        .service
        .upload_poster("second.jpg", Bytes::from_static(b"jpg"), "image/jpeg")
        .await
        .unwrap();
    let loader = env.service.loader();
    let updated = env
        .service
        .update_post(
            post.id,
            PostDraft {
                file: Some(replacement.clone()),
                ..Default::default()
            },
            &loader,
        )
        .await
        .unwrap();

    assert_eq!(env.objects.deleted(), vec![old_object]);
    assert_eq!(
        updated.cloud_storage_object.as_deref(),
        Some(replacement.object_name.as_str())
    );
    assert_eq!(updated.poster_uri.as_deref(), Some(replacement.public_url.as_str()));
}

#[tokio::test]
async fn test_update_without_poster_change_keeps_object() {
    let env = setup().await;
    let post = create_post_with_poster(&env, "Poster").await;

    let loader = env.service.loader();
    let updated = env
        .service
        .update_post(
            post.id,
            PostDraft {
                content: Some("Fresh words".to_string()),
                ..Default::default()
            },
            &loader,
        )
        .await
        .unwrap();

    assert!(env.objects.deleted().is_empty());
    assert_eq!(updated.excerpt, "Fresh words");
    assert_eq!(updated.cloud_storage_object, post.cloud_storage_object);
    assert!(updated.modified_on >= post.modified_on);
    assert_eq!(updated.created_on.timestamp(), post.created_on.timestamp());
}

#[tokio::test]
async fn test_null_poster_without_previous_object_is_noop() {
    let env = setup().await;
    let post = env.service.create_post(draft("Plain", "text")).await.unwrap();

    let loader = env.service.loader();
    env.service
        .update_post(
            post.id,
            PostDraft {
                poster_uri: FieldPatch::Null,
                ..Default::default()
            },
            &loader,
        )
        .await
        .unwrap();

    assert!(env.objects.deleted().is_empty());
}

#[tokio::test]
async fn test_update_missing_post_is_not_found() {
    let env = setup().await;

    let loader = env.service.loader();
    let err = env
        .service
        .update_post(404, draft("Ghost", "boo"), &loader)
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_update_loads_previous_post_once() {
    let env = setup().await;
    let post = create_post_with_poster(&env, "Poster").await;

    let source = Arc::new(CountingSource {
        inner: env.storage.clone(),
        calls: AtomicUsize::new(0),
    });
    let loader = BlogPostLoader::new(source.clone());

    env.service
        .update_post(
            post.id,
            PostDraft {
                poster_uri: FieldPatch::Null,
                ..Default::default()
            },
            &loader,
        )
        .await
        .unwrap();

    // 旧图清理与合并共用一次加载
    assert_eq!(source.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_rejected_update_keeps_previous_poster() {
    let env = setup().await;
    let post = create_post_with_poster(&env, "Poster").await;
    let old_object = post.cloud_storage_object.clone().unwrap();

    let loader = env.service.loader();
    let err = env
        .service
        .update_post(
            post.id,
            PostDraft {
                title: Some("   ".to_string()),
                poster_uri: FieldPatch::Null,
                ..Default::default()
            },
            &loader,
        )
        .await
        .unwrap_err();

    assert!(matches!(err, BlogError::Validation(_)));
    assert!(env.objects.deleted().is_empty());
    assert!(env.objects.contains(&old_object));

    let stored = env.storage.get_post(post.id).await.unwrap().unwrap();
    assert_eq!(stored.cloud_storage_object.as_deref(), Some(old_object.as_str()));
}

#[tokio::test]
async fn test_rejected_update_with_new_file_keeps_previous_poster() {
    let env = setup().await;
    let post = create_post_with_poster(&env, "Poster").await;
    let old_object = post.cloud_storage_object.clone().unwrap();

    let replacement = env
        .service
        .upload_poster("second.jpg", Bytes::from_static(b"jpg"), "image/jpeg")
        .await
        .unwrap();
    let loader = env.service.loader();
    let err = env
        .service
        .update_post(
            post.id,
            PostDraft {
                title: Some("x".repeat(201)),
                file: Some(replacement),
                ..Default::default()
            },
            &loader,
        )
        .await
        .unwrap_err();

    assert!(matches!(err, BlogError::Validation(_)));
    assert!(env.objects.deleted().is_empty());
    assert!(env.objects.contains(&old_object));
}

#[tokio::test]
async fn test_blank_poster_uri_deletes_previous_object() {
    let env = setup().await;
    let post = create_post_with_poster(&env, "Poster").await;
    let old_object = post.cloud_storage_object.clone().unwrap();

    let loader = env.service.loader();
    let updated = env
        .service
        .update_post(
            post.id,
            PostDraft {
                poster_uri: FieldPatch::Value("  ".to_string()),
                ..Default::default()
            },
            &loader,
        )
        .await
        .unwrap();

    assert!(updated.poster_uri.is_none());
    assert!(updated.cloud_storage_object.is_none());
    assert_eq!(env.objects.deleted(), vec![old_object]);
}

// =============================================================================
// Delete hooks
// =============================================================================

#[tokio::test]
async fn test_delete_post_deletes_object_once() {
    let env = setup().await;
    let post = create_post_with_poster(&env, "Doomed").await;
    let object = post.cloud_storage_object.clone().unwrap();

    let result = env.service.delete_post(post.id).await.unwrap();

    assert!(result.success);
    assert_eq!(result.id, post.id);
    assert_eq!(env.objects.deleted(), vec![object]);
    assert!(env.storage.get_post(post.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_delete_post_cascades_to_its_comments_only() {
    let env = setup().await;
    let doomed = env.service.create_post(draft("Doomed", "x")).await.unwrap();
    let kept = env.service.create_post(draft("Kept", "y")).await.unwrap();

    for name in ["a", "b", "c"] {
        env.storage.insert_comment(&comment(doomed.id, name)).await.unwrap();
    }
    let survivor = env.storage.insert_comment(&comment(kept.id, "d")).await.unwrap();

    let result = env.service.delete_post(doomed.id).await.unwrap();
    assert!(result.success);

    assert!(env.storage.comment_ids_for_post(doomed.id).await.unwrap().is_empty());
    assert_eq!(
        env.storage.comment_ids_for_post(kept.id).await.unwrap(),
        vec![survivor.id]
    );
    // 没有海报的文章不会触发对象删除
    assert!(env.objects.deleted().is_empty());
}

#[tokio::test]
async fn test_delete_post_without_comments() {
    let env = setup().await;
    let post = env.service.create_post(draft("Lonely", "z")).await.unwrap();

    let result = env.service.delete_post(post.id).await.unwrap();
    assert!(result.success);
    assert_eq!(env.storage.count_posts().await.unwrap(), 0);
}

#[tokio::test]
async fn test_delete_missing_post_reports_failure() {
    let env = setup().await;
    env.objects.seed("unrelated.png");

    let result = env.service.delete_post(777).await.unwrap();

    assert!(!result.success);
    assert_eq!(result.id, 777);
    assert!(env.objects.deleted().is_empty());
    assert!(env.objects.contains("unrelated.png"));
}

// =============================================================================
// Comments
// =============================================================================

#[tokio::test]
async fn test_add_comment() {
    let env = setup().await;
    let post = env.service.create_post(draft("Open", "talk")).await.unwrap();

    let loader = env.service.loader();
    let saved = env
        .service
        .add_comment(
            post.id,
            CommentDraft {
                name: " Ada ".to_string(),
                website: Some("   ".to_string()),
                comment: "Great post".to_string(),
            },
            &loader,
        )
        .await
        .unwrap();

    assert_eq!(saved.name, "Ada");
    assert!(saved.website.is_none());
    assert_eq!(saved.blog_post, post.id);

    let comments = env.service.list_comments(post.id).await.unwrap();
    assert_eq!(comments.len(), 1);
}

#[tokio::test]
async fn test_add_comment_validation() {
    let env = setup().await;
    let post = env.service.create_post(draft("Open", "talk")).await.unwrap();
    let loader = env.service.loader();

    let err = env
        .service
        .add_comment(
            post.id,
            CommentDraft {
                name: "".to_string(),
                comment: "text".to_string(),
                ..Default::default()
            },
            &loader,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, BlogError::Validation(_)));

    let err = env
        .service
        .add_comment(
            9999,
            CommentDraft {
                name: "Ada".to_string(),
                comment: "text".to_string(),
                ..Default::default()
            },
            &loader,
        )
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_add_comment_website_must_be_http() {
    let env = setup().await;
    let post = env.service.create_post(draft("Open", "talk")).await.unwrap();
    let loader = env.service.loader();

    for website in ["javascript:alert(document.cookie)", "data:text/html,hi", "not a url"] {
        let err = env
            .service
            .add_comment(
                post.id,
                CommentDraft {
                    name: "Mallory".to_string(),
                    website: Some(website.to_string()),
                    comment: "click me".to_string(),
                },
                &loader,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, BlogError::Validation(_)), "{}", website);
    }
    assert!(env.service.list_comments(post.id).await.unwrap().is_empty());

    let saved = env
        .service
        .add_comment(
            post.id,
            CommentDraft {
                name: "Ada".to_string(),
                website: Some(" https://ada.example/about ".to_string()),
                comment: "hi".to_string(),
            },
            &loader,
        )
        .await
        .unwrap();
    assert_eq!(saved.website.as_deref(), Some("https://ada.example/about"));
}
