use crate::storage::{BlogPost, Comment};
use migration::entities::{blog_post, comment};

/// 将 Sea-ORM Model 转换为 BlogPost
pub fn model_to_blog_post(model: blog_post::Model) -> BlogPost {
    BlogPost {
        id: model.id,
        blog: model.blog,
        title: model.title,
        created_on: model.created_on,
        modified_on: model.modified_on,
        content: model.content,
        excerpt: model.excerpt,
        poster_uri: model.poster_uri,
        cloud_storage_object: model.cloud_storage_object,
    }
}

/// 将 BlogPost 转换为 ActiveModel（用于插入/更新）
///
/// 新建时 id 由数据库生成；更新时 created_on 不可写。
pub fn blog_post_to_active_model(post: &BlogPost, is_new: bool) -> blog_post::ActiveModel {
    use sea_orm::ActiveValue::*;

    blog_post::ActiveModel {
        id: if is_new { NotSet } else { Unchanged(post.id) },
        blog: Set(post.blog.clone()),
        title: Set(post.title.clone()),
        created_on: if is_new { Set(post.created_on) } else { NotSet },
        modified_on: Set(post.modified_on),
        content: Set(post.content.clone()),
        excerpt: Set(post.excerpt.clone()),
        poster_uri: Set(post.poster_uri.clone()),
        cloud_storage_object: Set(post.cloud_storage_object.clone()),
    }
}

pub fn model_to_comment(model: comment::Model) -> Comment {
    Comment {
        id: model.id,
        blog_post: model.blog_post,
        name: model.name,
        website: model.website,
        comment: model.comment,
        created_on: model.created_on,
    }
}

pub fn comment_to_active_model(comment: &Comment) -> comment::ActiveModel {
    use sea_orm::ActiveValue::*;

    comment::ActiveModel {
        id: NotSet,
        blog_post: Set(comment.blog_post),
        name: Set(comment.name.clone()),
        website: Set(comment.website.clone()),
        comment: Set(comment.comment.clone()),
        created_on: Set(comment.created_on),
    }
}
