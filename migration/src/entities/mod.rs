pub mod blog_post;
pub mod comment;

pub use blog_post::Entity as BlogPostEntity;
pub use comment::Entity as CommentEntity;
