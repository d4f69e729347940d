//! 对象存储模块
//!
//! 存放文章海报图片等外部文件，支持：
//! - 本地文件系统（默认）
//! - S3 兼容存储（`s3` feature）

mod local;
mod provider;
#[cfg(feature = "s3")]
mod s3;

pub use local::LocalObjectStorage;
pub use provider::{
    ObjectStorage, ObjectStorageFactory, UploadedFile, guess_content_type, validate_object_name,
};
#[cfg(feature = "s3")]
pub use s3::S3ObjectStorage;
