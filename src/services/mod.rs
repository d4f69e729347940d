//! Service layer for business logic
//!
//! Blog post lifecycle (save / delete hooks), the pure pre-save pipeline and
//! the external object storage used for poster images.

mod blog_service;
pub mod object_storage;
pub mod post_pipeline;

pub use blog_service::*;
pub use object_storage::{ObjectStorage, ObjectStorageFactory, UploadedFile};
pub use post_pipeline::{EntityData, FieldPatch, PostDraft};
