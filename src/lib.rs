//! Quillpress - a small blog backend
//!
//! Blog posts and their comments are stored through SeaORM, poster images in
//! an object storage (local filesystem or S3), and pages are rendered on the
//! server with Maud.
//!
//! # Features
//! - **server**: HTTP server mode (default)
//! - **cli**: Command-line interface (default)
//! - **s3**: S3 object storage backend
//!
//! # Architecture
//! - `storage`: SeaORM data access and the per-request post loader
//! - `services`: post lifecycle hooks and object storage
//! - `api`: HTTP routes, middleware and HTML views
//! - `config`: Configuration management
//! - `runtime`: Application lifecycle and execution modes
//! - `system`: Logging

pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
