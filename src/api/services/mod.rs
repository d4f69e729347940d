pub mod admin;
pub mod blog;
pub mod health;
pub mod uploads;

pub use admin::admin_routes;
pub use blog::blog_routes;
pub use health::{AppStartTime, HealthService, health_routes};
pub use uploads::upload_routes;
