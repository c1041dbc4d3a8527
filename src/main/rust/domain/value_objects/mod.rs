mod backoff_policy;
mod camera_info;
mod resolution;
mod server_config;
mod stream_config;

pub use backoff_policy::BackoffPolicy;
pub use camera_info::CameraInfo;
pub use resolution::Resolution;
pub use server_config::{ServerConfig, DEFAULT_HTTP_PORT};
pub use stream_config::{StreamConfig, DEFAULT_JPEG_QUALITY};
