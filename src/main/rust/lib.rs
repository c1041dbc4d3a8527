pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

// Re-exports for convenience
pub use application::services::{
    CaptureHandle, CaptureService, DeviceProber, SourceSelector, StreamingService, PROBE_INDICES,
};
pub use config::Config;
pub use domain::entities::{CloseReason, Frame, ViewerSession, ViewerState};
pub use domain::errors::{DomainError, Result};
pub use domain::ports::{
    CameraBackend, CameraDevice, DeviceNameLookup, FrameSource, MetricsReporter, NoNameLookup,
    StreamContext, StreamingServer,
};
pub use domain::value_objects::{
    BackoffPolicy, CameraInfo, Resolution, ServerConfig, StreamConfig,
};
pub use infrastructure::camera::{NokhwaBackend, NokhwaNameLookup};
pub use infrastructure::http::WarpMjpegServer;
pub use infrastructure::metrics::{serve_metrics, PrometheusReporter};
pub use infrastructure::network::detect_local_ip;
