use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Failed to open camera {index}: {reason}")]
    DeviceOpenFailed { index: u32, reason: String },

    #[error("Failed to configure camera: {0}")]
    DeviceConfigFailed(String),

    #[error("Video source disconnected: {0}")]
    SourceDisconnected(String),

    #[error("Capture device already released")]
    CaptureReleased,

    #[error("Capture thread failed: {0}")]
    CaptureThreadFailed(String),

    #[error("JPEG encoding failed: {0}")]
    EncodeFailed(String),

    #[error("Frame buffer does not match {width}x{height} RGB")]
    InvalidFrame { width: u32, height: u32 },

    #[error("No video sources found")]
    NoDevicesFound,

    #[error("Invalid video source selection: {0:?}")]
    InvalidSelection(String),

    #[error("Failed to bind HTTP listener on {addr}: {reason}")]
    BindFailed { addr: String, reason: String },

    #[error("Invalid port: port cannot be zero")]
    InvalidPort,

    #[error("Invalid JPEG quality {0}: must be between 1 and 100")]
    InvalidJpegQuality(u8),

    #[error("Invalid resolution {width}x{height}")]
    InvalidResolution { width: u32, height: u32 },

    #[error("Invalid backoff multiplier: must be > 1.0")]
    InvalidBackoffMultiplier,

    #[error("Server not running")]
    ServerNotRunning,

    #[error("Console I/O failed: {0}")]
    Console(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DomainError>;
