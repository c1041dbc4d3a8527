use std::net::IpAddr;
use std::time::Duration;

use clap::Parser;

use crate::domain::value_objects::{
    BackoffPolicy, Resolution, StreamConfig, DEFAULT_HTTP_PORT, DEFAULT_JPEG_QUALITY,
};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "pipeline-mjpeg",
    version,
    about = "Serve a local camera as an MJPEG stream to browsers on the LAN"
)]
pub struct Config {
    /// HTTP port for the viewer page and stream
    #[arg(long, env = "MJPEG_PORT", default_value_t = DEFAULT_HTTP_PORT)]
    pub port: u16,

    /// Address to listen on (detected from the default route if not set)
    #[arg(long, env = "BIND_IP")]
    pub bind_ip: Option<IpAddr>,

    /// Position of the camera in the enumerated list; skips the prompt
    #[arg(long, env = "VIDEO_SOURCE")]
    pub source: Option<usize>,

    /// Requested capture width (best effort)
    #[arg(long, env = "CAPTURE_WIDTH", default_value_t = 1920)]
    pub width: u32,

    /// Requested capture height (best effort)
    #[arg(long, env = "CAPTURE_HEIGHT", default_value_t = 1080)]
    pub height: u32,

    /// JPEG quality for streamed frames (1-100)
    #[arg(long, env = "JPEG_QUALITY", default_value_t = DEFAULT_JPEG_QUALITY)]
    pub jpeg_quality: u8,

    /// Metrics server port
    #[arg(long, env = "METRICS_PORT", default_value = "9001")]
    pub metrics_port: u16,

    /// Longest wait between polls when the camera has no frame ready (ms)
    #[arg(long, env = "MAX_FRAME_BACKOFF_MS", default_value_t = 50)]
    pub max_frame_backoff_ms: u64,

    /// Seconds to wait for open streams to close on shutdown
    #[arg(long, env = "DRAIN_TIMEOUT_SECS", default_value_t = 5)]
    pub drain_timeout_secs: u64,

    /// Ask the OS for human-readable camera names
    #[arg(long, env = "DEVICE_NAMES")]
    pub device_names: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Minimum allowed port (ports below 1024 are privileged)
const MIN_USER_PORT: u16 = 1024;

const FIRST_FRAME_RETRY: Duration = Duration::from_millis(1);

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        Self::validate_port(self.port, "HTTP")?;
        Self::validate_port(self.metrics_port, "metrics")?;

        if self.port == self.metrics_port {
            anyhow::bail!("HTTP port and metrics port cannot be the same");
        }

        if !(1..=100).contains(&self.jpeg_quality) {
            anyhow::bail!(
                "JPEG quality must be between 1 and 100, got {}",
                self.jpeg_quality
            );
        }

        if self.width == 0 || self.height == 0 {
            anyhow::bail!(
                "Capture resolution must be non-zero, got {}x{}",
                self.width,
                self.height
            );
        }

        if self.max_frame_backoff_ms == 0 {
            anyhow::bail!("Max frame backoff must be at least 1 ms");
        }

        Ok(())
    }

    fn validate_port(port: u16, name: &str) -> anyhow::Result<()> {
        if port == 0 {
            anyhow::bail!("Invalid {} port: port cannot be 0", name);
        }
        if port < MIN_USER_PORT {
            anyhow::bail!(
                "Invalid {} port: {} is a privileged port (< {}). Use a port >= {}",
                name,
                port,
                MIN_USER_PORT,
                MIN_USER_PORT
            );
        }
        Ok(())
    }

    pub fn capture_resolution(&self) -> Resolution {
        Resolution::new(self.width, self.height)
    }

    pub fn frame_backoff(&self) -> crate::domain::errors::Result<BackoffPolicy> {
        BackoffPolicy::new(
            FIRST_FRAME_RETRY,
            Duration::from_millis(self.max_frame_backoff_ms).max(FIRST_FRAME_RETRY),
            2.0,
        )
    }

    pub fn drain_timeout(&self) -> Duration {
        Duration::from_secs(self.drain_timeout_secs)
    }

    pub fn to_stream_config(&self) -> crate::domain::errors::Result<StreamConfig> {
        let config = StreamConfig::new()
            .with_jpeg_quality(self.jpeg_quality)
            .with_capture_resolution(self.capture_resolution())
            .with_frame_backoff(self.frame_backoff()?);
        config.validate()?;
        Ok(config)
    }
}
