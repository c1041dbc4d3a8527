use std::net::SocketAddr;
use std::sync::Arc;

use async_trait::async_trait;

use super::FrameSource;
use crate::domain::errors::Result;
use crate::domain::value_objects::{CameraInfo, ServerConfig, StreamConfig};

/// Everything a connection handler needs, built once at startup.
#[derive(Clone)]
pub struct StreamContext {
    pub camera: CameraInfo,
    pub stream_config: StreamConfig,
    pub frames: Arc<dyn FrameSource>,
}

/// Port for streaming server implementations
#[async_trait]
pub trait StreamingServer: Send + Sync {
    /// Bind the listener and start serving; returns the bound address
    async fn start(&mut self, context: StreamContext, server_config: ServerConfig)
        -> Result<SocketAddr>;

    /// Stop accepting, tell open streams to finish, and wait for them
    async fn stop(&mut self) -> Result<()>;

    /// Check if server is running
    fn is_running(&self) -> bool;

    fn local_addr(&self) -> Option<SocketAddr>;
}
