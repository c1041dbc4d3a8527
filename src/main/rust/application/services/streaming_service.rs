use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::errors::Result;
use crate::domain::ports::{StreamContext, StreamingServer};
use crate::domain::value_objects::ServerConfig;

/// Application service orchestrating the MJPEG server
pub struct StreamingService {
    server: Arc<RwLock<Box<dyn StreamingServer>>>,
}

impl StreamingService {
    pub fn new(server: Box<dyn StreamingServer>) -> Self {
        Self {
            server: Arc::new(RwLock::new(server)),
        }
    }

    /// Start serving the viewer page and stream (use case)
    pub async fn start_streaming(
        &self,
        context: StreamContext,
        server_config: ServerConfig,
    ) -> Result<SocketAddr> {
        context.stream_config.validate()?;

        let camera = context.camera.title();
        let addr = {
            let mut server = self.server.write().await;
            server.start(context, server_config).await?
        };

        tracing::info!(%addr, %camera, "Streaming server started");

        Ok(addr)
    }

    /// Stop the server; a no-op when it is not running
    pub async fn stop_streaming(&self) -> Result<()> {
        let mut server = self.server.write().await;

        if !server.is_running() {
            return Ok(());
        }

        tracing::info!("Stopping streaming server");
        server.stop().await?;

        Ok(())
    }

    /// Check if currently streaming
    pub async fn is_streaming(&self) -> bool {
        let server = self.server.read().await;
        server.is_running()
    }

    pub async fn local_addr(&self) -> Option<SocketAddr> {
        let server = self.server.read().await;
        server.local_addr()
    }
}
