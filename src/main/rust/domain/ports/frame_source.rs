use async_trait::async_trait;

use crate::domain::entities::Frame;
use crate::domain::errors::Result;

/// Port the stream route pulls frames from
#[async_trait]
pub trait FrameSource: Send + Sync {
    /// Wait for the next frame. Empty polls are retried internally; an
    /// error means no further frames will come.
    async fn next_frame(&self) -> Result<Frame>;
}
