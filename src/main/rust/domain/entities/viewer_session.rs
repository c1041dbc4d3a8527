use std::net::SocketAddr;
use std::time::{Duration, Instant};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    ClientGone,
    Shutdown,
    SourceLost,
    EncodeFailed,
}

impl CloseReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            CloseReason::ClientGone => "client disconnected",
            CloseReason::Shutdown => "server shutting down",
            CloseReason::SourceLost => "video source lost",
            CloseReason::EncodeFailed => "frame encoding failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewerState {
    Streaming,
    Closed { reason: CloseReason },
}

/// One open `/stream` connection.
#[derive(Debug, Clone)]
pub struct ViewerSession {
    id: String,
    remote: Option<SocketAddr>,
    started_at: Instant,
    frames_sent: u64,
    bytes_sent: u64,
    state: ViewerState,
}

impl ViewerSession {
    pub fn new(remote: Option<SocketAddr>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            remote,
            started_at: Instant::now(),
            frames_sent: 0,
            bytes_sent: 0,
            state: ViewerState::Streaming,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn remote(&self) -> Option<SocketAddr> {
        self.remote
    }

    pub fn duration(&self) -> Duration {
        self.started_at.elapsed()
    }

    pub fn frames_sent(&self) -> u64 {
        self.frames_sent
    }

    pub fn bytes_sent(&self) -> u64 {
        self.bytes_sent
    }

    pub fn state(&self) -> &ViewerState {
        &self.state
    }

    pub fn is_streaming(&self) -> bool {
        matches!(self.state, ViewerState::Streaming)
    }

    pub fn record_frame(&mut self, bytes: usize) {
        if self.is_streaming() {
            self.frames_sent += 1;
            self.bytes_sent += bytes as u64;
        }
    }

    /// First close wins; later calls keep the original reason.
    pub fn close(&mut self, reason: CloseReason) {
        if self.is_streaming() {
            self.state = ViewerState::Closed { reason };
        }
    }
}
