use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use warp::http::header::{HeaderValue, CACHE_CONTROL, CONTENT_TYPE, PRAGMA};
use warp::hyper::Body;
use warp::{Filter, Rejection, Reply};

use super::mjpeg_stream::stream_to_viewer;
use super::multipart::STREAM_CONTENT_TYPE;
use super::viewer_page::render_viewer_page;
use crate::domain::entities::ViewerSession;
use crate::domain::errors::{DomainError, Result};
use crate::domain::ports::{MetricsReporter, StreamContext, StreamingServer};
use crate::domain::value_objects::ServerConfig;

const DEFAULT_DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Viewer page at `/`, MJPEG at `/stream`, 404 for anything else.
pub fn routes(
    context: Arc<StreamContext>,
    metrics: Arc<dyn MetricsReporter>,
    shutdown: watch::Receiver<bool>,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let page_context = context.clone();
    let page_metrics = metrics.clone();
    let page = warp::get().and(warp::path::end()).map(move || {
        page_metrics.report_page_served();
        warp::reply::html(render_viewer_page(&page_context.camera))
    });

    let stream = warp::get()
        .and(warp::path("stream"))
        .and(warp::path::end())
        .and(warp::addr::remote())
        .map(move |remote: Option<SocketAddr>| {
            stream_response(&context, metrics.clone(), shutdown.clone(), remote)
        });

    page.or(stream)
}

fn stream_response(
    context: &StreamContext,
    metrics: Arc<dyn MetricsReporter>,
    shutdown: watch::Receiver<bool>,
    remote: Option<SocketAddr>,
) -> warp::reply::Response {
    let (sender, body) = Body::channel();

    tokio::spawn(stream_to_viewer(
        context.frames.clone(),
        context.stream_config.jpeg_quality(),
        metrics,
        sender,
        shutdown,
        ViewerSession::new(remote),
    ));

    let mut response = warp::reply::Response::new(body);
    let headers = response.headers_mut();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(STREAM_CONTENT_TYPE));
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache, private"));
    headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
    response
}

/// warp-backed MJPEG server
pub struct WarpMjpegServer {
    metrics: Arc<dyn MetricsReporter>,
    shutdown: Option<watch::Sender<bool>>,
    server_task: Option<JoinHandle<()>>,
    local_addr: Option<SocketAddr>,
    drain_timeout: Duration,
}

impl WarpMjpegServer {
    pub fn new(metrics: Arc<dyn MetricsReporter>) -> Self {
        Self {
            metrics,
            shutdown: None,
            server_task: None,
            local_addr: None,
            drain_timeout: DEFAULT_DRAIN_TIMEOUT,
        }
    }

    /// How long `stop` waits for open connections before giving up on them.
    pub fn with_drain_timeout(mut self, timeout: Duration) -> Self {
        self.drain_timeout = timeout;
        self
    }
}

#[async_trait]
impl StreamingServer for WarpMjpegServer {
    async fn start(
        &mut self,
        context: StreamContext,
        server_config: ServerConfig,
    ) -> Result<SocketAddr> {
        if self.is_running() {
            self.stop().await?;
        }

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let routes = routes(Arc::new(context), self.metrics.clone(), shutdown_rx.clone());

        let bind_addr = server_config.socket_addr();
        let mut signal = shutdown_rx;
        let (addr, server) = warp::serve(routes)
            .try_bind_with_graceful_shutdown(bind_addr, async move {
                let _ = signal.changed().await;
            })
            .map_err(|e| DomainError::BindFailed {
                addr: bind_addr.to_string(),
                reason: e.to_string(),
            })?;

        self.server_task = Some(tokio::spawn(server));
        self.shutdown = Some(shutdown_tx);
        self.local_addr = Some(addr);

        Ok(addr)
    }

    async fn stop(&mut self) -> Result<()> {
        let shutdown = self.shutdown.take().ok_or(DomainError::ServerNotRunning)?;
        let _ = shutdown.send(true);

        if let Some(mut task) = self.server_task.take() {
            if tokio::time::timeout(self.drain_timeout, &mut task).await.is_err() {
                tracing::warn!(timeout = ?self.drain_timeout, "Connections still open, closing listener");
                task.abort();
            }
        }
        self.local_addr = None;

        Ok(())
    }

    fn is_running(&self) -> bool {
        self.shutdown.is_some()
    }

    fn local_addr(&self) -> Option<SocketAddr> {
        self.local_addr
    }
}
