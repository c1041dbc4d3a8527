use std::sync::Arc;

use tokio::sync::watch;
use warp::hyper::body::Sender;

use super::multipart::encode_segment;
use crate::domain::entities::{CloseReason, ViewerSession};
use crate::domain::ports::{FrameSource, MetricsReporter};

/// Feed one viewer until it leaves, the source ends, or shutdown is signalled.
///
/// Frames are read from the shared source one at a time; encoding and
/// writing happen here, so a slow viewer only slows itself down. Each part
/// is handed to the body as a single chunk, so a viewer never sees a
/// partial part followed by the next boundary.
pub async fn stream_to_viewer(
    frames: Arc<dyn FrameSource>,
    jpeg_quality: u8,
    metrics: Arc<dyn MetricsReporter>,
    mut body: Sender,
    mut shutdown: watch::Receiver<bool>,
    mut session: ViewerSession,
) -> ViewerSession {
    metrics.report_viewer_connected(&session);
    tracing::info!(
        viewer_id = %session.id(),
        remote = ?session.remote(),
        "Viewer connected"
    );

    let reason = loop {
        if *shutdown.borrow() {
            break CloseReason::Shutdown;
        }

        let next = tokio::select! {
            _ = shutdown.changed() => break CloseReason::Shutdown,
            next = frames.next_frame() => next,
        };
        let frame = match next {
            Ok(frame) => frame,
            Err(e) => {
                tracing::info!(viewer_id = %session.id(), error = %e, "Video source unavailable");
                break CloseReason::SourceLost;
            }
        };

        let encoded = tokio::task::spawn_blocking(move || frame.encode_jpeg(jpeg_quality)).await;
        let jpeg = match encoded {
            Ok(Ok(jpeg)) => jpeg,
            Ok(Err(e)) => {
                tracing::warn!(viewer_id = %session.id(), error = %e, "Dropping viewer");
                break CloseReason::EncodeFailed;
            }
            Err(e) => {
                tracing::warn!(viewer_id = %session.id(), error = %e, "Encoder task failed");
                break CloseReason::EncodeFailed;
            }
        };

        let sent = tokio::select! {
            _ = shutdown.changed() => break CloseReason::Shutdown,
            sent = body.send_data(encode_segment(&jpeg)) => sent,
        };
        if sent.is_err() {
            break CloseReason::ClientGone;
        }

        session.record_frame(jpeg.len());
        metrics.report_frame_sent(jpeg.len());
    };

    session.close(reason);
    metrics.report_viewer_disconnected(&session);
    tracing::info!(
        viewer_id = %session.id(),
        reason = reason.as_str(),
        frames_sent = session.frames_sent(),
        bytes_sent = session.bytes_sent(),
        duration = ?session.duration(),
        "Viewer disconnected"
    );

    session
}
