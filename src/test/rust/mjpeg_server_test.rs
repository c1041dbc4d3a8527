use pipeline_mjpeg::{
    BackoffPolicy, CameraDevice, CameraInfo, CaptureService, DomainError, Frame, MetricsReporter,
    Resolution, ServerConfig, StreamConfig, StreamContext, StreamingServer, ViewerSession,
    WarpMjpegServer,
};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

const READ_TIMEOUT: Duration = Duration::from_secs(10);
const DRAIN_TIMEOUT: Duration = Duration::from_secs(2);

/// Yields `remaining` flat grey frames, then reports the camera unplugged.
/// With `remaining == None` it never runs dry.
struct TestCamera {
    remaining: Option<usize>,
    pace: Duration,
    releases: Arc<AtomicUsize>,
}

impl CameraDevice for TestCamera {
    fn read_frame(&mut self) -> pipeline_mjpeg::Result<Option<Frame>> {
        match self.remaining.as_mut() {
            Some(0) => return Err(DomainError::SourceDisconnected("unplugged".to_string())),
            Some(left) => *left -= 1,
            None => {}
        }
        std::thread::sleep(self.pace);
        Frame::from_rgb(8, 8, vec![128; 8 * 8 * 3]).map(Some)
    }

    fn resolution(&self) -> Resolution {
        Resolution::new(8, 8)
    }

    fn backend_name(&self) -> String {
        "TEST".to_string()
    }

    fn set_resolution(&mut self, _resolution: Resolution) -> pipeline_mjpeg::Result<()> {
        Ok(())
    }

    fn release(&mut self) {
        self.releases.fetch_add(1, Ordering::SeqCst);
    }
}

struct NoMetrics;

impl MetricsReporter for NoMetrics {
    fn report_viewer_connected(&self, _session: &ViewerSession) {}
    fn report_viewer_disconnected(&self, _session: &ViewerSession) {}
    fn report_frame_sent(&self, _bytes: usize) {}
    fn report_page_served(&self) {}
}

struct Harness {
    server: WarpMjpegServer,
    capture: CaptureService,
    releases: Arc<AtomicUsize>,
    addr: SocketAddr,
}

async fn start_harness(frames: Option<usize>, pace: Duration) -> Harness {
    let releases = Arc::new(AtomicUsize::new(0));
    let camera = TestCamera {
        remaining: frames,
        pace,
        releases: releases.clone(),
    };
    let capture = CaptureService::start(move || Ok(camera), BackoffPolicy::default())
        .await
        .unwrap();

    let context = StreamContext {
        camera: CameraInfo::new(
            0,
            "Test Camera".to_string(),
            Resolution::new(8, 8),
            "TEST".to_string(),
        ),
        stream_config: StreamConfig::new(),
        frames: Arc::new(capture.handle()),
    };
    let mut server =
        WarpMjpegServer::new(Arc::new(NoMetrics)).with_drain_timeout(DRAIN_TIMEOUT);
    let addr = server
        .start(context, ServerConfig::ephemeral(IpAddr::V4(Ipv4Addr::LOCALHOST)))
        .await
        .unwrap();

    Harness {
        server,
        capture,
        releases,
        addr,
    }
}

async fn send_request(addr: SocketAddr, path: &str) -> TcpStream {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let request = format!(
        "GET {} HTTP/1.1\r\nHost: {}\r\nConnection: close\r\n\r\n",
        path, addr
    );
    stream.write_all(request.as_bytes()).await.unwrap();
    stream
}

async fn read_to_end(mut stream: TcpStream) -> Vec<u8> {
    let mut response = Vec::new();
    tokio::time::timeout(READ_TIMEOUT, stream.read_to_end(&mut response))
        .await
        .expect("response did not finish in time")
        .unwrap();
    response
}

/// Read until the first multipart boundary has arrived.
async fn read_first_part(stream: &mut TcpStream) -> Vec<u8> {
    let mut received = Vec::new();
    let mut buf = [0u8; 4096];
    while find(&received, b"--frame\r\n").is_none() {
        let n = tokio::time::timeout(READ_TIMEOUT, stream.read(&mut buf))
            .await
            .expect("no frame before timeout")
            .unwrap();
        assert!(n > 0, "stream closed before the first frame");
        received.extend_from_slice(&buf[..n]);
    }
    received
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Split a raw response into its header block and decoded body.
fn split_response(response: &[u8]) -> (String, Vec<u8>) {
    let end = find(response, b"\r\n\r\n").expect("no header terminator");
    let head = String::from_utf8_lossy(&response[..end]).to_lowercase();
    let raw = &response[end + 4..];

    let body = if head.contains("transfer-encoding: chunked") {
        dechunk(raw)
    } else {
        raw.to_vec()
    };
    (head, body)
}

fn dechunk(mut raw: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    loop {
        let line_end = find(raw, b"\r\n").expect("truncated chunk size");
        let size_text = String::from_utf8_lossy(&raw[..line_end]);
        let size_text = size_text.split(';').next().unwrap_or("").trim();
        let size = usize::from_str_radix(size_text, 16).expect("bad chunk size");
        if size == 0 {
            return body;
        }
        let start = line_end + 2;
        body.extend_from_slice(&raw[start..start + size]);
        raw = &raw[start + size + 2..];
    }
}

/// Parse a multipart body into its JPEG payloads, checking the framing of
/// every part on the way.
fn parse_parts(mut body: &[u8]) -> Vec<Vec<u8>> {
    let mut parts = Vec::new();
    while !body.is_empty() {
        assert!(body.starts_with(b"--frame\r\n"), "part does not start at a boundary");
        let header_end = find(body, b"\r\n\r\n").expect("part headers not terminated");
        let headers = String::from_utf8_lossy(&body[..header_end]).to_string();
        assert!(headers.contains("Content-type: image/jpeg"));

        let length: usize = headers
            .lines()
            .find_map(|line| line.strip_prefix("Content-length: "))
            .expect("part without Content-length")
            .trim()
            .parse()
            .unwrap();

        let start = header_end + 4;
        let payload = &body[start..start + length];
        assert_eq!(&body[start + length..start + length + 2], b"\r\n");
        parts.push(payload.to_vec());
        body = &body[start + length + 2..];
    }
    parts
}

#[tokio::test]
async fn test_stream_sends_every_frame_then_ends() {
    let mut harness = start_harness(Some(5), Duration::ZERO).await;

    let response = read_to_end(send_request(harness.addr, "/stream").await).await;
    let (head, body) = split_response(&response);

    assert!(head.starts_with("http/1.1 200"));
    assert!(head.contains("content-type: multipart/x-mixed-replace; boundary=frame"));
    assert!(head.contains("cache-control: no-cache"));

    let parts = parse_parts(&body);
    assert_eq!(parts.len(), 5);
    for jpeg in &parts {
        assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);
        assert_eq!(&jpeg[jpeg.len() - 2..], &[0xFF, 0xD9]);
    }

    harness.server.stop().await.unwrap();
    harness.capture.release().await.unwrap();
    assert_eq!(harness.releases.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_concurrent_viewers_share_the_camera() {
    let mut harness = start_harness(Some(40), Duration::from_millis(2)).await;

    let first = send_request(harness.addr, "/stream").await;
    let second = send_request(harness.addr, "/stream").await;
    let (first, second) = tokio::join!(read_to_end(first), read_to_end(second));

    let first_parts = parse_parts(&split_response(&first).1);
    let second_parts = parse_parts(&split_response(&second).1);

    // Each frame is read by exactly one viewer.
    assert_eq!(first_parts.len() + second_parts.len(), 40);

    harness.server.stop().await.unwrap();
    harness.capture.release().await.unwrap();
}

#[tokio::test]
async fn test_root_serves_viewer_page() {
    let mut harness = start_harness(None, Duration::from_millis(5)).await;

    let response = read_to_end(send_request(harness.addr, "/").await).await;
    let (head, body) = split_response(&response);
    let page = String::from_utf8_lossy(&body);

    assert!(head.starts_with("http/1.1 200"));
    assert!(head.contains("content-type: text/html"));
    assert!(page.contains("Test Camera (8x8)"));
    assert!(page.contains("/stream"));

    harness.server.stop().await.unwrap();
    harness.capture.release().await.unwrap();
}

#[tokio::test]
async fn test_unknown_path_is_not_found() {
    let mut harness = start_harness(None, Duration::from_millis(5)).await;

    let response = read_to_end(send_request(harness.addr, "/snapshot").await).await;
    let (head, _) = split_response(&response);

    assert!(head.starts_with("http/1.1 404"));

    harness.server.stop().await.unwrap();
    harness.capture.release().await.unwrap();
}

#[tokio::test]
async fn test_shutdown_closes_viewers_and_releases_once() {
    let mut harness = start_harness(None, Duration::from_millis(5)).await;

    let mut viewer = send_request(harness.addr, "/stream").await;
    let mut received = read_first_part(&mut viewer).await;

    harness.server.stop().await.unwrap();
    assert!(!harness.server.is_running());

    // The viewer's connection is finished by the server, not left hanging.
    let rest = read_to_end(viewer).await;
    received.extend_from_slice(&rest);
    assert!(String::from_utf8_lossy(&received).contains("boundary=frame"));

    harness.capture.release().await.unwrap();
    assert_eq!(harness.releases.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_shutdown_with_several_viewers_and_a_stalled_client() {
    let mut harness = start_harness(None, Duration::from_millis(1)).await;

    // This client stops reading after its first part.
    let mut stalled = send_request(harness.addr, "/stream").await;
    read_first_part(&mut stalled).await;

    let mut viewers = Vec::new();
    for _ in 0..3 {
        let mut viewer = send_request(harness.addr, "/stream").await;
        read_first_part(&mut viewer).await;
        viewers.push(viewer);
    }
    tokio::time::sleep(Duration::from_millis(200)).await;

    tokio::time::timeout(Duration::from_secs(5), harness.server.stop())
        .await
        .expect("stop did not return")
        .unwrap();
    assert!(!harness.server.is_running());

    for viewer in viewers {
        read_to_end(viewer).await;
    }
    read_to_end(stalled).await;

    harness.capture.release().await.unwrap();
    assert_eq!(harness.releases.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_stop_without_start_is_an_error() {
    let mut server = WarpMjpegServer::new(Arc::new(NoMetrics));

    assert!(!server.is_running());
    assert!(matches!(
        server.stop().await,
        Err(DomainError::ServerNotRunning)
    ));
}
