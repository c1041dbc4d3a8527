//! `multipart/x-mixed-replace` framing for the MJPEG stream.

use warp::hyper::body::Bytes;

/// Boundary token separating parts of the stream.
pub const BOUNDARY: &str = "frame";

/// Value of the response `Content-Type` header.
pub const STREAM_CONTENT_TYPE: &str = "multipart/x-mixed-replace; boundary=frame";

/// Build one complete part: boundary line, part headers, blank line, the
/// JPEG bytes and a trailing CRLF. A part is always sent as a single chunk.
pub fn encode_segment(jpeg: &[u8]) -> Bytes {
    let header = format!(
        "--{}\r\nContent-type: image/jpeg\r\nContent-length: {}\r\n\r\n",
        BOUNDARY,
        jpeg.len()
    );

    let mut segment = Vec::with_capacity(header.len() + jpeg.len() + 2);
    segment.extend_from_slice(header.as_bytes());
    segment.extend_from_slice(jpeg);
    segment.extend_from_slice(b"\r\n");
    Bytes::from(segment)
}
