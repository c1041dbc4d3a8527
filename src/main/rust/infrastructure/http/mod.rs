mod mjpeg_server;
mod mjpeg_stream;
pub mod multipart;
mod viewer_page;

pub use mjpeg_server::{routes, WarpMjpegServer};
pub use mjpeg_stream::stream_to_viewer;
pub use viewer_page::render_viewer_page;
