mod camera_device;
mod device_name_lookup;
mod frame_source;
mod metrics_reporter;
mod streaming_server;

pub use camera_device::{CameraBackend, CameraDevice};
pub use device_name_lookup::{DeviceNameLookup, NoNameLookup};
pub use frame_source::FrameSource;
pub use metrics_reporter::MetricsReporter;
pub use streaming_server::{StreamContext, StreamingServer};
