mod capture_service;
mod device_prober;
mod source_selector;
mod streaming_service;

pub use capture_service::{CaptureHandle, CaptureService};
pub use device_prober::{DeviceProber, PROBE_INDICES};
pub use source_selector::SourceSelector;
pub use streaming_service::StreamingService;
