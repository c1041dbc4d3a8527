use crate::domain::entities::Frame;
use crate::domain::errors::{DomainError, Result};
use crate::domain::value_objects::Resolution;

/// An opened camera. Implementations are driven from a single thread and
/// need not be `Send`.
pub trait CameraDevice {
    /// Poll the next frame. `Ok(None)` means nothing is ready yet and the
    /// caller should try again; `Err` means the device is unusable.
    fn read_frame(&mut self) -> Result<Option<Frame>>;

    /// Resolution as currently reported by the device.
    fn resolution(&self) -> Resolution;

    /// Symbolic name of the platform backend driving the device.
    fn backend_name(&self) -> String;

    /// Best effort; a device may keep its current mode.
    fn set_resolution(&mut self, resolution: Resolution) -> Result<()>;

    /// Hand the device back to the OS. Must be safe to call more than once.
    fn release(&mut self);
}

/// Port for opening cameras by index
pub trait CameraBackend: Send + Sync {
    type Device: CameraDevice;

    fn open(&self, index: u32) -> Result<Self::Device>;

    /// Open for streaming at (or near) `resolution`. A device that refuses
    /// the mode is still returned, running at whatever mode it kept.
    fn open_with_resolution(&self, index: u32, resolution: Resolution) -> Result<Self::Device> {
        let mut device = self.open(index)?;
        match device.set_resolution(resolution) {
            Ok(()) => {}
            Err(DomainError::DeviceConfigFailed(reason)) => {
                tracing::warn!(index, %resolution, %reason, "Camera kept its current resolution");
            }
            Err(e) => {
                device.release();
                return Err(e);
            }
        }
        Ok(device)
    }
}
