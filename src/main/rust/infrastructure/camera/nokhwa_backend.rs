use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType};
use nokhwa::{Camera, NokhwaError};

use crate::domain::entities::Frame;
use crate::domain::errors::{DomainError, Result};
use crate::domain::ports::{CameraBackend, CameraDevice};
use crate::domain::value_objects::Resolution;

/// Opens cameras through the platform's native API via nokhwa.
#[derive(Debug, Default, Clone, Copy)]
pub struct NokhwaBackend;

impl NokhwaBackend {
    pub fn new() -> Self {
        Self
    }
}

/// Format asked for when streaming: the wanted size as MJPEG at 30 fps,
/// which the driver maps to its closest supported mode.
pub fn closest_format(resolution: Resolution) -> CameraFormat {
    CameraFormat::new(
        nokhwa::utils::Resolution::new(resolution.width(), resolution.height()),
        FrameFormat::MJPEG,
        30,
    )
}

fn start_stream(mut camera: Camera, index: u32) -> Result<NokhwaDevice> {
    camera
        .open_stream()
        .map_err(|e| DomainError::DeviceOpenFailed {
            index,
            reason: e.to_string(),
        })?;

    Ok(NokhwaDevice {
        camera,
        index,
        released: false,
    })
}

fn create_camera(index: u32, format: RequestedFormatType) -> Result<Camera> {
    let requested = RequestedFormat::new::<RgbFormat>(format);
    Camera::new(CameraIndex::Index(index), requested).map_err(|e: NokhwaError| {
        DomainError::DeviceOpenFailed {
            index,
            reason: e.to_string(),
        }
    })
}

impl CameraBackend for NokhwaBackend {
    type Device = NokhwaDevice;

    fn open(&self, index: u32) -> Result<NokhwaDevice> {
        // Let the driver pick its default mode
        start_stream(create_camera(index, RequestedFormatType::None)?, index)
    }

    fn open_with_resolution(&self, index: u32, resolution: Resolution) -> Result<NokhwaDevice> {
        // The format has to be negotiated before the stream holds its buffers
        let camera = match create_camera(
            index,
            RequestedFormatType::Closest(closest_format(resolution)),
        ) {
            Ok(camera) => camera,
            Err(e) => {
                tracing::warn!(
                    index,
                    %resolution,
                    error = %e,
                    "Requested format refused, using device default"
                );
                create_camera(index, RequestedFormatType::None)?
            }
        };
        start_stream(camera, index)
    }
}

pub struct NokhwaDevice {
    camera: Camera,
    index: u32,
    released: bool,
}

impl CameraDevice for NokhwaDevice {
    fn read_frame(&mut self) -> Result<Option<Frame>> {
        let buffer = match self.camera.frame() {
            Ok(buffer) => buffer,
            Err(e) if self.camera.is_stream_open() => {
                tracing::trace!(index = self.index, error = %e, "No frame ready");
                return Ok(None);
            }
            Err(e) => return Err(DomainError::SourceDisconnected(e.to_string())),
        };

        let decoded = match buffer.decode_image::<RgbFormat>() {
            Ok(decoded) => decoded,
            Err(e) => {
                tracing::debug!(index = self.index, error = %e, "Skipping undecodable frame");
                return Ok(None);
            }
        };

        let (width, height) = (decoded.width(), decoded.height());
        Frame::from_rgb(width, height, decoded.into_raw()).map(Some)
    }

    fn resolution(&self) -> Resolution {
        let resolution = self.camera.resolution();
        Resolution::new(resolution.width(), resolution.height())
    }

    fn backend_name(&self) -> String {
        format!("{:?}", self.camera.backend())
    }

    fn set_resolution(&mut self, resolution: Resolution) -> Result<()> {
        self.camera
            .set_resolution(nokhwa::utils::Resolution::new(
                resolution.width(),
                resolution.height(),
            ))
            .map_err(|e| DomainError::DeviceConfigFailed(e.to_string()))
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;

        if let Err(e) = self.camera.stop_stream() {
            tracing::debug!(index = self.index, error = %e, "Error while stopping camera stream");
        }
    }
}

impl Drop for NokhwaDevice {
    fn drop(&mut self) {
        self.release();
    }
}
