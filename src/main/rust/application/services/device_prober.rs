use std::ops::RangeInclusive;

use crate::domain::ports::{CameraBackend, CameraDevice, DeviceNameLookup, NoNameLookup};
use crate::domain::value_objects::CameraInfo;

/// Device indices tried at startup. Cameras above index 9 are not found.
pub const PROBE_INDICES: RangeInclusive<u32> = 0..=9;

/// Finds working cameras by opening each index and reading a single frame
pub struct DeviceProber<B: CameraBackend> {
    backend: B,
    names: Box<dyn DeviceNameLookup>,
}

impl<B: CameraBackend> DeviceProber<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            names: Box::new(NoNameLookup),
        }
    }

    pub fn with_name_lookup(mut self, names: Box<dyn DeviceNameLookup>) -> Self {
        self.names = names;
        self
    }

    /// Probe one index. A missing or silent device is `None`, not an error.
    pub fn probe(&self, index: u32) -> Option<CameraInfo> {
        let mut device = match self.backend.open(index) {
            Ok(device) => device,
            Err(e) => {
                tracing::debug!(index, error = %e, "No camera at index");
                return None;
            }
        };

        let probed = match device.read_frame() {
            Ok(Some(_)) => Some((device.resolution(), device.backend_name())),
            Ok(None) => {
                tracing::debug!(index, "Camera opened but produced no frame");
                None
            }
            Err(e) => {
                tracing::debug!(index, error = %e, "Camera opened but frame read failed");
                None
            }
        };
        device.release();

        let (resolution, backend) = probed?;
        let name = self
            .names
            .lookup(index)
            .unwrap_or_else(|| CameraInfo::fallback_name(index));

        tracing::info!(index, %name, %resolution, %backend, "Found camera");
        Some(CameraInfo::new(index, name, resolution, backend))
    }

    /// Probe every index in `PROBE_INDICES`, keeping the hits in index order.
    pub fn enumerate(&self) -> Vec<CameraInfo> {
        PROBE_INDICES.filter_map(|index| self.probe(index)).collect()
    }
}
