use super::Resolution;

/// A camera that answered the startup probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraInfo {
    id: u32,
    name: String,
    resolution: Resolution,
    backend: String,
}

impl CameraInfo {
    pub fn new(id: u32, name: String, resolution: Resolution, backend: String) -> Self {
        Self {
            id,
            name,
            resolution,
            backend,
        }
    }

    /// Name used when the platform cannot tell us anything better.
    pub fn fallback_name(id: u32) -> String {
        format!("Camera {}", id)
    }

    /// Device index the camera was probed at.
    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    pub fn backend(&self) -> &str {
        &self.backend
    }

    /// `name (WxH)`, used for the page title.
    pub fn title(&self) -> String {
        format!("{} ({})", self.name, self.resolution)
    }

    /// One line of the selection menu.
    pub fn menu_line(&self, position: usize) -> String {
        format!(
            "{}: {} ({}) - {}",
            position, self.name, self.resolution, self.backend
        )
    }
}
