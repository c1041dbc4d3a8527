use std::collections::HashMap;
use std::sync::OnceLock;

use nokhwa::utils::ApiBackend;

use crate::domain::ports::DeviceNameLookup;

/// Names cameras from the platform's device list, queried once on first use.
#[derive(Debug, Default)]
pub struct NokhwaNameLookup {
    names: OnceLock<HashMap<u32, String>>,
}

impl NokhwaNameLookup {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DeviceNameLookup for NokhwaNameLookup {
    fn lookup(&self, index: u32) -> Option<String> {
        self.names.get_or_init(query_device_names).get(&index).cloned()
    }
}

fn query_device_names() -> HashMap<u32, String> {
    let devices = match nokhwa::query(ApiBackend::Auto) {
        Ok(devices) => devices,
        Err(e) => {
            tracing::warn!(error = %e, "Camera name lookup unavailable");
            return HashMap::new();
        }
    };

    devices
        .into_iter()
        .filter_map(|device| {
            let index = device.index().as_index().ok()?;
            let name = device.human_name();
            (!name.trim().is_empty()).then_some((index, name))
        })
        .collect()
}
