/// Port for mapping a device index to a human-readable name
pub trait DeviceNameLookup: Send + Sync {
    fn lookup(&self, index: u32) -> Option<String>;
}

/// Lookup that never knows a name.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoNameLookup;

impl DeviceNameLookup for NoNameLookup {
    fn lookup(&self, _index: u32) -> Option<String> {
        None
    }
}
