mod local_ip;

pub use local_ip::{detect_local_ip, detect_local_ip_via};
