pub mod camera;
pub mod http;
pub mod metrics;
pub mod network;
