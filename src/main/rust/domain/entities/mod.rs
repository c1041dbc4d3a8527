mod frame;
mod viewer_session;

pub use frame::Frame;
pub use viewer_session::{CloseReason, ViewerSession, ViewerState};
