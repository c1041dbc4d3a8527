use crate::domain::entities::ViewerSession;

/// Port for metrics reporting
pub trait MetricsReporter: Send + Sync {
    fn report_viewer_connected(&self, session: &ViewerSession);
    fn report_viewer_disconnected(&self, session: &ViewerSession);
    fn report_frame_sent(&self, bytes: usize);
    fn report_page_served(&self);
}
