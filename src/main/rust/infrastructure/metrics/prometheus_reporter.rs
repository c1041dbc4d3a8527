use lazy_static::lazy_static;
use prometheus::{Encoder, IntCounter, IntGauge, Registry, TextEncoder};

use crate::domain::entities::ViewerSession;
use crate::domain::ports::MetricsReporter;

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();
    pub static ref ACTIVE_VIEWERS: IntGauge = IntGauge::new(
        "mjpeg_active_viewers",
        "Number of currently connected stream viewers"
    ).expect("metric can be created");
    pub static ref TOTAL_VIEWERS: IntCounter = IntCounter::new(
        "mjpeg_viewer_connections_total",
        "Total number of stream connections since server start"
    ).expect("metric can be created");
    pub static ref FRAMES_SENT: IntCounter = IntCounter::new(
        "mjpeg_frames_sent_total",
        "Total JPEG frames written to viewers"
    ).expect("metric can be created");
    pub static ref BYTES_SENT: IntCounter = IntCounter::new(
        "mjpeg_bytes_sent_total",
        "Total JPEG payload bytes written to viewers"
    ).expect("metric can be created");
    pub static ref PAGE_VIEWS: IntCounter = IntCounter::new(
        "mjpeg_page_views_total",
        "Total viewer page requests"
    ).expect("metric can be created");
}

pub struct PrometheusReporter;

impl PrometheusReporter {
    pub fn new() -> Self {
        Self
    }

    pub fn init_metrics() -> Result<(), prometheus::Error> {
        REGISTRY.register(Box::new(ACTIVE_VIEWERS.clone()))?;
        REGISTRY.register(Box::new(TOTAL_VIEWERS.clone()))?;
        REGISTRY.register(Box::new(FRAMES_SENT.clone()))?;
        REGISTRY.register(Box::new(BYTES_SENT.clone()))?;
        REGISTRY.register(Box::new(PAGE_VIEWS.clone()))?;
        Ok(())
    }

    pub fn gather_metrics() -> Vec<u8> {
        let encoder = TextEncoder::new();
        let metric_families = REGISTRY.gather();
        let mut buffer = vec![];
        if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
            tracing::error!("Failed to encode metrics: {}", e);
            return b"# Error encoding metrics\n".to_vec();
        }
        buffer
    }
}

impl Default for PrometheusReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsReporter for PrometheusReporter {
    fn report_viewer_connected(&self, _session: &ViewerSession) {
        ACTIVE_VIEWERS.inc();
        TOTAL_VIEWERS.inc();
    }

    fn report_viewer_disconnected(&self, _session: &ViewerSession) {
        ACTIVE_VIEWERS.dec();
    }

    fn report_frame_sent(&self, bytes: usize) {
        FRAMES_SENT.inc();
        BYTES_SENT.inc_by(bytes as u64);
    }

    fn report_page_served(&self) {
        PAGE_VIEWS.inc();
    }
}
