use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tokio::sync::watch;
use tracing::{error, info, warn};

use pipeline_mjpeg::{
    detect_local_ip, serve_metrics, CameraBackend, CameraDevice, CameraInfo, CaptureService,
    Config, DeviceNameLookup, DeviceProber, NoNameLookup, NokhwaBackend, NokhwaNameLookup,
    PrometheusReporter, ServerConfig, SourceSelector, StreamConfig, StreamContext,
    StreamingService, WarpMjpegServer,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse configuration
    let config = Config::parse();

    // Initialize logging
    let filter = if config.verbose { "debug" } else { "info" };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .init();

    info!("Starting Pipeline-MJPEG v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = config.validate() {
        error!("Configuration validation failed: {}", e);
        return Err(e);
    }
    let stream_config = config.to_stream_config()?;

    // Probing opens real hardware and blocks; keep it off the async workers
    let names: Box<dyn DeviceNameLookup> = if config.device_names {
        Box::new(NokhwaNameLookup::new())
    } else {
        Box::new(NoNameLookup)
    };
    let sources = tokio::task::spawn_blocking(move || {
        DeviceProber::new(NokhwaBackend::new())
            .with_name_lookup(names)
            .enumerate()
    })
    .await?;

    if sources.is_empty() {
        println!("No video sources found!");
        return Ok(());
    }

    let selected = {
        let stdin = io::stdin();
        let mut selector = SourceSelector::new(stdin.lock(), io::stdout());
        selector.select(&sources, config.source)?
    };
    println!("\nUsing: {}", selected.name());

    let ip = config.bind_ip.unwrap_or_else(detect_local_ip);
    let server_config = ServerConfig::new(ip, config.port)?;

    // Initialize metrics
    PrometheusReporter::init_metrics()?;
    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
    let metrics_server = tokio::spawn(serve_metrics(
        SocketAddr::new([0, 0, 0, 0].into(), config.metrics_port),
        async move {
            let _ = shutdown_rx.changed().await;
        },
    ));

    // Open the chosen camera for the rest of the process
    let capture = CaptureService::start(
        open_for_streaming(NokhwaBackend::new(), &selected, &stream_config),
        stream_config.frame_backoff().clone(),
    )
    .await?;

    let context = StreamContext {
        camera: selected.clone(),
        stream_config,
        frames: Arc::new(capture.handle()),
    };
    let server = Box::new(
        WarpMjpegServer::new(Arc::new(PrometheusReporter::new()))
            .with_drain_timeout(config.drain_timeout()),
    );
    let streaming_service = StreamingService::new(server);

    let addr = match streaming_service.start_streaming(context, server_config).await {
        Ok(addr) => addr,
        Err(e) => {
            error!("Failed to start streaming server: {}", e);
            if let Err(release_err) = capture.release().await {
                warn!("Error while releasing camera: {}", release_err);
            }
            let _ = shutdown_tx.send(true);
            return Err(e.into());
        }
    };

    info!("-------------------------------------------------------");
    info!("MJPEG Server Ready");
    info!("   Camera:  {}", selected.title());
    info!("   Backend: {}", selected.backend());
    info!("   Metrics: http://0.0.0.0:{}/metrics", config.metrics_port);
    info!("-------------------------------------------------------");
    println!("\nStreaming video at: http://{}/", addr);
    println!("Press Ctrl+C to stop the server");

    // Handle graceful shutdown
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received (Ctrl+C)"),
        Err(err) => error!("Failed to listen for shutdown signal: {}", err),
    }

    if let Err(e) = streaming_service.stop_streaming().await {
        warn!("Error while stopping server: {}", e);
    }
    if let Err(e) = capture.release().await {
        warn!("Error while releasing camera: {}", e);
    }

    let _ = shutdown_tx.send(true);
    metrics_server.await.ok();

    info!("Server stopped gracefully");
    Ok(())
}

/// Opener run on the capture thread: the configured resolution is requested
/// while opening, and the device keeps whatever mode it settles on.
fn open_for_streaming<B>(
    backend: B,
    camera: &CameraInfo,
    stream_config: &StreamConfig,
) -> impl FnOnce() -> pipeline_mjpeg::Result<B::Device> + Send + 'static
where
    B: CameraBackend + 'static,
    B::Device: 'static,
{
    let index = camera.id();
    let resolution = stream_config.capture_resolution();

    move || {
        let device = backend.open_with_resolution(index, resolution)?;
        info!(requested = %resolution, actual = %device.resolution(), "Capture device ready");
        Ok(device)
    }
}
