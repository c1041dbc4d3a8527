use std::future::Future;
use std::net::SocketAddr;

use warp::{Filter, Rejection, Reply};

use super::PrometheusReporter;

/// Health check response structure
#[derive(serde::Serialize)]
struct HealthResponse {
    status: &'static str,
    service: &'static str,
    version: &'static str,
}

/// `/metrics`, `/health`, `/livez` and `/readyz`.
pub fn metrics_routes() -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    // CORS configuration for browser access
    let cors = warp::cors()
        .allow_any_origin()
        .allow_methods(vec!["GET", "OPTIONS"])
        .allow_headers(vec!["Content-Type"]);

    let metrics_route = warp::path("metrics").map(|| {
        let body = PrometheusReporter::gather_metrics();
        warp::reply::with_header(body, "content-type", "text/plain; version=0.0.4; charset=utf-8")
    });

    let health_route = warp::path("health").map(|| {
        let response = HealthResponse {
            status: "healthy",
            service: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
        };
        warp::reply::json(&response)
    });

    let liveness_route =
        warp::path("livez").map(|| warp::reply::with_status("OK", warp::http::StatusCode::OK));

    let readiness_route = warp::path("readyz").map(|| {
        let response = HealthResponse {
            status: "ready",
            service: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
        };
        warp::reply::json(&response)
    });

    metrics_route
        .or(health_route)
        .or(liveness_route)
        .or(readiness_route)
        .with(cors)
}

/// Serve the metrics routes until `shutdown` resolves. Bind failures are
/// logged; the stream server keeps running without metrics.
pub async fn serve_metrics(addr: SocketAddr, shutdown: impl Future<Output = ()> + Send + 'static) {
    match warp::serve(metrics_routes()).try_bind_with_graceful_shutdown(addr, shutdown) {
        Ok((bound, server)) => {
            tracing::info!("Metrics server listening on http://{}", bound);
            server.await;
        }
        Err(e) => {
            tracing::error!(%addr, error = %e, "Metrics server failed to bind");
        }
    }
}
