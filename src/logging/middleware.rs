use axum::{
    extract::Request,
    http::{Method, StatusCode, Uri},
    middleware::Next,
    response::Response,
};
use std::time::{Duration, Instant};
use tower_http::request_id::{
    MakeRequestUuid, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tracing::Instrument;

/// Logs one line per request once the response is known. Runs inside a span
/// carrying the request id so handler logs can be correlated with it.
pub async fn log_request(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let uri = request.uri().clone();

    let request_id = request
        .extensions()
        .get::<RequestId>()
        .and_then(|id| id.header_value().to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    let span = tracing::info_span!("request", request_id = %request_id);
    let response = next.run(request).instrument(span.clone()).await;

    span.in_scope(|| record(&method, &uri, response.status(), start.elapsed()));
    response
}

fn record(method: &Method, uri: &Uri, status: StatusCode, elapsed: Duration) {
    let duration_ms = elapsed.as_millis();

    if status.is_server_error() {
        tracing::error!(%method, %uri, %status, duration_ms, "request failed");
    } else if status.is_client_error() {
        tracing::warn!(%method, %uri, %status, duration_ms, "request rejected");
    } else {
        tracing::info!(%method, %uri, %status, duration_ms, "request completed");
    }
}

/// Assigns an `x-request-id` to requests that arrive without one.
pub fn request_id_layer() -> SetRequestIdLayer<MakeRequestUuid> {
    SetRequestIdLayer::x_request_id(MakeRequestUuid)
}

/// Copies `x-request-id` from the request onto the response.
pub fn propagate_request_id_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::x_request_id()
}
