use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;

/// Request tracking middleware
///
/// Tags every request with an id (honoring a caller-supplied
/// `x-request-id`), echoes it on the response, and logs method, uri,
/// status and elapsed time once the response is ready.
pub async fn track_requests(mut request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    request.extensions_mut().insert(request_id.clone());

    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = std::time::Instant::now();

    let mut response = next.run(request).await;

    tracing::info!(
        method = %method,
        uri = %uri,
        status = %response.status(),
        duration_ms = %start.elapsed().as_millis(),
        request_id = %request_id,
        "request completed"
    );

    if let Ok(value) = request_id.parse() {
        response.headers_mut().insert("x-request-id", value);
    }

    response
}
