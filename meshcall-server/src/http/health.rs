use axum::http::StatusCode;

/// Liveness probe. Returns 200 while the process is serving.
pub async fn liveness_handler() -> StatusCode {
    StatusCode::OK
}
