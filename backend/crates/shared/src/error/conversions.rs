//! Error conversions
//!
//! HTTP rendering of [`AppError`] as a JSend envelope.

#[cfg(feature = "axum")]
use super::app_error::AppError;

// ============================================================================
// Axum conversions (feature-gated)
// ============================================================================

#[cfg(feature = "axum")]
impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use crate::response::JSend;
        use axum::Json;
        use axum::http::StatusCode;

        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        // 5xx の詳細はクライアントに返さない
        let body = if self.is_server_error() {
            JSend::<()>::error()
        } else {
            JSend::<()>::fail(self.message(), self.details().map(<[String]>::to_vec))
        };

        (status, Json(body)).into_response()
    }
}
