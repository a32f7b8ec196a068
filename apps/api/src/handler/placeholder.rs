//! `/api` 配下の予約ルート

use axum::http::StatusCode;

/// `/api/*` への全メソッドに 501 を返す
pub async fn api_not_implemented() -> (StatusCode, &'static str) {
    (StatusCode::NOT_IMPLEMENTED, "not implemented")
}
