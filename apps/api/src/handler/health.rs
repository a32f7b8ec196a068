//! # ヘルスチェックハンドラ
//!
//! プロセスが応答できることだけを返す。データベースには接続しない。

use axum::Json;
use datagate_shared::HealthResponse;

/// `GET /health`
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
