//! # ヘルスチェック
//!
//! `GET /health` が返すレスポンス型。データベースへの I/O は行わない。

use serde::{Deserialize, Serialize};

/// ヘルスチェックレスポンス
///
/// ```
/// use datagate_shared::HealthResponse;
///
/// let response = HealthResponse::ok();
/// assert_eq!(response.status, "ok");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    /// 稼働状態
    pub status: String,
}

impl HealthResponse {
    /// 稼働中を表すレスポンス
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}
