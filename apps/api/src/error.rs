//! # API エラーハンドリング
//!
//! ハンドラのエラーを定義し、`{"isSuccess": false, "error": ...}` 形式の
//! 400 レスポンスへ変換する。
//!
//! ## エラーの流れ
//!
//! ```text
//! JSON 解析失敗 ──────────┐
//! リクエスト検証失敗 ─────┼─▶ ApiError ──IntoResponse──▶ 400 + ConnectionCheckResponse
//! 接続確認の失敗 ─────────┘
//! ```
//!
//! `error` に入る文字列は [`ApiError`] の `Display` そのもの。

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use datagate_shared::ConnectionCheckResponse;
use thiserror::Error;

/// API 層で発生するエラー
#[derive(Debug, Error)]
pub enum ApiError {
    /// ボディが JSON として読めない、または型が合わない
    ///
    /// 解析エラーの詳細はクライアントに返さず、ログにのみ出力する。
    #[error("Invalid request body")]
    InvalidBody(#[source] JsonRejection),

    /// リクエストの必須項目や値域の検証に失敗した
    #[error("validation error: {0}")]
    Validation(String),

    /// 接続確認に失敗した
    ///
    /// メッセージは検証器が返した診断をそのまま使う。
    #[error("{0}")]
    ConnectionFailed(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::InvalidBody(rejection) => {
                tracing::debug!(detail = %rejection.body_text(), "リクエストボディを解析できません");
            }
            ApiError::Validation(msg) => {
                tracing::debug!(error = %msg, "リクエストの検証に失敗しました");
            }
            ApiError::ConnectionFailed(_) => {}
        }

        (
            StatusCode::BAD_REQUEST,
            Json(ConnectionCheckResponse::failure(self.to_string())),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_検証エラーは400とエラーエンベロープになる() {
        let response = ApiError::Validation("host is required".to_string()).into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({
                "isSuccess": false,
                "error": "validation error: host is required"
            })
        );
    }

    #[tokio::test]
    async fn test_接続失敗は診断メッセージをそのまま返す() {
        let response =
            ApiError::ConnectionFailed("mysql ping failed: timeout".to_string()).into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "mysql ping failed: timeout");
    }
}
