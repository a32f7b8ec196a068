//! # 接続確認レスポンス
//!
//! `POST /register` が返すエンベロープ。
//!
//! ## 形状
//!
//! | 結果 | JSON |
//! |------|------|
//! | 成功 | `{"isSuccess": true, "message": "..."}` |
//! | 失敗 | `{"isSuccess": false, "error": "..."}` |
//!
//! 成功時は `error` を、失敗時は `message` を出力しない。

use serde::{Deserialize, Serialize};

/// 接続確認の結果エンベロープ
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionCheckResponse {
    pub is_success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message:    Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error:      Option<String>,
}

impl ConnectionCheckResponse {
    /// 成功レスポンス
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            is_success: true,
            message:    Some(message.into()),
            error:      None,
        }
    }

    /// 失敗レスポンス
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            is_success: false,
            message:    None,
            error:      Some(error.into()),
        }
    }
}
