//! # 検証結果
//!
//! 接続検証の成否と診断メッセージを保持する値オブジェクト。
//! 検証器は失敗をエラーとして返さず、常にこの値を返す。

use serde::Serialize;

/// 接続成功時のメッセージ
pub const CONNECTION_SUCCESSFUL: &str = "Database connection successful";

/// 接続検証の結果
///
/// # 使用例
///
/// ```rust
/// use datagate_domain::ValidationResult;
///
/// let ok = ValidationResult::success();
/// assert!(ok.success);
/// assert_eq!(ok.message, "Database connection successful");
///
/// let ng = ValidationResult::failure("failed to create mysql connection");
/// assert!(!ng.success);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    /// 接続・疎通確認に成功したか
    pub success: bool,
    /// 人間が読める診断メッセージ
    pub message: String,
}

impl ValidationResult {
    /// 成功結果を作成する
    pub fn success() -> Self {
        Self {
            success: true,
            message: CONNECTION_SUCCESSFUL.to_string(),
        }
    }

    /// 失敗結果を作成する
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}
