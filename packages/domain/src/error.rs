//! # ドメイン層エラー定義
//!
//! 接続記述子の構造検証で発生するエラーを表現する。
//!
//! ## 設計方針
//!
//! - **違反を全件収集**: 最初の違反で打ち切らず、すべての違反を 1 つのエラーにまとめる
//! - **接続エラーとの区別**: メッセージは常に `validation error:` で始まり、
//!   インフラ層の接続エラーと混同されない
//!
//! ## 使用例
//!
//! ```rust
//! use datagate_domain::{DescriptorViolation, DomainError};
//!
//! let err = DomainError::Validation(vec![
//!     DescriptorViolation::Missing("host"),
//!     DescriptorViolation::PortOutOfRange(0),
//! ]);
//! assert_eq!(
//!     err.to_string(),
//!     "validation error: host is required; port must be between 1 and 65535 (got 0)"
//! );
//! ```

use thiserror::Error;

/// 構造検証で検出される個々の違反
///
/// メッセージは HTTP レスポンスの `error` にそのまま含まれるため英語で定義する。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DescriptorViolation {
    /// 必須フィールドが空
    #[error("{0} is required")]
    Missing(&'static str),

    /// 対応していないデータベース種別
    #[error("unsupported database type: {0:?}")]
    UnsupportedEngine(String),

    /// ポート番号が 1〜65535 の範囲外
    #[error("port must be between 1 and 65535 (got {0})")]
    PortOutOfRange(i64),
}

/// ドメイン層で発生するエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// バリデーションエラー
    ///
    /// 接続記述子が構造検証を通過しなかった場合に使用する。
    /// 空にならないことは [`ConnectionDescriptor::parse`](crate::ConnectionDescriptor::parse) が保証する。
    #[error("validation error: {}", join_violations(.0))]
    Validation(Vec<DescriptorViolation>),
}

impl DomainError {
    /// 違反の一覧を取得する
    pub fn violations(&self) -> &[DescriptorViolation] {
        match self {
            DomainError::Validation(violations) => violations,
        }
    }

    /// 非対応のデータベース種別が原因かどうか
    pub fn is_unsupported_engine(&self) -> bool {
        self.violations()
            .iter()
            .any(|v| matches!(v, DescriptorViolation::UnsupportedEngine(_)))
    }
}

fn join_violations(violations: &[DescriptorViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
