//! # プローブエラー定義
//!
//! 接続確認（プローブ）で発生するエラーを表現する。
//!
//! ## 構造
//!
//! `std::io::Error` と同じ struct + enum パターンを採用:
//! - [`ProbeError`]: エラー種別（[`ProbeErrorKind`]）と [`SpanTrace`] を保持するラッパー
//! - [`ProbeErrorKind`]: 接続失敗・ping 失敗・タイムアウトなどの具体的な種別
//!
//! ## メッセージ
//!
//! `Display` の出力は検証結果の `message` としてそのまま呼び出し元に返る。
//! そのため必ずエンジン名を含め、パスワードは含めない。
//! ドライバのエラーは接続オプションを構造体で渡しているため、資格情報を含まない。

use std::{fmt, time::Duration};

use datagate_domain::DatabaseEngine;
use derive_more::Display;
use thiserror::Error;
use tracing_error::SpanTrace;

/// ドライバ由来のエラー
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// プローブで発生するエラー
///
/// 生成時点のスパン情報（[`SpanTrace`]）を自動的に記録する。
#[derive(Display)]
#[display("{kind}")]
pub struct ProbeError {
    kind:       ProbeErrorKind,
    span_trace: SpanTrace,
}

/// プローブエラーの種別
#[derive(Debug, Error)]
pub enum ProbeErrorKind {
    /// 接続の確立に失敗した
    ///
    /// 名前解決の失敗、接続拒否、認証エラー、ハンドシェイク失敗など。
    #[error("failed to create {} connection: {source}", .engine.label())]
    Connect {
        engine: DatabaseEngine,
        source: BoxError,
    },

    /// 接続後の疎通確認（ping）に失敗した
    #[error("{} ping failed: {source}", .engine.label())]
    Ping {
        engine: DatabaseEngine,
        source: BoxError,
    },

    /// 制限時間内に接続確認が完了しなかった
    ///
    /// 呼び出し元からは接続エラーと同様に扱われる。
    #[error("{} connection timed out after {timeout:?}", .engine.label())]
    Timeout {
        engine:  DatabaseEngine,
        timeout: Duration,
    },

    /// プローブが登録されていないエンジン
    ///
    /// 構造検証を通過した記述子では通常発生しない。
    #[error("unsupported database type: {0}")]
    UnsupportedEngine(DatabaseEngine),
}

impl ProbeError {
    /// エラー種別を取得する
    pub fn kind(&self) -> &ProbeErrorKind {
        &self.kind
    }

    /// SpanTrace を取得する
    pub fn span_trace(&self) -> &SpanTrace {
        &self.span_trace
    }

    /// 失敗したエンジンを取得する
    pub fn engine(&self) -> DatabaseEngine {
        match &self.kind {
            ProbeErrorKind::Connect { engine, .. }
            | ProbeErrorKind::Ping { engine, .. }
            | ProbeErrorKind::Timeout { engine, .. } => *engine,
            ProbeErrorKind::UnsupportedEngine(engine) => *engine,
        }
    }

    /// タイムアウトかどうか
    pub fn is_timeout(&self) -> bool {
        matches!(self.kind, ProbeErrorKind::Timeout { .. })
    }

    // ===== Convenience constructors =====

    /// 接続失敗エラーを生成する
    pub fn connect(engine: DatabaseEngine, source: impl Into<BoxError>) -> Self {
        Self::from_kind(ProbeErrorKind::Connect {
            engine,
            source: source.into(),
        })
    }

    /// ping 失敗エラーを生成する
    pub fn ping(engine: DatabaseEngine, source: impl Into<BoxError>) -> Self {
        Self::from_kind(ProbeErrorKind::Ping {
            engine,
            source: source.into(),
        })
    }

    /// タイムアウトエラーを生成する
    pub fn timeout(engine: DatabaseEngine, timeout: Duration) -> Self {
        Self::from_kind(ProbeErrorKind::Timeout { engine, timeout })
    }

    /// 非対応エンジンエラーを生成する
    pub fn unsupported_engine(engine: DatabaseEngine) -> Self {
        Self::from_kind(ProbeErrorKind::UnsupportedEngine(engine))
    }

    fn from_kind(kind: ProbeErrorKind) -> Self {
        Self {
            kind,
            span_trace: SpanTrace::capture(),
        }
    }
}

impl fmt::Debug for ProbeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProbeError")
            .field("kind", &self.kind)
            .field("span_trace", &self.span_trace)
            .finish()
    }
}

impl std::error::Error for ProbeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.kind.source()
    }
}
