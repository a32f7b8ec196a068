//! # DataGate 共有ユーティリティ
//!
//! API のレスポンス形状やトレーシング初期化など、
//! 特定のドメイン知識に依存しない共通部品を提供する。
//!
//! ## 設計方針
//!
//! - ビジネスロジックを含まない純粋なユーティリティのみを配置
//! - axum への依存は持たない（`IntoResponse` 変換は API 側の責務）
//! - tower / tracing-subscriber などの重い依存は `observability` feature に閉じ込める

pub mod check_response;
pub mod health;
pub mod observability;
#[cfg(feature = "observability")]
pub mod request_log;

pub use check_response::ConnectionCheckResponse;
pub use health::HealthResponse;
