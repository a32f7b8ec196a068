//! # DataGate インフラ層
//!
//! 外部のデータベースに実際に接続し、資格情報が有効かどうかを確認する。
//!
//! ## 設計方針
//!
//! ドメイン層で構造検証された [`ConnectionDescriptor`](datagate_domain::ConnectionDescriptor)
//! を受け取り、エンジン固有のドライバで短命な接続を張る。
//! ドライバの詳細はこのクレートに閉じ込め、API 層には [`ValidationResult`](datagate_domain::ValidationResult)
//! だけを返す。
//!
//! ## 依存関係
//!
//! ```text
//! api → infra → domain
//!   ↘          ↗
//!     shared
//! ```
//!
//! ## モジュール構成
//!
//! - [`connection_validator`] - 構造検証・プローブ選択・締め切り管理を行うディスパッチャ
//! - [`probe`] - エンジン別の接続プローブ（PostgreSQL / MySQL / MongoDB）
//! - [`error`] - プローブエラー定義
//! - `mock` - テスト用フェイクプローブ（`test-utils` feature）
//!
//! ## 使用例
//!
//! ```rust,ignore
//! use datagate_domain::ConnectionRequest;
//! use datagate_infra::ConnectionValidator;
//!
//! async fn check(request: ConnectionRequest) {
//!     let validator = ConnectionValidator::default();
//!     let result = validator.validate(request).await;
//!     println!("{}: {}", result.success, result.message);
//! }
//! ```

pub mod connection_validator;
pub mod error;
#[cfg(any(test, feature = "test-utils"))]
pub mod mock;
pub mod probe;

pub use connection_validator::{ConnectionValidator, DEFAULT_PROBE_TIMEOUT};
pub use error::{ProbeError, ProbeErrorKind};
pub use probe::{ConnectionProbe, MongoProbe, MySqlProbe, PostgresProbe, ProbeSession};
