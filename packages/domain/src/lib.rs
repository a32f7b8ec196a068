//! # DataGate ドメイン層
//!
//! データベース接続情報の検証に関するドメインモデルを定義する。
//!
//! ## 設計方針
//!
//! - **I/O を持たない**: ネットワークアクセスはインフラ層の責務
//! - **構造検証を先に行う**: 接続試行の前に、入力の形が正しいことを型で保証する
//! - **閉じた列挙**: 対応するデータベースエンジンは [`DatabaseEngine`] の列挙で表現する
//!
//! ## モジュール構成
//!
//! - [`connection`] - 接続記述子とデータベースエンジン
//! - [`validation_result`] - 検証結果
//! - [`error`] - ドメイン層エラー定義

pub mod connection;
pub mod error;
pub mod validation_result;

pub use connection::{ConnectionDescriptor, ConnectionRequest, DatabaseEngine};
pub use error::{DescriptorViolation, DomainError};
pub use validation_result::ValidationResult;
