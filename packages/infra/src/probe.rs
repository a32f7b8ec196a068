//! # 接続プローブ
//!
//! エンジンごとの接続確認戦略を定義する。
//!
//! ## 設計方針
//!
//! - **trait による抽象化**: `ConnectionProbe` がエンジン固有の接続方法を隠蔽する
//! - **3 つの実装**: PostgreSQL / MySQL（sqlx）、MongoDB（公式ドライバ）
//! - **セッションの所有**: 開いた接続は [`ProbeSession`] が所有し、ドロップで必ず解放される
//!
//! ## 1 回のプローブの流れ
//!
//! ```text
//! open(descriptor, deadline) ──▶ ProbeSession ──▶ ping() ──▶ close()
//!                                      │
//!                                      └── 途中でタイムアウトした場合は Drop で解放
//! ```
//!
//! 接続プールは使わない。1 回の検証ごとに接続を張り、確認後すぐに閉じる。

mod mongo;
mod mysql;
mod postgres;
mod relational;

use std::sync::Arc;

use async_trait::async_trait;
use datagate_domain::{ConnectionDescriptor, DatabaseEngine};
pub use mongo::MongoProbe;
pub use mysql::MySqlProbe;
pub use postgres::PostgresProbe;
use tokio::time::Instant;

use crate::error::ProbeError;

/// エンジン固有の接続確認戦略
#[async_trait]
pub trait ConnectionProbe: Send + Sync {
    /// このプローブが担当するエンジン
    fn engine(&self) -> DatabaseEngine;

    /// 接続を開く
    ///
    /// `deadline` は検証全体の締め切り。ドライバが独自のタイムアウト設定を持つ場合は
    /// 残り時間に合わせて設定する。締め切りの強制自体は呼び出し元が行う。
    async fn open(
        &self,
        descriptor: &ConnectionDescriptor,
        deadline: Instant,
    ) -> Result<Box<dyn ProbeSession>, ProbeError>;
}

/// 開かれた接続 1 本
///
/// 実装はドロップ時に接続を解放すること。
/// [`close`](ProbeSession::close) は正常系での丁寧な切断で、2 回目以降は何もしない。
#[async_trait]
pub trait ProbeSession: Send {
    /// 往復の疎通確認を行う
    async fn ping(&mut self) -> Result<(), ProbeError>;

    /// 接続を閉じる
    async fn close(&mut self);
}

/// 標準のプローブ一式を返す
pub fn default_probes() -> Vec<Arc<dyn ConnectionProbe>> {
    vec![
        Arc::new(PostgresProbe),
        Arc::new(MySqlProbe),
        Arc::new(MongoProbe),
    ]
}
