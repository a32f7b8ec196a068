//! sqlx 接続を使ったリレーショナルデータベース共通のセッション
//!
//! PostgreSQL と MySQL は接続型が違うだけで、ping と close の扱いは同じ。

use async_trait::async_trait;
use datagate_domain::DatabaseEngine;
use sqlx::Connection;

use super::ProbeSession;
use crate::error::ProbeError;

/// sqlx の単一接続を保持するセッション
///
/// `conn` は `close` で取り出されるまで `Some`。
/// ドロップ時は sqlx 側がソケットを閉じる。
pub(super) struct SqlxSession<C> {
    engine: DatabaseEngine,
    conn:   Option<C>,
}

impl<C: Connection> SqlxSession<C> {
    pub(super) fn new(engine: DatabaseEngine, conn: C) -> Self {
        Self {
            engine,
            conn: Some(conn),
        }
    }
}

#[async_trait]
impl<C> ProbeSession for SqlxSession<C>
where
    C: Connection + 'static,
{
    async fn ping(&mut self) -> Result<(), ProbeError> {
        let engine = self.engine;
        let Some(conn) = self.conn.as_mut() else {
            return Err(ProbeError::ping(engine, "connection already closed"));
        };
        conn.ping().await.map_err(|e| ProbeError::ping(engine, e))
    }

    async fn close(&mut self) {
        let Some(conn) = self.conn.take() else {
            return;
        };
        // 切断時のエラーは検証結果に影響しない
        if let Err(e) = conn.close().await {
            tracing::debug!(engine = %self.engine, error = %e, "接続のクローズに失敗しました");
        }
    }
}
