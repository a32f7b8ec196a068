//! MongoDB プローブ
//!
//! クライアントの生成自体は接続を伴わない。サーバー選択は最初のコマンド
//! （`ping`）で行われるため、サーバー選択と接続のタイムアウトを検証の残り時間から決める。
//!
//! ドライバには残り時間より [`DRIVER_TIMEOUT_MARGIN`] だけ短いタイムアウトを渡す。
//! 接続拒否や名前解決の失敗はドライバのサーバー選択エラーとして締め切り前に返り、
//! 原因付きの ping 失敗として報告される。

use std::time::Duration;

use async_trait::async_trait;
use datagate_domain::{ConnectionDescriptor, DatabaseEngine};
use mongodb::{
    Client,
    bson::doc,
    options::{ClientOptions, Credential, ServerAddress},
};
use tokio::time::Instant;

use super::{ConnectionProbe, ProbeSession};
use crate::error::ProbeError;

/// ドライバに渡すタイムアウトの下限
///
/// 0 を渡すとドライバ既定値として解釈されるため避ける。
const MIN_DRIVER_TIMEOUT: Duration = Duration::from_millis(1);

/// ドライバのタイムアウトを締め切りより手前に置く幅
///
/// サーバー選択エラーの返却とクライアントの shutdown がこの幅に収まる。
pub const DRIVER_TIMEOUT_MARGIN: Duration = Duration::from_millis(500);

/// MongoDB の接続確認
#[derive(Debug, Clone, Copy, Default)]
pub struct MongoProbe;

impl MongoProbe {
    /// 記述子と残り時間からクライアントオプションを組み立てる
    ///
    /// 認証 DB は指定しない（ドライバ既定の `admin`）。
    pub fn client_options(descriptor: &ConnectionDescriptor, remaining: Duration) -> ClientOptions {
        let timeout = remaining
            .saturating_sub(DRIVER_TIMEOUT_MARGIN)
            .max(MIN_DRIVER_TIMEOUT);

        let credential = Credential::builder()
            .username(descriptor.username().to_string())
            .password(descriptor.password().to_string())
            .build();

        ClientOptions::builder()
            .hosts(vec![ServerAddress::Tcp {
                host: descriptor.host().to_string(),
                port: Some(descriptor.port()),
            }])
            .credential(credential)
            .app_name("datagate".to_string())
            .server_selection_timeout(timeout)
            .connect_timeout(timeout)
            .build()
    }
}

#[async_trait]
impl ConnectionProbe for MongoProbe {
    fn engine(&self) -> DatabaseEngine {
        DatabaseEngine::Mongo
    }

    async fn open(
        &self,
        descriptor: &ConnectionDescriptor,
        deadline: Instant,
    ) -> Result<Box<dyn ProbeSession>, ProbeError> {
        let remaining = deadline.saturating_duration_since(Instant::now());
        let options = Self::client_options(descriptor, remaining);
        let client = Client::with_options(options)
            .map_err(|e| ProbeError::connect(DatabaseEngine::Mongo, e))?;

        Ok(Box::new(MongoSession {
            client:   Some(client),
            database: descriptor.database_name().to_string(),
        }))
    }
}

/// MongoDB クライアントを保持するセッション
///
/// `Client` のドロップでバックグラウンドの監視タスクと接続が破棄される。
struct MongoSession {
    client:   Option<Client>,
    database: String,
}

#[async_trait]
impl ProbeSession for MongoSession {
    async fn ping(&mut self) -> Result<(), ProbeError> {
        let Some(client) = self.client.as_ref() else {
            return Err(ProbeError::ping(
                DatabaseEngine::Mongo,
                "client already shut down",
            ));
        };

        client
            .database(&self.database)
            .run_command(doc! { "ping": 1 })
            .await
            .map(|_| ())
            .map_err(|e| ProbeError::ping(DatabaseEngine::Mongo, e))
    }

    async fn close(&mut self) {
        // 未完了のセッションやカーソルは無いので待たずに閉じる
        if let Some(client) = self.client.take() {
            client.shutdown().immediate(true).await;
        }
    }
}
