//! PostgreSQL プローブ
//!
//! `PgConnection` を 1 本だけ張り、`ping` で疎通を確認する。

use async_trait::async_trait;
use datagate_domain::{ConnectionDescriptor, DatabaseEngine};
use sqlx::{
    Connection,
    PgConnection,
    postgres::{PgConnectOptions, PgSslMode},
};
use tokio::time::Instant;

use super::{ConnectionProbe, ProbeSession, relational::SqlxSession};
use crate::error::ProbeError;

/// PostgreSQL の接続確認
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresProbe;

impl PostgresProbe {
    /// 記述子から接続オプションを組み立てる
    ///
    /// DSN 文字列を組み立てずに構造体で渡すため、パスワード中の記号をエスケープする必要がない。
    pub fn connect_options(descriptor: &ConnectionDescriptor) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(descriptor.host())
            .port(descriptor.port())
            .username(descriptor.username())
            .password(descriptor.password())
            .database(descriptor.database_name())
            .ssl_mode(PgSslMode::Disable)
            .application_name("datagate")
    }
}

#[async_trait]
impl ConnectionProbe for PostgresProbe {
    fn engine(&self) -> DatabaseEngine {
        DatabaseEngine::Postgres
    }

    async fn open(
        &self,
        descriptor: &ConnectionDescriptor,
        _deadline: Instant,
    ) -> Result<Box<dyn ProbeSession>, ProbeError> {
        let options = Self::connect_options(descriptor);
        let conn = PgConnection::connect_with(&options)
            .await
            .map_err(|e| ProbeError::connect(DatabaseEngine::Postgres, e))?;

        Ok(Box::new(SqlxSession::new(DatabaseEngine::Postgres, conn)))
    }
}

#[cfg(test)]
mod tests {
    use datagate_domain::ConnectionRequest;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_接続オプションに記述子の値が反映される() {
        let descriptor = ConnectionDescriptor::parse(ConnectionRequest {
            engine:        "postgres".to_string(),
            host:          "db.internal".to_string(),
            port:          15432,
            database_name: "orders".to_string(),
            username:      "reader".to_string(),
            password:      "p@ss:/word".to_string(),
        })
        .unwrap();

        let options = PostgresProbe::connect_options(&descriptor);

        assert_eq!(options.get_host(), "db.internal");
        assert_eq!(options.get_port(), 15432);
        assert_eq!(options.get_username(), "reader");
        assert_eq!(options.get_database(), Some("orders"));
    }
}
