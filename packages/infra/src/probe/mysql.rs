//! MySQL プローブ

use async_trait::async_trait;
use datagate_domain::{ConnectionDescriptor, DatabaseEngine};
use sqlx::{Connection, MySqlConnection, mysql::MySqlConnectOptions};
use tokio::time::Instant;

use super::{ConnectionProbe, ProbeSession, relational::SqlxSession};
use crate::error::ProbeError;

/// MySQL / MariaDB の接続確認
#[derive(Debug, Clone, Copy, Default)]
pub struct MySqlProbe;

impl MySqlProbe {
    pub fn connect_options(descriptor: &ConnectionDescriptor) -> MySqlConnectOptions {
        MySqlConnectOptions::new()
            .host(descriptor.host())
            .port(descriptor.port())
            .username(descriptor.username())
            .password(descriptor.password())
            .database(descriptor.database_name())
    }
}

#[async_trait]
impl ConnectionProbe for MySqlProbe {
    fn engine(&self) -> DatabaseEngine {
        DatabaseEngine::MySql
    }

    async fn open(
        &self,
        descriptor: &ConnectionDescriptor,
        _deadline: Instant,
    ) -> Result<Box<dyn ProbeSession>, ProbeError> {
        let options = Self::connect_options(descriptor);
        let conn = MySqlConnection::connect_with(&options)
            .await
            .map_err(|e| ProbeError::connect(DatabaseEngine::MySql, e))?;

        Ok(Box::new(SqlxSession::new(DatabaseEngine::MySql, conn)))
    }
}
