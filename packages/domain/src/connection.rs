//! # 接続記述子
//!
//! 検証対象のデータベース接続情報を表現する。
//!
//! ## 型の使い分け
//!
//! | 型 | 状態 | 用途 |
//! |---|------|------|
//! | [`ConnectionRequest`] | 未検証 | 呼び出し元から受け取った生の値 |
//! | [`ConnectionDescriptor`] | 構造検証済み | プローブに渡す値 |
//!
//! [`ConnectionDescriptor`] は [`ConnectionDescriptor::parse`] でのみ生成できるため、
//! 必須フィールドの欠落や範囲外のポートを持つ記述子はネットワーク I/O に到達しない。
//!
//! ## 使用例
//!
//! ```rust
//! use datagate_domain::{ConnectionDescriptor, ConnectionRequest, DatabaseEngine};
//!
//! let request = ConnectionRequest {
//!     engine:        "postgres".to_string(),
//!     host:          "localhost".to_string(),
//!     port:          5432,
//!     database_name: "app".to_string(),
//!     username:      "app".to_string(),
//!     password:      "secret".to_string(),
//! };
//!
//! let descriptor = ConnectionDescriptor::parse(request).unwrap();
//! assert_eq!(descriptor.engine(), DatabaseEngine::Postgres);
//! assert_eq!(descriptor.port(), 5432);
//! ```

use std::{fmt, num::NonZeroU16, str::FromStr};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::error::{DescriptorViolation, DomainError};

/// 対応するデータベースエンジン
///
/// 文字列表現（`"postgres"`, `"mysql"`, `"mongo"`）は入力の `dbType` と一致する。
/// 大文字小文字は区別する。
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
pub enum DatabaseEngine {
    /// PostgreSQL
    #[serde(rename = "postgres")]
    #[strum(serialize = "postgres")]
    Postgres,
    /// MySQL / MariaDB
    #[serde(rename = "mysql")]
    #[strum(serialize = "mysql")]
    MySql,
    /// MongoDB
    #[serde(rename = "mongo")]
    #[strum(serialize = "mongo")]
    Mongo,
}

impl DatabaseEngine {
    /// 診断メッセージで使うエンジン名
    ///
    /// MongoDB だけは入力値（`mongo`）ではなく `mongodb` と表記する。
    pub fn label(self) -> &'static str {
        match self {
            DatabaseEngine::Postgres => "postgres",
            DatabaseEngine::MySql => "mysql",
            DatabaseEngine::Mongo => "mongodb",
        }
    }
}

/// 未検証の接続情報
///
/// HTTP ボディなど外部入力をそのまま保持する。ポートは負数も表現できるよう `i64` とする。
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ConnectionRequest {
    /// データベース種別（`postgres` / `mysql` / `mongo`）
    pub engine:        String,
    /// ホスト名または IP アドレス
    pub host:          String,
    /// ポート番号
    pub port:          i64,
    /// データベース名
    pub database_name: String,
    /// ユーザー名
    pub username:      String,
    /// パスワード
    pub password:      String,
}

impl fmt::Debug for ConnectionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionRequest")
            .field("engine", &self.engine)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database_name", &self.database_name)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// 構造検証済みの接続記述子
///
/// # 不変条件
///
/// - `engine` は [`DatabaseEngine`] のいずれか
/// - `host`, `database_name`, `username`, `password` は空でない
/// - `port` は 1〜65535
///
/// 1 回の検証呼び出しの間だけ存在し、永続化しない。
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionDescriptor {
    engine:        DatabaseEngine,
    host:          String,
    port:          NonZeroU16,
    database_name: String,
    username:      String,
    password:      String,
}

impl ConnectionDescriptor {
    /// 未検証の接続情報を構造検証する
    ///
    /// ネットワーク I/O は一切行わない。違反はすべて収集し、
    /// 1 つの [`DomainError::Validation`] として返す。
    pub fn parse(request: ConnectionRequest) -> Result<Self, DomainError> {
        let mut violations = Vec::new();

        let engine = match DatabaseEngine::from_str(&request.engine) {
            Ok(engine) => Some(engine),
            Err(_) if request.engine.is_empty() => {
                violations.push(DescriptorViolation::Missing("engine"));
                None
            }
            Err(_) => {
                violations.push(DescriptorViolation::UnsupportedEngine(
                    request.engine.clone(),
                ));
                None
            }
        };

        if request.host.is_empty() {
            violations.push(DescriptorViolation::Missing("host"));
        }

        let port = u16::try_from(request.port).ok().and_then(NonZeroU16::new);
        if port.is_none() {
            violations.push(DescriptorViolation::PortOutOfRange(request.port));
        }

        for (name, value) in [
            ("databaseName", &request.database_name),
            ("username", &request.username),
            ("password", &request.password),
        ] {
            if value.is_empty() {
                violations.push(DescriptorViolation::Missing(name));
            }
        }

        match (engine, port) {
            (Some(engine), Some(port)) if violations.is_empty() => Ok(Self {
                engine,
                host: request.host,
                port,
                database_name: request.database_name,
                username: request.username,
                password: request.password,
            }),
            _ => Err(DomainError::Validation(violations)),
        }
    }

    pub fn engine(&self) -> DatabaseEngine {
        self.engine
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port.get()
    }

    pub fn database_name(&self) -> &str {
        &self.database_name
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// パスワードを取得する
    ///
    /// ドライバの接続オプション構築以外には使わないこと。
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for ConnectionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionDescriptor")
            .field("engine", &self.engine)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database_name", &self.database_name)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}
