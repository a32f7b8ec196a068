//! # アプリケーション設定
//!
//! 環境変数から API サーバーの設定を読み込む。
//!
//! ## 環境変数一覧
//!
//! | 変数名 | 必須 | デフォルト | 説明 |
//! |--------|------|------------|------|
//! | `DATAGATE_HOST` | No | `0.0.0.0` | バインドアドレス |
//! | `PORT` | No | `8080` | ポート番号 |
//! | `PROBE_TIMEOUT_SECS` | No | `5` | 1 回の接続確認の制限時間（秒、1 以上） |
//! | `LOG_FORMAT` | No | `pretty` | `json` / `pretty`（`datagate_shared::observability` が読む） |
//!
//! 開発時は `.env` に書いておけば `main` が起動時に読み込む。

use std::{env, time::Duration};

use datagate_infra::DEFAULT_PROBE_TIMEOUT;
use thiserror::Error;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;

/// 設定の読み込みエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// ポート番号として解釈できない
    #[error("PORT は 1〜65535 の整数である必要があります（値: {0:?}）")]
    InvalidPort(String),

    /// 制限時間として解釈できない
    #[error("PROBE_TIMEOUT_SECS は 1 以上の整数である必要があります（値: {0:?}）")]
    InvalidProbeTimeout(String),
}

/// API サーバーの設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// バインドアドレス
    pub host:          String,
    /// ポート番号
    pub port:          u16,
    /// 接続確認の制限時間
    pub probe_timeout: Duration,
}

impl ApiConfig {
    /// 環境変数から設定を読み込む
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 任意の参照関数から設定を読み込む
    ///
    /// 値が空文字の場合は未設定として扱う。
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let host = get("DATAGATE_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match get("PORT") {
            Some(raw) => match raw.trim().parse::<u16>() {
                Ok(port) if port > 0 => port,
                _ => return Err(ConfigError::InvalidPort(raw)),
            },
            None => DEFAULT_PORT,
        };

        let probe_timeout = match get("PROBE_TIMEOUT_SECS") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => return Err(ConfigError::InvalidProbeTimeout(raw)),
            },
            None => DEFAULT_PROBE_TIMEOUT,
        };

        Ok(Self {
            host,
            port,
            probe_timeout,
        })
    }
}
