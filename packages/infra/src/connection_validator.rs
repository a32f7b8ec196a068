//! # 接続検証ディスパッチャ
//!
//! 接続リクエストを受け取り、構造検証 → プローブ選択 → 制限時間付きの接続確認を行い、
//! 結果を [`ValidationResult`] として返す。
//!
//! ## 設計方針
//!
//! - **エラーを外に漏らさない**: どの失敗も `ValidationResult` の値として返す
//! - **構造検証を先に行う**: 不正な記述子ではネットワーク I/O を一切行わない
//! - **単一の締め切り**: open → ping → close の全体に 1 つの締め切りを適用する
//! - **リトライしない**: 1 回の呼び出しにつき接続試行は 1 回
//!
//! ## 処理の流れ
//!
//! | 段階 | 失敗時のメッセージ |
//! |------|--------------------|
//! | 構造検証 | `validation error: ...` |
//! | プローブ選択 | `unsupported database type: ...` |
//! | 接続 | `failed to create <engine> connection: ...` |
//! | ping | `<engine> ping failed: ...` |
//! | 締め切り超過 | `<engine> connection timed out after ...` |

use std::{collections::HashMap, sync::Arc, time::Duration};

use datagate_domain::{ConnectionDescriptor, ConnectionRequest, DatabaseEngine, ValidationResult};
use tokio::time::{Instant, timeout_at};

use crate::{
    error::ProbeError,
    probe::{ConnectionProbe, default_probes},
};

/// 接続確認の既定の制限時間
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// 接続検証ディスパッチャ
///
/// 保持するのは不変の設定とプローブのレジストリのみ。
/// `Arc` で包んでハンドラ間で共有し、並行に呼び出してよい。
pub struct ConnectionValidator {
    probes:        HashMap<DatabaseEngine, Arc<dyn ConnectionProbe>>,
    probe_timeout: Duration,
}

impl ConnectionValidator {
    /// プローブを持たない空のディスパッチャを作成する
    pub fn new(probe_timeout: Duration) -> Self {
        Self {
            probes: HashMap::new(),
            probe_timeout,
        }
    }

    /// PostgreSQL / MySQL / MongoDB の標準プローブを登録したディスパッチャを作成する
    pub fn with_default_probes(probe_timeout: Duration) -> Self {
        default_probes()
            .into_iter()
            .fold(Self::new(probe_timeout), Self::with_probe)
    }

    /// プローブを登録する
    ///
    /// 同じエンジンのプローブが登録済みの場合は置き換える。
    pub fn with_probe(mut self, probe: Arc<dyn ConnectionProbe>) -> Self {
        self.probes.insert(probe.engine(), probe);
        self
    }

    /// 接続確認の制限時間
    pub fn probe_timeout(&self) -> Duration {
        self.probe_timeout
    }

    /// 接続リクエストを検証する
    ///
    /// 成功・失敗のいずれも [`ValidationResult`] として返す。
    /// パスワードはログに出力しない。
    #[tracing::instrument(
        skip_all,
        fields(engine = %request.engine, host = %request.host, port = request.port)
    )]
    pub async fn validate(&self, request: ConnectionRequest) -> ValidationResult {
        let descriptor = match ConnectionDescriptor::parse(request) {
            Ok(descriptor) => descriptor,
            Err(e) => {
                tracing::info!(
                    error = %e,
                    unsupported_engine = e.is_unsupported_engine(),
                    "接続情報の構造検証に失敗しました"
                );
                return ValidationResult::failure(e.to_string());
            }
        };

        match self.probe(&descriptor).await {
            Ok(()) => {
                tracing::info!("データベースへの接続を確認しました");
                ValidationResult::success()
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    engine = e.engine().label(),
                    timeout = e.is_timeout(),
                    "データベースへの接続確認に失敗しました"
                );
                ValidationResult::failure(e.to_string())
            }
        }
    }

    /// 構造検証済みの記述子で接続確認を行う
    ///
    /// 締め切りを過ぎた場合は実行中の試行をドロップし、セッションはその時点で解放される。
    pub async fn probe(&self, descriptor: &ConnectionDescriptor) -> Result<(), ProbeError> {
        let engine = descriptor.engine();
        let probe = self
            .probes
            .get(&engine)
            .ok_or_else(|| ProbeError::unsupported_engine(engine))?;

        let deadline = Instant::now() + self.probe_timeout;
        match timeout_at(deadline, run_probe(probe.as_ref(), descriptor, deadline)).await {
            Ok(result) => result,
            Err(_elapsed) => Err(ProbeError::timeout(engine, self.probe_timeout)),
        }
    }
}

impl Default for ConnectionValidator {
    fn default() -> Self {
        Self::with_default_probes(DEFAULT_PROBE_TIMEOUT)
    }
}

/// open → ping → close を 1 回実行する
///
/// ping の成否にかかわらず close してから ping の結果を返す。
async fn run_probe(
    probe: &dyn ConnectionProbe,
    descriptor: &ConnectionDescriptor,
    deadline: Instant,
) -> Result<(), ProbeError> {
    let mut session = probe.open(descriptor, deadline).await?;
    tracing::debug!("接続を確立しました");

    let result = session.ping().await;
    session.close().await;
    result
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;
    use crate::mock::{FakeBehavior, FakeProbe};

    fn request(engine: &str) -> ConnectionRequest {
        ConnectionRequest {
            engine:        engine.to_string(),
            host:          "localhost".to_string(),
            port:          5432,
            database_name: "app".to_string(),
            username:      "app".to_string(),
            password:      "secret".to_string(),
        }
    }

    fn validator_with(probe: &FakeProbe) -> ConnectionValidator {
        ConnectionValidator::new(DEFAULT_PROBE_TIMEOUT).with_probe(Arc::new(probe.clone()))
    }

    #[tokio::test]
    async fn test_接続に成功すると成功メッセージを返す() {
        let probe = FakeProbe::new(DatabaseEngine::Postgres, FakeBehavior::Succeed);
        let sut = validator_with(&probe);

        let result = sut.validate(request("postgres")).await;

        assert_eq!(result, ValidationResult::success());
        assert_eq!(result.message, "Database connection successful");
    }

    #[rstest]
    #[case(FakeBehavior::FailOpen, "failed to create mysql connection: connection refused")]
    #[case(FakeBehavior::FailPing, "mysql ping failed: authentication failed")]
    #[tokio::test]
    async fn test_接続失敗はエンジン名付きのメッセージになる(
        #[case] behavior: FakeBehavior,
        #[case] expected: &str,
    ) {
        let probe = FakeProbe::new(DatabaseEngine::MySql, behavior);
        let sut = validator_with(&probe);

        let result = sut.validate(request("mysql")).await;

        assert!(!result.success);
        assert_eq!(result.message, expected);
    }

    #[tokio::test]
    async fn test_プローブ未登録のエンジンは非対応エラーになる() {
        let probe = FakeProbe::new(DatabaseEngine::Postgres, FakeBehavior::Succeed);
        let sut = validator_with(&probe);

        let result = sut.validate(request("mongo")).await;

        assert!(!result.success);
        assert_eq!(result.message, "unsupported database type: mongo");
        assert_eq!(probe.ledger().invocations(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_締め切りを過ぎるとタイムアウトを返す() {
        let probe = FakeProbe::new(DatabaseEngine::Mongo, FakeBehavior::HangOnPing);
        let sut = validator_with(&probe);

        let result = sut.validate(request("mongo")).await;

        assert!(!result.success);
        assert_eq!(result.message, "mongodb connection timed out after 5s");
        assert!(probe.ledger().is_balanced());
    }

    #[test]
    fn test_標準プローブは全エンジンを登録する() {
        let sut = ConnectionValidator::default();

        assert_eq!(sut.probe_timeout(), DEFAULT_PROBE_TIMEOUT);
        for engine in [
            DatabaseEngine::Postgres,
            DatabaseEngine::MySql,
            DatabaseEngine::Mongo,
        ] {
            assert!(sut.probes.contains_key(&engine), "{engine} が登録されていること");
        }
    }
}
