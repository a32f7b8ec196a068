//! # テスト用フェイクプローブ
//!
//! 実際のデータベースに接続せずに [`ConnectionValidator`](crate::ConnectionValidator)
//! の振る舞いを検証するためのプローブ実装。
//! `test-utils` feature を有効にすることで、他クレートからも利用可能。
//!
//! ```toml
//! [dev-dependencies]
//! datagate-infra = { workspace = true, features = ["test-utils"] }
//! ```
//!
//! [`ProbeLedger`] が呼び出し回数と接続の開閉を記録するため、
//! 「構造検証で弾かれたときはプローブが呼ばれない」「どの経路でも接続が解放される」
//! といった性質をテストできる。

use std::{
    future,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use datagate_domain::{ConnectionDescriptor, DatabaseEngine};
use tokio::time::Instant;

use crate::{
    error::ProbeError,
    probe::{ConnectionProbe, ProbeSession},
};

/// フェイクプローブの振る舞い
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FakeBehavior {
    /// 接続も ping も成功する
    Succeed,
    /// 接続の確立に失敗する
    FailOpen,
    /// 接続後の ping に失敗する
    FailPing,
    /// 接続の確立が終わらない
    HangOnOpen,
    /// ping の応答が返らない
    HangOnPing,
}

// ===== ProbeLedger =====

/// プローブの呼び出しと接続の開閉を記録する台帳
#[derive(Debug, Default)]
pub struct ProbeLedger {
    invocations: AtomicUsize,
    opened:      AtomicUsize,
    released:    AtomicUsize,
}

impl ProbeLedger {
    /// `open` が呼ばれた回数
    pub fn invocations(&self) -> usize {
        self.invocations.load(Ordering::SeqCst)
    }

    /// 確立した接続の数
    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    /// 解放した接続の数
    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }

    /// 開いた接続がすべて解放済みかどうか
    pub fn is_balanced(&self) -> bool {
        self.opened() == self.released()
    }
}

// ===== FakeProbe =====

/// 指定した振る舞いをするプローブ
#[derive(Debug, Clone)]
pub struct FakeProbe {
    engine:   DatabaseEngine,
    behavior: FakeBehavior,
    ledger:   Arc<ProbeLedger>,
}

impl FakeProbe {
    pub fn new(engine: DatabaseEngine, behavior: FakeBehavior) -> Self {
        Self {
            engine,
            behavior,
            ledger: Arc::new(ProbeLedger::default()),
        }
    }

    /// 呼び出し記録を共有する台帳
    pub fn ledger(&self) -> Arc<ProbeLedger> {
        Arc::clone(&self.ledger)
    }
}

#[async_trait]
impl ConnectionProbe for FakeProbe {
    fn engine(&self) -> DatabaseEngine {
        self.engine
    }

    async fn open(
        &self,
        _descriptor: &ConnectionDescriptor,
        _deadline: Instant,
    ) -> Result<Box<dyn ProbeSession>, ProbeError> {
        self.ledger.invocations.fetch_add(1, Ordering::SeqCst);

        match self.behavior {
            FakeBehavior::FailOpen => {
                return Err(ProbeError::connect(self.engine, "connection refused"));
            }
            FakeBehavior::HangOnOpen => future::pending::<()>().await,
            FakeBehavior::Succeed | FakeBehavior::FailPing | FakeBehavior::HangOnPing => {}
        }

        self.ledger.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakeSession {
            engine:   self.engine,
            behavior: self.behavior,
            ledger:   Arc::clone(&self.ledger),
            released: false,
        }))
    }
}

// ===== FakeSession =====

/// 解放を台帳に 1 回だけ記録するセッション
struct FakeSession {
    engine:   DatabaseEngine,
    behavior: FakeBehavior,
    ledger:   Arc<ProbeLedger>,
    released: bool,
}

impl FakeSession {
    fn release(&mut self) {
        if !self.released {
            self.released = true;
            self.ledger.released.fetch_add(1, Ordering::SeqCst);
        }
    }
}

#[async_trait]
impl ProbeSession for FakeSession {
    async fn ping(&mut self) -> Result<(), ProbeError> {
        match self.behavior {
            FakeBehavior::FailPing => Err(ProbeError::ping(self.engine, "authentication failed")),
            FakeBehavior::HangOnPing => {
                future::pending::<()>().await;
                Ok(())
            }
            FakeBehavior::Succeed | FakeBehavior::FailOpen | FakeBehavior::HangOnOpen => Ok(()),
        }
    }

    async fn close(&mut self) {
        self.release();
    }
}

impl Drop for FakeSession {
    fn drop(&mut self) {
        self.release();
    }
}
