//! # DataGate API サーバー
//!
//! ## 起動方法
//!
//! ```bash
//! # 開発環境（.env ファイルを使用）
//! cargo run -p datagate-api
//!
//! # 本番環境（環境変数を直接指定）
//! PORT=8080 LOG_FORMAT=json cargo run -p datagate-api --release
//! ```

use std::sync::Arc;

use anyhow::Context as _;
use datagate_api::{build_app, config::ApiConfig};
use datagate_infra::ConnectionValidator;
use datagate_shared::observability::{TracingConfig, init_tracing};
use tokio::net::TcpListener;

const SERVICE_NAME: &str = "datagate-api";

/// 以下の順序で初期化する
///
/// 1. `.env` の読み込み
/// 2. トレーシングの初期化
/// 3. 設定の読み込み
/// 4. ルーターの構築
/// 5. HTTP サーバーの起動
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 本番環境では .env を置かず、環境変数を直接設定する
    dotenvy::dotenv().ok();

    let tracing_config = TracingConfig::from_env(SERVICE_NAME);
    init_tracing(&tracing_config).context("トレーシングの初期化に失敗しました")?;
    let _tracing_guard = tracing_config.root_span().entered();

    let config = ApiConfig::from_env().context("設定の読み込みに失敗しました")?;
    tracing::info!(
        host = %config.host,
        port = config.port,
        probe_timeout = ?config.probe_timeout,
        "DataGate API サーバーを起動します"
    );

    let validator = Arc::new(ConnectionValidator::with_default_probes(config.probe_timeout));
    let app = build_app(validator);

    let listener = TcpListener::bind((config.host.as_str(), config.port))
        .await
        .with_context(|| format!("{}:{} にバインドできません", config.host, config.port))?;
    tracing::info!(addr = %listener.local_addr()?, "DataGate API サーバーが起動しました");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("DataGate API サーバーを停止しました");
    Ok(())
}

/// Ctrl+C を受け取るまで待つ
///
/// 待ち受け自体に失敗した場合は停止させず、そのまま動かし続ける。
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "シグナルの待ち受けに失敗しました");
        std::future::pending::<()>().await;
    }
}
