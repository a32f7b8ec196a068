//! # Observability 基盤
//!
//! トレーシングの初期化と、リクエスト ID・リクエストスパンの生成を提供する。
//!
//! ## 環境変数
//!
//! | 変数 | 既定値 | 内容 |
//! |------|--------|------|
//! | `LOG_FORMAT` | `pretty` | `json` / `pretty` |
//! | `RUST_LOG` | `info,datagate=debug` | `EnvFilter` の書式 |
//!
//! `init_tracing` は `tracing_error::ErrorLayer` も登録するため、
//! インフラ層のエラーが生成時の `SpanTrace` を保持できる。

/// `RUST_LOG` 未設定時のフィルタ
pub const DEFAULT_LOG_FILTER: &str = "info,datagate=debug";

/// リクエスト ID を運ぶヘッダー名
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// ログ出力形式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// 1 行 1 JSON（本番向け）
    Json,
    /// 人間向けの整形出力（開発向け）
    #[default]
    Pretty,
}

impl LogFormat {
    /// 文字列からログ形式を決める
    ///
    /// 前後の空白と大文字小文字は無視する。
    /// 解釈できない値は stderr に警告を出して [`Pretty`](LogFormat::Pretty) とする
    /// （この時点ではまだ subscriber が無いため `tracing` は使えない）。
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Self::Json,
            "pretty" | "" => Self::Pretty,
            other => {
                eprintln!("WARNING: unknown LOG_FORMAT={other:?}, falling back to pretty");
                Self::Pretty
            }
        }
    }

    /// 環境変数 `LOG_FORMAT` から読み取る
    pub fn from_env() -> Self {
        std::env::var("LOG_FORMAT")
            .map(|value| Self::parse(&value))
            .unwrap_or_default()
    }
}

/// トレーシング初期化設定
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// サービス名（[`root_span`](Self::root_span) の `service` フィールドに載る）
    pub service_name:   String,
    pub log_format:     LogFormat,
    /// `RUST_LOG` が無いときに使うフィルタ
    pub default_filter: String,
}

impl TracingConfig {
    pub fn new(service_name: impl Into<String>, log_format: LogFormat) -> Self {
        Self {
            service_name: service_name.into(),
            log_format,
            default_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }

    /// `LOG_FORMAT` を読んで設定を作る
    pub fn from_env(service_name: impl Into<String>) -> Self {
        Self::new(service_name, LogFormat::from_env())
    }

    /// アプリケーション全体を包むルートスパンを作る
    ///
    /// subscriber の初期化後に作ること。初期化前に作ったスパンは無効のままになる。
    #[cfg(feature = "observability")]
    pub fn root_span(&self) -> tracing::Span {
        tracing::info_span!("app", service = %self.service_name)
    }
}

/// グローバル subscriber を初期化する
///
/// 2 回目以降の呼び出しはエラーを返す。
#[cfg(feature = "observability")]
pub fn init_tracing(
    config: &TracingConfig,
) -> Result<(), tracing_subscriber::util::TryInitError> {
    use tracing_subscriber::{Layer as _, layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.default_filter));

    let fmt_layer = match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_current_span(true)
            .with_span_list(false)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer().boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .with(tracing_error::ErrorLayer::default())
        .try_init()
}

/// UUID v7 のリクエスト ID を生成する [`MakeRequestId`](tower_http::request_id::MakeRequestId)
///
/// 時刻順に並ぶため、ログを ID で並べても到着順がおおよそ保たれる。
#[cfg(feature = "observability")]
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuidV7;

#[cfg(feature = "observability")]
impl tower_http::request_id::MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(
        &mut self,
        _request: &http::Request<B>,
    ) -> Option<tower_http::request_id::RequestId> {
        let id = uuid::Uuid::now_v7().to_string();
        http::HeaderValue::from_str(&id)
            .ok()
            .map(tower_http::request_id::RequestId::new)
    }
}

/// `TraceLayer` 用のリクエストスパンを作る
///
/// `SetRequestIdLayer` の内側で使うと、リクエスト ID がスパンに載り、
/// ハンドラ内のすべてのログに付与される。
#[cfg(feature = "observability")]
pub fn make_request_span<B>(request: &http::Request<B>) -> tracing::Span {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("-");

    tracing::info_span!(
        "request",
        method = %request.method(),
        path = %request.uri().path(),
        request_id = %request_id,
    )
}
