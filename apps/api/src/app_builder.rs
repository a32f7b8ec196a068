//! # アプリケーション構築
//!
//! State の組み立てとルーター・ミドルウェアの構成を担当する。
//! `main.rs` は設定の読み込みとサーバー起動に集中する。

use std::sync::Arc;

use axum::{
    Router,
    http::{Method, header},
    routing::{any, get, post},
};
use datagate_infra::ConnectionValidator;
use datagate_shared::{
    observability::{MakeRequestUuidV7, make_request_span},
    request_log::RequestLogLayer,
};
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::handler::{RegisterState, api_not_implemented, health_check, register_db};

/// ルーターを構築する
///
/// 検証器は呼び出し側で組み立てて渡す（テストではフェイクプローブを登録したものを渡す）。
pub fn build_app(validator: Arc<ConnectionValidator>) -> Router {
    let register_state = Arc::new(RegisterState { validator });

    Router::new()
        .route("/health", get(health_check))
        .route("/register", post(register_db))
        .route("/api", any(api_not_implemented))
        .route("/api/{*rest}", any(api_not_implemented))
        .with_state(register_state)
        .layer(cors_layer())
        // レイヤー順序（下に書いたものが外側）
        // 1. SetRequestIdLayer: UUID v7 を採番（クライアント提供値があればそれを使う）
        // 2. TraceLayer: request_id を含むスパンを作成
        // 3. RequestLogLayer: スパン内で 1 行のリクエストログを出力
        // 4. PropagateRequestIdLayer: レスポンスに X-Request-Id をコピー
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(RequestLogLayer)
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
}

/// 全オリジンを許可する CORS 設定
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::ORIGIN,
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::AUTHORIZATION,
        ])
}
