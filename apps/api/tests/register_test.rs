//! # ルーターの統合テスト
//!
//! `build_app` が組み立てるルーター全体を `oneshot` で呼び出し、
//! エンドポイントのレスポンス形状とミドルウェアの効果を検証する。
//! 接続確認はフェイクプローブで置き換えるため、データベースは不要。

use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use datagate_api::build_app;
use datagate_domain::DatabaseEngine;
use datagate_infra::{
    ConnectionValidator,
    mock::{FakeBehavior, FakeProbe},
};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{Value, json};
use tower::ServiceExt;

// ===== ヘルパー =====

fn app_with(probe: &FakeProbe) -> Router {
    let validator =
        ConnectionValidator::new(Duration::from_secs(5)).with_probe(Arc::new(probe.clone()));
    build_app(Arc::new(validator))
}

fn succeeding_app(engine: DatabaseEngine) -> (Router, FakeProbe) {
    let probe = FakeProbe::new(engine, FakeBehavior::Succeed);
    (app_with(&probe), probe)
}

fn register_request(body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/register")
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.into())
        .unwrap()
}

fn valid_body(db_type: &str) -> Value {
    json!({
        "dbName": "orders",
        "userName": "reader",
        "password": "s3cret",
        "host": "db.internal",
        "port": 5432,
        "dbType": db_type,
    })
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

// ===== GET /health =====

#[tokio::test]
async fn test_healthはokを返す() {
    let (app, probe) = succeeding_app(DatabaseEngine::Postgres);

    let (status, body) = send(
        app,
        Request::builder().uri("/health").body(Body::empty()).unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
    assert_eq!(probe.ledger().invocations(), 0);
}

// ===== POST /register =====

#[rstest]
#[case(DatabaseEngine::Postgres, "postgres")]
#[case(DatabaseEngine::MySql, "mysql")]
#[case(DatabaseEngine::Mongo, "mongo")]
#[tokio::test]
async fn test_接続に成功すると200と成功メッセージを返す(
    #[case] engine: DatabaseEngine,
    #[case] db_type: &str,
) {
    let (app, probe) = succeeding_app(engine);

    let (status, body) = send(app, register_request(valid_body(db_type).to_string())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "isSuccess": true,
            "message": "Database connection successful"
        })
    );
    assert_eq!(probe.ledger().invocations(), 1);
}

#[tokio::test]
async fn test_接続に失敗すると400と診断メッセージを返す() {
    let probe = FakeProbe::new(DatabaseEngine::MySql, FakeBehavior::FailOpen);
    let app = app_with(&probe);

    let (status, body) = send(app, register_request(valid_body("mysql").to_string())).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({
            "isSuccess": false,
            "error": "failed to create mysql connection: connection refused"
        })
    );
    assert!(probe.ledger().is_balanced());
}

#[tokio::test(start_paused = true)]
async fn test_応答がない場合はタイムアウトとして400を返す() {
    let probe = FakeProbe::new(DatabaseEngine::Mongo, FakeBehavior::HangOnPing);
    let app = app_with(&probe);

    let (status, body) = send(app, register_request(valid_body("mongo").to_string())).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "mongodb connection timed out after 5s");
    assert!(probe.ledger().is_balanced());
}

#[rstest]
#[case::not_json("this is not json")]
#[case::wrong_type(r#"{"port": "five thousand"}"#)]
#[case::array("[1, 2, 3]")]
#[tokio::test]
async fn test_解析できないボディはinvalid_request_bodyになる(#[case] raw: &'static str) {
    let (app, probe) = succeeding_app(DatabaseEngine::Postgres);

    let (status, body) = send(app, register_request(raw)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({
            "isSuccess": false,
            "error": "Invalid request body"
        })
    );
    assert_eq!(probe.ledger().invocations(), 0);
}

#[tokio::test]
async fn test_content_typeがないボディもinvalid_request_bodyになる() {
    let (app, _probe) = succeeding_app(DatabaseEngine::Postgres);
    let request = Request::builder()
        .method(Method::POST)
        .uri("/register")
        .body(Body::from(valid_body("postgres").to_string()))
        .unwrap();

    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid request body");
}

#[rstest]
#[case::missing_host(json!({"dbName": "a", "userName": "b", "password": "c", "port": 1, "dbType": "postgres"}), "validation error: host is required")]
#[case::port_zero(json!({"dbName": "a", "userName": "b", "password": "c", "host": "h", "port": 0, "dbType": "postgres"}), "validation error: port must be at least 1")]
#[case::unknown_type(json!({"dbName": "a", "userName": "b", "password": "c", "host": "h", "port": 1, "dbType": "oracle"}), "validation error: unsupported database type: \"oracle\"")]
#[tokio::test]
async fn test_検証に失敗するとプローブを呼ばずに400を返す(
    #[case] request: Value,
    #[case] expected: &str,
) {
    let (app, probe) = succeeding_app(DatabaseEngine::Postgres);

    let (status, body) = send(app, register_request(request.to_string())).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["isSuccess"], false);
    assert_eq!(body["error"], expected);
    assert_eq!(probe.ledger().invocations(), 0);
}

#[tokio::test]
async fn test_ポートが範囲外ならドメインの構造検証で弾く() {
    let (app, probe) = succeeding_app(DatabaseEngine::Postgres);
    let mut request = valid_body("postgres");
    request["port"] = json!(70000);

    let (status, body) = send(app, register_request(request.to_string())).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "validation error: port must be between 1 and 65535 (got 70000)"
    );
    assert_eq!(probe.ledger().invocations(), 0);
}

// ===== /api/* =====

#[rstest]
#[case(Method::GET, "/api/databases")]
#[case(Method::POST, "/api/databases/orders/tables")]
#[case(Method::DELETE, "/api")]
#[tokio::test]
async fn test_apiグループは501を返す(#[case] method: Method, #[case] uri: &str) {
    let (app, _probe) = succeeding_app(DatabaseEngine::Postgres);

    let response = app
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_IMPLEMENTED);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"not implemented");
}

// ===== ミドルウェア =====

#[tokio::test]
async fn test_corsのプリフライトに許可ヘッダーを返す() {
    let (app, _probe) = succeeding_app(DatabaseEngine::Postgres);

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/register")
                .header(header::ORIGIN, "http://localhost:3000")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    let methods = headers[header::ACCESS_CONTROL_ALLOW_METHODS].to_str().unwrap();
    for method in ["GET", "POST", "PUT", "DELETE", "OPTIONS"] {
        assert!(methods.contains(method), "{method} が許可されること: {methods}");
    }
}

#[tokio::test]
async fn test_レスポンスにuuid_v7のリクエストidが付与される() {
    let (app, _probe) = succeeding_app(DatabaseEngine::Postgres);

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    let request_id = response
        .headers()
        .get("x-request-id")
        .expect("x-request-id ヘッダーが存在すること")
        .to_str()
        .unwrap();
    let uuid = uuid::Uuid::parse_str(request_id).unwrap();
    assert_eq!(uuid.get_version(), Some(uuid::Version::SortRand));
}

#[tokio::test]
async fn test_クライアント提供のリクエストidをそのまま返す() {
    let (app, _probe) = succeeding_app(DatabaseEngine::Postgres);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("x-request-id", "caller-supplied-42")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.headers()["x-request-id"], "caller-supplied-42");
}
