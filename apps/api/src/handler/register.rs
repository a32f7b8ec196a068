//! # データベース登録ハンドラ
//!
//! 送られてきた接続情報で実際に接続できるかを確認する。
//!
//! ## エンドポイント
//!
//! ```text
//! POST /register
//! {"dbName": "...", "userName": "...", "password": "...", "host": "...", "port": 5432, "dbType": "postgres"}
//! ```
//!
//! ## 検証の二段構え
//!
//! 1. このモジュールの [`RegisterDbRequest`]（`validator` derive）で必須項目と値域を確認
//! 2. `ConnectionValidator` がドメインの構造検証を行ったうえで実際に接続
//!
//! どちらで弾かれても 400 と `{"isSuccess": false, "error": ...}` を返す。

use std::{fmt, sync::Arc};

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use datagate_domain::{ConnectionRequest, DatabaseEngine};
use datagate_infra::ConnectionValidator;
use datagate_shared::ConnectionCheckResponse;
use serde::Deserialize;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::ApiError;

/// 検証エラーを並べる順序（フィールド名, JSON キー）
const FIELD_ORDER: [(&str, &str); 6] = [
    ("db_type", "dbType"),
    ("host", "host"),
    ("port", "port"),
    ("db_name", "dbName"),
    ("user_name", "userName"),
    ("password", "password"),
];

/// 登録ハンドラの State
pub struct RegisterState {
    pub validator: Arc<ConnectionValidator>,
}

/// `POST /register` のリクエストボディ
///
/// 欠けたフィールドはゼロ値として読み込み、検証で「必須」として報告する。
#[derive(Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct RegisterDbRequest {
    #[validate(length(min = 1, message = "dbName is required"))]
    pub db_name:   String,
    #[validate(length(min = 1, message = "userName is required"))]
    pub user_name: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password:  String,
    #[validate(length(min = 1, message = "host is required"))]
    pub host:      String,
    #[validate(range(min = 1, message = "port must be at least 1"))]
    pub port:      i64,
    #[validate(custom(function = "validate_db_type"))]
    pub db_type:   String,
}

impl fmt::Debug for RegisterDbRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterDbRequest")
            .field("db_name", &self.db_name)
            .field("user_name", &self.user_name)
            .field("password", &"[REDACTED]")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("db_type", &self.db_type)
            .finish()
    }
}

impl From<RegisterDbRequest> for ConnectionRequest {
    fn from(body: RegisterDbRequest) -> Self {
        ConnectionRequest {
            engine:        body.db_type,
            host:          body.host,
            port:          body.port,
            database_name: body.db_name,
            username:      body.user_name,
            password:      body.password,
        }
    }
}

fn validate_db_type(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::new("required").with_message("dbType is required".into()));
    }
    value.parse::<DatabaseEngine>().map(|_| ()).map_err(|_| {
        ValidationError::new("one_of")
            .with_message(format!("unsupported database type: {value:?}").into())
    })
}

/// 検証エラーを 1 行のメッセージにまとめる
///
/// `HashMap` の走査順に依存しないよう、フィールド順 → メッセージ順で並べる。
fn describe(errors: &ValidationErrors) -> String {
    let mut entries = Vec::new();
    for (field, field_errors) in errors.field_errors() {
        let field: &str = field.as_ref();
        let rank = FIELD_ORDER
            .iter()
            .position(|(name, key)| *name == field || *key == field)
            .unwrap_or(FIELD_ORDER.len());
        for error in field_errors {
            let message = error
                .message
                .as_ref()
                .map_or_else(|| format!("{field} is invalid"), ToString::to_string);
            entries.push((rank, message));
        }
    }
    entries.sort();
    entries
        .into_iter()
        .map(|(_, message)| message)
        .collect::<Vec<_>>()
        .join("; ")
}

/// `POST /register`
///
/// ボディを解析・検証し、接続確認の結果をエンベロープで返す。
pub async fn register_db(
    State(state): State<Arc<RegisterState>>,
    payload: Result<Json<RegisterDbRequest>, JsonRejection>,
) -> Result<Json<ConnectionCheckResponse>, ApiError> {
    let Json(body) = payload.map_err(ApiError::InvalidBody)?;
    body.validate()
        .map_err(|errors| ApiError::Validation(describe(&errors)))?;

    let result = state.validator.validate(body.into()).await;
    if result.success {
        Ok(Json(ConnectionCheckResponse::success(result.message)))
    } else {
        Err(ApiError::ConnectionFailed(result.message))
    }
}
