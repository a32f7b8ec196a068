//! # DataGate API サーバー
//!
//! データベースの接続情報を受け取り、実際に接続できるかを確認する HTTP サービス。
//!
//! ## エンドポイント
//!
//! | メソッド | パス | 内容 |
//! |----------|------|------|
//! | `GET` | `/health` | 稼働確認（`{"status":"ok"}`） |
//! | `POST` | `/register` | 接続確認（成功 200 / 失敗 400） |
//! | any | `/api/*` | 予約済み（501） |
//!
//! ## モジュール構成
//!
//! - [`app_builder`] - ルーターとミドルウェアの構成
//! - [`config`] - 環境変数からの設定読み込み
//! - [`error`] - API エラーと HTTP レスポンスへの変換
//! - [`handler`] - HTTP リクエストハンドラ

pub mod app_builder;
pub mod config;
pub mod error;
pub mod handler;

pub use app_builder::build_app;
