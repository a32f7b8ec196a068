//! # HTTP リクエストハンドラ
//!
//! ## モジュール構成
//!
//! ```text
//! handler.rs              # 親モジュール（re-export）
//! └── handler/
//!     ├── health.rs       # GET /health
//!     ├── register.rs     # POST /register
//!     └── placeholder.rs  # /api/*（未実装）
//! ```
//!
//! ハンドラは薄く保ち、接続確認そのものは `datagate_infra::ConnectionValidator` に委譲する。

pub mod health;
pub mod placeholder;
pub mod register;

pub use health::health_check;
pub use placeholder::api_not_implemented;
pub use register::{RegisterDbRequest, RegisterState, register_db};
