//! REST APIハンドラー
//!
//! サーバー一覧・登録・削除API

pub mod error;
pub mod servers;

use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use tower_http::trace::TraceLayer;

use crate::AppState;
use error::ErrorResponse;

/// APIルーターを作成
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/servers",
            get(servers::list_servers).post(servers::create_server),
        )
        .route("/api/servers/:identity", delete(servers::delete_server))
        .route("/servers.json", get(servers::servers_feed))
        .route("/add", post(servers::submit_form))
        .route("/health", get(health))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - 死活確認
async fn health() -> StatusCode {
    StatusCode::OK
}

async fn not_found() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: "Not found".to_string(),
            code: "NOT_FOUND".to_string(),
        }),
    )
}
