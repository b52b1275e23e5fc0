//! サーバーレジストリAPI
//!
//! 一覧・フィード・登録・削除のハンドラー

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Form, Json};
use serde::{Deserialize, Serialize};

use super::error::AppError;
use crate::types::server::{FeedEntry, ListFilter, Server};
use crate::AppState;

/// 登録成功時のメッセージ
pub const SUBMIT_SUCCESS_MESSAGE: &str = "Server successfully added!";

/// 登録リクエスト（JSON / フォーム共通）
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubmitServerRequest {
    /// lightwalletd のアドレス（例: `https://node.example.com:9067`）
    #[serde(default)]
    pub address: String,
}

/// 登録レスポンス
#[derive(Debug, Serialize)]
pub struct SubmitServerResponse {
    /// 結果メッセージ
    pub message: &'static str,
    /// 作成されたレコード
    pub server: Server,
}

/// 一覧レスポンス
#[derive(Debug, Serialize)]
pub struct ListServersResponse {
    /// サーバー一覧
    pub servers: Vec<Server>,
    /// 件数
    pub total: usize,
}

/// `/servers.json` のレスポンス
#[derive(Debug, Serialize)]
pub struct FeedResponse {
    /// 検証済みサーバー（到達不能を含む）
    pub servers: Vec<FeedEntry>,
}

/// GET /api/servers - サーバー一覧
///
/// 既定は検証済みかつ到達可能なもののみ。
/// `include_down` / `include_unvalidated` で範囲を広げられる。
pub async fn list_servers(
    State(state): State<AppState>,
    Query(filter): Query<ListFilter>,
) -> Result<Json<ListServersResponse>, AppError> {
    let servers = state.registry.list(filter).await?;
    let total = servers.len();
    Ok(Json(ListServersResponse { servers, total }))
}

/// GET /servers.json - 機械可読フィード
pub async fn servers_feed(State(state): State<AppState>) -> Result<Json<FeedResponse>, AppError> {
    let servers = state.registry.list_validated().await?;
    Ok(Json(FeedResponse {
        servers: servers.iter().map(FeedEntry::from).collect(),
    }))
}

/// POST /api/servers - サーバー登録（JSON）
pub async fn create_server(
    State(state): State<AppState>,
    Json(req): Json<SubmitServerRequest>,
) -> Result<(StatusCode, Json<SubmitServerResponse>), AppError> {
    submit(&state, &req.address).await
}

/// POST /add - サーバー登録（フォーム）
pub async fn submit_form(
    State(state): State<AppState>,
    Form(req): Form<SubmitServerRequest>,
) -> Result<(StatusCode, Json<SubmitServerResponse>), AppError> {
    submit(&state, &req.address).await
}

async fn submit(
    state: &AppState,
    address: &str,
) -> Result<(StatusCode, Json<SubmitServerResponse>), AppError> {
    let server = state.registry.submit(address).await?;
    Ok((
        StatusCode::CREATED,
        Json(SubmitServerResponse {
            message: SUBMIT_SUCCESS_MESSAGE,
            server,
        }),
    ))
}

/// DELETE /api/servers/:identity - サーバー削除
pub async fn delete_server(
    State(state): State<AppState>,
    Path(identity): Path<String>,
) -> Result<StatusCode, AppError> {
    state.registry.remove(&identity).await?;
    Ok(StatusCode::NO_CONTENT)
}
