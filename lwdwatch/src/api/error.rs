//! APIエラーレスポンス型
//!
//! axum用の共通エラーハンドリング

use axum::{response::IntoResponse, Json};
use serde::Serialize;

use crate::common::error::DirectoryError;

/// エラーレスポンス
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// エラーメッセージ
    pub error: String,
    /// エラーコード
    pub code: String,
}

/// Axum用のエラーレスポンス型
#[derive(Debug)]
pub struct AppError(pub DirectoryError);

impl From<DirectoryError> for AppError {
    fn from(err: DirectoryError) -> Self {
        AppError(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.0.status_code();

        // 詳細はログのみに出力し、レスポンスには external_message() を使う
        if status.is_server_error() {
            tracing::error!(error = %self.0, "Request failed");
        } else {
            tracing::debug!(error = %self.0, "Request rejected");
        }

        let payload = ErrorResponse {
            error: self.0.external_message().to_string(),
            code: self.0.error_code().to_string(),
        };

        (status, Json(payload)).into_response()
    }
}
