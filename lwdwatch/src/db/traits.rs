//! Repository traitパターン定義
//!
//! Registry Storeを抽象化し、登録経路とポーリングの双方へ同じストアを
//! 明示的な依存として注入するためのtrait。
//! `SqlitePool` 実装は `servers` モジュールのフリー関数に委譲する。

use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::common::error::DirectoryError;
use crate::types::server::{ListFilter, Server};

use super::servers;

/// サーバーレコードのRepository trait
#[async_trait]
pub trait ServerRepository: Send + Sync {
    /// サーバーを登録（identity 重複時は `DuplicateIdentity`）
    async fn create(&self, server: &Server) -> Result<(), DirectoryError>;
    /// identity をキーに全項目を upsert
    async fn update(&self, server: &Server) -> Result<(), DirectoryError>;
    /// identity で削除（存在しなければ false）
    async fn delete(&self, identity: &str) -> Result<bool, DirectoryError>;
    /// 未検証の場合に限り削除（検証済みなら何もせず false）
    async fn delete_unvalidated(&self, identity: &str) -> Result<bool, DirectoryError>;
    /// identity で取得
    async fn find(&self, identity: &str) -> Result<Option<Server>, DirectoryError>;
    /// フィルタ条件に一致する一覧を取得
    async fn list(&self, filter: ListFilter) -> Result<Vec<Server>, DirectoryError>;
}

#[async_trait]
impl ServerRepository for SqlitePool {
    async fn create(&self, server: &Server) -> Result<(), DirectoryError> {
        servers::create_server(self, server)
            .await
            .map_err(|err| match err.as_database_error() {
                Some(db_err) if db_err.is_unique_violation() => {
                    DirectoryError::DuplicateIdentity(server.identity.clone())
                }
                _ => err.into(),
            })
    }

    async fn update(&self, server: &Server) -> Result<(), DirectoryError> {
        Ok(servers::update_server(self, server).await?)
    }

    async fn delete(&self, identity: &str) -> Result<bool, DirectoryError> {
        Ok(servers::delete_server(self, identity).await?)
    }

    async fn delete_unvalidated(&self, identity: &str) -> Result<bool, DirectoryError> {
        Ok(servers::delete_unvalidated_server(self, identity).await?)
    }

    async fn find(&self, identity: &str) -> Result<Option<Server>, DirectoryError> {
        Ok(servers::get_server(self, identity).await?)
    }

    async fn list(&self, filter: ListFilter) -> Result<Vec<Server>, DirectoryError> {
        Ok(servers::list_servers(self, filter).await?)
    }
}
