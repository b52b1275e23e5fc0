//! サーバーレジストリ
//!
//! 登録アドレスの正規化・重複判定・作成と、運用者による削除、
//! 表示用スナップショットの取得を担う。
//!
//! 重複判定はストアの一覧を読んでから書き込むため、同時登録やポーリングの
//! upsert と競合しうる（最後の書き込みが勝つ）。identity が完全一致する
//! 同時挿入のみ主キー制約で `DuplicateIdentity` として検出される。

use std::sync::Arc;

use tracing::{info, warn};

use crate::address::{self, ServerAddress};
use crate::common::error::DirectoryError;
use crate::db::traits::ServerRepository;
use crate::types::server::{ListFilter, Server};

/// サーバーレジストリ
#[derive(Clone)]
pub struct ServerRegistry {
    repo: Arc<dyn ServerRepository>,
}

impl ServerRegistry {
    /// Repositoryを受け取ってレジストリを作成
    pub fn new(repo: Arc<dyn ServerRepository>) -> Self {
        Self { repo }
    }

    /// 共有しているRepository
    pub fn repository(&self) -> Arc<dyn ServerRepository> {
        Arc::clone(&self.repo)
    }

    /// アドレスを登録する
    ///
    /// 空文字列・構文エラー・重複は拒否し、ストアは変更しない。
    /// 成功時は未検証・未到達・未プローブのレコードを返す。
    pub async fn submit(&self, raw: &str) -> Result<Server, DirectoryError> {
        let address = ServerAddress::parse(raw)?;
        let identity = address.identity();

        if self.is_known(&identity).await? {
            return Err(DirectoryError::DuplicateIdentity(identity));
        }

        let server = Server::new(&address, raw);
        self.repo.create(&server).await?;

        info!(identity = %server.identity, address = %server.raw_address, "Server registered");
        Ok(server)
    }

    /// 既存レコードの登録アドレスを同じ規則で正規化し、identity が一致するか調べる
    async fn is_known(&self, identity: &str) -> Result<bool, DirectoryError> {
        let existing = self.repo.list(ListFilter::ALL).await?;
        Ok(existing.iter().any(|server| {
            match address::normalize(&server.raw_address) {
                Ok(existing_identity) => existing_identity == identity,
                Err(err) => {
                    warn!(
                        identity = %server.identity,
                        address = %server.raw_address,
                        error = %err,
                        "Stored address no longer parses; skipping in duplicate check"
                    );
                    false
                }
            }
        }))
    }

    /// サーバーを削除する
    ///
    /// identity そのもの、または同じ identity に正規化されるアドレスを受け付ける。
    pub async fn remove(&self, target: &str) -> Result<Server, DirectoryError> {
        let target = target.trim();
        let identity = match address::normalize(target) {
            Ok(identity) => identity,
            Err(_) => target.to_ascii_lowercase(),
        };

        let server = self
            .repo
            .find(&identity)
            .await?
            .ok_or_else(|| DirectoryError::ServerNotFound(identity.clone()))?;

        if !self.repo.delete(&identity).await? {
            return Err(DirectoryError::ServerNotFound(identity));
        }

        info!(identity = %server.identity, "Server removed");
        Ok(server)
    }

    /// 検証済みかつ到達可能なサーバー（既定の表示）
    pub async fn list_reachable(&self) -> Result<Vec<Server>, DirectoryError> {
        self.repo.list(ListFilter::REACHABLE).await
    }

    /// 検証済みのサーバー（到達不能を含む）
    pub async fn list_validated(&self) -> Result<Vec<Server>, DirectoryError> {
        self.repo.list(ListFilter::VALIDATED).await
    }

    /// 任意のフィルタで一覧を取得
    pub async fn list(&self, filter: ListFilter) -> Result<Vec<Server>, DirectoryError> {
        self.repo.list(filter).await
    }
}
