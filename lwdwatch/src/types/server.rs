//! サーバーレコード型定義

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::address::ServerAddress;

/// レジストリに登録されたlightwalletdサーバー
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Server {
    /// 正規化済み `host:port`（主キー）
    pub identity: String,
    /// 登録時のアドレス文字列（プローブ時のスキーム判定に使用）
    pub raw_address: String,
    /// 直近の成功プローブが報告したチェーン名（初回成功まで空）
    pub chain_label: String,
    /// 直近の成功プローブが報告したブロック高（初回成功まで0）
    pub height: u64,
    /// 直近のプローブ実行時刻（成功・失敗問わず）
    pub last_checked_at: Option<DateTime<Utc>>,
    /// 直近のプローブが成功したか
    pub reachable: bool,
    /// 一度でもプローブに成功したか（falseには戻らない）
    pub validated: bool,
    /// 登録日時
    pub registered_at: DateTime<Utc>,
}

impl Server {
    /// 新規登録用のレコードを作成する（未検証・未到達・未プローブ）
    pub fn new(address: &ServerAddress, raw_address: &str) -> Self {
        Self {
            identity: address.identity(),
            raw_address: raw_address.trim().to_string(),
            chain_label: String::new(),
            height: 0,
            last_checked_at: None,
            reachable: false,
            validated: false,
            registered_at: Utc::now(),
        }
    }
}

/// 一覧取得フィルタ
///
/// `include_unvalidated` が false なら検証済みのみ、`include_down` が false なら
/// 到達可能なもののみを返す。両方 true なら全件。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ListFilter {
    /// 未検証のレコードも含める
    #[serde(default)]
    pub include_unvalidated: bool,
    /// 到達不能のレコードも含める
    #[serde(default)]
    pub include_down: bool,
}

impl ListFilter {
    /// 全件（ポーリング候補）
    pub const ALL: Self = Self {
        include_unvalidated: true,
        include_down: true,
    };

    /// 検証済みかつ到達可能（既定の表示）
    pub const REACHABLE: Self = Self {
        include_unvalidated: false,
        include_down: false,
    };

    /// 検証済み（到達不能を含む、機械可読フィード）
    pub const VALIDATED: Self = Self {
        include_unvalidated: false,
        include_down: true,
    };

    /// レコードがフィルタ条件を満たすか
    pub fn matches(&self, server: &Server) -> bool {
        (self.include_unvalidated || server.validated) && (self.include_down || server.reachable)
    }
}

/// `/servers.json` フィードの1エントリ
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedEntry {
    /// 登録アドレス
    pub address: String,
    /// チェーン名
    pub blockchain: String,
    /// ブロック高
    pub height: u64,
    /// 到達可能か
    pub up: bool,
}

impl From<&Server> for FeedEntry {
    fn from(server: &Server) -> Self {
        Self {
            address: server.raw_address.clone(),
            blockchain: server.chain_label.clone(),
            height: server.height,
            up: server.reachable,
        }
    }
}
