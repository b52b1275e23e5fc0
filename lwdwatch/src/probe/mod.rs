//! Probe Client
//!
//! 1台のサーバーに対して、期限付きで稼働確認と自己紹介情報の取得を行う。
//! 通信方式は `Probe` traitの背後に隠し、スケジューラからは差し替え可能にする。

use async_trait::async_trait;

use crate::common::error::ProbeError;

/// lightwalletd gRPC プローブ
pub mod lightwalletd;

/// lightwalletd のメッセージ定義
pub mod proto;

pub use lightwalletd::{LightwalletdProbe, DEFAULT_PROBE_TIMEOUT};

/// プローブ成功時にサーバーが報告する情報
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainInfo {
    /// チェーン名（例: `main`, `test`）
    pub chain_label: String,
    /// 現在のブロック高
    pub height: u64,
}

/// 単一サーバーの稼働確認
///
/// 実装はリトライを行わず、1回の試行結果をそのまま返す。
#[async_trait]
pub trait Probe: Send + Sync {
    /// 登録アドレスに対してプローブを1回実行する
    async fn probe(&self, raw_address: &str) -> Result<ChainInfo, ProbeError>;
}
