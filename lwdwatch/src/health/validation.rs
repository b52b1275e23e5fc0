//! 検証ステートマシン
//!
//! プローブ結果と現在のレコード状態から、次の状態とレコードの存続を決める。
//! I/O を持たない純粋関数。
//!
//! | validated | プローブ | 結果 |
//! |---|---|---|
//! | false | 成功 | チェーン名・高さを更新、reachable=true、validated=true |
//! | false | 失敗 | レコード削除（last_checked_at は記録しない） |
//! | true  | 成功 | チェーン名・高さを更新、reachable=true |
//! | true  | 失敗 | reachable=false、チェーン名・高さは前回値のまま |
//!
//! 削除以外のすべての遷移で `last_checked_at` を `now` にする。

use chrono::{DateTime, Utc};

use crate::common::error::ProbeError;
use crate::probe::ChainInfo;
use crate::types::server::Server;

/// 1回のプローブに対する判定結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// 更新後のレコードを永続化する
    Update(Server),
    /// レコードを削除する（未検証のままプローブに失敗）
    Remove,
}

/// プローブ結果をレコードに適用する
pub fn decide(
    server: &Server,
    outcome: &Result<ChainInfo, ProbeError>,
    now: DateTime<Utc>,
) -> Transition {
    match outcome {
        Ok(info) => Transition::Update(Server {
            chain_label: info.chain_label.clone(),
            height: info.height,
            reachable: true,
            validated: true,
            last_checked_at: Some(now),
            ..server.clone()
        }),
        // 未検証のサーバーは1回だけ機会を与える
        Err(_) if !server.validated => Transition::Remove,
        Err(_) => Transition::Update(Server {
            reachable: false,
            last_checked_at: Some(now),
            ..server.clone()
        }),
    }
}
