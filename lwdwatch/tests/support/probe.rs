//! 応答を台本どおりに返すプローブ

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use lwdwatch::common::error::ProbeError;
use lwdwatch::probe::{ChainInfo, Probe};

/// 登録アドレスごとに結果を差し替えられるプローブ
///
/// 台本にないアドレスは接続失敗として扱う。
#[derive(Default)]
pub struct ScriptedProbe {
    results: Mutex<HashMap<String, Result<ChainInfo, ProbeError>>>,
    calls: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl ScriptedProbe {
    /// 次回以降のプローブ結果を設定する
    pub fn set(&self, raw_address: &str, result: Result<ChainInfo, ProbeError>) {
        self.results
            .lock()
            .unwrap()
            .insert(raw_address.to_string(), result);
    }

    /// これまでにプローブされた登録アドレス
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Probe for ScriptedProbe {
    async fn probe(&self, raw_address: &str) -> Result<ChainInfo, ProbeError> {
        self.calls.lock().unwrap().push(raw_address.to_string());
        self.results
            .lock()
            .unwrap()
            .get(raw_address)
            .cloned()
            .unwrap_or_else(|| Err(ProbeError::Connect("connection refused".into())))
    }
}

/// 成功応答
#[allow(dead_code)]
pub fn online(chain: &str, height: u64) -> Result<ChainInfo, ProbeError> {
    Ok(ChainInfo {
        chain_label: chain.to_string(),
        height,
    })
}
