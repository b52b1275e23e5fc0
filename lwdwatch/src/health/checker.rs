//! サーバーヘルスチェッカー（Poll Scheduler）
//!
//! 一定間隔のタイマーでサイクルを起動し、各サイクルでストア上の全レコードを
//! 並列にプローブする。プローブ結果は検証ステートマシンで判定し、
//! レコードごとに完了した時点で即座にストアへ反映する。
//!
//! タイマーは前回サイクルの完了を待たずに刻むため、サイクル同士は時間的に
//! 重なりうる。1サイクル内では各レコードを1回だけプローブする。

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use super::validation::{decide, Transition};
use crate::common::error::DirectoryError;
use crate::db::traits::ServerRepository;
use crate::probe::Probe;
use crate::shutdown::ShutdownController;
use crate::types::server::{ListFilter, Server};

/// デフォルトのチェック間隔（30分）
pub const DEFAULT_CHECK_INTERVAL: Duration = Duration::from_secs(30 * 60);

/// 1サイクルの集計
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// サイクル開始時点の候補数
    pub candidates: usize,
    /// プローブ成功（到達可能）
    pub online: usize,
    /// 検証済みでプローブ失敗（到達不能として保持）
    pub offline: usize,
    /// 未検証でプローブ失敗（削除）
    pub removed: usize,
    /// 削除対象だったが、並行するサイクルで検証済みになっていたため残した
    pub skipped: usize,
    /// ストアへの反映に失敗、またはタスクが異常終了
    pub errors: usize,
}

/// 1レコード分の処理結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CheckOutcome {
    Online,
    Offline,
    Removed,
    Skipped,
    StoreError,
}

impl CycleReport {
    fn record(&mut self, outcome: CheckOutcome) {
        match outcome {
            CheckOutcome::Online => self.online += 1,
            CheckOutcome::Offline => self.offline += 1,
            CheckOutcome::Removed => self.removed += 1,
            CheckOutcome::Skipped => self.skipped += 1,
            CheckOutcome::StoreError => self.errors += 1,
        }
    }
}

/// サーバーヘルスチェッカー
#[derive(Clone)]
pub struct ServerHealthChecker {
    /// Registry Store
    repo: Arc<dyn ServerRepository>,
    /// プローブ実装
    probe: Arc<dyn Probe>,
    /// チェック間隔
    check_interval: Duration,
}

impl ServerHealthChecker {
    /// 新しいヘルスチェッカーを作成
    pub fn new(repo: Arc<dyn ServerRepository>, probe: Arc<dyn Probe>) -> Self {
        Self {
            repo,
            probe,
            check_interval: DEFAULT_CHECK_INTERVAL,
        }
    }

    /// チェック間隔を設定
    pub fn with_interval(mut self, check_interval: Duration) -> Self {
        self.check_interval = check_interval;
        self
    }

    /// チェック間隔
    pub fn interval(&self) -> Duration {
        self.check_interval
    }

    /// バックグラウンドで監視を開始
    ///
    /// 最初のサイクルは起動直後に実行する（1間隔待ってから初回を実行する旧来の動作とは異なる）。
    /// `shutdown` が要求されるとタイマーを停止する。
    pub fn start(self, shutdown: ShutdownController) -> JoinHandle<()> {
        tokio::spawn(async move { self.monitor_loop(shutdown).await })
    }

    /// 監視ループ
    async fn monitor_loop(&self, shutdown: ShutdownController) {
        let mut timer = interval(self.check_interval);
        timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!(
            interval_secs = self.check_interval.as_secs(),
            "Server health checker started"
        );

        loop {
            tokio::select! {
                _ = timer.tick() => {
                    // サイクルの完了は待たない（次のtickは独立に刻む）
                    let checker = self.clone();
                    tokio::spawn(async move {
                        if let Err(e) = checker.run_cycle().await {
                            error!(error = %e, "Health check cycle failed");
                        }
                    });
                }
                _ = shutdown.wait() => {
                    info!("Server health checker stopped");
                    break;
                }
            }
        }
    }

    /// 1サイクルを実行する
    ///
    /// 開始時点でストアにある全レコード（未検証を含む）が候補。
    /// 候補一覧の取得に失敗した場合のみエラーを返す。
    pub async fn run_cycle(&self) -> Result<CycleReport, DirectoryError> {
        let candidates = self.repo.list(ListFilter::ALL).await?;

        let mut report = CycleReport {
            candidates: candidates.len(),
            ..Default::default()
        };

        if candidates.is_empty() {
            debug!("No servers to check");
            return Ok(report);
        }

        let mut tasks = JoinSet::new();
        for server in candidates {
            let checker = self.clone();
            tasks.spawn(async move { checker.check_server(server).await });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(outcome) => report.record(outcome),
                Err(e) => {
                    error!(error = %e, "Server check task failed");
                    report.errors += 1;
                }
            }
        }

        info!(
            candidates = report.candidates,
            online = report.online,
            offline = report.offline,
            removed = report.removed,
            skipped = report.skipped,
            errors = report.errors,
            "Health check cycle completed"
        );

        Ok(report)
    }

    /// 単一サーバーをプローブし、判定結果をストアへ反映する
    async fn check_server(&self, server: Server) -> CheckOutcome {
        debug!(server = %server.raw_address, "checking server");

        let outcome = self.probe.probe(&server.raw_address).await;
        let reason = outcome.as_ref().err();

        match decide(&server, &outcome, Utc::now()) {
            Transition::Remove => {
                debug!(
                    server = %server.raw_address,
                    reason = ?reason,
                    "removing server"
                );
                // 候補一覧はサイクル開始時点のもの。削除は未検証のままの場合に限る
                match self.repo.delete_unvalidated(&server.identity).await {
                    Ok(true) => CheckOutcome::Removed,
                    Ok(false) => {
                        debug!(
                            identity = %server.identity,
                            "server was validated or removed meanwhile; keeping store as is"
                        );
                        CheckOutcome::Skipped
                    }
                    Err(e) => {
                        warn!(identity = %server.identity, error = %e, "Failed to remove server");
                        CheckOutcome::StoreError
                    }
                }
            }
            Transition::Update(next) => {
                if let Some(err) = reason {
                    debug!(
                        server = %server.raw_address,
                        kind = err.kind(),
                        reason = %err,
                        "marking server as offline"
                    );
                } else {
                    debug!(
                        server = %server.raw_address,
                        chain = %next.chain_label,
                        height = next.height,
                        "server is online"
                    );
                }
                match self.repo.update(&next).await {
                    Ok(()) if next.reachable => CheckOutcome::Online,
                    Ok(()) => CheckOutcome::Offline,
                    Err(e) => {
                        warn!(identity = %next.identity, error = %e, "Failed to update server");
                        CheckOutcome::StoreError
                    }
                }
            }
        }
    }
}
