//! check サブコマンド
//!
//! ヘルスチェックを1サイクルだけ実行して終了します。

use std::sync::Arc;
use std::time::Duration;

use clap::Args;

use crate::bootstrap::open_repository;
use crate::config::DirectoryConfig;
use crate::health::{CycleReport, ServerHealthChecker};
use crate::probe::LightwalletdProbe;

/// check サブコマンドの引数
#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    /// Per-server probe timeout in seconds (at least 1)
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: u64,
}

/// Execute the check command
pub async fn execute(args: &CheckArgs, config: &DirectoryConfig) -> anyhow::Result<()> {
    let repo = open_repository(config).await?;
    let probe = LightwalletdProbe::new().with_timeout(Duration::from_secs(args.timeout));
    let checker = ServerHealthChecker::new(repo, Arc::new(probe));

    let report = checker.run_cycle().await?;
    println!("{}", format_report(&report));
    Ok(())
}

fn format_report(report: &CycleReport) -> String {
    format!(
        "checked {} server(s): {} online, {} offline, {} removed, {} skipped, {} error(s)",
        report.candidates,
        report.online,
        report.offline,
        report.removed,
        report.skipped,
        report.errors
    )
}
