//! serve サブコマンド
//!
//! ディレクトリサーバーとヘルスチェッカーを起動します。

use clap::Args;
use tracing::warn;

use crate::config::{check_interval_from_minutes, DirectoryConfig};
use crate::{bootstrap, server};

/// serve サブコマンドの引数
#[derive(Args, Debug, Clone, Default)]
pub struct ServeArgs {
    /// Listen port (overrides LWDWATCH_PORT)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Bind address (overrides LWDWATCH_HOST)
    #[arg(short = 'H', long)]
    pub host: Option<String>,

    /// Poll interval in minutes (overrides LWDWATCH_CHECK_INTERVAL)
    #[arg(long)]
    pub check_interval: Option<u64>,
}

impl ServeArgs {
    /// 引数を設定に反映する
    pub fn apply(&self, config: &mut DirectoryConfig) -> anyhow::Result<()> {
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(host) = &self.host {
            config.host = host.clone();
        }
        if let Some(minutes) = self.check_interval {
            config.check_interval = check_interval_from_minutes(minutes)?;
        }
        Ok(())
    }
}

/// Execute the serve command
pub async fn execute(args: &ServeArgs, mut config: DirectoryConfig) -> anyhow::Result<()> {
    args.apply(&mut config)?;

    let ctx = bootstrap::initialize(&config).await?;
    let shutdown = ctx.state.shutdown.clone();

    let result = server::run(ctx.state, &config.bind_addr()).await;

    // バインド失敗時もヘルスチェッカーを止めてから終了する
    shutdown.request_shutdown();
    if let Err(e) = ctx.checker.await {
        warn!("Health checker task ended abnormally: {}", e);
    }

    Ok(result?)
}
