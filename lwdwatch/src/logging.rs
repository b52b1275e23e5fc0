//! ロギング初期化ユーティリティ
//!
//! `RUST_LOG` が設定されていればそれを優先し、未設定なら
//! verbose フラグに応じて `info` / `debug` を使う。

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// 既定のフィルタ
fn default_filter(debug: bool) -> EnvFilter {
    let level = if debug { "debug" } else { "info" };
    // sqlx / hyper のクエリ単位ログはノイズになるため抑える
    EnvFilter::new(format!("{level},sqlx=warn,hyper=info,h2=info"))
}

/// ロギングを初期化する
pub fn init(debug: bool) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(debug));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {}", e))?;

    Ok(())
}
