//! サーバー初期化ロジック
//!
//! データベース接続、レジストリ初期化、ヘルスチェッカー起動など
//! サーバー起動に必要なコンポーネントの初期化を担当する。

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::info;

use crate::common::error::DirectoryError;
use crate::config::DirectoryConfig;
use crate::db::{self, traits::ServerRepository};
use crate::health::ServerHealthChecker;
use crate::probe::{LightwalletdProbe, Probe};
use crate::registry::ServerRegistry;
use crate::shutdown::ShutdownController;
use crate::AppState;

/// サーバー初期化結果
pub struct InitContext {
    /// アプリケーション状態
    pub state: AppState,
    /// ヘルスチェッカーのタスク（シャットダウン要求で終了する）
    pub checker: JoinHandle<()>,
}

/// Registry Storeを開く
///
/// DB接続・マイグレーションの失敗はプロセス起動を中止させる致命的エラー。
pub async fn open_repository(
    config: &DirectoryConfig,
) -> Result<Arc<dyn ServerRepository>, DirectoryError> {
    let pool = db::init_db_pool(&config.database_url).await?;
    info!(database_url = %config.database_url, "Database initialized");
    Ok(Arc::new(pool))
}

/// サーバー初期化を実行する
///
/// ストアを開いた後にヘルスチェッカーを起動する。
pub async fn initialize(config: &DirectoryConfig) -> Result<InitContext, DirectoryError> {
    info!("lwdwatch v{}", env!("CARGO_PKG_VERSION"));

    let repo = open_repository(config).await?;
    let probe: Arc<dyn Probe> = Arc::new(LightwalletdProbe::new());
    Ok(initialize_with(repo, probe, config))
}

/// 依存を注入して初期化する
pub fn initialize_with(
    repo: Arc<dyn ServerRepository>,
    probe: Arc<dyn Probe>,
    config: &DirectoryConfig,
) -> InitContext {
    let shutdown = ShutdownController::default();
    let registry = ServerRegistry::new(Arc::clone(&repo));

    let checker = ServerHealthChecker::new(repo, probe)
        .with_interval(config.check_interval)
        .start(shutdown.clone());

    InitContext {
        state: AppState { registry, shutdown },
        checker,
    }
}
