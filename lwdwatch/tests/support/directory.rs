//! ディレクトリサービスのテスト起動

use std::sync::Arc;

use lwdwatch::api::create_app;
use lwdwatch::db::{init_db_pool, traits::ServerRepository};
use lwdwatch::health::ServerHealthChecker;
use lwdwatch::probe::Probe;
use lwdwatch::registry::ServerRegistry;
use lwdwatch::shutdown::ShutdownController;
use lwdwatch::AppState;

use super::{spawn_router, TestServer};

/// インメモリストアを共有するレジストリとチェッカーの組
pub struct TestDirectory {
    pub registry: ServerRegistry,
    pub checker: ServerHealthChecker,
}

/// インメモリのRegistry Storeを開く
pub async fn memory_repository() -> Arc<dyn ServerRepository> {
    let pool = init_db_pool("sqlite::memory:")
        .await
        .expect("in-memory store should open");
    Arc::new(pool)
}

/// 与えたプローブでポーリングするディレクトリを組み立てる（ループは起動しない）
pub async fn directory_with(probe: Arc<dyn Probe>) -> TestDirectory {
    let repo = memory_repository().await;
    TestDirectory {
        registry: ServerRegistry::new(Arc::clone(&repo)),
        checker: ServerHealthChecker::new(repo, probe),
    }
}

/// HTTP API を実ポートで起動する
#[allow(dead_code)]
pub async fn spawn_directory_api(registry: ServerRegistry) -> TestServer {
    let state = AppState {
        registry,
        shutdown: ShutdownController::default(),
    };
    spawn_router(create_app(state)).await
}
