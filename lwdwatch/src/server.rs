//! axumサーバー起動・シャットダウンハンドリング

use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::common::error::DirectoryError;
use crate::shutdown::ShutdownController;
use crate::AppState;

/// axumサーバーを起動し、シャットダウンシグナルを待機する
pub async fn run(state: AppState, bind_addr: &str) -> Result<(), DirectoryError> {
    let listener = TcpListener::bind(bind_addr).await.map_err(|e| {
        DirectoryError::Config(format!("failed to bind to {}: {}", bind_addr, e))
    })?;

    serve(state, listener).await
}

/// バインド済みのリスナーでサーバーを実行する
pub async fn serve(state: AppState, listener: TcpListener) -> Result<(), DirectoryError> {
    let shutdown = state.shutdown.clone();
    let app = crate::api::create_app(state);

    if let Ok(addr) = listener.local_addr() {
        info!("lwdwatch listening on {}", addr);
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await
        .map_err(|e| DirectoryError::Internal(format!("server error: {}", e)))?;

    info!("Server shutdown complete");
    Ok(())
}

/// シャットダウンシグナルを待機
///
/// OSシグナルを受けた場合もコントローラへ伝播し、ヘルスチェッカーを停止させる。
async fn shutdown_signal(shutdown: ShutdownController) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down...");
        }
        _ = terminate => {
            info!("Received SIGTERM, shutting down...");
        }
        _ = shutdown.wait() => {
            info!("Shutdown requested, shutting down...");
        }
    }

    shutdown.request_shutdown();
}
