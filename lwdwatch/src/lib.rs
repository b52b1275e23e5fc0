//! lightwalletd server directory
//!
//! 登録されたlightwalletdサーバーを定期的にプローブし、
//! 稼働中のサーバー一覧を提供する。

#![warn(missing_docs)]

/// 共通型定義（エラー型）
pub mod common;

/// アドレス解析と identity の正規化
pub mod address;

/// 型定義
pub mod types;

/// データベースアクセス（Registry Store）
pub mod db;

/// サーバー登録管理
pub mod registry;

/// サーバープローブ（lightwalletd gRPC）
pub mod probe;

/// ヘルスチェック監視（検証ステートマシンと定期ポーリング）
pub mod health;

/// REST APIハンドラー
pub mod api;

/// サーバー初期化
pub mod bootstrap;

/// axumサーバー起動
pub mod server;

/// Shutdown controller
pub mod shutdown;

/// 設定管理（環境変数ヘルパー）
pub mod config;

/// ロギング初期化ユーティリティ
pub mod logging;

/// CLIインターフェース
pub mod cli;

/// アプリケーション状態
#[derive(Clone)]
pub struct AppState {
    /// サーバーレジストリ
    pub registry: registry::ServerRegistry,
    /// Cooperative shutdown controller
    pub shutdown: shutdown::ShutdownController,
}
