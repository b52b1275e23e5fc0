//! 型定義

/// サーバーレコードと一覧フィルタ
pub mod server;
