//! ヘルスチェック監視
//!
//! 登録サーバーを定期的にプローブし、検証ステートマシンに従って
//! レコードを更新・削除する。

/// 検証ステートマシン（純粋関数）
pub mod validation;

/// 定期ポーリング
pub mod checker;

pub use checker::{CycleReport, ServerHealthChecker, DEFAULT_CHECK_INTERVAL};
pub use validation::{decide, Transition};
