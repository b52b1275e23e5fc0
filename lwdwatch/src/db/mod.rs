//! データベースアクセス層
//!
//! SQLiteベースのRegistry Store

use std::str::FromStr;

use sqlx::sqlite::SqliteConnectOptions;
use sqlx::SqlitePool;

use crate::common::error::DirectoryError;

/// サーバーレジストリのCRUD
pub mod servers;

/// Repository traitパターン（テスタビリティ向上）
pub mod traits;

/// データベース接続プールを作成し、マイグレーションを適用する
///
/// ファイルDBの場合は親ディレクトリも作成する。
pub async fn init_db_pool(database_url: &str) -> Result<SqlitePool, DirectoryError> {
    // SQLiteファイルはディレクトリが存在しないと作成できないため、先に作成しておく
    if let Some(path) = database_url.strip_prefix("sqlite:") {
        // `sqlite::memory:` のような特殊指定はスキップ
        if !path.starts_with(':') {
            // `sqlite://` 形式に備えてスラッシュを除去し、クエリ部分を除外
            let normalized = path.trim_start_matches("//");
            let path_without_params = normalized.split('?').next().unwrap_or(normalized);
            let db_path = std::path::Path::new(path_without_params);
            if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).map_err(|err| {
                    DirectoryError::Database(format!(
                        "failed to create database directory {}: {}",
                        parent.display(),
                        err
                    ))
                })?;
            }
        }
    }

    let connect_options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
    let pool = SqlitePool::connect_with(connect_options).await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}
