//! サーバーレジストリのCRUD操作
//!
//! identity を主キーとする `servers` テーブルへのアクセス。
//! 各操作は単一のSQL文で完結し、行単位で原子的に反映される。

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::types::server::{ListFilter, Server};

/// サーバーを登録する
///
/// 同じ identity が既に存在する場合は主キー制約違反の `sqlx::Error` を返す。
pub async fn create_server(pool: &SqlitePool, server: &Server) -> Result<(), sqlx::Error> {
    let last_checked_at = server.last_checked_at.map(|dt| dt.to_rfc3339());
    let registered_at = server.registered_at.to_rfc3339();

    sqlx::query(
        r#"
        INSERT INTO servers (
            identity, raw_address, chain_label, height,
            last_checked_at, reachable, validated, registered_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&server.identity)
    .bind(&server.raw_address)
    .bind(&server.chain_label)
    .bind(server.height as i64)
    .bind(&last_checked_at)
    .bind(server.reachable)
    .bind(server.validated)
    .bind(&registered_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// サーバーを更新する（identity をキーにした全項目の upsert）
pub async fn update_server(pool: &SqlitePool, server: &Server) -> Result<(), sqlx::Error> {
    let last_checked_at = server.last_checked_at.map(|dt| dt.to_rfc3339());
    let registered_at = server.registered_at.to_rfc3339();

    sqlx::query(
        r#"
        INSERT INTO servers (
            identity, raw_address, chain_label, height,
            last_checked_at, reachable, validated, registered_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(identity) DO UPDATE SET
            raw_address = excluded.raw_address,
            chain_label = excluded.chain_label,
            height = excluded.height,
            last_checked_at = excluded.last_checked_at,
            reachable = excluded.reachable,
            validated = excluded.validated
        "#,
    )
    .bind(&server.identity)
    .bind(&server.raw_address)
    .bind(&server.chain_label)
    .bind(server.height as i64)
    .bind(&last_checked_at)
    .bind(server.reachable)
    .bind(server.validated)
    .bind(&registered_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// サーバーを削除する
///
/// 削除した行があれば true。存在しない場合は何もせず false を返す。
pub async fn delete_server(pool: &SqlitePool, identity: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM servers WHERE identity = ?")
        .bind(identity)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// 未検証のサーバーだけを削除する
///
/// 別のサイクルが先に検証済みへ更新していた場合は削除せず false を返す。
pub async fn delete_unvalidated_server(
    pool: &SqlitePool,
    identity: &str,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM servers WHERE identity = ? AND validated = 0")
        .bind(identity)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// identity でサーバーを取得
pub async fn get_server(pool: &SqlitePool, identity: &str) -> Result<Option<Server>, sqlx::Error> {
    let row = sqlx::query_as::<_, ServerRow>(
        r#"
        SELECT identity, raw_address, chain_label, height,
               last_checked_at, reachable, validated, registered_at
        FROM servers WHERE identity = ?
        "#,
    )
    .bind(identity)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(Server::from))
}

/// フィルタ条件に一致するサーバー一覧を登録順に取得
pub async fn list_servers(pool: &SqlitePool, filter: ListFilter) -> Result<Vec<Server>, sqlx::Error> {
    let rows = sqlx::query_as::<_, ServerRow>(
        r#"
        SELECT identity, raw_address, chain_label, height,
               last_checked_at, reachable, validated, registered_at
        FROM servers
        WHERE (?1 OR validated = 1) AND (?2 OR reachable = 1)
        ORDER BY registered_at ASC, identity ASC
        "#,
    )
    .bind(filter.include_unvalidated)
    .bind(filter.include_down)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(Server::from).collect())
}

#[derive(sqlx::FromRow)]
struct ServerRow {
    identity: String,
    raw_address: String,
    chain_label: String,
    height: i64,
    last_checked_at: Option<String>,
    reachable: bool,
    validated: bool,
    registered_at: String,
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

impl From<ServerRow> for Server {
    fn from(row: ServerRow) -> Self {
        Server {
            identity: row.identity,
            raw_address: row.raw_address,
            chain_label: row.chain_label,
            height: row.height as u64,
            last_checked_at: row.last_checked_at.as_deref().and_then(parse_timestamp),
            reachable: row.reachable,
            validated: row.validated,
            registered_at: parse_timestamp(&row.registered_at).unwrap_or_else(Utc::now),
        }
    }
}
