//! エラー型定義
//!
//! 統一エラー型（thiserror使用）
//!
//! `DirectoryError`は`external_message()`・`error_code()`・`status_code()`を提供し、
//! 内部詳細を含まないAPIエラーレスポンスを生成できます。

use axum::http::StatusCode;
use thiserror::Error;

/// アドレス解析エラー
///
/// 登録時に拒否される不正なアドレス。レジストリには決して入らない。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    /// 空文字列（空白のみを含む）
    #[error("address is empty")]
    Empty,

    /// `scheme://` が存在しない
    #[error("missing scheme, expected http:// or https://")]
    MissingScheme,

    /// http / https 以外のスキーム
    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),

    /// ポート指定が存在しない
    #[error("missing port")]
    MissingPort,

    /// ポートが数値でない、または 1..=65535 の範囲外
    #[error("invalid port: {0}")]
    InvalidPort(String),

    /// ホスト部がIPv4リテラルにもドメイン名にも該当しない
    #[error("invalid host: {0}")]
    InvalidHost(String),
}

/// プローブ失敗の種別
///
/// Validation Engineはすべて同一の「プローブ失敗」として扱う。
/// 種別は診断ログのためだけに保持する。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeError {
    /// 接続確立に失敗
    #[error("connect error: {0}")]
    Connect(String),

    /// 期限内に応答が得られなかった
    #[error("timeout: {0}")]
    Timeout(String),

    /// 応答はあったが期待した形式ではない
    #[error("protocol error: {0}")]
    Protocol(String),
}

impl ProbeError {
    /// ログ出力用の種別名
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Connect(_) => "connect",
            Self::Timeout(_) => "timeout",
            Self::Protocol(_) => "protocol",
        }
    }
}

/// ディレクトリサービスのエラー型
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// 空のアドレスが送信された
    #[error("Empty address")]
    EmptyAddress,

    /// アドレスの構文が不正
    #[error("Invalid address: {0}")]
    InvalidAddress(AddressError),

    /// 正規化後のidentityが既存レコードと衝突
    #[error("Server already known: {0}")]
    DuplicateIdentity(String),

    /// 指定したサーバーが存在しない
    #[error("Server not found: {0}")]
    ServerNotFound(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DirectoryError {
    /// Returns a safe error message for external clients.
    ///
    /// Submission rejections keep the wording users already know from the
    /// directory front end. Database and internal details are only logged.
    pub fn external_message(&self) -> &'static str {
        match self {
            Self::EmptyAddress => "The address must not be empty.",
            Self::InvalidAddress(_) => "Invalid address.",
            Self::DuplicateIdentity(_) => "Server already known.",
            Self::ServerNotFound(_) => "Server not found.",
            Self::Database(_) => "Database error",
            Self::Config(_) => "Configuration error",
            Self::Internal(_) => "Internal server error",
        }
    }

    /// APIレスポンスに含める機械可読なエラーコード
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyAddress => "EMPTY_ADDRESS",
            Self::InvalidAddress(_) => "INVALID_ADDRESS",
            Self::DuplicateIdentity(_) => "DUPLICATE_SERVER",
            Self::ServerNotFound(_) => "NOT_FOUND",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::EmptyAddress | Self::InvalidAddress(_) => StatusCode::BAD_REQUEST,
            Self::DuplicateIdentity(_) => StatusCode::CONFLICT,
            Self::ServerNotFound(_) => StatusCode::NOT_FOUND,
            Self::Database(_) | Self::Config(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<AddressError> for DirectoryError {
    fn from(err: AddressError) -> Self {
        match err {
            AddressError::Empty => Self::EmptyAddress,
            other => Self::InvalidAddress(other),
        }
    }
}

impl From<sqlx::Error> for DirectoryError {
    fn from(err: sqlx::Error) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<sqlx::migrate::MigrateError> for DirectoryError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        Self::Database(format!("migration failed: {}", err))
    }
}
