//! サーバーアドレスの解析と正規化
//!
//! `scheme "://" host ":" port [trailer]` の文法で登録アドレスを解析し、
//! 重複判定に使う identity（`host:port`）を導出する。
//!
//! ## 受理するアドレス
//!
//! - スキームは `http`（平文）または `https`（TLS）。大文字小文字は区別しない
//! - ホストは IPv4 リテラルまたはドメイン名
//! - ポートは必須（1〜65535）
//! - ポート以降の `/`・`?`・`#` で始まる部分は無視する
//!
//! ドメイン名の判定は実用上のヒューリスティックであり、RFC 1123 / 5890 への
//! 完全準拠ではない。IPv6 リテラル、IDN、単一ラベルのホストは受け付けない。

use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use crate::common::error::AddressError;

/// ホスト名全体の最大長
const MAX_HOST_LEN: usize = 253;

/// ラベルの最大長
const MAX_LABEL_LEN: usize = 63;

/// TLDの長さ（英字のみ）
const TLD_LEN: std::ops::RangeInclusive<usize> = 2..=6;

/// ポート表記の最大桁数
const MAX_PORT_DIGITS: usize = 5;

/// 接続スキーム
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scheme {
    /// 平文（`http://`）
    Plain,
    /// TLS（`https://`）
    Tls,
}

impl Scheme {
    /// URI表記
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Plain => "http",
            Self::Tls => "https",
        }
    }
}

/// ホスト部
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Host {
    /// IPv4リテラル
    Ipv4(Ipv4Addr),
    /// 小文字化済みドメイン名
    Domain(String),
}

impl fmt::Display for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ipv4(addr) => write!(f, "{}", addr),
            Self::Domain(name) => f.write_str(name),
        }
    }
}

/// 解析済みのサーバーアドレス
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServerAddress {
    scheme: Scheme,
    host: Host,
    port: u16,
}

impl ServerAddress {
    /// アドレス文字列を解析する
    pub fn parse(raw: &str) -> Result<Self, AddressError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(AddressError::Empty);
        }

        let (scheme, rest) = trimmed
            .split_once("://")
            .ok_or(AddressError::MissingScheme)?;
        let scheme = parse_scheme(scheme)?;

        // ポート以降（パス・クエリ・フラグメント）は identity に含めない
        let authority_end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
        let authority = &rest[..authority_end];

        if authority.starts_with('[') || authority.contains('@') {
            return Err(AddressError::InvalidHost(authority.to_string()));
        }

        let (host, port) = authority
            .rsplit_once(':')
            .ok_or(AddressError::MissingPort)?;
        let port = parse_port(port)?;
        let host = parse_host(host)?;

        Ok(Self { scheme, host, port })
    }

    /// 重複判定に使う正規化済み identity（`host:port`）
    ///
    /// 同一ホストでもポートが異なれば別サーバーとして扱う（ネットワークごとに
    /// ポートを分けて複数の lightwalletd を動かす構成があるため）。
    pub fn identity(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// プローブの接続先URI（スキームを保持し、末尾の余分な構造は落とす）
    pub fn endpoint_uri(&self) -> String {
        format!("{}://{}:{}", self.scheme.as_str(), self.host, self.port)
    }

    /// TLSで接続すべきか
    pub fn is_tls(&self) -> bool {
        self.scheme == Scheme::Tls
    }

    /// スキーム
    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    /// ホスト
    pub fn host(&self) -> &Host {
        &self.host
    }

    /// ポート
    pub fn port(&self) -> u16 {
        self.port
    }
}

impl FromStr for ServerAddress {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ServerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.endpoint_uri())
    }
}

/// アドレス文字列を identity に正規化する
pub fn normalize(raw: &str) -> Result<String, AddressError> {
    ServerAddress::parse(raw).map(|address| address.identity())
}

fn parse_scheme(scheme: &str) -> Result<Scheme, AddressError> {
    if scheme.is_empty() {
        return Err(AddressError::MissingScheme);
    }
    match scheme.to_ascii_lowercase().as_str() {
        "http" => Ok(Scheme::Plain),
        "https" => Ok(Scheme::Tls),
        _ => Err(AddressError::UnsupportedScheme(scheme.to_string())),
    }
}

fn parse_port(port: &str) -> Result<u16, AddressError> {
    if port.is_empty() {
        return Err(AddressError::MissingPort);
    }
    if port.len() > MAX_PORT_DIGITS || !port.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AddressError::InvalidPort(port.to_string()));
    }
    match port.parse::<u16>() {
        Ok(0) | Err(_) => Err(AddressError::InvalidPort(port.to_string())),
        Ok(value) => Ok(value),
    }
}

fn parse_host(host: &str) -> Result<Host, AddressError> {
    let invalid = || AddressError::InvalidHost(host.to_string());

    if host.is_empty() || host.contains(':') {
        return Err(invalid());
    }

    // 数字とドットのみならIPv4として扱う（ドメインのTLDは英字なので衝突しない）
    if host.bytes().all(|b| b.is_ascii_digit() || b == b'.') {
        // std の解析器は先頭ゼロのオクテットと範囲外の値を拒否する
        return host.parse::<Ipv4Addr>().map(Host::Ipv4).map_err(|_| invalid());
    }

    let domain = host.to_ascii_lowercase();
    if domain.len() > MAX_HOST_LEN {
        return Err(invalid());
    }

    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 || !labels.iter().all(|label| is_valid_label(label)) {
        return Err(invalid());
    }

    let tld = labels[labels.len() - 1];
    if !TLD_LEN.contains(&tld.len()) || !tld.bytes().all(|b| b.is_ascii_alphabetic()) {
        return Err(invalid());
    }

    Ok(Host::Domain(domain))
}

fn is_valid_label(label: &str) -> bool {
    !label.is_empty()
        && label.len() <= MAX_LABEL_LEN
        && !label.starts_with('-')
        && !label.ends_with('-')
        && label.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
}
