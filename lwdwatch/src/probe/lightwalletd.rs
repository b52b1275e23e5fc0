//! lightwalletd gRPC プローブ
//!
//! `CompactTxStreamer/GetLightdInfo` を1回呼び出し、チェーン名とブロック高を取得する。
//!
//! - `http://` は平文の HTTP/2 チャネル
//! - `https://` はプラットフォームの信頼ストアによる TLS（クライアント証明書・ピン留めなし）
//! - 接続確立から応答受信までを単一の期限で打ち切る

use std::time::Duration;

use async_trait::async_trait;
use tonic::client::Grpc;
use tonic::codec::ProstCodec;
use tonic::codegen::http::uri::PathAndQuery;
use tonic::transport::{Channel, ClientTlsConfig, Endpoint};
use tonic::{Code, Request, Status};

use super::proto::{Empty, LightdInfo, GET_LIGHTD_INFO_PATH};
use super::{ChainInfo, Probe};
use crate::address::ServerAddress;
use crate::common::error::ProbeError;

/// 1回のプローブ全体の期限
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(30);

/// lightwalletd に対する gRPC プローブ
#[derive(Debug, Clone)]
pub struct LightwalletdProbe {
    timeout: Duration,
}

impl Default for LightwalletdProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl LightwalletdProbe {
    /// 既定の期限（30秒）でプローブを作成
    pub fn new() -> Self {
        Self {
            timeout: DEFAULT_PROBE_TIMEOUT,
        }
    }

    /// 期限を変更する
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// 現在の期限
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn connect(address: &ServerAddress) -> Result<Channel, ProbeError> {
        let mut endpoint = Endpoint::from_shared(address.endpoint_uri())
            .map_err(|e| ProbeError::Connect(error_chain(&e)))?;

        if address.is_tls() {
            endpoint = endpoint
                .tls_config(ClientTlsConfig::new().with_native_roots())
                .map_err(|e| ProbeError::Connect(error_chain(&e)))?;
        }

        endpoint
            .connect()
            .await
            .map_err(|e| ProbeError::Connect(error_chain(&e)))
    }

    async fn get_lightd_info(address: &ServerAddress) -> Result<ChainInfo, ProbeError> {
        let channel = Self::connect(address).await?;
        let mut grpc = Grpc::new(channel);
        grpc.ready()
            .await
            .map_err(|e| ProbeError::Connect(error_chain(&e)))?;

        let response = grpc
            .unary::<Empty, LightdInfo, _>(
                Request::new(Empty {}),
                PathAndQuery::from_static(GET_LIGHTD_INFO_PATH),
                ProstCodec::default(),
            )
            .await
            .map_err(classify_status)?;

        let info = response.into_inner();
        if info.chain_name.is_empty() {
            return Err(ProbeError::Protocol(
                "GetLightdInfo returned an empty chain name".to_string(),
            ));
        }

        Ok(ChainInfo {
            chain_label: info.chain_name,
            height: info.block_height,
        })
    }
}

#[async_trait]
impl Probe for LightwalletdProbe {
    async fn probe(&self, raw_address: &str) -> Result<ChainInfo, ProbeError> {
        let address = ServerAddress::parse(raw_address)
            .map_err(|e| ProbeError::Connect(format!("unusable address: {}", e)))?;

        match tokio::time::timeout(self.timeout, Self::get_lightd_info(&address)).await {
            Ok(result) => result,
            Err(_) => Err(ProbeError::Timeout(format!(
                "no response within {}s",
                self.timeout.as_secs_f64()
            ))),
        }
    }
}

/// gRPC ステータスをプローブ失敗の種別に振り分ける
pub(crate) fn classify_status(status: Status) -> ProbeError {
    match status.code() {
        Code::Unavailable => ProbeError::Connect(status.message().to_string()),
        Code::DeadlineExceeded => ProbeError::Timeout(status.message().to_string()),
        code => ProbeError::Protocol(format!("{}: {}", code, status.message())),
    }
}

/// transport エラーは Display が簡潔すぎるため、原因を連結して返す
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
