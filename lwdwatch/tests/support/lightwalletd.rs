//! 疑似 lightwalletd
//!
//! `GetLightdInfo` だけを h2c で応答する。成功時は長さ接頭辞付きメッセージと
//! `grpc-status: 0` トレーラー、失敗時は trailers-only 応答を返す。

use std::convert::Infallible;

use axum::body::{Body, Bytes};
use axum::http::{header, HeaderMap, HeaderValue, Response, StatusCode};
use axum::routing::post;
use axum::Router;
use futures::stream;
use http_body::Frame;
use http_body_util::StreamBody;
use lwdwatch::probe::proto::{LightdInfo, GET_LIGHTD_INFO_PATH};
use prost::Message;

use super::{spawn_router, TestServer};

/// 疑似サーバーの応答内容
#[derive(Debug, Clone)]
pub enum LightdReply {
    /// 正常応答
    Info { chain: String, height: u64 },
    /// 指定した gRPC ステータスコードで失敗
    Status(i32),
}

#[allow(dead_code)]
impl LightdReply {
    pub fn info(chain: &str, height: u64) -> Self {
        Self::Info {
            chain: chain.to_string(),
            height,
        }
    }
}

/// 疑似 lightwalletd を起動する
pub async fn spawn_lightwalletd(reply: LightdReply) -> TestServer {
    let router = Router::new().route(
        GET_LIGHTD_INFO_PATH,
        post(move || {
            let reply = reply.clone();
            async move { grpc_response(&reply) }
        }),
    );
    spawn_router(router).await
}

fn grpc_response(reply: &LightdReply) -> Response<Body> {
    match reply {
        LightdReply::Info { chain, height } => {
            let info = LightdInfo {
                version: "v0.4.17".to_string(),
                vendor: "ECC LightWalletD".to_string(),
                taddr_support: true,
                chain_name: chain.clone(),
                sapling_activation_height: 419_200,
                consensus_branch_id: "c2d6d0b4".to_string(),
                block_height: *height,
            };
            let payload = info.encode_to_vec();

            let mut framed = Vec::with_capacity(payload.len() + 5);
            framed.push(0);
            framed.extend_from_slice(&(payload.len() as u32).to_be_bytes());
            framed.extend_from_slice(&payload);

            let mut trailers = HeaderMap::new();
            trailers.insert("grpc-status", HeaderValue::from_static("0"));

            let frames = stream::iter(vec![
                Ok::<_, Infallible>(Frame::data(Bytes::from(framed))),
                Ok(Frame::trailers(trailers)),
            ]);

            Response::builder()
                .status(StatusCode::OK)
                .header(header::CONTENT_TYPE, "application/grpc")
                .body(Body::new(StreamBody::new(frames)))
                .unwrap()
        }
        LightdReply::Status(code) => Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, "application/grpc")
            .header("grpc-status", code.to_string())
            .header("grpc-message", "fake lightwalletd refused the call")
            .body(Body::empty())
            .unwrap(),
    }
}
