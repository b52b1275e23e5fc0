//! `cash.z.wallet.sdk.rpc` パッケージのうち、プローブに必要なメッセージのみを定義
//!
//! フィールド番号は lightwalletd の `service.proto` に一致させること。

/// `GetLightdInfo` のフルメソッドパス
pub const GET_LIGHTD_INFO_PATH: &str = "/cash.z.wallet.sdk.rpc.CompactTxStreamer/GetLightdInfo";

/// 空リクエスト
#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct Empty {}

/// `GetLightdInfo` の応答
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct LightdInfo {
    /// lightwalletd のバージョン
    #[prost(string, tag = "1")]
    pub version: ::prost::alloc::string::String,
    /// ベンダー名
    #[prost(string, tag = "2")]
    pub vendor: ::prost::alloc::string::String,
    /// 透過アドレス対応
    #[prost(bool, tag = "3")]
    pub taddr_support: bool,
    /// チェーン名
    #[prost(string, tag = "4")]
    pub chain_name: ::prost::alloc::string::String,
    /// Sapling 有効化高
    #[prost(uint64, tag = "5")]
    pub sapling_activation_height: u64,
    /// コンセンサスブランチID
    #[prost(string, tag = "6")]
    pub consensus_branch_id: ::prost::alloc::string::String,
    /// 現在のブロック高
    #[prost(uint64, tag = "7")]
    pub block_height: u64,
}
