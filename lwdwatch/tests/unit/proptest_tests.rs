//! Property-based tests using proptest

use chrono::Utc;
use proptest::prelude::*;

use lwdwatch::address::{normalize, ServerAddress};
use lwdwatch::common::error::ProbeError;
use lwdwatch::health::{decide, Transition};
use lwdwatch::probe::ChainInfo;
use lwdwatch::types::server::{ListFilter, Server};

fn host_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        (
            prop::collection::vec("[a-z][a-z0-9]{0,8}", 1..3),
            "[a-z]{2,6}"
        )
            .prop_map(|(labels, tld)| format!("{}.{}", labels.join("."), tld)),
        any::<[u8; 4]>().prop_map(|o| format!("{}.{}.{}.{}", o[0], o[1], o[2], o[3])),
    ]
}

fn address_strategy() -> impl Strategy<Value = (String, String, u16)> {
    (
        prop_oneof![Just("http"), Just("https"), Just("HTTPS"), Just("Http")],
        host_strategy(),
        1u16..=65535,
    )
        .prop_map(|(scheme, host, port)| (scheme.to_string(), host, port))
}

fn outcome_strategy() -> impl Strategy<Value = Result<ChainInfo, ProbeError>> {
    prop_oneof![
        ("[a-z]{1,8}", any::<u64>()).prop_map(|(chain_label, height)| {
            Ok::<_, ProbeError>(ChainInfo {
                chain_label,
                height,
            })
        }),
        Just(Err(ProbeError::Connect("refused".into()))),
        Just(Err(ProbeError::Timeout("elapsed".into()))),
        Just(Err(ProbeError::Protocol("bad frame".into()))),
    ]
}

fn fresh_server() -> Server {
    let raw = "http://lwd.example.com:9067";
    Server::new(&ServerAddress::parse(raw).unwrap(), raw)
}

// ---------------------------------------------------------------------------
// Address normalization
// ---------------------------------------------------------------------------

proptest! {
    /// identity は host:port で、スキーム・大文字小文字・末尾の装飾に依存しない
    #[test]
    fn identity_ignores_scheme_case_and_trailer(
        (scheme, host, port) in address_strategy(),
        trailer in prop_oneof![Just(""), Just("/"), Just("/path?q=1"), Just("#frag")],
        padding in prop_oneof![Just(""), Just("  "), Just("\t")],
    ) {
        let raw = format!("{pad}{}://{}:{}{}{pad}", scheme, host.to_uppercase(), port, trailer, pad = padding);
        let identity = normalize(&raw).unwrap();
        prop_assert_eq!(identity, format!("{}:{}", host, port));
    }

    /// 正規化済みエンドポイントを再度解析しても identity は変わらない
    #[test]
    fn normalization_is_idempotent((scheme, host, port) in address_strategy()) {
        let raw = format!("{}://{}:{}", scheme, host, port);
        let address = ServerAddress::parse(&raw).unwrap();
        let reparsed = ServerAddress::parse(&address.endpoint_uri()).unwrap();
        prop_assert_eq!(reparsed.identity(), address.identity());
        prop_assert_eq!(reparsed.endpoint_uri(), address.endpoint_uri());
    }

    /// ポートを欠いたアドレスは常に拒否される
    #[test]
    fn missing_port_is_rejected((scheme, host, _port) in address_strategy()) {
        let raw = format!("{}://{}", scheme, host);
        prop_assert!(normalize(&raw).is_err());
    }
}

// ---------------------------------------------------------------------------
// Validation state machine
// ---------------------------------------------------------------------------

proptest! {
    /// 一度検証済みになったレコードは、以降どの結果列でも削除・未検証化されない
    #[test]
    fn validated_flag_is_monotonic(
        outcomes in prop::collection::vec(outcome_strategy(), 1..20),
    ) {
        let mut server = fresh_server();
        for outcome in &outcomes {
            let was_validated = server.validated;
            match decide(&server, outcome, Utc::now()) {
                Transition::Update(next) => {
                    prop_assert!(next.validated || !was_validated);
                    prop_assert_eq!(next.reachable, outcome.is_ok());
                    prop_assert!(next.last_checked_at.is_some());
                    server = next;
                }
                Transition::Remove => {
                    prop_assert!(!was_validated, "validated record was removed");
                    prop_assert!(outcome.is_err());
                    return Ok(());
                }
            }
        }
    }

    /// 失敗時はチェーン名と高さを直前の値のまま保持する
    #[test]
    fn failure_keeps_stale_chain_and_height(
        chain in "[a-z]{1,8}",
        height in any::<u64>(),
        failure in outcome_strategy().prop_filter("failure only", |o| o.is_err()),
    ) {
        let server = Server {
            chain_label: chain.clone(),
            height,
            reachable: true,
            validated: true,
            ..fresh_server()
        };
        let Transition::Update(next) = decide(&server, &failure, Utc::now()) else {
            panic!("validated record must not be removed");
        };
        prop_assert_eq!(next.chain_label, chain);
        prop_assert_eq!(next.height, height);
        prop_assert!(!next.reachable);
    }

    /// 表示フィルタは未検証レコードを既定で隠す
    #[test]
    fn default_filters_hide_unvalidated(reachable in any::<bool>()) {
        let server = Server { reachable, ..fresh_server() };
        prop_assert!(!ListFilter::REACHABLE.matches(&server));
        prop_assert!(!ListFilter::VALIDATED.matches(&server));
        prop_assert!(ListFilter::ALL.matches(&server));
    }
}
