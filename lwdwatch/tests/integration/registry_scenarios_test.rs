//! Integration Test: 登録からポーリングまでの遷移
//!
//! 登録 → 初回プローブ → 以降のサイクルでの到達可否の変化を、
//! インメモリストアと台本プローブで確認する。

use std::sync::Arc;

use lwdwatch::common::error::{DirectoryError, ProbeError};
use lwdwatch::types::server::{FeedEntry, ListFilter};

use crate::support::directory::directory_with;
use crate::support::probe::{online, ScriptedProbe};

/// 初回プローブに失敗した未検証サーバーは痕跡を残さず消える
#[tokio::test]
async fn test_unvalidated_server_failing_first_probe_is_removed() {
    let probe = Arc::new(ScriptedProbe::default());
    let dir = directory_with(probe.clone()).await;

    let raw = "https://bad.example.com:9067";
    dir.registry.submit(raw).await.unwrap();
    probe.set(raw, Err(ProbeError::Timeout("no response".into())));

    let report = dir.checker.run_cycle().await.unwrap();

    assert_eq!(report.candidates, 1);
    assert_eq!(report.removed, 1);
    assert!(dir.registry.list(ListFilter::ALL).await.unwrap().is_empty());
    assert!(dir.registry.list_validated().await.unwrap().is_empty());
}

/// 成功で検証済みになり、その後の失敗では値を保持したまま到達不能になる
#[tokio::test]
async fn test_validated_server_goes_down_with_stale_values() {
    let probe = Arc::new(ScriptedProbe::default());
    let dir = directory_with(probe.clone()).await;

    let raw = "http://lwd.example.com:9067";
    dir.registry.submit(raw).await.unwrap();
    assert!(dir.registry.list_reachable().await.unwrap().is_empty());

    probe.set(raw, online("main", 2_345_000));
    dir.checker.run_cycle().await.unwrap();

    let reachable = dir.registry.list_reachable().await.unwrap();
    assert_eq!(reachable.len(), 1);
    let first = reachable[0].clone();
    assert!(first.validated && first.reachable);
    assert_eq!(first.chain_label, "main");
    assert_eq!(first.height, 2_345_000);
    let first_checked = first.last_checked_at.expect("probe time recorded");

    probe.set(raw, Err(ProbeError::Connect("connection refused".into())));
    let report = dir.checker.run_cycle().await.unwrap();
    assert_eq!(report.offline, 1);

    assert!(dir.registry.list_reachable().await.unwrap().is_empty());
    let validated = dir.registry.list_validated().await.unwrap();
    assert_eq!(validated.len(), 1);
    let down = &validated[0];
    assert!(down.validated);
    assert!(!down.reachable);
    assert_eq!(down.chain_label, "main");
    assert_eq!(down.height, 2_345_000);
    assert!(down.last_checked_at.unwrap() >= first_checked);

    assert_eq!(
        FeedEntry::from(down),
        FeedEntry {
            address: raw.to_string(),
            blockchain: "main".to_string(),
            height: 2_345_000,
            up: false,
        }
    );
}

/// 検証済みサーバーは何度失敗しても削除されず、成功すれば復帰する
#[tokio::test]
async fn test_validated_server_survives_repeated_failures_and_recovers() {
    let probe = Arc::new(ScriptedProbe::default());
    let dir = directory_with(probe.clone()).await;

    let raw = "https://zec.example.org:443";
    dir.registry.submit(raw).await.unwrap();
    probe.set(raw, online("main", 100));
    dir.checker.run_cycle().await.unwrap();

    probe.set(raw, Err(ProbeError::Protocol("unexpected response".into())));
    for _ in 0..3 {
        let report = dir.checker.run_cycle().await.unwrap();
        assert_eq!(report.removed, 0);
    }
    assert_eq!(dir.registry.list_validated().await.unwrap().len(), 1);

    probe.set(raw, online("main", 160));
    dir.checker.run_cycle().await.unwrap();

    let reachable = dir.registry.list_reachable().await.unwrap();
    assert_eq!(reachable.len(), 1);
    assert_eq!(reachable[0].height, 160);
}

/// 同じ identity に正規化されるアドレスは重複として拒否され、ストアは変わらない
#[tokio::test]
async fn test_duplicate_submission_leaves_store_unchanged() {
    let probe = Arc::new(ScriptedProbe::default());
    let dir = directory_with(probe).await;

    dir.registry
        .submit("https://node.example.com:9067")
        .await
        .unwrap();

    for variant in [
        "https://node.example.com:9067/",
        "http://NODE.example.com:9067",
        "  https://node.example.com:09067  ",
    ] {
        let err = dir.registry.submit(variant).await.unwrap_err();
        assert!(
            matches!(err, DirectoryError::DuplicateIdentity(ref id) if id == "node.example.com:9067"),
            "{} should be a duplicate, got {:?}",
            variant,
            err
        );
    }

    let all = dir.registry.list(ListFilter::ALL).await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].raw_address, "https://node.example.com:9067");
}

/// 1サイクルで全候補が1回ずつプローブされ、結果が独立に反映される
#[tokio::test]
async fn test_cycle_probes_every_candidate_once() {
    let probe = Arc::new(ScriptedProbe::default());
    let dir = directory_with(probe.clone()).await;

    let up = "http://up.example.com:9067";
    let gone = "http://gone.example.com:9067";
    dir.registry.submit(up).await.unwrap();
    dir.registry.submit(gone).await.unwrap();
    probe.set(up, online("test", 7));

    let report = dir.checker.run_cycle().await.unwrap();

    assert_eq!(report.candidates, 2);
    assert_eq!(report.online, 1);
    assert_eq!(report.removed, 1);

    let mut calls = probe.calls();
    calls.sort();
    assert_eq!(calls, vec![gone.to_string(), up.to_string()]);

    let all = dir.registry.list(ListFilter::ALL).await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].identity, "up.example.com:9067");
}
