//! End-to-end scan scenarios driven entirely by [`StubProbe`] fixtures, so
//! they run deterministically without any real network access.

use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use osint_model::{Finding, FindingType, ScanEvent, Severity};
use osint_orchestrator::{Orchestrator, ScanConfig};
use osint_probe::HopRegistry;
use osint_test_support::StubProbe;

fn account_finding(platform: &str, username: &str) -> Finding {
    Finding::builder(FindingType::Account, Severity::Medium)
        .title(format!("Account found on {platform}"))
        .source("stub")
        .data_field("platform", platform)
        .data_field("username", username)
        .build()
}

fn breach_finding() -> Finding {
    Finding::builder(FindingType::Breach, Severity::Critical)
        .title("Credential exposure found")
        .description("password leaked in a prior breach")
        .source("stub")
        .build()
}

fn fast_config() -> ScanConfig {
    ScanConfig {
        scan_deadline: Duration::from_secs(5),
        probe_deadline: Duration::from_secs(2),
        drain_grace_period: Duration::from_millis(200),
        inter_probe_pause: Duration::from_millis(1),
        ..ScanConfig::default()
    }
}

#[tokio::test]
async fn clean_email_at_depth_one_completes_with_only_hop_one_findings() {
    let registry = HopRegistry::new()
        .register_hop_1(Arc::new(StubProbe::new("clean_probe", vec![])))
        .register_hop_2(Arc::new(StubProbe::new("hop2_probe", vec![account_finding("GitHub", "someone")])));

    let orchestrator = Orchestrator::new(fast_config(), registry);
    let events: Vec<_> = orchestrator.scan("clean@example.com".to_string(), 1).collect().await;

    assert!(matches!(events.first(), Some(ScanEvent::Start { depth: 1, .. })));
    let terminal = events.iter().find(|e| e.is_terminal()).expect("one terminal event");
    match terminal {
        ScanEvent::Complete { findings, risk_level, .. } => {
            // Only the root seed finding: hop 2 never ran at depth 1.
            assert_eq!(findings.len(), 1);
            assert_eq!(*risk_level, osint_model::RiskLevel::Low);
        }
        other => panic!("expected Complete, got {other:?}"),
    }
    assert_eq!(events.iter().filter(|e| e.is_terminal()).count(), 1);
}

#[tokio::test]
async fn breached_email_raises_risk_above_low() {
    let registry = HopRegistry::new().register_hop_1(Arc::new(StubProbe::new("breach_probe", vec![breach_finding()])));

    let orchestrator = Orchestrator::new(fast_config(), registry);
    let events: Vec<_> = orchestrator.scan("breached@example.com".to_string(), 1).collect().await;

    match events.iter().find(|e| e.is_terminal()).unwrap() {
        ScanEvent::Complete { risk_score, risk_level, .. } => {
            assert!(*risk_score > 0);
            assert_ne!(*risk_level, osint_model::RiskLevel::Low);
        }
        other => panic!("expected Complete, got {other:?}"),
    }
}

#[tokio::test]
async fn depth_two_expands_usernames_discovered_in_hop_one() {
    let registry = HopRegistry::new()
        .register_hop_1(Arc::new(StubProbe::new("hop1_account", vec![account_finding("GitHub", "octocat")])))
        .register_hop_2(Arc::new(StubProbe::new(
            "platform_existence",
            vec![account_finding("GitLab", "octocat")],
        )));

    let orchestrator = Orchestrator::new(fast_config(), registry);
    let events: Vec<_> = orchestrator.scan("dev@example.com".to_string(), 2).collect().await;

    let finding_titles: Vec<String> = events
        .iter()
        .filter_map(|e| match e {
            ScanEvent::Finding { finding } => Some(finding.title().to_string()),
            _ => None,
        })
        .collect();

    assert!(finding_titles.iter().any(|t| t.contains("GitHub")));
    assert!(finding_titles.iter().any(|t| t.contains("GitLab")));
}

#[tokio::test]
async fn depth_one_scan_never_runs_hop_two_or_hop_three() {
    let registry = HopRegistry::new()
        .register_hop_1(Arc::new(StubProbe::new("hop1", vec![account_finding("GitHub", "someone")])))
        .register_hop_2(Arc::new(StubProbe::new("hop2", vec![account_finding("GitLab", "someone")])))
        .register_hop_3(Arc::new(StubProbe::new("hop3", vec![breach_finding()])));

    let orchestrator = Orchestrator::new(fast_config(), registry);
    let events: Vec<_> = orchestrator.scan("shallow@example.com".to_string(), 1).collect().await;

    let titles: Vec<String> = events
        .iter()
        .filter_map(|e| match e {
            ScanEvent::Finding { finding } => Some(finding.title().to_string()),
            _ => None,
        })
        .collect();

    assert!(titles.iter().any(|t| t.contains("GitHub")));
    assert!(!titles.iter().any(|t| t.contains("GitLab")));
    assert!(!titles.iter().any(|t| t.contains("Credential exposure")));
}

#[tokio::test]
async fn scan_wide_timeout_yields_timeout_not_complete() {
    let slow_probe = StubProbe::new("slow_probe", vec![account_finding("GitHub", "someone")])
        .with_delay(Duration::from_secs(10));

    let registry = HopRegistry::new().register_hop_1(Arc::new(slow_probe));
    let mut config = fast_config();
    config.scan_deadline = Duration::from_millis(50);
    config.probe_deadline = Duration::from_secs(5);
    config.drain_grace_period = Duration::from_millis(30);

    let orchestrator = Orchestrator::new(config, registry);
    let events: Vec<_> = orchestrator.scan("slow@example.com".to_string(), 1).collect().await;

    let terminal = events.iter().find(|e| e.is_terminal()).expect("one terminal event");
    assert!(matches!(terminal, ScanEvent::Timeout { .. }));
}

#[tokio::test]
async fn findings_never_leak_the_raw_seed_email() {
    let registry = HopRegistry::new().register_hop_1(Arc::new(StubProbe::new("hop1", vec![])));
    let orchestrator = Orchestrator::new(fast_config(), registry);
    let events: Vec<_> = orchestrator.scan("secret.person@example.com".to_string(), 1).collect().await;

    for event in &events {
        if let ScanEvent::Finding { finding } = event {
            assert!(!finding.searchable_text().contains("secret.person@example.com"));
        }
    }
}

#[tokio::test]
async fn every_finding_id_in_a_scan_is_unique() {
    let registry = HopRegistry::new().register_hop_1(Arc::new(StubProbe::new(
        "hop1",
        vec![account_finding("GitHub", "a"), account_finding("GitLab", "b"), breach_finding()],
    )));

    let orchestrator = Orchestrator::new(fast_config(), registry);
    let events: Vec<_> = orchestrator.scan("ids@example.com".to_string(), 1).collect().await;

    let ids: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            ScanEvent::Finding { finding } => Some(finding.id()),
            _ => None,
        })
        .collect();
    let unique: std::collections::HashSet<_> = ids.iter().collect();
    assert_eq!(ids.len(), unique.len());
}

#[tokio::test]
async fn scan_with_callback_delivers_the_same_terminal_event_as_the_stream() {
    let registry = HopRegistry::new().register_hop_1(Arc::new(StubProbe::new("hop1", vec![])));
    let orchestrator = Orchestrator::new(fast_config(), registry);

    let mut seen_terminal = false;
    let result = orchestrator
        .scan_with_callback("callback@example.com".to_string(), 1, |event| {
            if event.is_terminal() {
                seen_terminal = matches!(event, ScanEvent::Complete { .. });
            }
            Ok(())
        })
        .await;

    assert!(result.is_ok());
    assert!(seen_terminal);
}

#[tokio::test]
async fn scan_with_callback_stops_and_errors_when_the_sink_rejects() {
    let registry = HopRegistry::new().register_hop_1(Arc::new(StubProbe::new("hop1", vec![])));
    let orchestrator = Orchestrator::new(fast_config(), registry);

    let result = orchestrator
        .scan_with_callback("reject@example.com".to_string(), 1, |_event| Err("sink closed".to_string()))
        .await;

    assert!(result.is_err());
}

#[tokio::test]
async fn dropping_the_event_stream_mid_scan_does_not_panic() {
    let slow_probe =
        StubProbe::new("slow_probe", vec![account_finding("GitHub", "someone")]).with_delay(Duration::from_millis(200));
    let registry = HopRegistry::new().register_hop_1(Arc::new(slow_probe));

    let orchestrator = Orchestrator::new(fast_config(), registry);
    let mut stream = orchestrator.scan("dropme@example.com".to_string(), 1);
    // Pull exactly one event (Start), then drop the stream before it drains.
    let _ = stream.next().await;
    drop(stream);
}
