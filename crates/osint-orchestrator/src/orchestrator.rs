//! The orchestrator: drives the three-hop scan, fans out probes,
//! aggregates, enforces budgets, and emits the event stream.

use std::cmp::min;

use async_stream::stream;
use chrono::Utc;
use futures::stream::BoxStream;
use futures::StreamExt;
use osint_model::{
    estimate_progress, AggregatedState, AuditEntry, Finding, FindingId, FindingType, LogLevel, ScanEvent, ScanStats,
    Severity,
};
use osint_probe::{HopRegistry, Probe, Seed};
use osint_probes_email::mask_email;
use tokio::time::{timeout_at, Instant};
use uuid::Uuid;

use crate::config::ScanConfig;
use crate::error::ScanError;
use crate::risk::calculate_risk_score;
use crate::seed_extractor;

/// Drives the three hops against a [`HopRegistry`] of probes, using a
/// [`ScanConfig`] for budgets. Stateless across calls: `scan` takes
/// everything it needs as arguments and owns no mutable state itself.
#[derive(Clone)]
pub struct Orchestrator {
    config: ScanConfig,
    registry: HopRegistry,
}

impl Orchestrator {
    #[must_use]
    pub fn new(config: ScanConfig, registry: HopRegistry) -> Self {
        Self { config, registry }
    }

    /// Run one scan. Depth is clamped to 1..=3. The returned stream is the
    /// single entry point: every event — including every finding — is
    /// published on it, terminating with exactly one of `complete` or
    /// `timeout`.
    pub fn scan(&self, email: String, depth: u8) -> BoxStream<'static, ScanEvent> {
        let depth = depth.clamp(1, 3);
        let config = self.config.clone();
        let registry = self.registry.clone();

        Box::pin(stream! {
            let scan_start = Instant::now();
            let scan_deadline = scan_start + config.scan_deadline;
            let mut state = AggregatedState::new(std::time::Instant::now());

            yield ScanEvent::Start { depth, timestamp: Utc::now() };

            let root_id: FindingId = Uuid::new_v4();
            let masked = mask_email(&email);
            let root = Finding::builder(FindingType::Email, Severity::Low)
                .id(root_id)
                .title(masked.clone())
                .description("Verified seed email for this self-assessment scan.")
                .source("user_input")
                .data_field("email_masked", masked)
                .build();

            state.record_finding(root.clone());
            yield ScanEvent::Finding { finding: Box::new(root) };
            yield progress_event(&state, depth, scan_start);

            let mut timed_out = Instant::now() >= scan_deadline;

            if !timed_out {
                log_line(&mut state, LogLevel::Info, "starting hop 1: direct email intelligence");
                for chunk in registry.hop_1().chunks(config.hop_1_fan_out.max(1)) {
                    if Instant::now() >= scan_deadline {
                        timed_out = true;
                        break;
                    }
                    let chunk_deadline = min(Instant::now() + config.probe_deadline, scan_deadline + config.drain_grace_period);

                    let collected = futures::future::join_all(chunk.iter().map(|probe| {
                        collect_probe_findings(probe.clone(), Seed::Email(email.clone()), depth, root_id, chunk_deadline)
                    }))
                    .await;

                    for per_probe_findings in collected {
                        for finding in per_probe_findings {
                            seed_extractor::extract(&mut state, &finding);
                            state.record_finding(finding.clone());
                            yield ScanEvent::Finding { finding: Box::new(finding) };
                            yield progress_event(&state, depth, scan_start);
                        }
                    }
                    if Instant::now() >= scan_deadline {
                        timed_out = true;
                        break;
                    }
                    tokio::time::sleep(config.inter_probe_pause).await;
                }
            }

            if !timed_out && depth >= 2 && Instant::now() < scan_deadline {
                log_line(&mut state, LogLevel::Info, "starting hop 2: username expansion");
                let usernames: Vec<String> = state
                    .usernames()
                    .iter()
                    .take(config.hop_2_username_cap)
                    .cloned()
                    .collect();

                for chunk in usernames.chunks(config.hop_2_username_fan_out.max(1)) {
                    if Instant::now() >= scan_deadline {
                        timed_out = true;
                        break;
                    }
                    let chunk_deadline = min(Instant::now() + config.probe_deadline, scan_deadline + config.drain_grace_period);

                    let collected = futures::future::join_all(chunk.iter().map(|username| {
                        collect_username_findings(registry.hop_2(), username.clone(), depth, root_id, chunk_deadline)
                    }))
                    .await;

                    for per_username_findings in collected {
                        for finding in per_username_findings {
                            seed_extractor::extract(&mut state, &finding);
                            state.record_finding(finding.clone());
                            yield ScanEvent::Finding { finding: Box::new(finding) };
                            yield progress_event(&state, depth, scan_start);
                        }
                    }
                    if Instant::now() >= scan_deadline {
                        timed_out = true;
                        break;
                    }
                    tokio::time::sleep(config.inter_probe_pause).await;
                }
            }

            if !timed_out && depth >= 3 && Instant::now() < scan_deadline {
                log_line(&mut state, LogLevel::Info, "starting hop 3: correlation");
                let aggregate = std::sync::Arc::new(state.clone());
                for probe in registry.hop_3() {
                    if Instant::now() >= scan_deadline {
                        timed_out = true;
                        break;
                    }
                    let seed = Seed::Aggregate(aggregate.clone());
                    let probe_deadline = min(Instant::now() + config.probe_deadline, scan_deadline + config.drain_grace_period);

                    let mut probe_stream = probe.run(seed, depth, root_id);
                    loop {
                        match timeout_at(probe_deadline, probe_stream.next()).await {
                            Ok(Some(finding)) => {
                                seed_extractor::extract(&mut state, &finding);
                                state.record_finding(finding.clone());
                                yield ScanEvent::Finding { finding: Box::new(finding) };
                                yield progress_event(&state, depth, scan_start);
                            }
                            Ok(None) => break,
                            Err(_) => {
                                log_line(
                                    &mut state,
                                    LogLevel::Warn,
                                    &format!("correlation probe '{}' timed out", probe.name()),
                                );
                                break;
                            }
                        }
                    }
                    if Instant::now() >= scan_deadline {
                        timed_out = true;
                        break;
                    }
                }
            }

            let scan_time_seconds = scan_start.elapsed().as_secs_f64();

            if timed_out {
                yield ScanEvent::Timeout {
                    findings: state.findings.clone(),
                    audit_log: state.audit_log.clone(),
                    scan_time_seconds,
                };
            } else {
                let (risk_score, risk_level) = calculate_risk_score(&state.findings);
                let stats = ScanStats {
                    finding_count: state.findings.len(),
                    username_count: state.usernames().len(),
                    account_count: state.found_accounts.len(),
                    breach_count: state.findings.iter().filter(|f| f.kind() == FindingType::Breach).count(),
                };
                yield ScanEvent::Complete {
                    findings: state.findings.clone(),
                    audit_log: state.audit_log.clone(),
                    scan_time_seconds,
                    risk_score,
                    risk_level,
                    stats,
                };
            }
        })
    }

    /// Sink-callback variant of [`Orchestrator::scan`] for hosts that want a
    /// push interface instead of polling a stream — drives the same event
    /// sequence, handing each event to `on_event` in order. Returns once the
    /// stream reaches its terminal event, or as soon as `on_event` rejects
    /// one.
    pub async fn scan_with_callback(
        &self,
        email: String,
        depth: u8,
        mut on_event: impl FnMut(&ScanEvent) -> Result<(), String>,
    ) -> Result<(), ScanError> {
        let mut events = self.scan(email, depth);
        while let Some(event) = events.next().await {
            on_event(&event).map_err(ScanError::EventChannelClosed)?;
        }
        Ok(())
    }
}

/// Drain one probe's stream into a buffer, bounded by `deadline`. Buffering
/// (rather than re-yielding in place) is the price of running several
/// probes or seeds concurrently under a hop's fan-out cap; callers re-emit
/// each buffer in order once the batch joins.
async fn collect_probe_findings(
    probe: std::sync::Arc<dyn Probe>,
    seed: Seed,
    depth: u8,
    root_id: FindingId,
    deadline: Instant,
) -> Vec<Finding> {
    let mut out = Vec::new();
    let mut probe_stream = probe.run(seed, depth, root_id);
    loop {
        match timeout_at(deadline, probe_stream.next()).await {
            Ok(Some(finding)) => out.push(finding),
            Ok(None) | Err(_) => break,
        }
    }
    out
}

/// Drive every hop-2 probe against one username, collecting its findings
/// into a buffer.
async fn collect_username_findings(
    probes: &[std::sync::Arc<dyn Probe>],
    username: String,
    depth: u8,
    root_id: FindingId,
    deadline: Instant,
) -> Vec<Finding> {
    let mut out = Vec::new();
    for probe in probes {
        out.extend(collect_probe_findings(probe.clone(), Seed::Username(username.clone()), depth, root_id, deadline).await);
    }
    out
}

fn progress_event(state: &AggregatedState, depth: u8, scan_start: Instant) -> ScanEvent {
    ScanEvent::Progress {
        progress: estimate_progress(state.findings.len(), depth),
        finding_count: state.findings.len(),
        elapsed_seconds: scan_start.elapsed().as_secs_f64(),
    }
}

fn log_line(state: &mut AggregatedState, level: LogLevel, message: &str) {
    state.log(AuditEntry::new(level, message));
}
