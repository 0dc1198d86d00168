//! The typed event stream (C9) a scan publishes as it runs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::finding::Finding;

/// Severity of a narration line on the audit log / `log` event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    /// Routine narration ("starting hop 2").
    Info,
    /// A probe produced a result worth calling out without it being an error.
    Success,
    /// A degraded condition the scan recovered from (rate limit, parse miss).
    Warn,
    /// A programming error or infrastructure failure.
    Error,
}

/// Terminal risk classification produced by the risk scorer (C7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    /// score < 30
    Low,
    /// 30 <= score < 50
    Medium,
    /// 50 <= score < 70
    High,
    /// score >= 70
    Critical,
}

/// Headline numbers attached to the `complete` event, useful to a transport
/// layer that wants summary counters without re-deriving them from the
/// finding list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanStats {
    /// Total findings emitted across every hop.
    pub finding_count: usize,
    /// Distinct usernames discovered.
    pub username_count: usize,
    /// Distinct platform accounts discovered.
    pub account_count: usize,
    /// Breach-type findings.
    pub breach_count: usize,
}

/// One of the six kinds of event a scan publishes on its channel, per the
/// external interface contract: `start`, `finding`, `progress`, `log`,
/// `complete`, `error`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScanEvent {
    /// Emitted exactly once, first.
    Start {
        /// Requested scan depth, already clamped to 1..=3.
        depth: u8,
        /// UTC scan start time.
        timestamp: DateTime<Utc>,
    },
    /// Emitted once per finding, in emission order.
    Finding {
        /// The newly emitted finding.
        finding: Box<Finding>,
    },
    /// Emitted after each finding; a heuristic completion estimate.
    Progress {
        /// 0..=95 during the scan; the `complete` event implies 100.
        progress: u8,
        /// Findings emitted so far.
        finding_count: usize,
        /// Seconds elapsed since scan start.
        elapsed_seconds: f64,
    },
    /// Orchestrator narration. Never contains the clear-text seed email.
    Log {
        /// UTC time the line was produced.
        timestamp: DateTime<Utc>,
        /// Narration severity.
        level: LogLevel,
        /// Human-readable narration text.
        message: String,
    },
    /// Normal terminal event.
    Complete {
        /// Every finding emitted during the scan, in emission order.
        findings: Vec<Finding>,
        /// Every audit log line emitted during the scan.
        audit_log: Vec<AuditEntry>,
        /// Wall-clock scan duration.
        scan_time_seconds: f64,
        /// Output of the risk scorer.
        risk_score: u8,
        /// Output of the risk scorer.
        risk_level: RiskLevel,
        /// Summary counters.
        stats: ScanStats,
    },
    /// Abnormal terminal event: the scan-wide deadline fired.
    Timeout {
        /// Findings emitted before the deadline fired.
        findings: Vec<Finding>,
        /// Every audit log line emitted before the deadline fired.
        audit_log: Vec<AuditEntry>,
        /// Wall-clock scan duration up to the deadline.
        scan_time_seconds: f64,
    },
    /// Abnormal terminal event: an infrastructure failure, not a probe
    /// failure, prevented further progress.
    Error {
        /// Coarse machine-readable failure category.
        error_kind: String,
        /// Human-readable detail.
        message: String,
    },
}

impl ScanEvent {
    /// True for the three terminal event kinds (`complete`, `timeout`,
    /// `error`) — exactly one of these is published per scan.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ScanEvent::Complete { .. } | ScanEvent::Timeout { .. } | ScanEvent::Error { .. }
        )
    }
}

/// One line of the orchestrator's audit log, mirroring `ScanEvent::Log`'s
/// payload so it can be collected into the `complete`/`timeout` event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// UTC time the line was produced.
    pub timestamp: DateTime<Utc>,
    /// Narration severity.
    pub level: LogLevel,
    /// Human-readable narration text.
    pub message: String,
}

impl AuditEntry {
    /// Build an audit entry stamped with the current time.
    #[must_use]
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            level,
            message: message.into(),
        }
    }
}

/// Expected-findings constant per depth used by the progress estimator.
/// Heuristic, not contract (Design Notes, Open Question iii) — exposed as a
/// plain function rather than baked into `ScanEvent` so the orchestrator's
/// `ScanConfig` can override it.
#[must_use]
pub fn expected_findings_for_depth(depth: u8) -> u32 {
    match depth {
        1 => 10,
        2 => 25,
        _ => 40,
    }
}

/// Compute the `progress` field: actual findings over the expected count for
/// this depth, capped at 95 so `complete` is always the one that reaches 100.
#[must_use]
pub fn estimate_progress(finding_count: usize, depth: u8) -> u8 {
    let expected = expected_findings_for_depth(depth).max(1);
    let pct = (finding_count as f64 / f64::from(expected) * 100.0).round();
    pct.clamp(0.0, 95.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_caps_at_95_before_completion() {
        assert_eq!(estimate_progress(0, 1), 0);
        assert_eq!(estimate_progress(10, 1), 95);
        assert_eq!(estimate_progress(100, 1), 95);
    }

    #[test]
    fn expected_findings_match_depth_table() {
        assert_eq!(expected_findings_for_depth(1), 10);
        assert_eq!(expected_findings_for_depth(2), 25);
        assert_eq!(expected_findings_for_depth(3), 40);
    }

    #[test]
    fn terminal_events_are_identified() {
        let complete = ScanEvent::Complete {
            findings: vec![],
            audit_log: vec![],
            scan_time_seconds: 1.0,
            risk_score: 0,
            risk_level: RiskLevel::Low,
            stats: ScanStats::default(),
        };
        assert!(complete.is_terminal());

        let progress = ScanEvent::Progress {
            progress: 10,
            finding_count: 1,
            elapsed_seconds: 1.0,
        };
        assert!(!progress.is_terminal());
    }
}
