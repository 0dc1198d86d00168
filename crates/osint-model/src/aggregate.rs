//! Ephemeral, process-memory-only scan state (C6's working set).
//!
//! None of this is persisted or shared across scans; it exists only for the
//! lifetime of one `scan()` call and is discarded once the event stream
//! closes.

use std::collections::BTreeSet;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::event::AuditEntry;
use crate::finding::Finding;

/// A single location hint gathered from a probe, before aggregation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationHint {
    /// Raw, unnormalised location text as the probe reported it.
    pub location: String,
    /// Name of the probe or service this hint came from.
    pub source: String,
    /// Coarse category used to weight this hint (see the location
    /// aggregator's per-source-type weight table).
    pub source_type: String,
    /// Confidence in `[0, 1]`; defaults to `0.5` when the probe doesn't
    /// supply one.
    pub confidence: f64,
}

/// A confirmed account on a named platform, as tracked by the aggregate
/// (distinct from the richer `ACCOUNT`-type `Finding` that announced it).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoundAccount {
    /// Platform name, e.g. `"GitHub"`.
    pub platform: String,
    /// Handle on that platform.
    pub username: String,
    /// Profile URL, when known.
    pub url: Option<String>,
}

/// The mutable working set the seed extractor (C5) updates from every
/// finding the orchestrator receives, and that the correlation probes (C8)
/// read back.
#[derive(Debug, Clone)]
pub struct AggregatedState {
    /// Every finding emitted so far, insertion order = emission order.
    pub findings: Vec<Finding>,
    /// Deduplicated, lower-cased discovered usernames, in first-seen order.
    usernames: Vec<String>,
    seen_usernames: BTreeSet<String>,
    /// Free-text biographies gathered from profile probes.
    pub bios: Vec<String>,
    /// Raw location hints, pre-aggregation.
    pub locations: Vec<LocationHint>,
    /// Confirmed platform accounts.
    pub found_accounts: Vec<FoundAccount>,
    /// URLs worth checking against historical archives. Deduplicated at
    /// consumption (`found_urls()`), not at insertion, per the data model.
    found_urls_raw: Vec<String>,
    /// Ordered narration lines, mirrored into the terminal event payload.
    pub audit_log: Vec<AuditEntry>,
    /// Wall-clock scan start, used to compute `elapsed_seconds`.
    pub start_time: Instant,
}

impl AggregatedState {
    /// A fresh, empty aggregate stamped with the current instant.
    #[must_use]
    pub fn new(start_time: Instant) -> Self {
        Self {
            findings: Vec::new(),
            usernames: Vec::new(),
            seen_usernames: BTreeSet::new(),
            bios: Vec::new(),
            locations: Vec::new(),
            found_accounts: Vec::new(),
            found_urls_raw: Vec::new(),
            audit_log: Vec::new(),
            start_time,
        }
    }

    /// Seconds elapsed since `start_time`.
    #[must_use]
    pub fn elapsed_seconds(&self) -> f64 {
        self.start_time.elapsed().as_secs_f64()
    }

    /// Record a finding in emission order. Does not itself run seed
    /// extraction; see `osint-orchestrator`'s extractor for that.
    pub fn record_finding(&mut self, finding: Finding) {
        self.findings.push(finding);
    }

    /// Add a lower-cased, deduplicated username. No-op if already present.
    pub fn add_username(&mut self, username: &str) {
        let normalized = username.trim().to_lowercase();
        if self.seen_usernames.insert(normalized.clone()) {
            self.usernames.push(normalized);
        }
    }

    /// Discovered usernames, first-seen order, for the hop-2 breadth cap to
    /// draw its first N from.
    #[must_use]
    pub fn usernames(&self) -> &[String] {
        &self.usernames
    }

    /// Add a URL worth archive-checking; deduplication happens in
    /// `found_urls()`, not here, per the data model's "deduplicated at
    /// consumption" rule.
    pub fn add_found_url(&mut self, url: impl Into<String>) {
        self.found_urls_raw.push(url.into());
    }

    /// Deduplicated found URLs, first-seen order.
    #[must_use]
    pub fn found_urls(&self) -> Vec<String> {
        let mut seen = BTreeSet::new();
        let mut out = Vec::new();
        for url in &self.found_urls_raw {
            if seen.insert(url.clone()) {
                out.push(url.clone());
            }
        }
        out
    }

    /// Append a narration line to the audit log.
    pub fn log(&mut self, entry: AuditEntry) {
        self.audit_log.push(entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::LogLevel;

    #[test]
    fn usernames_are_lowercased_and_deduplicated() {
        let mut state = AggregatedState::new(Instant::now());
        state.add_username("Octocat");
        state.add_username("octocat");
        state.add_username(" OCTOCAT ");
        state.add_username("other");
        assert_eq!(state.usernames(), &["octocat".to_string(), "other".to_string()]);
    }

    #[test]
    fn found_urls_dedupe_only_on_read() {
        let mut state = AggregatedState::new(Instant::now());
        state.add_found_url("https://example.com/a");
        state.add_found_url("https://example.com/a");
        state.add_found_url("https://example.com/b");
        assert_eq!(state.found_urls_raw.len(), 3);
        assert_eq!(state.found_urls().len(), 2);
    }

    #[test]
    fn audit_log_preserves_order() {
        let mut state = AggregatedState::new(Instant::now());
        state.log(AuditEntry::new(LogLevel::Info, "starting hop 1"));
        state.log(AuditEntry::new(LogLevel::Warn, "rate limited"));
        assert_eq!(state.audit_log.len(), 2);
        assert_eq!(state.audit_log[0].message, "starting hop 1");
    }
}
