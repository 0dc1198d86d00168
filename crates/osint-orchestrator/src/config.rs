//! Environment knobs read at startup and passed through from the host.

use std::time::Duration;

/// Runtime configuration for a single `scan()` call. A host overrides
/// individual fields as needed, either by constructing this directly or by
/// layering a TOML file over `Default` (see `osint-cli::config_file`).
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Global soft deadline for the whole scan.
    pub scan_deadline: Duration,
    /// Per-probe-invocation timeout; a firing timeout is "no more findings"
    /// for that probe, not a scan failure.
    pub probe_deadline: Duration,
    /// How many hop-1 probes may run concurrently (defaults to 1,
    /// sequential; raise for bounded fan-out).
    pub hop_1_fan_out: usize,
    /// How many usernames hop 2 explores, taken in first-seen order from
    /// the username set at the end of hop 1.
    pub hop_2_username_cap: usize,
    /// How many of the capped usernames hop 2 may process concurrently.
    pub hop_2_username_fan_out: usize,
    /// Grace period the orchestrator waits for in-flight probes to drain
    /// after the scan deadline fires, before emitting `timeout` anyway.
    pub drain_grace_period: Duration,
    /// Inter-probe politeness pause, independent of any single probe's own
    /// internal pacing.
    pub inter_probe_pause: Duration,
    /// Bearer credential for code-hosting APIs; `None` unless the host
    /// configures one explicitly. Never a compiled-in default.
    pub bearer_token: Option<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            scan_deadline: Duration::from_secs(90),
            probe_deadline: Duration::from_secs(30),
            hop_1_fan_out: 1,
            hop_2_username_cap: 5,
            hop_2_username_fan_out: 2,
            drain_grace_period: Duration::from_secs(2),
            inter_probe_pause: Duration::from_millis(400),
            bearer_token: None,
        }
    }
}
