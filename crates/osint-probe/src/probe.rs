use futures::stream::BoxStream;
use osint_model::{Finding, FindingId};

use crate::seed::Seed;

/// A bounded operation producing findings from a seed (C2).
///
/// Implementations must not raise to their caller for network, parse, or
/// remote-policy failures — such conditions are absorbed internally and
/// either turned into a degraded finding or used to end the stream early.
/// Only a genuine programming error (a panic) is allowed to escape, and the
/// orchestrator treats even that as "this probe produced no more findings"
/// rather than failing the scan.
pub trait Probe: Send + Sync {
    /// Static probe name, used as `Finding::source` and in audit log lines.
    fn name(&self) -> &'static str;

    /// One-line description, surfaced by the registry for diagnostics.
    fn description(&self) -> &'static str;

    /// Lazily produce findings for `seed`. `depth` lets expensive probes
    /// skip their deep branch below `depth >= 2`. Every top-level finding
    /// must carry `parent_id` unless the probe nests its own sub-hierarchy
    /// under a finding it emitted earlier in this same call.
    fn run(&self, seed: Seed, depth: u8, parent_id: FindingId) -> BoxStream<'static, Finding>;
}
