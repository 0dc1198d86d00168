//! A deterministic, network-free [`Probe`] for orchestrator tests: yields a
//! fixed, pre-built finding list as-is and can be given a per-item delay to
//! exercise the per-probe timeout path.

use std::time::Duration;

use async_stream::stream;
use futures::stream::BoxStream;
use osint_probe::{Probe, Seed};
use osint_model::{Finding, FindingId};

/// Canned probe. Build one with [`StubProbe::new`], optionally chaining
/// [`StubProbe::with_delay`] to make every yield wait before resolving.
pub struct StubProbe {
    name: &'static str,
    findings: Vec<Finding>,
    delay: Option<Duration>,
}

impl StubProbe {
    /// A probe named `name` that yields exactly `findings`, in order.
    #[must_use]
    pub fn new(name: &'static str, findings: Vec<Finding>) -> Self {
        Self { name, findings, delay: None }
    }

    /// Pause for `delay` before each yield — use a delay longer than the
    /// test's configured probe deadline to exercise the timeout path.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

impl Probe for StubProbe {
    fn name(&self) -> &'static str {
        self.name
    }

    fn description(&self) -> &'static str {
        "deterministic fixture probe for tests"
    }

    fn run(&self, _seed: Seed, _depth: u8, _parent_id: FindingId) -> BoxStream<'static, Finding> {
        let findings = self.findings.clone();
        let delay = self.delay;
        Box::pin(stream! {
            for finding in findings {
                if let Some(delay) = delay {
                    tokio::time::sleep(delay).await;
                }
                yield finding;
            }
        })
    }
}
