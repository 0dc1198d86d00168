use std::sync::Arc;

use crate::probe::Probe;

/// Static grouping of probes into the three hops, with their expected seed
/// type (C3). This is the only place probe-to-hop membership is declared —
/// probe crates just implement [`Probe`]; the binary wires them up here.
#[derive(Clone, Default)]
pub struct HopRegistry {
    hop_1: Vec<Arc<dyn Probe>>,
    hop_2: Vec<Arc<dyn Probe>>,
    hop_3: Vec<Arc<dyn Probe>>,
}

impl HopRegistry {
    /// An empty registry; use the `register_*` methods to populate it.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a hop-1 probe (accepts `Seed::Email`).
    #[must_use]
    pub fn register_hop_1(mut self, probe: Arc<dyn Probe>) -> Self {
        self.hop_1.push(probe);
        self
    }

    /// Register a hop-2 probe (accepts `Seed::Username` or
    /// `Seed::PlatformUsername`).
    #[must_use]
    pub fn register_hop_2(mut self, probe: Arc<dyn Probe>) -> Self {
        self.hop_2.push(probe);
        self
    }

    /// Register a hop-3 / correlation probe (accepts `Seed::Aggregate`).
    #[must_use]
    pub fn register_hop_3(mut self, probe: Arc<dyn Probe>) -> Self {
        self.hop_3.push(probe);
        self
    }

    /// Hop-1 probes, in registration order.
    #[must_use]
    pub fn hop_1(&self) -> &[Arc<dyn Probe>] {
        &self.hop_1
    }

    /// Hop-2 probes, in registration order.
    #[must_use]
    pub fn hop_2(&self) -> &[Arc<dyn Probe>] {
        &self.hop_2
    }

    /// Hop-3 / correlation probes, in registration order.
    #[must_use]
    pub fn hop_3(&self) -> &[Arc<dyn Probe>] {
        &self.hop_3
    }
}

#[cfg(test)]
mod tests {
    use futures::stream::{self, BoxStream};
    use osint_model::{Finding, FindingId, FindingType, Severity};

    use super::*;
    use crate::seed::Seed;

    struct StubProbe(&'static str);

    impl Probe for StubProbe {
        fn name(&self) -> &'static str {
            self.0
        }

        fn description(&self) -> &'static str {
            "stub"
        }

        fn run(&self, _seed: Seed, _depth: u8, parent_id: FindingId) -> BoxStream<'static, Finding> {
            let finding = Finding::builder(FindingType::Username, Severity::Low)
                .title("stub")
                .description("stub")
                .source(self.0)
                .parent_id(parent_id)
                .build();
            Box::pin(stream::once(async move { finding }))
        }
    }

    #[test]
    fn registration_order_is_preserved() {
        let registry = HopRegistry::new()
            .register_hop_1(Arc::new(StubProbe("a")))
            .register_hop_1(Arc::new(StubProbe("b")));

        let names: Vec<_> = registry.hop_1().iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert!(registry.hop_2().is_empty());
        assert!(registry.hop_3().is_empty());
    }
}
