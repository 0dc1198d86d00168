//! The probe abstraction (C2), its seed types, and the static hop registry
//! (C3). Probe crates depend only on this crate plus `osint-http`; the
//! orchestrator depends on this crate to drive whatever is registered,
//! without knowing about any concrete probe.

mod probe;
mod registry;
mod seed;

pub use probe::Probe;
pub use registry::HopRegistry;
pub use seed::Seed;
