//! Finding-graph data model and event stream types shared by every probe
//! crate and the orchestrator.
//!
//! This crate has no async, HTTP, or I/O dependencies — it is the pure data
//! shape that crosses every boundary in the workspace, so it can be derived
//! into wire formats without the transport layer reaching back into probe
//! internals.

mod aggregate;
mod breach;
mod event;
mod finding;

pub use aggregate::{AggregatedState, FoundAccount, LocationHint};
pub use breach::BreachRecord;
pub use event::{
    estimate_progress, expected_findings_for_depth, AuditEntry, LogLevel, RiskLevel, ScanEvent,
    ScanStats,
};
pub use finding::{is_valid_username, normalize_username, Finding, FindingBuilder, FindingId, FindingType, Severity};
