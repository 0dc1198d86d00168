//! The finding graph's single currency: [`Finding`].

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Identifier for a [`Finding`], unique within a single scan.
pub type FindingId = Uuid;

/// Coarse classification of a finding, per the finding-graph data model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FindingType {
    /// The scan's seed identity, or an email discovered during the scan.
    Email,
    /// A handle discovered on some platform.
    Username,
    /// A confirmed account on a named platform.
    Account,
    /// Free-form personal information (location, name, bio excerpt, ...).
    PersonalInfo,
    /// A data breach or leak exposure.
    Breach,
    /// A domain name relevant to the identity.
    Domain,
}

/// Qualitative severity assigned by the producing probe.
///
/// Ordered `Low < Medium < High < Critical` so callers can sort or filter
/// by severity without matching on the variant by hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    /// Routine or negative-result finding.
    Low,
    /// Notable but not independently dangerous.
    Medium,
    /// Materially increases the subject's exposure.
    High,
    /// Directly actionable by an attacker (e.g. a live password exposure).
    Critical,
}

/// A single node in the causal discovery graph.
///
/// Findings are immutable after emission (invariant 1 of the data model):
/// every field is set once, at construction, via [`FindingBuilder`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    id: FindingId,
    #[serde(rename = "type")]
    kind: FindingType,
    severity: Severity,
    title: String,
    description: String,
    source: String,
    source_url: Option<String>,
    timestamp: DateTime<Utc>,
    data: BTreeMap<String, Value>,
    parent_id: Option<FindingId>,
    link_label: Option<String>,
}

impl Finding {
    /// Start building a finding with a fresh random id and the current time.
    #[must_use]
    pub fn builder(kind: FindingType, severity: Severity) -> FindingBuilder {
        FindingBuilder::new(kind, severity)
    }

    /// Globally-unique-within-scan identifier.
    #[must_use]
    pub fn id(&self) -> FindingId {
        self.id
    }

    /// The finding's coarse type.
    #[must_use]
    pub fn kind(&self) -> FindingType {
        self.kind
    }

    /// The probe-assigned severity.
    #[must_use]
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Short human title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Short human description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Name of the probe or external service that produced this finding.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Optional deep link to the external evidence.
    #[must_use]
    pub fn source_url(&self) -> Option<&str> {
        self.source_url.as_deref()
    }

    /// UTC creation time.
    #[must_use]
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Open, probe-specific evidence payload.
    #[must_use]
    pub fn data(&self) -> &BTreeMap<String, Value> {
        &self.data
    }

    /// Convenience accessor for `data.username`.
    #[must_use]
    pub fn data_username(&self) -> Option<&str> {
        self.data.get("username").and_then(Value::as_str)
    }

    /// Id of the finding that caused this one to be discovered, if any.
    #[must_use]
    pub fn parent_id(&self) -> Option<FindingId> {
        self.parent_id
    }

    /// Short description of the parent-to-child edge.
    #[must_use]
    pub fn link_label(&self) -> Option<&str> {
        self.link_label.as_deref()
    }

    /// Concatenation of title and description, lower-cased, for text-driven
    /// scoring and PII-leak checks.
    #[must_use]
    pub fn searchable_text(&self) -> String {
        format!("{} {}", self.title, self.description).to_lowercase()
    }
}

/// Builder for [`Finding`], mirroring the builder-pattern construction used
/// throughout this workspace's probe crates.
#[derive(Debug)]
pub struct FindingBuilder {
    id: FindingId,
    kind: FindingType,
    severity: Severity,
    title: String,
    description: String,
    source: String,
    source_url: Option<String>,
    timestamp: DateTime<Utc>,
    data: BTreeMap<String, Value>,
    parent_id: Option<FindingId>,
    link_label: Option<String>,
}

impl FindingBuilder {
    fn new(kind: FindingType, severity: Severity) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            severity,
            title: String::new(),
            description: String::new(),
            source: String::new(),
            source_url: None,
            timestamp: Utc::now(),
            data: BTreeMap::new(),
            parent_id: None,
            link_label: None,
        }
    }

    /// Override the generated id. Only used by the orchestrator for the root
    /// finding, whose id is reused as the `parent_id` seed for hop one.
    #[must_use]
    pub fn id(mut self, id: FindingId) -> Self {
        self.id = id;
        self
    }

    /// Short human title.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Short human description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Name of the producing probe or external service.
    #[must_use]
    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// Deep link to the external evidence.
    #[must_use]
    pub fn source_url(mut self, url: impl Into<String>) -> Self {
        self.source_url = Some(url.into());
        self
    }

    /// Insert one key into the open `data` payload.
    #[must_use]
    pub fn data_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    /// Replace the entire `data` payload at once.
    #[must_use]
    pub fn data(mut self, data: BTreeMap<String, Value>) -> Self {
        self.data = data;
        self
    }

    /// Id of the causing finding.
    #[must_use]
    pub fn parent_id(mut self, parent_id: FindingId) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    /// Short description of the parent-to-child edge.
    #[must_use]
    pub fn link_label(mut self, label: impl Into<String>) -> Self {
        self.link_label = Some(label.into());
        self
    }

    /// Finalize the finding.
    #[must_use]
    pub fn build(self) -> Finding {
        Finding {
            id: self.id,
            kind: self.kind,
            severity: self.severity,
            title: self.title,
            description: self.description,
            source: self.source,
            source_url: self.source_url,
            timestamp: self.timestamp,
            data: self.data,
            parent_id: self.parent_id,
            link_label: self.link_label,
        }
    }
}

/// Username hygiene regex from the data model: `^[A-Za-z0-9_.-]{2,30}$`.
#[must_use]
pub fn is_valid_username(username: &str) -> bool {
    let len = username.chars().count();
    if !(2..=30).contains(&len) {
        return false;
    }
    username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
}

/// Lower-case a username for case-insensitive platforms, per invariant 5.
#[must_use]
pub fn normalize_username(username: &str) -> String {
    username.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_validation_accepts_typical_handles() {
        assert!(is_valid_username("octocat"));
        assert!(is_valid_username("john.doe-99"));
        assert!(is_valid_username("ab"));
        assert!(is_valid_username(&"a".repeat(30)));
    }

    #[test]
    fn username_validation_rejects_bad_handles() {
        assert!(!is_valid_username("a"));
        assert!(!is_valid_username(&"a".repeat(31)));
        assert!(!is_valid_username("has space"));
        assert!(!is_valid_username("has@sign"));
        assert!(!is_valid_username(""));
    }

    #[test]
    fn builder_produces_root_style_finding() {
        let f = Finding::builder(FindingType::Email, Severity::Low)
            .title("a***e@example.com")
            .description("Seed email")
            .source("User Input")
            .data_field("email_masked", "a***e@example.com")
            .build();

        assert_eq!(f.kind(), FindingType::Email);
        assert!(f.parent_id().is_none());
        assert_eq!(f.data().get("email_masked").unwrap(), "a***e@example.com");
    }

    #[test]
    fn severity_ordering_matches_tiers() {
        assert!(Severity::Low < Severity::Medium);
        assert!(Severity::Medium < Severity::High);
        assert!(Severity::High < Severity::Critical);
    }
}
