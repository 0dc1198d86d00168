//! Seed extractor: the only code that writes to [`AggregatedState`] from a
//! finding. Pure in the sense that it reads the finding and writes to the
//! aggregate, never emits new findings of its own.

use osint_model::{AggregatedState, Finding, FindingType, FoundAccount, LocationHint};
use serde_json::Value;

/// Fold one finding into the aggregate: usernames, bios, location hints,
/// found accounts, and found URLs are each extracted independently. Call
/// this for every finding before it's handed to the consumer, so the
/// aggregate is always current by the time a later hop reads it.
pub fn extract(state: &mut AggregatedState, finding: &Finding) {
    if let Some(username) = finding.data_username() {
        if username.chars().count() >= 3 {
            state.add_username(username);
        }
    }

    if let Some(bio) = finding.data().get("bio").and_then(Value::as_str) {
        state.bios.push(bio.to_string());
    }

    if let Some(location) = finding.data().get("location").and_then(Value::as_str) {
        let source_type = finding
            .data()
            .get("source_type")
            .and_then(Value::as_str)
            .unwrap_or_else(|| finding.source())
            .to_string();
        let confidence = finding.data().get("confidence").and_then(Value::as_f64).unwrap_or(0.5);
        state.locations.push(LocationHint {
            location: location.to_string(),
            source: finding.source().to_string(),
            source_type,
            confidence,
        });
    }

    if finding.kind() == FindingType::Account {
        let platform = finding.data().get("platform").and_then(Value::as_str);
        let username = finding.data_username();
        if let (Some(platform), Some(username)) = (platform, username) {
            state.found_accounts.push(FoundAccount {
                platform: platform.to_string(),
                username: username.to_string(),
                url: finding.source_url().map(str::to_string),
            });
            state.add_username(username);
        }
    }

    if let Some(url) = finding.data().get("url").and_then(Value::as_str) {
        state.add_found_url(url.to_string());
    } else if let Some(url) = finding.source_url() {
        state.add_found_url(url.to_string());
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use osint_model::{Finding, FindingType, Severity};

    use super::*;

    #[test]
    fn short_usernames_are_not_added() {
        let mut state = AggregatedState::new(Instant::now());
        let finding = Finding::builder(FindingType::Username, Severity::Low)
            .data_field("username", "ab")
            .build();
        extract(&mut state, &finding);
        assert!(state.usernames().is_empty());
    }

    #[test]
    fn account_findings_populate_found_accounts_and_usernames() {
        let mut state = AggregatedState::new(Instant::now());
        let finding = Finding::builder(FindingType::Account, Severity::Medium)
            .data_field("platform", "GitHub")
            .data_field("username", "octocat")
            .build();
        extract(&mut state, &finding);
        assert_eq!(state.found_accounts.len(), 1);
        assert_eq!(state.usernames(), &["octocat".to_string()]);
    }

    #[test]
    fn location_defaults_confidence_when_absent() {
        let mut state = AggregatedState::new(Instant::now());
        let finding = Finding::builder(FindingType::PersonalInfo, Severity::Low)
            .source("github_profile")
            .data_field("location", "Berlin")
            .build();
        extract(&mut state, &finding);
        assert_eq!(state.locations.len(), 1);
        assert!((state.locations[0].confidence - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn source_url_is_recorded_as_a_found_url() {
        let mut state = AggregatedState::new(Instant::now());
        let finding = Finding::builder(FindingType::PersonalInfo, Severity::Low)
            .source_url("https://example.com/profile")
            .build();
        extract(&mut state, &finding);
        assert_eq!(state.found_urls(), vec!["https://example.com/profile".to_string()]);
    }
}
