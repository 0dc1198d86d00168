//! Location aggregator: groups raw location hints by normalized city/region
//! text, weights each hint by its source type, and turns the winning group
//! into a single high-confidence finding plus an "alternative locations"
//! finding for everything else.

use async_stream::stream;
use futures::stream::BoxStream;
use osint_model::{Finding, FindingId, FindingType, Severity};
use osint_probe::{Probe, Seed};

/// Per-source-type reliability weight, exactly as the original scored it.
fn source_weight(source_type: &str) -> f64 {
    match source_type {
        "linkedin_profile" => 0.95,
        "github_profile" => 0.9,
        "twitter_profile" => 0.85,
        "gravatar_profile" => 0.7,
        "subreddit_activity" => 0.6,
        "commit_timezone" => 0.55,
        "timezone_inference" => 0.5,
        "domain_registration" => 0.4,
        "ip_geolocation" => 0.3,
        _ => 0.3,
    }
}

/// Common abbreviations normalized to their full form before grouping.
fn expand_abbreviation(text: &str) -> String {
    match text {
        "sf" => "san francisco".to_string(),
        "nyc" => "new york city".to_string(),
        "la" => "los angeles".to_string(),
        "dc" => "washington dc".to_string(),
        "uk" => "united kingdom".to_string(),
        "usa" | "us" => "united states".to_string(),
        other => other.to_string(),
    }
}

fn normalize_location(raw: &str) -> String {
    let lower = raw.trim().to_lowercase();
    let city_only = lower.split(',').next().unwrap_or(&lower).trim();
    expand_abbreviation(city_only)
}

/// Splits a normalized location into its city and (if present) region, the
/// same way `location_inference.py:_extract_city_region` does.
fn extract_city_region(normalized: &str) -> (Option<String>, Option<String>) {
    let parts: Vec<&str> = normalized.split(',').map(str::trim).collect();
    match parts.as_slice() {
        [] => (None, None),
        [city] => (Some((*city).to_string()), None),
        [city, region, ..] => (Some((*city).to_string()), Some((*region).to_string())),
    }
}

struct Group {
    key: String,
    display: String,
    original: String,
    weighted_sum: f64,
    weight_sum: f64,
    source_types: Vec<String>,
}

/// Folds one `(source_type, confidence)` contribution into the group keyed
/// by `key`, creating it on first sight. A single hint contributes under
/// both its full normalized key and its city-only key, so a lone hint with
/// no comma lands two entries in the same group — exactly enough to clear
/// the two-source alternatives threshold on its own.
fn add_contribution(groups: &mut Vec<Group>, key: String, original: &str, source_type: &str, confidence: f64) {
    let weight = source_weight(source_type) * confidence.clamp(0.0, 1.0);
    if let Some(group) = groups.iter_mut().find(|g| g.key == key) {
        group.weighted_sum += weight;
        group.weight_sum += source_weight(source_type);
        group.source_types.push(source_type.to_string());
    } else {
        groups.push(Group {
            display: title_case(&key),
            key,
            original: original.to_string(),
            weighted_sum: weight,
            weight_sum: source_weight(source_type),
            source_types: vec![source_type.to_string()],
        });
    }
}

/// Groups every raw location hint across the scan, weights by source
/// reliability, and emits the winning location plus alternatives.
pub struct LocationAggregatorProbe;

impl Probe for LocationAggregatorProbe {
    fn name(&self) -> &'static str {
        "location_aggregator"
    }

    fn description(&self) -> &'static str {
        "Aggregates location hints across every probe into a weighted-confidence estimate."
    }

    fn run(&self, seed: Seed, _depth: u8, parent_id: FindingId) -> BoxStream<'static, Finding> {
        let hints = seed
            .as_aggregate()
            .map(|state| state.locations.clone())
            .unwrap_or_default();

        Box::pin(stream! {
            if hints.is_empty() {
                return;
            }

            let mut groups: Vec<Group> = Vec::new();
            for hint in &hints {
                let normalized = normalize_location(&hint.location);
                add_contribution(&mut groups, normalized.clone(), &hint.location, &hint.source_type, hint.confidence);

                if let (Some(city), _) = extract_city_region(&normalized) {
                    add_contribution(&mut groups, city, &hint.location, &hint.source_type, hint.confidence * 0.8);
                }
            }

            groups.sort_by(|a, b| {
                let confidence_a = a.weighted_sum / a.weight_sum.max(0.0001);
                let confidence_b = b.weighted_sum / b.weight_sum.max(0.0001);
                confidence_b.partial_cmp(&confidence_a).unwrap_or(std::cmp::Ordering::Equal)
            });

            let Some(winner) = groups.first() else { return };
            let base_confidence = winner.weighted_sum / winner.weight_sum.max(0.0001);
            let source_count_bonus = (winner.source_types.len() as f64 * 0.1).min(0.3);
            let confidence = (base_confidence + source_count_bonus).min(1.0);

            if confidence < 0.3 {
                return;
            }

            let (confidence_label, severity) = if confidence >= 0.8 {
                ("high", Severity::High)
            } else if confidence >= 0.5 {
                ("medium", Severity::Medium)
            } else {
                ("low", Severity::Low)
            };

            let original_title = title_case(&winner.original);

            yield Finding::builder(FindingType::PersonalInfo, severity)
                .title(format!("Probable Location: {original_title}"))
                .description(format!(
                    "{confidence_label} confidence ({confidence:.2}), corroborated by {} source(s): {}",
                    winner.source_types.len(),
                    winner.source_types.join(", "),
                ))
                .source("location_aggregator")
                .data_field("location", winner.original.clone())
                .data_field("normalized", winner.key.clone())
                .data_field("confidence", confidence)
                .data_field("confidence_label", confidence_label)
                .parent_id(parent_id)
                .link_label("probably in")
                .build();

            let alternatives: Vec<&Group> = groups
                .iter()
                .skip(1)
                .filter(|g| g.source_types.len() >= 2)
                .collect();

            if !alternatives.is_empty() {
                let names: Vec<String> = alternatives.iter().map(|g| g.display.clone()).collect();
                let description = alternatives
                    .iter()
                    .map(|g| format!("{} ({} sources)", g.display, g.source_types.len()))
                    .collect::<Vec<_>>()
                    .join("; ");
                yield Finding::builder(FindingType::PersonalInfo, Severity::Low)
                    .title(format!("Alternative Locations: {}", names.join(", ")))
                    .description(description)
                    .source("location_aggregator")
                    .parent_id(parent_id)
                    .link_label("possibly in")
                    .build();
            }
        })
    }
}

fn title_case(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use osint_model::{AggregatedState, LocationHint};
    use std::sync::Arc;
    use std::time::Instant;

    #[test]
    fn expands_common_abbreviations() {
        assert_eq!(normalize_location("SF"), "san francisco");
        assert_eq!(normalize_location("NYC, USA"), "new york city");
    }

    #[test]
    fn source_weights_rank_linkedin_above_ip_geolocation() {
        assert!(source_weight("linkedin_profile") > source_weight("ip_geolocation"));
    }

    #[test]
    fn title_case_capitalizes_each_word() {
        assert_eq!(title_case("san francisco"), "San Francisco");
    }

    #[tokio::test]
    async fn a_lone_comma_free_hint_still_clears_the_alternatives_threshold() {
        let mut state = AggregatedState::new(Instant::now());
        state.locations.push(LocationHint {
            location: "berlin".to_string(),
            source: "twitter".to_string(),
            source_type: "twitter_profile".to_string(),
            confidence: 0.9,
        });
        state.locations.push(LocationHint {
            location: "san francisco, ca".to_string(),
            source: "linkedin".to_string(),
            source_type: "linkedin_profile".to_string(),
            confidence: 0.9,
        });

        let probe = LocationAggregatorProbe;
        let parent_id = Finding::builder(FindingType::Email, Severity::Low).build().id();
        let findings: Vec<_> = probe
            .run(Seed::Aggregate(Arc::new(state)), 3, parent_id)
            .collect()
            .await;

        let winner = findings.iter().find(|f| f.title().starts_with("Probable Location:")).unwrap();
        assert!(winner.title().contains("San Francisco, Ca"));
        assert_eq!(winner.link_label(), Some("probably in"));

        let alternatives = findings.iter().find(|f| f.title().starts_with("Alternative Locations:")).unwrap();
        assert!(alternatives.title().contains("Berlin"));
        assert_eq!(alternatives.link_label(), Some("possibly in"));
    }
}
