//! Intelligence-aggregator leak search: queries a leak-intelligence
//! phonebook/search API for the seed email and extracts candidate usernames
//! out of the surrounding leak text, filtering a deny-list of common false
//! positives.

use async_stream::stream;
use futures::stream::BoxStream;
use osint_model::{is_valid_username, normalize_username, Finding, FindingId, FindingType, Severity};
use osint_probe::{Probe, Seed};
use regex::Regex;
use serde_json::Value;

use osint_http::PoliteClient;

/// Usernames that show up constantly in leak dumps as labels rather than
/// real handles — filtered out of extracted candidates.
const DENY_LIST: &[&str] = &["admin", "user", "test", "null", "none", "unknown", "anonymous"];

/// Searches a leak-intelligence aggregator's phonebook for the seed email
/// and mines candidate usernames from surrounding leak text.
pub struct IntelAggregatorProbe {
    client: PoliteClient,
}

impl IntelAggregatorProbe {
    #[must_use]
    pub fn new(client: PoliteClient) -> Self {
        Self { client }
    }
}

impl Probe for IntelAggregatorProbe {
    fn name(&self) -> &'static str {
        "intel_aggregator_leak_search"
    }

    fn description(&self) -> &'static str {
        "Searches a leak-intelligence aggregator's phonebook for the seed email."
    }

    fn run(&self, seed: Seed, _depth: u8, parent_id: FindingId) -> BoxStream<'static, Finding> {
        let client = self.client.clone();
        let email = seed.as_email().map(str::to_string);

        Box::pin(stream! {
            let Some(email) = email else { return };
            let url = format!(
                "https://2.intelx.io/phonebook/search?term={}",
                urlencoding::encode(&email)
            );

            let response = match client.get_authenticated(&url).await {
                Ok(response) => response,
                Err(err) if err.is_negative_result() => return,
                Err(_) => return,
            };
            let Ok(body): Result<Value, _> = response.json().await else { return };

            let selectors = body.get("selectors").and_then(Value::as_array).cloned().unwrap_or_default();
            if selectors.is_empty() {
                return;
            }

            yield Finding::builder(FindingType::Breach, Severity::High)
                .title(format!("Intelligence aggregator found {} leak record(s)", selectors.len()))
                .description("Seed email appears in an aggregated leak/phonebook index.")
                .source("intel_aggregator_leak_search")
                .source_url(url)
                .data_field("record_count", selectors.len() as u64)
                .parent_id(parent_id)
                .build();

            let username_pattern = Regex::new(r"[A-Za-z0-9_.-]{3,30}").expect("static pattern");
            let mut seen = std::collections::BTreeSet::new();

            for selector in &selectors {
                let Some(text) = selector.get("selectorvalue").and_then(Value::as_str) else { continue };
                for candidate in username_pattern.find_iter(text) {
                    let normalized = normalize_username(candidate.as_str());
                    if !is_valid_username(&normalized)
                        || DENY_LIST.contains(&normalized.as_str())
                        || normalized.contains('@')
                        || !seen.insert(normalized.clone())
                    {
                        continue;
                    }
                    yield Finding::builder(FindingType::Username, Severity::Medium)
                        .title(format!("Candidate username from leak text: {normalized}"))
                        .description("Extracted from text surrounding a leak-aggregator match; unconfirmed.")
                        .source("intel_aggregator_leak_search")
                        .data_field("username", normalized)
                        .parent_id(parent_id)
                        .link_label("leak text mention")
                        .build();
                }
            }
        })
    }
}
