//! Infostealer-log search: queries a stealer-log search API for the seed
//! email and surfaces any infected-host record with the platforms whose
//! saved credentials were harvested.

use async_stream::stream;
use futures::stream::BoxStream;
use osint_model::{Finding, FindingId, FindingType, Severity};
use osint_probe::{Probe, Seed};
use serde_json::Value;

use osint_http::PoliteClient;

/// Well-known domains extracted from stolen-credential URLs, mapped to the
/// platform name used in the resulting finding.
const PLATFORM_DOMAINS: &[(&str, &str)] = &[
    ("facebook.com", "Facebook"),
    ("instagram.com", "Instagram"),
    ("twitter.com", "Twitter/X"),
    ("x.com", "Twitter/X"),
    ("linkedin.com", "LinkedIn"),
    ("github.com", "GitHub"),
    ("paypal.com", "PayPal"),
    ("amazon.com", "Amazon"),
    ("netflix.com", "Netflix"),
    ("google.com", "Google"),
];

fn platform_for_url(url: &str) -> Option<&'static str> {
    PLATFORM_DOMAINS
        .iter()
        .find(|(domain, _)| url.contains(domain))
        .map(|(_, name)| *name)
}

/// Checks an infostealer-log aggregator for infected-host records
/// containing the seed email's saved credentials.
pub struct InfostealerLogProbe {
    client: PoliteClient,
}

impl InfostealerLogProbe {
    #[must_use]
    pub fn new(client: PoliteClient) -> Self {
        Self { client }
    }
}

impl Probe for InfostealerLogProbe {
    fn name(&self) -> &'static str {
        "infostealer_log_search"
    }

    fn description(&self) -> &'static str {
        "Searches an infostealer-log aggregator for infected-host records tied to the seed email."
    }

    fn run(&self, seed: Seed, _depth: u8, parent_id: FindingId) -> BoxStream<'static, Finding> {
        let client = self.client.clone();
        let email = seed.as_email().map(str::to_string);

        Box::pin(stream! {
            let Some(email) = email else { return };
            let url = format!(
                "https://cavalier.hudsonrock.com/api/json/v2/osint-tools/search-by-email?email={}",
                urlencoding::encode(&email)
            );

            let response = match client.get(&url).await {
                Ok(response) => response,
                Err(err) if err.is_negative_result() => return,
                Err(_) => return,
            };
            let Ok(body): Result<Value, _> = response.json().await else { return };

            let Some(data) = body.get("data") else { return };
            let stealers = data.get("stealers").and_then(Value::as_array).cloned().unwrap_or_default();
            if stealers.is_empty() {
                return;
            }

            yield Finding::builder(FindingType::Breach, Severity::Critical)
                .title(format!("Email appears in {} infostealer log(s)", stealers.len()))
                .description(
                    "The seed email was found in credentials harvested by infostealer malware on a \
                     compromised device. Any saved passwords for the affected sites should be rotated."
                        .to_string(),
                )
                .source("infostealer_log_search")
                .source_url(url)
                .data_field("infection_count", stealers.len() as u64)
                .parent_id(parent_id)
                .build();

            let mut seen_platforms = std::collections::BTreeSet::new();
            for stealer in &stealers {
                for credential_url in stealer
                    .get("top_passwords_urls")
                    .or_else(|| stealer.get("top_logins"))
                    .and_then(Value::as_array)
                    .into_iter()
                    .flatten()
                    .filter_map(Value::as_str)
                {
                    if let Some(platform) = platform_for_url(credential_url) {
                        if seen_platforms.insert(platform) {
                            yield Finding::builder(FindingType::Account, Severity::Critical)
                                .title(format!("Stolen credentials for {platform} in infostealer log"))
                                .description("Harvested by malware from an infected device; treat as compromised.")
                                .source("infostealer_log_search")
                                .data_field("platform", platform)
                                .parent_id(parent_id)
                                .link_label("infostealer credential")
                                .build();
                        }
                    }
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_known_credential_urls_to_platform_names() {
        assert_eq!(platform_for_url("https://www.facebook.com/login"), Some("Facebook"));
        assert_eq!(platform_for_url("https://unknown-site.example/login"), None);
    }
}
