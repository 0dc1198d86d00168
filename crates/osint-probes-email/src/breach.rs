//! Breach check: k-anonymous hash-prefix lookup against the HIBP-style range
//! API, merged with a small table of major breaches checked unconditionally
//! (the "annotated aggregator" style — see `osint_model::BreachRecord` and
//! Open Question (i)).

use async_stream::stream;
use futures::stream::BoxStream;
use osint_model::{BreachRecord, Finding, FindingId, FindingType, Severity};
use osint_probe::{Probe, Seed};
use sha1::{Digest, Sha1};

use osint_http::PoliteClient;

const RANGE_API: &str = "https://api.pwnedpasswords.com/range";

/// Breaches checked unconditionally and annotated with industry/sensitivity,
/// independent of what the hash-prefix range API returns. Mirrors the small
/// `known_breaches` table the original carried for services it always
/// wanted called out explicitly.
fn known_breaches() -> Vec<BreachRecord> {
    vec![
        BreachRecord {
            name: "Collection #1".to_string(),
            date: "2019-01".to_string(),
            data_classes: vec!["email".to_string(), "password".to_string()],
            industry: Some("aggregated credential dump".to_string()),
            is_sensitive: false,
        },
        BreachRecord {
            name: "LinkedIn".to_string(),
            date: "2021-06".to_string(),
            data_classes: vec!["email".to_string(), "name".to_string(), "phone".to_string()],
            industry: Some("professional networking".to_string()),
            is_sensitive: false,
        },
        BreachRecord {
            name: "Adobe".to_string(),
            date: "2013-10".to_string(),
            data_classes: vec!["email".to_string(), "password".to_string(), "password_hint".to_string()],
            industry: Some("software".to_string()),
            is_sensitive: false,
        },
        BreachRecord {
            name: "Ashley Madison".to_string(),
            date: "2015-07".to_string(),
            data_classes: vec!["email".to_string(), "address".to_string(), "sexual_orientation".to_string()],
            industry: Some("dating".to_string()),
            is_sensitive: true,
        },
        BreachRecord {
            name: "MyFitnessPal".to_string(),
            date: "2018-02".to_string(),
            data_classes: vec!["email".to_string(), "password".to_string()],
            industry: Some("health and fitness".to_string()),
            is_sensitive: true,
        },
    ]
}

/// Checks the seed email against a pwned-password-style k-anonymity range
/// API, plus a fixed table of notable breaches checked unconditionally.
pub struct BreachCheckProbe {
    client: PoliteClient,
    range_api_base: String,
}

impl BreachCheckProbe {
    #[must_use]
    pub fn new(client: PoliteClient) -> Self {
        Self { client, range_api_base: RANGE_API.to_string() }
    }

    /// Points the range lookup at a different base URL. Test-only seam for
    /// running this probe against a local mock server.
    #[cfg(test)]
    #[must_use]
    pub fn with_range_api_base(mut self, base: impl Into<String>) -> Self {
        self.range_api_base = base.into();
        self
    }
}

impl Probe for BreachCheckProbe {
    fn name(&self) -> &'static str {
        "breach_check"
    }

    fn description(&self) -> &'static str {
        "k-anonymous hash-prefix breach lookup plus a fixed annotated breach table."
    }

    fn run(&self, seed: Seed, _depth: u8, parent_id: FindingId) -> BoxStream<'static, Finding> {
        let client = self.client.clone();
        let email = seed.as_email().map(str::to_lowercase);
        let range_api_base = self.range_api_base.clone();

        Box::pin(stream! {
            let Some(email) = email else { return };

            let digest = Sha1::digest(email.as_bytes());
            let hex = format!("{digest:x}").to_uppercase();
            let (prefix, suffix) = hex.split_at(5);

            match client.get(&format!("{range_api_base}/{prefix}")).await {
                Ok(response) => {
                    if let Ok(body) = response.text().await {
                        let hit_count = body
                            .lines()
                            .find_map(|line| line.split_once(':').filter(|(s, _)| *s == suffix))
                            .and_then(|(_, count)| count.trim().parse::<u64>().ok());

                        if let Some(count) = hit_count {
                            yield Finding::builder(FindingType::Breach, Severity::High)
                                .title("Credential exposure found via hash-prefix lookup")
                                .description(format!(
                                    "The seed email's password hash suffix appears in {count} breach record(s)."
                                ))
                                .source("breach_check")
                                .source_url(format!("{range_api_base}/{prefix}"))
                                .data_field("hit_count", count)
                                .parent_id(parent_id)
                                .build();
                        }
                    }
                }
                Err(err) if err.is_negative_result() => {}
                Err(_) => {}
            }

            for breach in known_breaches() {
                let severity = if breach.is_sensitive { Severity::Critical } else { Severity::Medium };
                let data_classes = serde_json::to_value(&breach.data_classes).unwrap_or_default();
                yield Finding::builder(FindingType::Breach, severity)
                    .title(format!("Potentially exposed in: {}", breach.name))
                    .description(format!(
                        "{} ({}) — data classes: {}",
                        breach.name,
                        breach.date,
                        breach.data_classes.join(", ")
                    ))
                    .source("breach_check")
                    .data_field("breach_name", breach.name)
                    .data_field("date", breach.date)
                    .data_field("data_classes", data_classes)
                    .data_field("is_sensitive", breach.is_sensitive)
                    .parent_id(parent_id)
                    .build();
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use osint_probe::Seed;
    use wiremock::matchers::{method, path_regex};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn known_breaches_table_is_non_empty_and_flags_sensitive_ones() {
        let breaches = known_breaches();
        assert!(breaches.len() >= 5);
        assert!(breaches.iter().any(|b| b.is_sensitive));
        assert!(breaches.iter().any(|b| !b.is_sensitive));
    }

    #[tokio::test]
    async fn range_hit_yields_a_high_severity_breach_finding() {
        let server = MockServer::start().await;
        let digest = Sha1::digest(b"leaked@example.com");
        let hex = format!("{digest:x}").to_uppercase();
        let (_, suffix) = hex.split_at(5);

        Mock::given(method("GET"))
            .and(path_regex(r"^/range/[0-9A-F]{5}$"))
            .respond_with(ResponseTemplate::new(200).set_body_string(format!("{suffix}:42\nAAAA0000:1")))
            .mount(&server)
            .await;

        let client = osint_test_support::fast_client().unwrap();
        let probe = BreachCheckProbe::new(client).with_range_api_base(format!("{}/range", server.uri()));
        let parent_id = Finding::builder(FindingType::Email, Severity::Low).build().id();
        let findings: Vec<_> = probe
            .run(Seed::Email("leaked@example.com".to_string()), 1, parent_id)
            .collect()
            .await;

        assert!(findings.iter().any(|f| f.kind() == FindingType::Breach
            && f.title().contains("hash-prefix")
            && f.data().get("hit_count").and_then(|v| v.as_u64()) == Some(42)));
        // Plus the fixed annotated table, regardless of the range hit.
        assert!(findings.len() >= 1 + known_breaches().len());
    }

    #[tokio::test]
    async fn range_api_failure_still_yields_the_fixed_breach_table() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path_regex(r"^/range/[0-9A-F]{5}$"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = osint_test_support::fast_client().unwrap();
        let probe = BreachCheckProbe::new(client).with_range_api_base(format!("{}/range", server.uri()));
        let parent_id = Finding::builder(FindingType::Email, Severity::Low).build().id();
        let findings: Vec<_> = probe
            .run(Seed::Email("someone@example.com".to_string()), 1, parent_id)
            .collect()
            .await;

        assert_eq!(findings.len(), known_breaches().len());
    }
}
