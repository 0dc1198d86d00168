//! Email-reputation reverse lookup against EmailRep.io: reputation tier,
//! suspicious/malicious/blacklist flags, and whether the address belongs to
//! a free provider.

use async_stream::stream;
use futures::stream::BoxStream;
use osint_model::{Finding, FindingId, FindingType, Severity};
use osint_probe::{Probe, Seed};
use serde_json::Value;

use osint_http::PoliteClient;

/// Looks up the seed email's reputation via an EmailRep.io-style API.
pub struct EmailReputationProbe {
    client: PoliteClient,
}

impl EmailReputationProbe {
    #[must_use]
    pub fn new(client: PoliteClient) -> Self {
        Self { client }
    }
}

impl Probe for EmailReputationProbe {
    fn name(&self) -> &'static str {
        "email_reputation"
    }

    fn description(&self) -> &'static str {
        "Queries an email-reputation service for suspicious/malicious/blacklist signals."
    }

    fn run(&self, seed: Seed, _depth: u8, parent_id: FindingId) -> BoxStream<'static, Finding> {
        let client = self.client.clone();
        let email = seed.as_email().map(str::to_string);

        Box::pin(stream! {
            let Some(email) = email else { return };
            let url = format!("https://emailrep.io/{}", urlencoding_encode(&email));

            let response = match client.get(&url).await {
                Ok(response) => response,
                Err(err) if err.is_negative_result() => return,
                Err(_) => return,
            };

            let Ok(body): Result<Value, _> = response.json().await else { return };

            let reputation = body.get("reputation").and_then(Value::as_str).unwrap_or("unknown");
            let suspicious = body.get("suspicious").and_then(Value::as_bool).unwrap_or(false);
            let details = body.get("details").cloned().unwrap_or_default();
            let blacklisted = details.get("blacklisted").and_then(Value::as_bool).unwrap_or(false);
            let malicious_activity = details.get("malicious_activity").and_then(Value::as_bool).unwrap_or(false);
            let data_breach = details.get("data_breach").and_then(Value::as_bool).unwrap_or(false);
            let free_provider = details.get("free_provider").and_then(Value::as_bool).unwrap_or(false);
            let deliverable = details.get("deliverable").and_then(Value::as_bool).unwrap_or(true);

            let severity = if malicious_activity || blacklisted {
                Severity::High
            } else if suspicious {
                Severity::Medium
            } else {
                Severity::Low
            };

            yield Finding::builder(FindingType::PersonalInfo, severity)
                .title(format!("Email reputation: {reputation}"))
                .description(format!(
                    "suspicious={suspicious} blacklisted={blacklisted} malicious_activity={malicious_activity} \
                     data_breach={data_breach} free_provider={free_provider} deliverable={deliverable}"
                ))
                .source("email_reputation")
                .source_url(url)
                .data_field("reputation", reputation)
                .data_field("suspicious", suspicious)
                .data_field("blacklisted", blacklisted)
                .parent_id(parent_id)
                .build();

            if data_breach {
                yield Finding::builder(FindingType::Breach, Severity::Medium)
                    .title("Email-reputation service reports prior breach involvement")
                    .description("The reputation service's own breach signal is set for this address.")
                    .source("email_reputation")
                    .parent_id(parent_id)
                    .build();
            }
        })
    }
}

fn urlencoding_encode(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}
