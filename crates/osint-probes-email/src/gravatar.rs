//! Gravatar profile lookup: hash the email into Gravatar's MD5 identifier,
//! check the avatar exists (not the default silhouette), and pull the
//! public JSON profile if one is published.

use async_stream::stream;
use futures::stream::BoxStream;
use md5::compute as md5_compute;
use osint_model::{Finding, FindingId, FindingType, Severity};
use osint_probe::{Probe, Seed};
use serde_json::Value;

use osint_http::PoliteClient;

const GRAVATAR_BASE: &str = "https://www.gravatar.com";

/// Checks Gravatar for a published avatar and profile under the seed
/// email's MD5 hash.
pub struct GravatarLookupProbe {
    client: PoliteClient,
    base_url: String,
}

impl GravatarLookupProbe {
    #[must_use]
    pub fn new(client: PoliteClient) -> Self {
        Self { client, base_url: GRAVATAR_BASE.to_string() }
    }

    /// Test-only seam for pointing lookups at a local mock server.
    #[cfg(test)]
    #[must_use]
    pub fn with_base_url(mut self, base: impl Into<String>) -> Self {
        self.base_url = base.into();
        self
    }
}

impl Probe for GravatarLookupProbe {
    fn name(&self) -> &'static str {
        "gravatar_lookup"
    }

    fn description(&self) -> &'static str {
        "Checks Gravatar for a non-default avatar and public JSON profile."
    }

    fn run(&self, seed: Seed, _depth: u8, parent_id: FindingId) -> BoxStream<'static, Finding> {
        let client = self.client.clone();
        let email = seed.as_email().map(|e| e.trim().to_lowercase());
        let base_url = self.base_url.clone();

        Box::pin(stream! {
            let Some(email) = email else { return };
            let hash = format!("{:x}", md5_compute(email.as_bytes()));

            let avatar_url = format!("{base_url}/avatar/{hash}?d=404");
            let has_avatar = matches!(client.get(&avatar_url).await, Ok(_));
            if has_avatar {
                yield Finding::builder(FindingType::PersonalInfo, Severity::Low)
                    .title("Gravatar avatar found")
                    .description("The seed email has a non-default avatar registered with Gravatar.")
                    .source("gravatar_lookup")
                    .source_url(format!("{base_url}/avatar/{hash}"))
                    .parent_id(parent_id)
                    .build();
            }

            let profile_url = format!("{base_url}/{hash}.json");
            let response = match client.get(&profile_url).await {
                Ok(response) => response,
                Err(err) if err.is_negative_result() => return,
                Err(_) => return,
            };
            let Ok(body): Result<Value, _> = response.json().await else { return };
            let Some(entry) = body.get("entry").and_then(Value::as_array).and_then(|a| a.first()) else {
                return;
            };

            let display_name = entry.get("displayName").and_then(Value::as_str).unwrap_or_default();
            let profile_about = entry.get("aboutMe").and_then(Value::as_str).unwrap_or_default();
            let profile_location = entry.get("currentLocation").and_then(Value::as_str);

            yield Finding::builder(FindingType::PersonalInfo, Severity::Medium)
                .title(format!("Gravatar profile: {display_name}"))
                .description(profile_about.to_string())
                .source("gravatar_lookup")
                .source_url(profile_url)
                .data_field("display_name", display_name)
                .parent_id(parent_id)
                .build();

            if let Some(location) = profile_location.filter(|l| !l.is_empty()) {
                yield Finding::builder(FindingType::PersonalInfo, Severity::Medium)
                    .title(format!("Location hint from Gravatar: {location}"))
                    .description("Self-reported location on the public Gravatar profile.")
                    .source("gravatar_profile")
                    .data_field("location", location)
                    .data_field("source_type", "gravatar_profile")
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
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn published_profile_yields_name_and_location_findings() {
        let server = MockServer::start().await;
        let hash = format!("{:x}", md5_compute(b"someone@example.com"));

        Mock::given(method("GET"))
            .and(path(format!("/avatar/{hash}")))
            .respond_with(ResponseTemplate::new(200).set_body_string("image-bytes"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(format!("/{hash}.json")))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"entry":[{"displayName":"Jane Doe","aboutMe":"hi","currentLocation":"Berlin"}]}"#,
            ))
            .mount(&server)
            .await;

        let client = osint_test_support::fast_client().unwrap();
        let probe = GravatarLookupProbe::new(client).with_base_url(server.uri());
        let parent_id = Finding::builder(FindingType::Email, Severity::Low).build().id();
        let findings: Vec<_> = probe
            .run(Seed::Email("someone@example.com".to_string()), 1, parent_id)
            .collect()
            .await;

        assert!(findings.iter().any(|f| f.title().contains("avatar found")));
        assert!(findings.iter().any(|f| f.title().contains("Jane Doe")));
        assert!(findings.iter().any(|f| f.title().contains("Berlin")));
    }

    #[tokio::test]
    async fn missing_profile_yields_no_findings() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = osint_test_support::fast_client().unwrap();
        let probe = GravatarLookupProbe::new(client).with_base_url(server.uri());
        let parent_id = Finding::builder(FindingType::Email, Severity::Low).build().id();
        let findings: Vec<_> = probe
            .run(Seed::Email("nobody@example.com".to_string()), 1, parent_id)
            .collect()
            .await;

        assert!(findings.is_empty());
    }
}
