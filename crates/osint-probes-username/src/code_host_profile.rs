//! Deep code-host profile reader: pulls the full public profile (name,
//! company, location, public email, blog, bio, follower/following/repo
//! counts) and scans the user's repo languages for a language-diversity
//! signal.

use std::collections::BTreeSet;

use async_stream::stream;
use futures::stream::BoxStream;
use osint_model::{Finding, FindingId, FindingType, Severity};
use osint_probe::{Probe, Seed};
use serde_json::Value;

use osint_http::PoliteClient;

const GITHUB_API_BASE: &str = "https://api.github.com";

/// Reads a GitHub user's full public profile and repo languages.
pub struct CodeHostProfileProbe {
    client: PoliteClient,
    base_url: String,
}

impl CodeHostProfileProbe {
    #[must_use]
    pub fn new(client: PoliteClient) -> Self {
        Self { client, base_url: GITHUB_API_BASE.to_string() }
    }

    /// Test-only seam for pointing lookups at a local mock server.
    #[cfg(test)]
    #[must_use]
    pub fn with_base_url(mut self, base: impl Into<String>) -> Self {
        self.base_url = base.into();
        self
    }
}

impl Probe for CodeHostProfileProbe {
    fn name(&self) -> &'static str {
        "code_host_profile"
    }

    fn description(&self) -> &'static str {
        "Reads a GitHub user's full public profile, commit emails, and repo languages."
    }

    fn run(&self, seed: Seed, depth: u8, parent_id: FindingId) -> BoxStream<'static, Finding> {
        let client = self.client.clone();
        let username = seed.as_username().map(str::to_string);
        let base_url = self.base_url.clone();

        Box::pin(stream! {
            let Some(username) = username else { return };
            let profile_url = format!("{base_url}/users/{username}");

            let response = match client.get_authenticated(&profile_url).await {
                Ok(response) => response,
                Err(err) if err.is_negative_result() => return,
                Err(_) => return,
            };
            let Ok(profile): Result<Value, _> = response.json().await else { return };

            if let Some(name) = profile.get("name").and_then(Value::as_str).filter(|n| !n.is_empty()) {
                yield Finding::builder(FindingType::PersonalInfo, Severity::High)
                    .title(format!("Real name on GitHub: {name}"))
                    .source("code_host_profile")
                    .data_field("name", name)
                    .parent_id(parent_id)
                    .build();
            }
            if let Some(location) = profile.get("location").and_then(Value::as_str).filter(|l| !l.is_empty()) {
                yield Finding::builder(FindingType::PersonalInfo, Severity::Medium)
                    .title(format!("Location on GitHub: {location}"))
                    .source("github_profile")
                    .data_field("location", location)
                    .data_field("source_type", "github_profile")
                    .parent_id(parent_id)
                    .build();
            }
            if let Some(company) = profile.get("company").and_then(Value::as_str).filter(|c| !c.is_empty()) {
                yield Finding::builder(FindingType::PersonalInfo, Severity::Medium)
                    .title(format!("Company on GitHub: {company}"))
                    .source("code_host_profile")
                    .data_field("company", company)
                    .parent_id(parent_id)
                    .build();
            }
            if let Some(public_email) = profile.get("email").and_then(Value::as_str).filter(|e| !e.is_empty()) {
                yield Finding::builder(FindingType::Email, Severity::High)
                    .title(format!("Public email on GitHub: {public_email}"))
                    .source("code_host_profile")
                    .data_field("email", public_email)
                    .parent_id(parent_id)
                    .build();
            }
            if let Some(blog) = profile.get("blog").and_then(Value::as_str).filter(|b| !b.is_empty()) {
                yield Finding::builder(FindingType::PersonalInfo, Severity::Low)
                    .title(format!("Linked website: {blog}"))
                    .source("code_host_profile")
                    .data_field("url", blog)
                    .parent_id(parent_id)
                    .build();
            }
            if let Some(bio) = profile.get("bio").and_then(Value::as_str).filter(|b| !b.is_empty()) {
                yield Finding::builder(FindingType::PersonalInfo, Severity::Low)
                    .title("GitHub bio")
                    .description(bio.to_string())
                    .source("code_host_profile")
                    .data_field("bio", bio)
                    .parent_id(parent_id)
                    .build();
            }

            let repos = profile.get("public_repos").and_then(Value::as_u64).unwrap_or(0);
            let followers = profile.get("followers").and_then(Value::as_u64).unwrap_or(0);
            let following = profile.get("following").and_then(Value::as_u64).unwrap_or(0);
            yield Finding::builder(FindingType::PersonalInfo, Severity::Low)
                .title(format!("GitHub activity: {repos} repos, {followers} followers, {following} following"))
                .source("code_host_profile")
                .data_field("public_repos", repos)
                .data_field("followers", followers)
                .data_field("following", following)
                .parent_id(parent_id)
                .build();

            if depth < 2 {
                return;
            }

            let repos_url = format!("{base_url}/users/{username}/repos?per_page=100");
            let Ok(response) = client.get_authenticated(&repos_url).await else { return };
            let Ok(repo_list): Result<Value, _> = response.json().await else { return };

            let languages: BTreeSet<String> = repo_list
                .as_array()
                .into_iter()
                .flatten()
                .filter_map(|repo| repo.get("language").and_then(Value::as_str))
                .map(str::to_string)
                .collect();

            if languages.len() >= 3 {
                yield Finding::builder(FindingType::PersonalInfo, Severity::Low)
                    .title(format!("Polyglot repo languages: {}", languages.len()))
                    .description(format!("Languages observed: {}", languages.into_iter().collect::<Vec<_>>().join(", ")))
                    .source("code_host_profile")
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
    async fn full_profile_at_depth_two_yields_profile_and_language_findings() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/users/janedoe"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"name":"Jane Doe","location":"Berlin","company":"Acme","email":"jane@acme.test",
                   "blog":"https://jane.dev","bio":"hacker","public_repos":12,"followers":3,"following":4}"#,
            ))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/users/janedoe/repos"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"[{"language":"Rust"},{"language":"Python"},{"language":"Go"}]"#,
            ))
            .mount(&server)
            .await;

        let client = osint_test_support::fast_client().unwrap();
        let probe = CodeHostProfileProbe::new(client).with_base_url(server.uri());
        let parent_id = Finding::builder(FindingType::Username, Severity::Low).build().id();
        let findings: Vec<_> = probe
            .run(Seed::Username("janedoe".to_string()), 2, parent_id)
            .collect()
            .await;

        assert!(findings.iter().any(|f| f.title().contains("Jane Doe")));
        assert!(findings.iter().any(|f| f.title().contains("Berlin")));
        assert!(findings.iter().any(|f| f.title().contains("Acme")));
        assert!(findings.iter().any(|f| f.kind() == FindingType::Email));
        assert!(findings.iter().any(|f| f.title().contains("Polyglot")));
    }

    #[tokio::test]
    async fn shallow_depth_skips_the_repo_language_call() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/users/janedoe"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"public_repos":1,"followers":0,"following":0}"#))
            .mount(&server)
            .await;

        let client = osint_test_support::fast_client().unwrap();
        let probe = CodeHostProfileProbe::new(client).with_base_url(server.uri());
        let parent_id = Finding::builder(FindingType::Username, Severity::Low).build().id();
        let findings: Vec<_> = probe
            .run(Seed::Username("janedoe".to_string()), 1, parent_id)
            .collect()
            .await;

        assert!(findings.iter().any(|f| f.title().contains("GitHub activity")));
        assert!(!findings.iter().any(|f| f.title().contains("Polyglot")));
    }
}
