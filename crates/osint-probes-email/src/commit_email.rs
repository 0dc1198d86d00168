//! Commit-author email search on the primary code host: search commits by
//! `author-email:`, and search user profiles with the raw email, to surface
//! usernames tied to the seed address.

use std::collections::BTreeSet;

use async_stream::stream;
use futures::stream::BoxStream;
use osint_model::{Finding, FindingId, FindingType, Severity};
use osint_probe::{Probe, Seed};
use serde_json::Value;

use osint_http::PoliteClient;

/// Finds GitHub usernames whose commits or profile are tied to the seed
/// email.
pub struct CommitEmailSearchProbe {
    client: PoliteClient,
}

impl CommitEmailSearchProbe {
    #[must_use]
    pub fn new(client: PoliteClient) -> Self {
        Self { client }
    }
}

impl Probe for CommitEmailSearchProbe {
    fn name(&self) -> &'static str {
        "commit_email_search"
    }

    fn description(&self) -> &'static str {
        "Searches GitHub commits and user profiles tied to the seed email."
    }

    fn run(&self, seed: Seed, _depth: u8, parent_id: FindingId) -> BoxStream<'static, Finding> {
        let client = self.client.clone();
        let email = seed.as_email().map(str::to_string);

        Box::pin(stream! {
            let Some(email) = email else { return };
            let mut usernames = BTreeSet::new();

            let commits_url = format!(
                "https://api.github.com/search/commits?q=author-email:{}",
                urlencoding::encode(&email)
            );
            if let Ok(response) = client.get_authenticated(&commits_url).await {
                if let Ok(body) = response.json::<Value>().await {
                    for item in body.get("items").and_then(Value::as_array).into_iter().flatten() {
                        for role in ["author", "committer"] {
                            if let Some(login) = item.get(role).and_then(|a| a.get("login")).and_then(Value::as_str) {
                                usernames.insert(login.to_string());
                            }
                        }
                    }
                }
            }

            let users_url = format!(
                "https://api.github.com/search/users?q={}+in:email",
                urlencoding::encode(&email)
            );
            if let Ok(response) = client.get_authenticated(&users_url).await {
                if let Ok(body) = response.json::<Value>().await {
                    for item in body.get("items").and_then(Value::as_array).into_iter().flatten() {
                        if let Some(login) = item.get("login").and_then(Value::as_str) {
                            usernames.insert(login.to_string());
                        }
                    }
                }
            }

            for username in usernames {
                yield Finding::builder(FindingType::Username, Severity::High)
                    .title(format!("GitHub username tied to seed email: {username}"))
                    .description("Discovered via commit-author or user-search match on the seed email.")
                    .source("commit_email_search")
                    .source_url(format!("https://github.com/{username}"))
                    .data_field("username", username.clone())
                    .data_field("platform", "github")
                    .parent_id(parent_id)
                    .link_label("commit author match")
                    .build();
            }
        })
    }
}
