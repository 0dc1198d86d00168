//! Paste-site dump search: searches GitHub's code-search index for the
//! literal email string, a reasonable proxy for paste-site scraping since
//! pastes are frequently mirrored into public gists and repos.

use async_stream::stream;
use futures::stream::BoxStream;
use osint_model::{Finding, FindingId, FindingType, Severity};
use osint_probe::{Probe, Seed};
use serde_json::Value;

use osint_http::PoliteClient;

/// Searches GitHub code search (as a paste-mirror proxy) for the literal
/// seed email string.
pub struct PasteSiteSearchProbe {
    client: PoliteClient,
}

impl PasteSiteSearchProbe {
    #[must_use]
    pub fn new(client: PoliteClient) -> Self {
        Self { client }
    }
}

impl Probe for PasteSiteSearchProbe {
    fn name(&self) -> &'static str {
        "paste_site_search"
    }

    fn description(&self) -> &'static str {
        "Searches GitHub code search for the seed email as a paste/gist-mirror proxy."
    }

    fn run(&self, seed: Seed, _depth: u8, parent_id: FindingId) -> BoxStream<'static, Finding> {
        let client = self.client.clone();
        let email = seed.as_email().map(str::to_string);

        Box::pin(stream! {
            let Some(email) = email else { return };
            let url = format!(
                "https://api.github.com/search/code?q={}+in:file",
                urlencoding::encode(&format!("\"{email}\""))
            );

            let response = match client.get_authenticated(&url).await {
                Ok(response) => response,
                Err(err) if err.is_negative_result() => return,
                Err(_) => return,
            };
            let Ok(body): Result<Value, _> = response.json().await else { return };

            let total = body.get("total_count").and_then(Value::as_u64).unwrap_or(0);
            if total == 0 {
                return;
            }

            let sample: Vec<String> = body
                .get("items")
                .and_then(Value::as_array)
                .into_iter()
                .flatten()
                .take(5)
                .filter_map(|item| item.get("html_url").and_then(Value::as_str).map(str::to_string))
                .collect();

            yield Finding::builder(FindingType::PersonalInfo, Severity::High)
                .title(format!("Email string found in {total} public code/paste-mirror hit(s)"))
                .description(format!("Sample URLs: {}", sample.join(", ")))
                .source("paste_site_search")
                .source_url(url)
                .data_field("total_count", total)
                .data_field("sample_urls", sample)
                .parent_id(parent_id)
                .build();
        })
    }
}
