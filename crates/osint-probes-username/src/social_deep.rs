//! Social deep-dive against Reddit: pulls the `about.json` profile plus
//! recent `comments.json`, infers a location hint from a
//! subreddit-participation table, and regex-extracts phone numbers, URLs,
//! and cross-platform handles mentioned in the bio.

use async_stream::stream;
use futures::stream::BoxStream;
use osint_model::{Finding, FindingId, FindingType, Severity};
use osint_probe::{Probe, Seed};
use regex::Regex;
use serde_json::Value;

use osint_http::PoliteClient;

/// Subreddits whose participation is a reasonably strong location signal.
const LOCATION_SUBREDDITS: &[(&str, &str)] = &[
    ("london", "London, UK"),
    ("toronto", "Toronto, Canada"),
    ("nyc", "New York City, USA"),
    ("sanfrancisco", "San Francisco, USA"),
    ("losangeles", "Los Angeles, USA"),
    ("chicago", "Chicago, USA"),
    ("seattle", "Seattle, USA"),
    ("boston", "Boston, USA"),
    ("austin", "Austin, USA"),
    ("sydney", "Sydney, Australia"),
    ("melbourne", "Melbourne, Australia"),
    ("berlin", "Berlin, Germany"),
    ("paris", "Paris, France"),
    ("amsterdam", "Amsterdam, Netherlands"),
    ("dublin", "Dublin, Ireland"),
    ("dubai", "Dubai, UAE"),
    ("singapore", "Singapore"),
    ("mumbai", "Mumbai, India"),
    ("bangalore", "Bangalore, India"),
    ("tokyo", "Tokyo, Japan"),
    ("india", "India"),
    ("unitedkingdom", "United Kingdom"),
    ("canada", "Canada"),
    ("australia", "Australia"),
    ("germany", "Germany"),
];

fn phone_pattern() -> Regex {
    Regex::new(r"\+?\d[\d\s().-]{7,}\d").expect("static pattern")
}

fn url_pattern() -> Regex {
    Regex::new(r"https?://[^\s)]+").expect("static pattern")
}

/// Reads a Reddit user's profile and recent comments for karma, bio,
/// website, a subreddit-derived location hint, and contact-info leaks.
pub struct SocialDeepDiveProbe {
    client: PoliteClient,
}

impl SocialDeepDiveProbe {
    #[must_use]
    pub fn new(client: PoliteClient) -> Self {
        Self { client }
    }
}

impl Probe for SocialDeepDiveProbe {
    fn name(&self) -> &'static str {
        "social_deep_dive"
    }

    fn description(&self) -> &'static str {
        "Reads a Reddit profile and recent comment history for bio, location, and contact leaks."
    }

    fn run(&self, seed: Seed, _depth: u8, parent_id: FindingId) -> BoxStream<'static, Finding> {
        let client = self.client.clone();
        let username = seed.as_username().map(str::to_string);

        Box::pin(stream! {
            let Some(username) = username else { return };

            let about_url = format!("https://www.reddit.com/user/{username}/about.json");
            let response = match client.get(&about_url).await {
                Ok(response) => response,
                Err(err) if err.is_negative_result() => return,
                Err(_) => return,
            };
            let Ok(about): Result<Value, _> = response.json().await else { return };
            let Some(data) = about.get("data") else { return };

            let karma = data.get("total_karma").and_then(Value::as_i64).unwrap_or(0);
            yield Finding::builder(FindingType::PersonalInfo, Severity::Low)
                .title(format!("Reddit karma: {karma}"))
                .source("social_deep_dive")
                .data_field("karma", karma)
                .parent_id(parent_id)
                .build();

            let bio = data
                .get("subreddit")
                .and_then(|s| s.get("public_description"))
                .and_then(Value::as_str)
                .unwrap_or_default();
            if !bio.is_empty() {
                yield Finding::builder(FindingType::PersonalInfo, Severity::Low)
                    .title("Reddit bio")
                    .description(bio.to_string())
                    .source("social_deep_dive")
                    .data_field("bio", bio)
                    .parent_id(parent_id)
                    .build();

                if let Some(phone) = phone_pattern().find(bio) {
                    yield Finding::builder(FindingType::PersonalInfo, Severity::High)
                        .title("Phone number mentioned in Reddit bio")
                        .description(phone.as_str().to_string())
                        .source("social_deep_dive")
                        .parent_id(parent_id)
                        .build();
                }
                for url in url_pattern().find_iter(bio).take(3) {
                    yield Finding::builder(FindingType::PersonalInfo, Severity::Low)
                        .title(format!("Website linked from Reddit bio: {}", url.as_str()))
                        .source("social_deep_dive")
                        .data_field("url", url.as_str())
                        .parent_id(parent_id)
                        .build();
                }
            }

            let comments_url = format!("https://www.reddit.com/user/{username}/comments.json?limit=100");
            let Ok(response) = client.get(&comments_url).await else { return };
            let Ok(comments): Result<Value, _> = response.json().await else { return };

            let subreddits: Vec<String> = comments
                .get("data")
                .and_then(|d| d.get("children"))
                .and_then(Value::as_array)
                .into_iter()
                .flatten()
                .filter_map(|c| c.get("data").and_then(|d| d.get("subreddit")).and_then(Value::as_str))
                .map(str::to_lowercase)
                .collect();

            let post_count = subreddits.len();
            for (subreddit, location) in LOCATION_SUBREDDITS {
                if subreddits.iter().any(|s| s == subreddit) {
                    let confidence = if post_count > 5 { "medium" } else { "low" };
                    let severity = if confidence == "medium" { Severity::Medium } else { Severity::Low };
                    yield Finding::builder(FindingType::PersonalInfo, severity)
                        .title(format!("Location hint from subreddit activity: {location}"))
                        .description(format!("Active in r/{subreddit} ({confidence} confidence)."))
                        .source("subreddit_activity")
                        .data_field("location", *location)
                        .data_field("source_type", "subreddit_activity")
                        .data_field("confidence_label", confidence)
                        .parent_id(parent_id)
                        .build();
                }
            }
        })
    }
}
