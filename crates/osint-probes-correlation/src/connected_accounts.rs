//! Connected-accounts correlator: regex-extracts platform handles mentioned
//! in every bio gathered during the scan, deduplicates on
//! `platform:username`, and confirms the first three discovered usernames
//! against a handful of platforms whose APIs
//! answer without authentication.

use async_stream::stream;
use futures::stream::BoxStream;
use osint_model::{Finding, FindingId, FindingType, Severity};
use osint_probe::{Probe, Seed};
use regex::Regex;

use osint_http::PoliteClient;

struct BioPattern {
    platform: &'static str,
    regex: fn() -> Regex,
}

fn twitter_pattern() -> Regex {
    Regex::new(r"(?:twitter\.com/|x\.com/|@)([A-Za-z0-9_]{2,15})\b").expect("static pattern")
}
fn instagram_pattern() -> Regex {
    Regex::new(r"instagram\.com/([A-Za-z0-9_.]{2,30})").expect("static pattern")
}
fn linkedin_pattern() -> Regex {
    Regex::new(r"linkedin\.com/in/([A-Za-z0-9-]{2,100})").expect("static pattern")
}
fn github_pattern() -> Regex {
    Regex::new(r"github\.com/([A-Za-z0-9-]{2,39})").expect("static pattern")
}
fn youtube_pattern() -> Regex {
    Regex::new(r"youtube\.com/(?:c/|channel/|@)([A-Za-z0-9_-]{2,100})").expect("static pattern")
}
fn generic_url_pattern() -> Regex {
    Regex::new(r"(facebook|tiktok|twitch|reddit)\.com/(?:user/|r/)?([A-Za-z0-9_.-]{2,50})").expect("static pattern")
}

const BIO_PATTERNS: &[BioPattern] = &[
    BioPattern { platform: "Twitter/X", regex: twitter_pattern },
    BioPattern { platform: "Instagram", regex: instagram_pattern },
    BioPattern { platform: "LinkedIn", regex: linkedin_pattern },
    BioPattern { platform: "GitHub", regex: github_pattern },
    BioPattern { platform: "YouTube", regex: youtube_pattern },
];

/// Maps a platform name to the profile URL for a discovered handle.
fn profile_url(platform: &str, username: &str) -> Option<String> {
    let url = match platform {
        "Twitter/X" => format!("https://x.com/{username}"),
        "Instagram" => format!("https://instagram.com/{username}"),
        "LinkedIn" => format!("https://linkedin.com/in/{username}"),
        "GitHub" => format!("https://github.com/{username}"),
        "YouTube" => format!("https://youtube.com/@{username}"),
        "Facebook" => format!("https://facebook.com/{username}"),
        "TikTok" => format!("https://tiktok.com/@{username}"),
        "Twitch" => format!("https://twitch.tv/{username}"),
        "Reddit" => format!("https://reddit.com/user/{username}"),
        _ => return None,
    };
    Some(url)
}

fn canonical_generic_platform(domain: &str) -> &'static str {
    match domain {
        "facebook" => "Facebook",
        "tiktok" => "TikTok",
        "twitch" => "Twitch",
        "reddit" => "Reddit",
        _ => "Unknown",
    }
}

/// Extracts and correlates cross-platform handles mentioned in bios
/// gathered earlier in the scan, confirming the first few against
/// unauthenticated platform APIs.
pub struct ConnectedAccountsProbe {
    client: PoliteClient,
}

impl ConnectedAccountsProbe {
    #[must_use]
    pub fn new(client: PoliteClient) -> Self {
        Self { client }
    }
}

impl Probe for ConnectedAccountsProbe {
    fn name(&self) -> &'static str {
        "connected_accounts_correlator"
    }

    fn description(&self) -> &'static str {
        "Extracts cross-platform handles mentioned in bios and confirms a few via unauthenticated APIs."
    }

    fn run(&self, seed: Seed, _depth: u8, parent_id: FindingId) -> BoxStream<'static, Finding> {
        let client = self.client.clone();
        let bios = seed.as_aggregate().map(|state| state.bios.clone()).unwrap_or_default();

        Box::pin(stream! {
            if bios.is_empty() {
                return;
            }

            let mut discovered: Vec<(String, String)> = Vec::new();
            let mut seen = std::collections::BTreeSet::new();

            for bio in &bios {
                for pattern in BIO_PATTERNS {
                    for capture in (pattern.regex)().captures_iter(bio) {
                        if let Some(handle) = capture.get(1) {
                            let key = format!("{}:{}", pattern.platform, handle.as_str().to_lowercase());
                            if seen.insert(key) {
                                discovered.push((pattern.platform.to_string(), handle.as_str().to_string()));
                            }
                        }
                    }
                }

                for capture in generic_url_pattern().captures_iter(bio) {
                    let (Some(domain), Some(handle)) = (capture.get(1), capture.get(2)) else { continue };
                    let platform = canonical_generic_platform(domain.as_str());
                    let key = format!("{platform}:{}", handle.as_str().to_lowercase());
                    if seen.insert(key) {
                        discovered.push((platform.to_string(), handle.as_str().to_string()));
                    }
                }
            }

            for (platform, username) in &discovered {
                let mut builder = Finding::builder(FindingType::Account, Severity::Low)
                    .title(format!("Mentioned {platform} handle: {username}"))
                    .description("Extracted from a bio gathered earlier in the scan; unconfirmed.")
                    .source("connected_accounts_correlator")
                    .data_field("platform", platform.clone())
                    .data_field("username", username.clone())
                    .parent_id(parent_id)
                    .link_label("bio mention");
                if let Some(url) = profile_url(platform, username) {
                    builder = builder.source_url(url);
                }
                yield builder.build();
            }

            for (platform, username) in discovered.iter().take(3) {
                let Some(check_url) = cross_platform_check_url(platform, username) else { continue };
                let exists = client.get(&check_url).await.is_ok();
                if !exists {
                    continue;
                }
                yield Finding::builder(FindingType::Account, Severity::Medium)
                    .title(format!("Confirmed {platform} account: {username}"))
                    .description("Cross-platform existence check succeeded for a bio-mentioned handle.")
                    .source("connected_accounts_correlator")
                    .data_field("platform", platform.clone())
                    .data_field("username", username.clone())
                    .parent_id(parent_id)
                    .link_label("confirmed cross-platform match")
                    .build();
            }
        })
    }
}

/// Only a few platforms answer an unauthenticated existence check cheaply
/// enough to run inline here; everything else is left as an unconfirmed
/// mention.
fn cross_platform_check_url(platform: &str, username: &str) -> Option<String> {
    let url = match platform {
        "GitHub" => format!("https://api.github.com/users/{username}"),
        "Reddit" => format!("https://www.reddit.com/user/{username}/about.json"),
        _ => return None,
    };
    Some(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_github_and_twitter_handles_from_a_bio() {
        let bio = "Find me on github.com/octocat or @octocat_dev";
        let github_matches: Vec<_> = github_pattern().captures_iter(bio).collect();
        assert_eq!(github_matches[0].get(1).unwrap().as_str(), "octocat");

        let twitter_matches: Vec<_> = twitter_pattern().captures_iter(bio).collect();
        assert!(twitter_matches.iter().any(|m| m.get(1).unwrap().as_str() == "octocat_dev"));
    }

    #[test]
    fn generic_url_pattern_tags_the_right_platform() {
        assert_eq!(canonical_generic_platform("tiktok"), "TikTok");
        assert_eq!(canonical_generic_platform("unknown"), "Unknown");
    }
}
