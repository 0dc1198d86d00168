//! Per-platform existence checker: one entry per site, a check type (status
//! code vs. a content marker that must appear in the body), and an explicit
//! "not found" text override list to catch sites that answer 200 for a
//! client-rendered not-found page.

use async_stream::stream;
use futures::stream::BoxStream;
use osint_model::{Finding, FindingId, FindingType, Severity};
use osint_probe::{Probe, Seed};

use osint_http::PoliteClient;

enum CheckType {
    /// A 2xx status (after following redirects) means the handle exists.
    Status,
    /// The body must contain `success_value` for the handle to count as
    /// existing — used for sites that always answer 200.
    Content(&'static str),
}

struct PlatformEntry {
    name: &'static str,
    url_template: &'static str,
    check: CheckType,
}

const PLATFORMS: &[PlatformEntry] = &[
    PlatformEntry { name: "GitHub", url_template: "https://github.com/{u}", check: CheckType::Status },
    PlatformEntry { name: "GitLab", url_template: "https://gitlab.com/{u}", check: CheckType::Status },
    PlatformEntry { name: "Bitbucket", url_template: "https://bitbucket.org/{u}/", check: CheckType::Status },
    PlatformEntry { name: "Docker Hub", url_template: "https://hub.docker.com/u/{u}/", check: CheckType::Status },
    PlatformEntry { name: "npm", url_template: "https://www.npmjs.com/~{u}", check: CheckType::Status },
    PlatformEntry { name: "PyPI", url_template: "https://pypi.org/user/{u}/", check: CheckType::Status },
    PlatformEntry { name: "Dev.to", url_template: "https://dev.to/{u}", check: CheckType::Status },
    PlatformEntry { name: "Twitter/X", url_template: "https://x.com/{u}", check: CheckType::Status },
    PlatformEntry { name: "Instagram", url_template: "https://www.instagram.com/{u}/", check: CheckType::Status },
    PlatformEntry { name: "TikTok", url_template: "https://www.tiktok.com/@{u}", check: CheckType::Status },
    PlatformEntry { name: "Reddit", url_template: "https://www.reddit.com/user/{u}/about.json", check: CheckType::Status },
    PlatformEntry { name: "Pinterest", url_template: "https://www.pinterest.com/{u}/", check: CheckType::Status },
    PlatformEntry { name: "Tumblr", url_template: "https://{u}.tumblr.com/", check: CheckType::Status },
    PlatformEntry { name: "LinkedIn", url_template: "https://www.linkedin.com/in/{u}/", check: CheckType::Status },
    PlatformEntry { name: "Medium", url_template: "https://medium.com/@{u}", check: CheckType::Status },
    PlatformEntry { name: "About.me", url_template: "https://about.me/{u}", check: CheckType::Status },
    PlatformEntry { name: "Twitch", url_template: "https://www.twitch.tv/{u}", check: CheckType::Status },
    PlatformEntry { name: "Steam", url_template: "https://steamcommunity.com/id/{u}", check: CheckType::Status },
    PlatformEntry { name: "Dribbble", url_template: "https://dribbble.com/{u}", check: CheckType::Status },
    PlatformEntry { name: "Behance", url_template: "https://www.behance.net/{u}", check: CheckType::Status },
    PlatformEntry { name: "SoundCloud", url_template: "https://soundcloud.com/{u}", check: CheckType::Status },
    PlatformEntry { name: "Spotify", url_template: "https://open.spotify.com/user/{u}", check: CheckType::Status },
    PlatformEntry { name: "Vimeo", url_template: "https://vimeo.com/{u}", check: CheckType::Status },
    PlatformEntry { name: "Flickr", url_template: "https://www.flickr.com/people/{u}/", check: CheckType::Status },
    PlatformEntry { name: "Keybase", url_template: "https://keybase.io/{u}", check: CheckType::Status },
    PlatformEntry { name: "Patreon", url_template: "https://www.patreon.com/{u}", check: CheckType::Status },
    PlatformEntry { name: "Linktree", url_template: "https://linktr.ee/{u}", check: CheckType::Status },
    PlatformEntry { name: "Gravatar", url_template: "https://en.gravatar.com/{u}", check: CheckType::Status },
    PlatformEntry { name: "Hacker News", url_template: "https://news.ycombinator.com/user?id={u}", check: CheckType::Content("karma") },
];

/// Text markers that, even on a 2xx response, mean the handle does not
/// actually exist on a client-rendered "not found" page.
const NOT_FOUND_MARKERS: &[&str] = &[
    "page not found",
    "user not found",
    "doesn't exist",
    "does not exist",
    "404",
    "not found",
];

/// Checks a username against a fixed table of platforms, using either a
/// status-code check or a content-marker check depending on the site, with
/// a not-found text override to filter client-rendered false positives.
pub struct PlatformExistenceProbe {
    client: PoliteClient,
}

impl PlatformExistenceProbe {
    #[must_use]
    pub fn new(client: PoliteClient) -> Self {
        Self { client }
    }
}

impl Probe for PlatformExistenceProbe {
    fn name(&self) -> &'static str {
        "platform_existence_checker"
    }

    fn description(&self) -> &'static str {
        "Checks a username against ~28 code-host/social/registry/gaming platforms."
    }

    fn run(&self, seed: Seed, _depth: u8, parent_id: FindingId) -> BoxStream<'static, Finding> {
        let client = self.client.clone();
        let username = seed.as_username().map(str::to_string);

        Box::pin(stream! {
            let Some(username) = username else { return };

            for entry in PLATFORMS {
                let url = entry.url_template.replace("{u}", &username);
                let response = match client.get(&url).await {
                    Ok(response) => response,
                    Err(err) if err.is_negative_result() => continue,
                    Err(_) => continue,
                };

                let Ok(body) = response.text().await else { continue };
                let lower_body = body.to_lowercase();

                let exists = match entry.check {
                    CheckType::Status => true,
                    CheckType::Content(marker) => lower_body.contains(marker),
                };
                if !exists {
                    continue;
                }

                if NOT_FOUND_MARKERS.iter().any(|marker| lower_body.contains(marker)) {
                    continue;
                }

                yield Finding::builder(FindingType::Account, Severity::Medium)
                    .title(format!("Account found on {}", entry.name))
                    .description(format!("Username {username} exists on {}.", entry.name))
                    .source("platform_existence_checker")
                    .source_url(url)
                    .data_field("platform", entry.name)
                    .data_field("username", username.clone())
                    .parent_id(parent_id)
                    .link_label("confirmed account")
                    .build();
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_table_has_twenty_eight_entries() {
        assert_eq!(PLATFORMS.len(), 28);
    }

    #[test]
    fn hacker_news_uses_content_check() {
        let hn = PLATFORMS.iter().find(|p| p.name == "Hacker News").unwrap();
        assert!(matches!(hn.check, CheckType::Content("karma")));
    }
}
