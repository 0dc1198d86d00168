//! Web-archive lookup: queries the Internet Archive's CDX API for snapshots
//! of the username's known profile URLs, keeping only `200`-status
//! captures.

use async_stream::stream;
use futures::stream::BoxStream;
use osint_model::{Finding, FindingId, FindingType, Severity};
use osint_probe::{Probe, Seed};
use serde_json::Value;

use osint_http::PoliteClient;

const PROFILE_HOSTS: &[&str] = &[
    "github.com",
    "twitter.com",
    "x.com",
    "instagram.com",
    "linkedin.com/in",
    "reddit.com/user",
];

/// Looks up archived snapshots of a username's known profile URLs via the
/// Internet Archive's CDX API.
pub struct WebArchiveProbe {
    client: PoliteClient,
}

impl WebArchiveProbe {
    #[must_use]
    pub fn new(client: PoliteClient) -> Self {
        Self { client }
    }
}

impl Probe for WebArchiveProbe {
    fn name(&self) -> &'static str {
        "web_archive_lookup"
    }

    fn description(&self) -> &'static str {
        "Looks up Wayback Machine snapshots of a username's known profile URLs."
    }

    fn run(&self, seed: Seed, _depth: u8, parent_id: FindingId) -> BoxStream<'static, Finding> {
        let client = self.client.clone();
        let username = seed.as_username().map(str::to_string);

        Box::pin(stream! {
            let Some(username) = username else { return };

            for host in PROFILE_HOSTS {
                let target = format!("{host}/{username}");
                let cdx_url = format!(
                    "https://web.archive.org/cdx/search/cdx?url={}&output=json&fl=timestamp,original,statuscode,mimetype&limit=5",
                    urlencoding::encode(&target)
                );

                let response = match client.get(&cdx_url).await {
                    Ok(response) => response,
                    Err(err) if err.is_negative_result() => continue,
                    Err(_) => continue,
                };
                let Ok(rows): Result<Value, _> = response.json().await else { continue };
                let Some(rows) = rows.as_array() else { continue };

                for row in rows.iter().skip(1) {
                    let Some(columns) = row.as_array() else { continue };
                    let (Some(timestamp), Some(original), Some(status)) = (
                        columns.first().and_then(Value::as_str),
                        columns.get(1).and_then(Value::as_str),
                        columns.get(2).and_then(Value::as_str),
                    ) else {
                        continue;
                    };
                    if status != "200" {
                        continue;
                    }

                    let archive_url = format!("https://web.archive.org/web/{timestamp}/{original}");
                    yield Finding::builder(FindingType::PersonalInfo, Severity::Low)
                        .title(format!("Archived snapshot of {original}"))
                        .description(format!("Captured {}", format_timestamp(timestamp)))
                        .source("web_archive_lookup")
                        .source_url(archive_url)
                        .parent_id(parent_id)
                        .build();
                }
            }
        })
    }
}

/// CDX timestamps are `YYYYMMDDhhmmss`; render as `YYYY-MM-DD` when the
/// shape matches, otherwise pass the raw value through unchanged.
fn format_timestamp(raw: &str) -> String {
    if raw.len() >= 8 && raw.chars().all(|c| c.is_ascii_digit()) {
        format!("{}-{}-{}", &raw[0..4], &raw[4..6], &raw[6..8])
    } else {
        raw.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_well_shaped_cdx_timestamps() {
        assert_eq!(format_timestamp("20190304120000"), "2019-03-04");
    }

    #[test]
    fn passes_through_malformed_timestamps() {
        assert_eq!(format_timestamp("not-a-timestamp"), "not-a-timestamp");
    }
}
