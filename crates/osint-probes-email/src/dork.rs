//! Search-engine document dork: scripted Google search is hostile to
//! automation, so dork queries run through DuckDuckGo's HTML endpoint
//! instead. Each dork pattern below carries its own severity.

use async_stream::stream;
use futures::stream::BoxStream;
use osint_model::{Finding, FindingId, FindingType, Severity};
use osint_probe::{Probe, Seed};
use scraper::{Html, Selector};

use osint_http::PoliteClient;

struct DorkPattern {
    query_suffix: &'static str,
    label: &'static str,
    severity: Severity,
}

const DORK_PATTERNS: &[DorkPattern] = &[
    DorkPattern { query_suffix: "filetype:pdf", label: "PDF documents mentioning the address", severity: Severity::Medium },
    DorkPattern { query_suffix: "filetype:doc OR filetype:docx", label: "Word documents mentioning the address", severity: Severity::Medium },
    DorkPattern { query_suffix: "filetype:xls OR filetype:xlsx", label: "Spreadsheets mentioning the address", severity: Severity::Medium },
    DorkPattern { query_suffix: "filetype:txt", label: "Plain-text files mentioning the address", severity: Severity::Low },
    DorkPattern { query_suffix: "resume OR cv", label: "Resume/CV mentions", severity: Severity::High },
    DorkPattern { query_suffix: "site:pastebin.com OR site:ghostbin.com OR site:rentry.co", label: "Paste-site mentions", severity: Severity::Critical },
    DorkPattern { query_suffix: "site:linkedin.com", label: "LinkedIn profile mentions", severity: Severity::Low },
    DorkPattern { query_suffix: "site:github.com", label: "GitHub mentions", severity: Severity::Low },
    DorkPattern { query_suffix: "site:reddit.com", label: "Reddit mentions", severity: Severity::Low },
    DorkPattern { query_suffix: "\"dump\" OR \"leak\" OR \"breach\"", label: "Leak/dump mentions", severity: Severity::High },
    DorkPattern { query_suffix: "\"database\" OR \"sql\"", label: "Database export mentions", severity: Severity::High },
];

/// Runs a fixed table of document/leak dork queries through a
/// DuckDuckGo-HTML proxy, since the major search engines block scripted
/// querying.
pub struct DocumentDorkProbe {
    client: PoliteClient,
}

impl DocumentDorkProbe {
    #[must_use]
    pub fn new(client: PoliteClient) -> Self {
        Self { client }
    }
}

impl Probe for DocumentDorkProbe {
    fn name(&self) -> &'static str {
        "document_dork"
    }

    fn description(&self) -> &'static str {
        "Runs a fixed table of leak/document dork queries against a search-engine HTML proxy."
    }

    fn run(&self, seed: Seed, _depth: u8, parent_id: FindingId) -> BoxStream<'static, Finding> {
        let client = self.client.clone();
        let email = seed.as_email().map(str::to_string);

        Box::pin(stream! {
            let Some(email) = email else { return };

            for pattern in DORK_PATTERNS {
                let query = format!("\"{email}\" {}", pattern.query_suffix);
                let url = format!("https://html.duckduckgo.com/html/?q={}", urlencoding::encode(&query));

                let response = match client.get(&url).await {
                    Ok(response) => response,
                    Err(err) if err.is_negative_result() => continue,
                    Err(_) => continue,
                };
                let Ok(body) = response.text().await else { continue };

                let result_count = count_results(&body);
                if result_count == 0 {
                    continue;
                }

                yield Finding::builder(FindingType::PersonalInfo, pattern.severity)
                    .title(pattern.label)
                    .description(format!("{result_count} result(s) for query: {query}"))
                    .source("document_dork")
                    .source_url(url)
                    .data_field("result_count", result_count)
                    .data_field("query_suffix", pattern.query_suffix)
                    .parent_id(parent_id)
                    .build();
            }
        })
    }
}

fn count_results(html: &str) -> usize {
    let selector = match Selector::parse("a.result__a") {
        Ok(selector) => selector,
        Err(_) => return 0,
    };
    Html::parse_document(html).select(&selector).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dork_patterns_cover_the_expected_categories() {
        assert!(DORK_PATTERNS.iter().any(|p| p.query_suffix.contains("pastebin")));
        assert!(DORK_PATTERNS.iter().any(|p| p.query_suffix.contains("resume")));
        assert_eq!(DORK_PATTERNS.len(), 11);
    }

    #[test]
    fn counts_duckduckgo_result_anchors() {
        let html = r##"<html><body>
            <a class="result__a" href="#">one</a>
            <a class="result__a" href="#">two</a>
        </body></html>"##;
        assert_eq!(count_results(html), 2);
    }
}
