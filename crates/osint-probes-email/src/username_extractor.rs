//! Purely local: derive plausible usernames from an email's local part by
//! permutation — no network calls, so this probe's stream resolves
//! synchronously.

use osint_model::{is_valid_username, normalize_username, Finding, FindingId, FindingType, Severity};
use osint_probe::{Probe, Seed};

/// Derives username candidates from the local part of an email address.
pub struct UsernamePatternExtractorProbe;

impl Probe for UsernamePatternExtractorProbe {
    fn name(&self) -> &'static str {
        "username_pattern_extractor"
    }

    fn description(&self) -> &'static str {
        "Derives likely usernames from the local part of the seed email."
    }

    fn run(&self, seed: Seed, _depth: u8, parent_id: FindingId) -> futures::stream::BoxStream<'static, Finding> {
        let candidates = match seed.as_email() {
            Some(email) => derive_candidates(email),
            None => Vec::new(),
        };

        let findings = candidates
            .into_iter()
            .map(|candidate| {
                Finding::builder(FindingType::Username, Severity::Low)
                    .title(format!("Candidate username: {candidate}"))
                    .description("Derived from the local part of the seed email; unconfirmed until hop 2.")
                    .source("username_pattern_extractor")
                    .data_field("username", candidate)
                    .parent_id(parent_id)
                    .link_label("derived candidate")
                    .build()
            })
            .collect::<Vec<_>>();

        Box::pin(futures::stream::iter(findings))
    }
}

/// The local-part permutation rules: strip dots, underscore-join on common
/// separators, a first-initial+last-name split for two-part locals, and a
/// trailing-digits strip — each candidate filtered through the data model's
/// username hygiene rule and deduplicated case-insensitively.
fn derive_candidates(email: &str) -> Vec<String> {
    let Some((local, _domain)) = email.split_once('@') else {
        return Vec::new();
    };
    let local = local.to_lowercase();

    let mut seen = std::collections::BTreeSet::new();
    let mut out = Vec::new();
    let mut push = |candidate: String| {
        let normalized = normalize_username(&candidate);
        if is_valid_username(&normalized) && seen.insert(normalized.clone()) {
            out.push(normalized);
        }
    };

    push(local.clone());
    push(local.replace('.', ""));
    push(local.replace('.', "_"));

    for sep in ['.', '_', '-'] {
        if let Some((a, b)) = local.split_once(sep) {
            push(format!("{a}{b}"));
            push(format!("{a}_{b}"));
            push(format!("{a}.{b}"));
            if let Some(first) = a.chars().next() {
                push(format!("{first}{b}"));
            }
        }
    }

    let stripped_digits = local.trim_end_matches(|c: char| c.is_ascii_digit());
    if stripped_digits != local && !stripped_digits.is_empty() {
        push(stripped_digits.to_string());
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_dotted_local_part_into_joined_and_initialed_variants() {
        let candidates = derive_candidates("john.doe@example.com");
        assert!(candidates.contains(&"john.doe".to_string()));
        assert!(candidates.contains(&"johndoe".to_string()));
        assert!(candidates.contains(&"john_doe".to_string()));
        assert!(candidates.contains(&"jdoe".to_string()));
    }

    #[test]
    fn strips_trailing_digits() {
        let candidates = derive_candidates("octocat99@example.com");
        assert!(candidates.contains(&"octocat".to_string()));
    }

    #[test]
    fn rejects_locals_that_would_produce_invalid_usernames() {
        let candidates = derive_candidates("a@example.com");
        assert!(candidates.iter().all(|c| is_valid_username(c)));
    }
}
