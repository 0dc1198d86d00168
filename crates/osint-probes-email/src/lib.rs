//! Hop-1 probes: every probe here accepts [`Seed::Email`] and nothing else.
//!
//! Each probe absorbs its own network/parse failures into a low-severity
//! "no signal" finding or an empty stream rather than propagating an error —
//! per the [`osint_probe::Probe`] contract.

mod breach;
mod commit_email;
mod dork;
mod gravatar;
mod hudsonrock;
mod intelx;
mod keybase;
mod paste;
mod reverse_lookup;
mod username_extractor;

pub use breach::BreachCheckProbe;
pub use commit_email::CommitEmailSearchProbe;
pub use dork::DocumentDorkProbe;
pub use gravatar::GravatarLookupProbe;
pub use hudsonrock::InfostealerLogProbe;
pub use intelx::IntelAggregatorProbe;
pub use keybase::CryptoProofDirectoryProbe;
pub use paste::PasteSiteSearchProbe;
pub use reverse_lookup::EmailReputationProbe;
pub use username_extractor::UsernamePatternExtractorProbe;

/// Mask an email's local part for anything that ends up in a title or log
/// line: `"alice@example.com"` -> `"a***e@example.com"`.
#[must_use]
pub fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) if local.chars().count() >= 2 => {
            let mut chars = local.chars();
            let first = chars.next().unwrap_or('*');
            let last = chars.next_back().unwrap_or('*');
            format!("{first}***{last}@{domain}")
        }
        Some((_, domain)) => format!("***@{domain}"),
        None => "***".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks_typical_email() {
        assert_eq!(mask_email("alice@example.com"), "a***e@example.com");
    }

    #[test]
    fn masks_short_local_part() {
        assert_eq!(mask_email("a@example.com"), "***@example.com");
    }
}
