//! Data-broker enumerator: a fixed 12-broker catalogue. For each broker,
//! build the search/opt-out URLs for the seed email without ever actually
//! scraping the broker site, then group by severity and emit a
//! consolidated opt-out-links finding.

use async_stream::stream;
use futures::stream::BoxStream;
use osint_model::{Finding, FindingId, FindingType, Severity};
use osint_probe::{Probe, Seed};

struct Broker {
    name: &'static str,
    search_url_template: &'static str,
    opt_out_url: &'static str,
    data_types: &'static [&'static str],
    severity: Severity,
}

const BROKERS: &[Broker] = &[
    Broker { name: "Spokeo", search_url_template: "https://www.spokeo.com/search?q={email}", opt_out_url: "https://www.spokeo.com/optout", data_types: &["name", "address", "phone", "relatives"], severity: Severity::High },
    Broker { name: "BeenVerified", search_url_template: "https://www.beenverified.com/people/search?email={email}", opt_out_url: "https://www.beenverified.com/app/optout/search", data_types: &["name", "address", "phone", "criminal_records"], severity: Severity::High },
    Broker { name: "WhitePages", search_url_template: "https://www.whitepages.com/search/FullName?q={email}", opt_out_url: "https://www.whitepages.com/suppression-requests", data_types: &["name", "address", "phone"], severity: Severity::Medium },
    Broker { name: "TruePeopleSearch", search_url_template: "https://www.truepeoplesearch.com/results?name={email}", opt_out_url: "https://www.truepeoplesearch.com/removal", data_types: &["name", "address", "phone", "relatives"], severity: Severity::High },
    Broker { name: "FastPeopleSearch", search_url_template: "https://www.fastpeoplesearch.com/name/{email}", opt_out_url: "https://www.fastpeoplesearch.com/removal", data_types: &["name", "address", "phone"], severity: Severity::Medium },
    Broker { name: "Intelius", search_url_template: "https://www.intelius.com/people-search/{email}", opt_out_url: "https://www.intelius.com/opt-out", data_types: &["name", "address", "phone", "relatives", "criminal_records"], severity: Severity::High },
    Broker { name: "PeopleFinder", search_url_template: "https://www.peoplefinder.com/search?q={email}", opt_out_url: "https://www.peoplefinder.com/optout.php", data_types: &["name", "address", "phone"], severity: Severity::Medium },
    Broker { name: "Radaris", search_url_template: "https://radaris.com/p/{email}", opt_out_url: "https://radaris.com/control/privacy", data_types: &["name", "address", "phone", "relatives"], severity: Severity::High },
    Broker { name: "USSearch", search_url_template: "https://www.ussearch.com/search/{email}", opt_out_url: "https://www.ussearch.com/opt-out", data_types: &["name", "address", "phone"], severity: Severity::Medium },
    Broker { name: "ThatsThem", search_url_template: "https://thatsthem.com/email/{email}", opt_out_url: "https://thatsthem.com/optout", data_types: &["name", "address", "phone"], severity: Severity::Medium },
    Broker { name: "Pipl", search_url_template: "https://pipl.com/search/?q={email}", opt_out_url: "https://pipl.com/opt-out", data_types: &["name", "address", "phone", "social_profiles"], severity: Severity::High },
    Broker { name: "PeekYou", search_url_template: "https://www.peekyou.com/{email}", opt_out_url: "https://www.peekyou.com/about/contact/optout", data_types: &["name", "social_profiles"], severity: Severity::Medium },
];

/// Emits search/opt-out URLs for a fixed catalogue of people-search
/// ("data broker") sites, without ever contacting them — the catalogue is
/// data, not a live scrape target.
pub struct DataBrokerEnumeratorProbe;

impl Probe for DataBrokerEnumeratorProbe {
    fn name(&self) -> &'static str {
        "data_broker_enumerator"
    }

    fn description(&self) -> &'static str {
        "Maps the seed email to search/opt-out URLs for a fixed catalogue of people-search sites."
    }

    fn run(&self, seed: Seed, _depth: u8, parent_id: FindingId) -> BoxStream<'static, Finding> {
        let email = seed.as_aggregate().and_then(|state| {
            state.findings.iter().find_map(|f| {
                if f.kind() == FindingType::Email && f.parent_id().is_none() {
                    f.data().get("email_masked").and_then(|v| v.as_str()).map(str::to_string)
                } else {
                    None
                }
            })
        });

        Box::pin(stream! {
            let email_display = email.unwrap_or_else(|| "the seed email".to_string());
            let encoded = urlencoding::encode(&email_display).into_owned();

            yield Finding::builder(FindingType::PersonalInfo, Severity::High)
                .title(format!("Listed on {} data-broker/people-search sites", BROKERS.len()))
                .description(
                    "People-search aggregators typically compile this information from public records \
                     and other brokers; each listing below links directly to that broker's opt-out page."
                        .to_string(),
                )
                .source("data_broker_enumerator")
                .data_field("broker_count", BROKERS.len() as u64)
                .parent_id(parent_id)
                .build();

            let high_risk: Vec<&Broker> = BROKERS.iter().filter(|b| b.severity == Severity::High).collect();
            let medium_risk: Vec<&Broker> = BROKERS.iter().filter(|b| b.severity == Severity::Medium).collect();

            if !high_risk.is_empty() {
                yield Finding::builder(FindingType::Breach, Severity::High)
                    .title(format!("{} high-risk brokers expose relatives or criminal records", high_risk.len()))
                    .description(high_risk.iter().map(|b| b.name).collect::<Vec<_>>().join(", "))
                    .source("data_broker_enumerator")
                    .parent_id(parent_id)
                    .build();
            }
            if !medium_risk.is_empty() {
                yield Finding::builder(FindingType::PersonalInfo, Severity::Medium)
                    .title(format!("{} medium-risk brokers expose name/address/phone", medium_risk.len()))
                    .description(medium_risk.iter().map(|b| b.name).collect::<Vec<_>>().join(", "))
                    .source("data_broker_enumerator")
                    .parent_id(parent_id)
                    .build();
            }

            let mut opt_out_description = String::new();
            for broker in BROKERS {
                let search_url = broker.search_url_template.replace("{email}", &encoded);
                opt_out_description.push_str(&format!(
                    "{}: search {} | opt out {} | exposes: {}\n",
                    broker.name,
                    search_url,
                    broker.opt_out_url,
                    broker.data_types.join(", "),
                ));
            }

            yield Finding::builder(FindingType::PersonalInfo, Severity::Low)
                .title("Opt-out links for every listed broker")
                .description(opt_out_description)
                .source("data_broker_enumerator")
                .parent_id(parent_id)
                .build();
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalogue_has_exactly_twelve_brokers() {
        assert_eq!(BROKERS.len(), 12);
    }

    #[test]
    fn every_broker_has_an_opt_out_url() {
        assert!(BROKERS.iter().all(|b| b.opt_out_url.starts_with("https://")));
    }
}
