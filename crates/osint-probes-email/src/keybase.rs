//! Cryptographic-proof directory lookup: Keybase publishes a directory
//! mapping a verified email to a username plus its signed third-party
//! proofs (Twitter, GitHub, etc).

use async_stream::stream;
use futures::stream::BoxStream;
use osint_model::{Finding, FindingId, FindingType, Severity};
use osint_probe::{Probe, Seed};
use serde_json::Value;

use osint_http::PoliteClient;

/// Looks up the seed email in Keybase's public directory for a verified
/// username and its signed proofs.
pub struct CryptoProofDirectoryProbe {
    client: PoliteClient,
}

impl CryptoProofDirectoryProbe {
    #[must_use]
    pub fn new(client: PoliteClient) -> Self {
        Self { client }
    }
}

impl Probe for CryptoProofDirectoryProbe {
    fn name(&self) -> &'static str {
        "crypto_proof_directory"
    }

    fn description(&self) -> &'static str {
        "Looks up the seed email in Keybase's public verified-proof directory."
    }

    fn run(&self, seed: Seed, _depth: u8, parent_id: FindingId) -> BoxStream<'static, Finding> {
        let client = self.client.clone();
        let email = seed.as_email().map(str::to_string);

        Box::pin(stream! {
            let Some(email) = email else { return };
            let url = format!(
                "https://keybase.io/_/api/1.0/user/lookup.json?email={}",
                urlencoding::encode(&email)
            );

            let response = match client.get(&url).await {
                Ok(response) => response,
                Err(err) if err.is_negative_result() => return,
                Err(_) => return,
            };
            let Ok(body): Result<Value, _> = response.json().await else { return };
            let Some(them) = body.get("them").and_then(Value::as_array).and_then(|a| a.first()) else {
                return;
            };

            let Some(username) = them
                .get("basics")
                .and_then(|b| b.get("username"))
                .and_then(Value::as_str)
            else {
                return;
            };

            yield Finding::builder(FindingType::Username, Severity::High)
                .title(format!("Verified Keybase identity: {username}"))
                .description("Email verified against a cryptographically signed Keybase identity.")
                .source("crypto_proof_directory")
                .source_url(format!("https://keybase.io/{username}"))
                .data_field("username", username)
                .data_field("platform", "keybase")
                .parent_id(parent_id)
                .link_label("verified proof owner")
                .build();

            let proofs = them
                .get("proofs_summary")
                .and_then(|p| p.get("all"))
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default();

            for proof in proofs {
                let service = proof.get("proof_type").and_then(Value::as_str).unwrap_or("unknown");
                let handle = proof.get("nametag").and_then(Value::as_str).unwrap_or(username);
                yield Finding::builder(FindingType::Account, Severity::Medium)
                    .title(format!("Signed proof: {service} = {handle}"))
                    .description("Cryptographically signed third-party proof linked from Keybase.")
                    .source("crypto_proof_directory")
                    .data_field("platform", service)
                    .data_field("username", handle)
                    .parent_id(parent_id)
                    .link_label("signed proof")
                    .build();
            }
        })
    }
}
