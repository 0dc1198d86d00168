//! An HTTP-backed [`PoliteClient`] tuned for tests: loopback allowed, and
//! polite delays shrunk to near-zero so a wiremock-backed probe test doesn't
//! pay the production pacing policy.

use osint_http::{ClientConfig, PoliteClient, ProbeHttpError};
use std::time::Duration;

/// Build a [`PoliteClient`] suitable for pointing at a local `wiremock`
/// server: SSRF's loopback block lifted, concurrency uncapped enough for a
/// single test, and polite delays collapsed to a few milliseconds.
pub fn fast_client() -> Result<PoliteClient, ProbeHttpError> {
    PoliteClient::new(ClientConfig {
        concurrency_cap: 8,
        min_polite_delay: Duration::from_millis(1),
        max_polite_delay: Duration::from_millis(2),
        allow_private_hosts: true,
        ..ClientConfig::default()
    })
}
