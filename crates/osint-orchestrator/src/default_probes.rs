//! Builds the standard three-hop registry from every probe crate in the
//! workspace, sharing one [`PoliteClient`] across all of them. A host that
//! wants a different probe mix constructs its own [`HopRegistry`] instead —
//! this function is a convenience, not the only way to drive a scan.

use std::sync::Arc;

use osint_http::PoliteClient;
use osint_probe::HopRegistry;
use osint_probes_correlation::{ConnectedAccountsProbe, DataBrokerEnumeratorProbe, LocationAggregatorProbe};
use osint_probes_email::{
    BreachCheckProbe, CommitEmailSearchProbe, CryptoProofDirectoryProbe, DocumentDorkProbe, EmailReputationProbe,
    GravatarLookupProbe, InfostealerLogProbe, IntelAggregatorProbe, PasteSiteSearchProbe, UsernamePatternExtractorProbe,
};
use osint_probes_username::{
    CodeHostProfileProbe, CodeHostSecretScannerProbe, PlatformExistenceProbe, SocialDeepDiveProbe, WebArchiveProbe,
};

/// The registry a fresh binary or test harness reaches for by default: every
/// probe this workspace ships, grouped into its hop.
#[must_use]
pub fn default_registry(client: PoliteClient) -> HopRegistry {
    HopRegistry::new()
        .register_hop_1(Arc::new(BreachCheckProbe::new(client.clone())))
        .register_hop_1(Arc::new(EmailReputationProbe::new(client.clone())))
        .register_hop_1(Arc::new(GravatarLookupProbe::new(client.clone())))
        .register_hop_1(Arc::new(CommitEmailSearchProbe::new(client.clone())))
        .register_hop_1(Arc::new(CryptoProofDirectoryProbe::new(client.clone())))
        .register_hop_1(Arc::new(IntelAggregatorProbe::new(client.clone())))
        .register_hop_1(Arc::new(InfostealerLogProbe::new(client.clone())))
        .register_hop_1(Arc::new(PasteSiteSearchProbe::new(client.clone())))
        .register_hop_1(Arc::new(DocumentDorkProbe::new(client.clone())))
        .register_hop_1(Arc::new(UsernamePatternExtractorProbe))
        .register_hop_2(Arc::new(PlatformExistenceProbe::new(client.clone())))
        .register_hop_2(Arc::new(CodeHostProfileProbe::new(client.clone())))
        .register_hop_2(Arc::new(CodeHostSecretScannerProbe::new(client.clone())))
        .register_hop_2(Arc::new(SocialDeepDiveProbe::new(client.clone())))
        .register_hop_2(Arc::new(WebArchiveProbe::new(client.clone())))
        .register_hop_3(Arc::new(LocationAggregatorProbe))
        .register_hop_3(Arc::new(ConnectedAccountsProbe::new(client.clone())))
        .register_hop_3(Arc::new(DataBrokerEnumeratorProbe))
}
