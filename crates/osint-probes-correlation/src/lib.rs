//! Hop-3 / correlation probes: accept `Seed::Aggregate` and see the whole
//! scan's accumulated state.

mod broker_enumerator;
mod connected_accounts;
mod location_aggregator;

pub use broker_enumerator::DataBrokerEnumeratorProbe;
pub use connected_accounts::ConnectedAccountsProbe;
pub use location_aggregator::LocationAggregatorProbe;
