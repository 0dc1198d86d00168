use std::sync::Arc;

use osint_model::AggregatedState;

/// The input handed to a probe. The registry enforces which variant each
/// hop's probes accept — see [`crate::registry::HopRegistry`] — rather than
/// probes re-parsing an encoded string at their own boundary.
#[derive(Clone)]
pub enum Seed {
    /// Hop 1: the verified seed email.
    Email(String),
    /// Hop 2: a bare username, for probes that check many platforms.
    Username(String),
    /// Hop 2: a username already scoped to one platform, for probes that
    /// only make sense against a single site (e.g. a code-host profile
    /// reader).
    PlatformUsername {
        /// Platform the username belongs to.
        platform: String,
        /// Handle on that platform.
        username: String,
    },
    /// Hop 3: the accumulated scan state, read-only. Correlation probes
    /// never mutate this directly; they emit findings that the orchestrator
    /// folds back through the seed extractor like any other probe output.
    Aggregate(Arc<AggregatedState>),
}

impl Seed {
    /// The email, if this is an `Email` seed.
    #[must_use]
    pub fn as_email(&self) -> Option<&str> {
        match self {
            Seed::Email(email) => Some(email),
            _ => None,
        }
    }

    /// The username, for either of the two username-bearing variants.
    #[must_use]
    pub fn as_username(&self) -> Option<&str> {
        match self {
            Seed::Username(username) => Some(username),
            Seed::PlatformUsername { username, .. } => Some(username),
            _ => None,
        }
    }

    /// The aggregate, if this is an `Aggregate` seed.
    #[must_use]
    pub fn as_aggregate(&self) -> Option<&Arc<AggregatedState>> {
        match self {
            Seed::Aggregate(state) => Some(state),
            _ => None,
        }
    }
}
