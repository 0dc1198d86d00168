//! Shared shape for a single breach exposure, used by both the k-anonymous
//! hash-prefix lookup and the annotated aggregator (see Open Question (i):
//! the annotated aggregator's shape is canonical, the hash-prefix lookup is
//! an optional fallback that can only confirm membership, not annotate it).

use serde::{Deserialize, Serialize};

/// One breach a seed email was found in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreachRecord {
    /// Breach name as reported by the source, e.g. `"LinkedIn"`.
    pub name: String,
    /// Breach date, as reported by the source (not necessarily a full ISO
    /// date — sources report varying precision).
    pub date: String,
    /// Categories of data exposed in this breach, e.g. `["email",
    /// "password", "phone"]`.
    pub data_classes: Vec<String>,
    /// Industry the breached service operates in, when the source supplies
    /// it. Recovered from the annotated aggregator; absent from the plain
    /// hash-prefix lookup.
    pub industry: Option<String>,
    /// Whether the source itself flags this breach as exposing sensitive
    /// data classes (health, sexuality, financial). Recovered from the
    /// annotated aggregator; defaults to `false` for sources that don't
    /// distinguish.
    pub is_sensitive: bool,
}

impl BreachRecord {
    /// Build a record from the plain hash-prefix lookup, which can only
    /// confirm `{name, date, data_classes}`.
    #[must_use]
    pub fn from_hash_prefix_hit(
        name: impl Into<String>,
        date: impl Into<String>,
        data_classes: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            date: date.into(),
            data_classes,
            industry: None,
            is_sensitive: false,
        }
    }
}
