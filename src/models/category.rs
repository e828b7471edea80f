//! Category filters for place searches.

use serde::{Deserialize, Serialize};

/// Fixed category filter set for place searches.
///
/// `All` triggers a fan-out query (multiple category sub-queries plus fixed
/// keyword probes) rather than a single upstream call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryFilter {
    /// All categories (fan-out query).
    #[default]
    All,
    /// Restaurants and food.
    Restaurant,
    /// Supermarkets.
    Supermarket,
    /// Hotels.
    Hotel,
    /// Hospitals and health.
    Hospital,
    /// General stores.
    Store,
    /// Banks.
    Bank,
    /// Parks and leisure.
    Park,
}

impl CategoryFilter {
    /// Returns the filter as the upstream provider's type string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Restaurant => "restaurant",
            Self::Supermarket => "supermarket",
            Self::Hotel => "hotel",
            Self::Hospital => "hospital",
            Self::Store => "store",
            Self::Bank => "bank",
            Self::Park => "park",
        }
    }

    /// Parses a category string (case-insensitive).
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "all" => Some(Self::All),
            "restaurant" => Some(Self::Restaurant),
            "supermarket" => Some(Self::Supermarket),
            "hotel" => Some(Self::Hotel),
            "hospital" => Some(Self::Hospital),
            "store" => Some(Self::Store),
            "bank" => Some(Self::Bank),
            "park" => Some(Self::Park),
            _ => None,
        }
    }

    /// Returns every filter value.
    #[must_use]
    pub const fn all_filters() -> [Self; 8] {
        [
            Self::All,
            Self::Restaurant,
            Self::Supermarket,
            Self::Hotel,
            Self::Hospital,
            Self::Store,
            Self::Bank,
            Self::Park,
        ]
    }
}

impl std::fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
