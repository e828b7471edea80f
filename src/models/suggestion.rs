//! Autocomplete suggestion candidates.

use serde::{Deserialize, Serialize};

/// A lightweight autocomplete candidate.
///
/// Carries just enough to render a suggestion row; the full [`super::Place`]
/// is fetched only on selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Candidate place id, usable with a place-details lookup.
    pub place_id: String,
    /// Full human-readable description.
    pub description: String,
    /// Primary display line (usually the place name).
    pub primary_text: String,
    /// Secondary display line (usually the locality).
    pub secondary_text: String,
}
