//! # accessmap-core
//!
//! Viewport-driven nearby-places aggregation engine for a crowd-sourced
//! accessibility-review map application.
//!
//! As the user pans and zooms a map, this crate issues a bounded, deduplicated,
//! debounced set of upstream place-search requests, merges the heterogeneous
//! result shapes into one canonical place set, joins that set against locally
//! collected accessibility reviews, and keeps the in-memory working set
//! coherent under rapid input changes (typed search, category switch, viewport
//! change, manual recenter) without duplicate network work or stale UI flicker.
//!
//! ## Components
//!
//! - [`services::GeoFetcher`]: fans out and merges upstream place searches
//!   for a region and category filter
//! - [`services::SuggestionResolver`]: debounced autocomplete plus
//!   on-selection detail fetch
//! - [`services::PlaceAggregator`]: the canonical in-memory place set
//! - [`services::ViewportController`]: the state machine deciding when to
//!   re-fetch, with debouncing, zoom gating, and staleness tracking
//! - [`services::rank`]: joins places with reviews into an accessibility
//!   ranking
//!
//! ## Example
//!
//! ```rust,ignore
//! use accessmap_core::{CoreConfig, ViewportController};
//!
//! let controller = ViewportController::new(places_api, locator, CoreConfig::default());
//! let mut state = controller.subscribe();
//! controller.start().await?;
//! controller.set_category(CategoryFilter::Restaurant).await;
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

use thiserror::Error as ThisError;

// Module declarations
pub mod config;
pub mod models;
pub mod observability;
pub mod places;
pub mod reviews;
pub mod services;

// Re-exports for convenience
pub use config::CoreConfig;
pub use models::{
    AggregatedPlace, CategoryFilter, LatLng, Place, PlaceId, Region, Review, Suggestion,
};
pub use places::{LocationProvider, PlacesApi};
pub use reviews::ReviewsApi;
pub use services::{
    GeoFetcher, MapPhase, MapState, MergeMode, PlaceAggregator, RankingService,
    SuggestionResolver, ViewportController, rank,
};

/// Error type for accessmap-core operations.
///
/// Uses `thiserror` for automatic `Display` and `Error` trait implementations.
///
/// # Error Variant Triggers
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `Permission` | Device location access denied; fatal for the session |
/// | `Upstream` | Search provider unreachable or non-OK status (other than empty) |
/// | `DetailFetch` | Suggestion-selection place-details lookup failed |
/// | `Network` | Generic connectivity failure |
/// | `ReviewBackend` | Reviews storage collaborator rejected a call |
/// | `InvalidInput` | Malformed parameters (ratings out of range, empty ids) |
#[derive(Debug, ThisError)]
pub enum Error {
    /// Location permission was denied.
    ///
    /// Terminal for the session: the controller stays without a working
    /// region and does not retry automatically.
    #[error("location permission denied: {0}")]
    Permission(String),

    /// The search provider failed.
    ///
    /// Raised only when a whole fetch fails: every fan-out sub-query failed,
    /// or the single query in the non-fan-out branch failed. Partial sub-query
    /// failures are logged and excluded from the merge instead.
    #[error("upstream search '{operation}' failed: {cause}")]
    Upstream {
        /// The upstream call that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },

    /// The place-details lookup for a selected suggestion failed.
    ///
    /// Surfaced to the UI as a one-shot user-visible failure; selection state
    /// is left unchanged.
    #[error("detail fetch for place '{place_id}' failed: {cause}")]
    DetailFetch {
        /// The candidate place id being resolved.
        place_id: String,
        /// The underlying cause.
        cause: String,
    },

    /// Generic connectivity failure.
    #[error("network error: {0}")]
    Network(String),

    /// The reviews storage collaborator rejected a call.
    ///
    /// Includes ownership violations (editing or deleting a review authored
    /// by someone else, enforced server-side).
    #[error("review backend '{operation}' failed: {cause}")]
    ReviewBackend {
        /// The review operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },

    /// Invalid input was provided.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias for accessmap-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Permission("user declined".to_string());
        assert_eq!(
            err.to_string(),
            "location permission denied: user declined"
        );

        let err = Error::Upstream {
            operation: "nearby_search".to_string(),
            cause: "status INVALID_REQUEST".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "upstream search 'nearby_search' failed: status INVALID_REQUEST"
        );

        let err = Error::DetailFetch {
            place_id: "abc".to_string(),
            cause: "timeout".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "detail fetch for place 'abc' failed: timeout"
        );
    }
}
