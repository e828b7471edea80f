//! Data models for the aggregation engine.
//!
//! This module contains the core data structures used throughout the system.
//! Raw provider payload shapes live in [`crate::places`] and never cross this
//! boundary; everything here is canonical.

mod category;
mod place;
mod region;
mod review;
mod suggestion;

pub use category::CategoryFilter;
pub use place::{AggregatedPlace, LatLng, Place, PlaceId};
pub use region::Region;
pub use review::{NewReview, Review, ReviewUpdate};
pub use suggestion::Suggestion;
