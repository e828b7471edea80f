//! Canonical place types.

use serde::{Deserialize, Serialize};

/// Stable external identifier for a place.
///
/// Assigned by the upstream search provider and unique within a session.
/// At most one [`Place`] per id exists in any aggregated set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlaceId(String);

impl PlaceId {
    /// Creates a place id from a string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PlaceId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for PlaceId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::fmt::Display for PlaceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A geographic coordinate in float degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
}

impl LatLng {
    /// Creates a coordinate pair.
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Canonical place entity.
///
/// Created when returned by a search or a suggestion-detail fetch, merged
/// into the aggregator's working set, and discarded when the viewport or
/// category invalidates the set. Never persisted across sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    /// Stable external identifier (unique key).
    pub id: PlaceId,
    /// Display name.
    pub name: String,
    /// Street address or vicinity description.
    pub address: String,
    /// Geographic location.
    pub location: LatLng,
    /// Category tags reported by the provider.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Provider-side rating (0–5), when the provider populates it.
    #[serde(default)]
    pub external_rating: Option<f64>,
}

impl Place {
    /// Creates a place with the required fields; tags and rating default empty.
    #[must_use]
    pub fn new(id: impl Into<PlaceId>, name: impl Into<String>, location: LatLng) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            address: String::new(),
            location,
            tags: Vec::new(),
            external_rating: None,
        }
    }

    /// Sets the address.
    #[must_use]
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    /// Sets the category tags.
    #[must_use]
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    /// Sets the provider rating.
    #[must_use]
    pub const fn with_external_rating(mut self, rating: f64) -> Self {
        self.external_rating = Some(rating);
        self
    }
}

/// A place joined with its locally collected accessibility reviews.
///
/// Derived, recomputed on demand, never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedPlace {
    /// The underlying place.
    pub place: Place,
    /// Mean accessibility rating; 0.0 when the place has no reviews.
    pub accessibility_mean: f64,
    /// Number of accessibility reviews for the place.
    pub review_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_place_id_roundtrip() {
        let id = PlaceId::new("ChIJabc123");
        assert_eq!(id.as_str(), "ChIJabc123");
        assert_eq!(id.to_string(), "ChIJabc123");
        assert_eq!(PlaceId::from("ChIJabc123"), id);
    }

    #[test]
    fn test_place_builder() {
        let place = Place::new("a", "Joe's Cafe", LatLng::new(0.0, 0.0))
            .with_address("1 Main St")
            .with_tags(vec!["restaurant".to_string()])
            .with_external_rating(4.2);
        assert_eq!(place.id.as_str(), "a");
        assert_eq!(place.address, "1 Main St");
        assert_eq!(place.external_rating, Some(4.2));
    }
}
