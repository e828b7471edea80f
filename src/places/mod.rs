//! Place-search collaborator abstraction.
//!
//! The upstream provider is an unreliable, rate-limited, eventually-consistent
//! external service returning heterogeneous shapes for nearby search, text
//! search, autocomplete, and place details. All of them are normalized into
//! the canonical [`Place`] at this boundary; raw payloads never travel
//! further into the system.

mod google;

pub use google::{FixedLocationProvider, GooglePlacesClient};

use crate::Result;
use crate::models::{CategoryFilter, LatLng, Place, PlaceId, Suggestion};
use async_trait::async_trait;
use serde::Deserialize;

/// Trait for the place-search collaborator.
#[async_trait]
pub trait PlacesApi: Send + Sync {
    /// Returns places within `radius_m` of `center`, optionally filtered by
    /// category.
    ///
    /// An empty result is success, not an error.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Upstream`] when the provider is unreachable or
    /// reports a failure status.
    async fn nearby_search(
        &self,
        center: LatLng,
        radius_m: u32,
        category: Option<CategoryFilter>,
    ) -> Result<Vec<Place>>;

    /// Returns places matching a free-text query within `radius_m` of
    /// `center`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Upstream`] on provider failure.
    async fn text_search(&self, query: &str, center: LatLng, radius_m: u32) -> Result<Vec<Place>>;

    /// Returns lightweight suggestion candidates for partial text input,
    /// biased toward `center`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Upstream`] on provider failure.
    async fn autocomplete(
        &self,
        input: &str,
        center: LatLng,
        radius_m: u32,
    ) -> Result<Vec<Suggestion>>;

    /// Fetches full details for a single place id.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Upstream`] on provider failure or when the
    /// record is absent or missing geometry.
    async fn place_details(&self, place_id: &str) -> Result<Place>;
}

/// Trait for the device location collaborator.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    /// Requests location permission and returns the current device position.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Permission`] when the user denies access, or
    /// [`crate::Error::Network`] when no fix can be obtained.
    async fn current_location(&self) -> Result<LatLng>;
}

/// Raw place record as returned by the provider.
///
/// Field population is inconsistent across endpoints: nearby search sets
/// `vicinity`, text search and details set `formatted_address`, and any field
/// may be absent.
#[derive(Debug, Clone, Deserialize)]
pub struct RawPlace {
    /// Provider place id.
    pub place_id: Option<String>,
    /// Display name.
    pub name: Option<String>,
    /// Vicinity description (nearby search).
    pub vicinity: Option<String>,
    /// Formatted address (text search, details).
    pub formatted_address: Option<String>,
    /// Geometry holder.
    pub geometry: Option<RawGeometry>,
    /// Category type tags.
    #[serde(default)]
    pub types: Vec<String>,
    /// Provider rating.
    pub rating: Option<f64>,
}

/// Raw geometry holder.
#[derive(Debug, Clone, Deserialize)]
pub struct RawGeometry {
    /// Coordinates of the place.
    pub location: Option<RawLocation>,
}

/// Raw coordinate pair.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RawLocation {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
}

/// Normalizes a raw provider record into the canonical [`Place`].
///
/// Returns `None` when the id or geometry is missing; partial upstream data
/// is expected and dropped silently. Address falls back from `vicinity` to
/// `formatted_address`.
#[must_use]
pub fn normalize(raw: RawPlace) -> Option<Place> {
    let id = raw.place_id?;
    let location = raw.geometry?.location?;

    Some(Place {
        id: PlaceId::new(id),
        name: raw.name.unwrap_or_default(),
        address: raw
            .vicinity
            .or(raw.formatted_address)
            .unwrap_or_default(),
        location: LatLng::new(location.lat, location.lng),
        tags: raw.types,
        external_rating: raw.rating,
    })
}
