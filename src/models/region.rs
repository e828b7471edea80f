//! Map viewport type and radius derivation.

use super::LatLng;
use serde::{Deserialize, Serialize};

/// Meters per degree of latitude at the equator.
const METERS_PER_DEGREE_LAT: f64 = 111_320.0;

/// A map viewport described by center and angular span.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    /// Viewport center.
    pub center: LatLng,
    /// Latitude span of the visible area, in degrees.
    pub span_lat: f64,
    /// Longitude span of the visible area, in degrees.
    pub span_lng: f64,
}

impl Region {
    /// Creates a region from center and spans.
    #[must_use]
    pub const fn new(center: LatLng, span_lat: f64, span_lng: f64) -> Self {
        Self {
            center,
            span_lat,
            span_lng,
        }
    }

    /// Search radius in meters derived from the latitude span.
    ///
    /// Uses the equator approximation `span_lat * 111320 / 2`, rounded up.
    /// The error grows with latitude; this matches the upstream consumer's
    /// established behavior and is intentionally left uncorrected.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn search_radius_m(&self) -> u32 {
        let meters = (self.span_lat * METERS_PER_DEGREE_LAT / 2.0).ceil();
        if meters <= 0.0 {
            0
        } else {
            meters.min(f64::from(u32::MAX)) as u32
        }
    }

    /// Returns true when the viewport is wider than the given span threshold.
    ///
    /// Above the threshold fetching is suppressed and the working set cleared.
    #[must_use]
    pub fn is_zoomed_out(&self, zoom_threshold_span_lat: f64) -> bool {
        self.span_lat > zoom_threshold_span_lat
    }

    /// Returns true when the coordinate lies within the viewport bounds.
    #[must_use]
    pub fn contains(&self, point: LatLng) -> bool {
        let half_lat = self.span_lat / 2.0;
        let half_lng = self.span_lng / 2.0;
        (point.lat - self.center.lat).abs() <= half_lat
            && (point.lng - self.center.lng).abs() <= half_lng
    }
}
