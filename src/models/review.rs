//! Accessibility review types.
//!
//! Reviews are the only durable entity in the system; they live in the
//! external reviews backend and reference places by id without a storage-side
//! foreign key (places are not persisted).

use super::PlaceId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored accessibility review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    /// Backend-assigned review id.
    pub id: String,
    /// The reviewed place.
    pub place_id: PlaceId,
    /// Accessibility rating, 1–5.
    pub rating: u8,
    /// Free-text review body.
    pub text: String,
    /// Author identifier; ownership checks compare this against the
    /// authenticated caller server-side.
    pub author_id: String,
    /// Attached photo URLs.
    #[serde(default)]
    pub photos: Vec<String>,
    /// Attached video URL.
    #[serde(default)]
    pub video: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Payload for creating a review.
#[derive(Debug, Clone, Serialize)]
pub struct NewReview {
    /// The reviewed place.
    pub place_id: PlaceId,
    /// Accessibility rating, 1–5.
    pub rating: u8,
    /// Free-text review body.
    pub text: String,
    /// Attached photo URLs.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub photos: Vec<String>,
    /// Attached video URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video: Option<String>,
}

impl NewReview {
    /// Creates a review payload with no attachments.
    #[must_use]
    pub fn new(place_id: impl Into<PlaceId>, rating: u8, text: impl Into<String>) -> Self {
        Self {
            place_id: place_id.into(),
            rating,
            text: text.into(),
            photos: Vec::new(),
            video: None,
        }
    }

    /// Validates the payload.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidInput`] when the rating is outside 1–5
    /// or the text is empty.
    pub fn validate(&self) -> crate::Result<()> {
        if !(1..=5).contains(&self.rating) {
            return Err(crate::Error::InvalidInput(format!(
                "rating must be 1-5, got {}",
                self.rating
            )));
        }
        if self.text.trim().is_empty() {
            return Err(crate::Error::InvalidInput(
                "review text must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Partial update for an existing review; `None` fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReviewUpdate {
    /// New rating, if changed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    /// New text, if changed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Replacement photo URLs, if changed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photos: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_review_validates_rating() {
        assert!(NewReview::new("a", 0, "ramp at entrance").validate().is_err());
        assert!(NewReview::new("a", 6, "ramp at entrance").validate().is_err());
        assert!(NewReview::new("a", 5, "ramp at entrance").validate().is_ok());
    }

    #[test]
    fn test_new_review_validates_text() {
        assert!(NewReview::new("a", 3, "  ").validate().is_err());
    }
}
