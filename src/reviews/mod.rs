//! Reviews storage collaborator abstraction.
//!
//! Reviews are the only durable entity in the system; the backend owns them
//! and enforces ownership server-side by comparing the review's author to the
//! authenticated caller.

mod client;

pub use client::ReviewsClient;

use crate::Result;
use crate::models::{NewReview, PlaceId, Review, ReviewUpdate};
use async_trait::async_trait;

/// Accessor for the caller's auth token.
///
/// Injected explicitly instead of read from ambient session state so the core
/// stays testable without an app-context harness.
pub trait TokenProvider: Send + Sync {
    /// Returns the current bearer token, if a session is active.
    fn token(&self) -> Option<String>;
}

impl<F> TokenProvider for F
where
    F: Fn() -> Option<String> + Send + Sync,
{
    fn token(&self) -> Option<String> {
        self()
    }
}

/// Trait for the reviews storage collaborator.
#[async_trait]
pub trait ReviewsApi: Send + Sync {
    /// Returns all reviews for one place.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::ReviewBackend`] on backend failure.
    async fn reviews_for_place(&self, place_id: &PlaceId) -> Result<Vec<Review>>;

    /// Returns every stored review (ranking join input).
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::ReviewBackend`] on backend failure.
    async fn all_reviews(&self) -> Result<Vec<Review>>;

    /// Returns the authenticated caller's reviews, most recent first.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::ReviewBackend`] on backend failure or when no
    /// session is active.
    async fn my_reviews(&self) -> Result<Vec<Review>>;

    /// Creates a review authored by the authenticated caller.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidInput`] when the payload fails
    /// validation, or [`crate::Error::ReviewBackend`] on backend failure.
    async fn create(&self, review: NewReview) -> Result<Review>;

    /// Updates a review; the backend rejects callers other than the author.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::ReviewBackend`] on rejection or failure.
    async fn update(&self, review_id: &str, update: ReviewUpdate) -> Result<Review>;

    /// Deletes a review; the backend rejects callers other than the author.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::ReviewBackend`] on rejection or failure.
    async fn delete(&self, review_id: &str) -> Result<()>;
}
