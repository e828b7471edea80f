//! Shared fakes for the places, reviews, and location collaborators.
//!
//! Responses are closures so each test scripts exactly the behavior it needs,
//! including per-call latency (driven by the paused tokio clock).

#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use accessmap_core::models::{CategoryFilter, LatLng, NewReview, Place, PlaceId, Review, ReviewUpdate, Suggestion};
use accessmap_core::{Error, LocationProvider, PlacesApi, ReviewsApi, Result};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

type NearbyFn = dyn Fn(LatLng, u32, Option<CategoryFilter>) -> Result<Vec<Place>> + Send + Sync;
type TextFn = dyn Fn(&str) -> Result<Vec<Place>> + Send + Sync;
type AutocompleteFn = dyn Fn(&str) -> Result<Vec<Suggestion>> + Send + Sync;
type DetailsFn = dyn Fn(&str) -> Result<Place> + Send + Sync;
type DelayFn<K> = dyn Fn(&K) -> Duration + Send + Sync;

/// Builds a place with the given id and coordinates.
pub fn place(id: &str, lat: f64, lng: f64) -> Place {
    Place::new(id, format!("place {id}"), LatLng::new(lat, lng))
}

/// Builds a review for a place.
pub fn review(place_id: &str, rating: u8) -> Review {
    Review {
        id: format!("r-{place_id}-{rating}"),
        place_id: PlaceId::from(place_id),
        rating,
        text: "accessible entrance".to_string(),
        author_id: "tester".to_string(),
        photos: Vec::new(),
        video: None,
        created_at: Utc::now(),
    }
}

/// An upstream failure for scripting error paths.
pub fn upstream_err(operation: &str) -> Error {
    Error::Upstream {
        operation: operation.to_string(),
        cause: "scripted failure".to_string(),
    }
}

/// Scriptable places collaborator.
pub struct FakePlaces {
    nearby: Box<NearbyFn>,
    nearby_delay: Box<DelayFn<u32>>,
    text: Box<TextFn>,
    autocomplete: Box<AutocompleteFn>,
    autocomplete_delay: Box<DelayFn<String>>,
    details: Box<DetailsFn>,
    /// Inputs passed to autocomplete, in call order.
    pub autocomplete_log: Mutex<Vec<String>>,
    /// Total nearby-search calls.
    pub nearby_calls: AtomicUsize,
    /// Total text-search calls.
    pub text_calls: AtomicUsize,
}

impl Default for FakePlaces {
    fn default() -> Self {
        Self {
            nearby: Box::new(|_, _, _| Ok(Vec::new())),
            nearby_delay: Box::new(|_| Duration::ZERO),
            text: Box::new(|_| Ok(Vec::new())),
            autocomplete: Box::new(|_| Ok(Vec::new())),
            autocomplete_delay: Box::new(|_| Duration::ZERO),
            details: Box::new(|id| {
                Err(Error::Upstream {
                    operation: "place_details".to_string(),
                    cause: format!("no detail scripted for {id}"),
                })
            }),
            autocomplete_log: Mutex::new(Vec::new()),
            nearby_calls: AtomicUsize::new(0),
            text_calls: AtomicUsize::new(0),
        }
    }
}

impl FakePlaces {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_nearby<F>(mut self, f: F) -> Self
    where
        F: Fn(LatLng, u32, Option<CategoryFilter>) -> Result<Vec<Place>> + Send + Sync + 'static,
    {
        self.nearby = Box::new(f);
        self
    }

    /// Delays nearby responses as a function of the requested radius.
    pub fn with_nearby_delay<F>(mut self, f: F) -> Self
    where
        F: Fn(&u32) -> Duration + Send + Sync + 'static,
    {
        self.nearby_delay = Box::new(f);
        self
    }

    pub fn with_text<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> Result<Vec<Place>> + Send + Sync + 'static,
    {
        self.text = Box::new(f);
        self
    }

    pub fn with_autocomplete<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> Result<Vec<Suggestion>> + Send + Sync + 'static,
    {
        self.autocomplete = Box::new(f);
        self
    }

    /// Delays autocomplete responses as a function of the input text.
    pub fn with_autocomplete_delay<F>(mut self, f: F) -> Self
    where
        F: Fn(&String) -> Duration + Send + Sync + 'static,
    {
        self.autocomplete_delay = Box::new(f);
        self
    }

    pub fn with_details<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> Result<Place> + Send + Sync + 'static,
    {
        self.details = Box::new(f);
        self
    }

    pub fn nearby_call_count(&self) -> usize {
        self.nearby_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PlacesApi for FakePlaces {
    async fn nearby_search(
        &self,
        center: LatLng,
        radius_m: u32,
        category: Option<CategoryFilter>,
    ) -> Result<Vec<Place>> {
        self.nearby_calls.fetch_add(1, Ordering::SeqCst);
        let delay = (self.nearby_delay)(&radius_m);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        (self.nearby)(center, radius_m, category)
    }

    async fn text_search(&self, query: &str, _center: LatLng, _radius_m: u32) -> Result<Vec<Place>> {
        self.text_calls.fetch_add(1, Ordering::SeqCst);
        (self.text)(query)
    }

    async fn autocomplete(
        &self,
        input: &str,
        _center: LatLng,
        _radius_m: u32,
    ) -> Result<Vec<Suggestion>> {
        self.autocomplete_log.lock().unwrap().push(input.to_string());
        let delay = (self.autocomplete_delay)(&input.to_string());
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        (self.autocomplete)(input)
    }

    async fn place_details(&self, place_id: &str) -> Result<Place> {
        (self.details)(place_id)
    }
}

/// Location collaborator with a fixed outcome.
pub struct FakeLocator {
    result: Result<LatLng>,
}

impl FakeLocator {
    pub const fn at(location: LatLng) -> Self {
        Self {
            result: Ok(location),
        }
    }

    pub fn denied() -> Self {
        Self {
            result: Err(Error::Permission("user declined".to_string())),
        }
    }
}

#[async_trait]
impl LocationProvider for FakeLocator {
    async fn current_location(&self) -> Result<LatLng> {
        match &self.result {
            Ok(location) => Ok(*location),
            Err(Error::Permission(reason)) => Err(Error::Permission(reason.clone())),
            Err(_) => Err(Error::Network("no fix".to_string())),
        }
    }
}

/// In-memory reviews collaborator.
#[derive(Default)]
pub struct FakeReviews {
    reviews: Mutex<Vec<Review>>,
    pub fail_all: bool,
}

impl FakeReviews {
    pub fn with_reviews(reviews: Vec<Review>) -> Self {
        Self {
            reviews: Mutex::new(reviews),
            fail_all: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            reviews: Mutex::new(Vec::new()),
            fail_all: true,
        }
    }
}

#[async_trait]
impl ReviewsApi for FakeReviews {
    async fn reviews_for_place(&self, place_id: &PlaceId) -> Result<Vec<Review>> {
        if self.fail_all {
            return Err(backend_err("reviews_for_place"));
        }
        Ok(self
            .reviews
            .lock()
            .unwrap()
            .iter()
            .filter(|r| &r.place_id == place_id)
            .cloned()
            .collect())
    }

    async fn all_reviews(&self) -> Result<Vec<Review>> {
        if self.fail_all {
            return Err(backend_err("all_reviews"));
        }
        Ok(self.reviews.lock().unwrap().clone())
    }

    async fn my_reviews(&self) -> Result<Vec<Review>> {
        if self.fail_all {
            return Err(backend_err("my_reviews"));
        }
        Ok(self
            .reviews
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.author_id == "tester")
            .cloned()
            .collect())
    }

    async fn create(&self, new: NewReview) -> Result<Review> {
        if self.fail_all {
            return Err(backend_err("create_review"));
        }
        new.validate()?;
        let created = Review {
            id: format!("r{}", self.reviews.lock().unwrap().len() + 1),
            place_id: new.place_id,
            rating: new.rating,
            text: new.text,
            author_id: "tester".to_string(),
            photos: new.photos,
            video: new.video,
            created_at: Utc::now(),
        };
        self.reviews.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn update(&self, review_id: &str, update: ReviewUpdate) -> Result<Review> {
        let mut reviews = self.reviews.lock().unwrap();
        let review = reviews
            .iter_mut()
            .find(|r| r.id == review_id)
            .ok_or_else(|| backend_err("update_review"))?;
        if review.author_id != "tester" {
            return Err(backend_err("update_review"));
        }
        if let Some(rating) = update.rating {
            review.rating = rating;
        }
        if let Some(text) = update.text {
            review.text = text;
        }
        Ok(review.clone())
    }

    async fn delete(&self, review_id: &str) -> Result<()> {
        let mut reviews = self.reviews.lock().unwrap();
        let before = reviews.len();
        reviews.retain(|r| !(r.id == review_id && r.author_id == "tester"));
        if reviews.len() == before {
            return Err(backend_err("delete_review"));
        }
        Ok(())
    }
}

fn backend_err(operation: &str) -> Error {
    Error::ReviewBackend {
        operation: operation.to_string(),
        cause: "scripted failure".to_string(),
    }
}
