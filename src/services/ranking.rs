//! Accessibility ranking of aggregated places.

use super::GeoFetcher;
use crate::Result;
use crate::models::{AggregatedPlace, CategoryFilter, LatLng, Place, PlaceId, Review};
use crate::places::PlacesApi;
use crate::reviews::ReviewsApi;
use std::collections::HashMap;
use std::sync::Arc;

/// Joins places with accessibility reviews into a ranked list.
///
/// Groups reviews by place id, computes the per-place mean rating (0.0 with
/// no reviews) and review count, and sorts descending by mean with count as
/// the tie-break. Reviews referencing a place id not present in `places` are
/// ignored; a place is never synthesized from a review alone.
///
/// Pure function, safe to recompute on every render. Ties beyond the count
/// break on place id so the output order is fully deterministic.
#[must_use]
pub fn rank(places: &HashMap<PlaceId, Place>, reviews: &[Review]) -> Vec<AggregatedPlace> {
    let mut totals: HashMap<&PlaceId, (u32, usize)> = HashMap::new();
    for review in reviews {
        if places.contains_key(&review.place_id) {
            let entry = totals.entry(&review.place_id).or_insert((0, 0));
            entry.0 += u32::from(review.rating);
            entry.1 += 1;
        }
    }

    let mut ranked: Vec<AggregatedPlace> = places
        .values()
        .map(|place| {
            let (sum, count) = totals.get(&place.id).copied().unwrap_or((0, 0));
            #[allow(clippy::cast_precision_loss)]
            let accessibility_mean = if count == 0 {
                0.0
            } else {
                f64::from(sum) / count as f64
            };
            AggregatedPlace {
                place: place.clone(),
                accessibility_mean,
                review_count: count,
            }
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.accessibility_mean
            .total_cmp(&a.accessibility_mean)
            .then_with(|| b.review_count.cmp(&a.review_count))
            .then_with(|| a.place.id.cmp(&b.place.id))
    });
    ranked
}

/// Builds the accessibility ranking for a map category around a point.
///
/// Runs one fan-out fetch at the ranking radius, pulls every stored review,
/// and joins them with [`rank`].
pub struct RankingService<P: PlacesApi, R: ReviewsApi> {
    fetcher: GeoFetcher<P>,
    reviews: Arc<R>,
    ranking_radius_m: u32,
}

impl<P: PlacesApi, R: ReviewsApi> RankingService<P, R> {
    /// Creates a ranking service.
    #[must_use]
    pub fn new(fetcher: GeoFetcher<P>, reviews: Arc<R>, ranking_radius_m: u32) -> Self {
        Self {
            fetcher,
            reviews,
            ranking_radius_m,
        }
    }

    /// Fetches places and reviews, then ranks them.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Upstream`] when the place fetch fails entirely
    /// or [`crate::Error::ReviewBackend`] when reviews cannot be loaded.
    pub async fn rank_around(
        &self,
        center: LatLng,
        category: CategoryFilter,
    ) -> Result<Vec<AggregatedPlace>> {
        let places = self
            .fetcher
            .fetch_with_radius(center, self.ranking_radius_m, category)
            .await?;
        let reviews = self.reviews.all_reviews().await?;
        Ok(rank(&places, &reviews))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn place(id: &str) -> (PlaceId, Place) {
        (
            PlaceId::from(id),
            Place::new(id, format!("place {id}"), LatLng::new(0.0, 0.0)),
        )
    }

    fn review(place_id: &str, rating: u8) -> Review {
        Review {
            id: format!("r-{place_id}-{rating}"),
            place_id: PlaceId::from(place_id),
            rating,
            text: "step-free entrance".to_string(),
            author_id: "u1".to_string(),
            photos: Vec::new(),
            video: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_mean_and_count() {
        let places: HashMap<_, _> = [place("a")].into();
        let reviews = [review("a", 5), review("a", 3)];
        let ranked = rank(&places, &reviews);
        assert_eq!(ranked.len(), 1);
        assert!((ranked[0].accessibility_mean - 4.0).abs() < f64::EPSILON);
        assert_eq!(ranked[0].review_count, 2);
    }

    #[test]
    fn test_sort_mean_then_count() {
        let places: HashMap<_, _> = [place("a"), place("b"), place("c"), place("d")].into();
        let reviews = [
            review("a", 4),
            review("b", 4),
            review("b", 4),
            review("c", 5),
        ];
        let ranked = rank(&places, &reviews);
        let order: Vec<&str> = ranked.iter().map(|p| p.place.id.as_str()).collect();
        // c: mean 5; b: mean 4 count 2; a: mean 4 count 1; d: no reviews.
        assert_eq!(order, vec!["c", "b", "a", "d"]);
    }

    #[test]
    fn test_unreviewed_places_sort_last() {
        let places: HashMap<_, _> = [place("x"), place("y")].into();
        let reviews = [review("y", 1)];
        let ranked = rank(&places, &reviews);
        assert_eq!(ranked[0].place.id.as_str(), "y");
        assert_eq!(ranked[1].review_count, 0);
        assert!((ranked[1].accessibility_mean - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_orphan_reviews_ignored() {
        let places: HashMap<_, _> = [place("a")].into();
        let reviews = [review("ghost", 5)];
        let ranked = rank(&places, &reviews);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].review_count, 0);
    }

    #[test]
    fn test_rank_is_idempotent() {
        let places: HashMap<_, _> = [place("a"), place("b"), place("c")].into();
        let reviews = [review("a", 2), review("b", 2), review("c", 4)];
        let first = rank(&places, &reviews);
        let second = rank(&places, &reviews);
        assert_eq!(first, second);
    }
}
