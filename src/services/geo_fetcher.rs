//! Upstream place-search fan-out and merge.
//!
//! This is the highest-volume call path in the system. The upstream provider
//! is non-deterministic: the same entity shows up under several categories
//! and field population varies between endpoints, so everything is folded
//! into one id-keyed mapping where last write wins.

use crate::config::CoreConfig;
use crate::models::{CategoryFilter, LatLng, Place, PlaceId, Region};
use crate::places::PlacesApi;
use crate::{Error, Result};
use futures::future::{BoxFuture, FutureExt, join_all};
use std::collections::HashMap;
use std::sync::Arc;

/// Issues and merges upstream place-search calls for a region and category.
pub struct GeoFetcher<P: PlacesApi> {
    api: Arc<P>,
    fan_out_categories: Vec<CategoryFilter>,
    keyword_probes: Vec<String>,
}

impl<P: PlacesApi> GeoFetcher<P> {
    /// Creates a fetcher using the config's fan-out lists.
    #[must_use]
    pub fn new(api: Arc<P>, config: &CoreConfig) -> Self {
        Self {
            api,
            fan_out_categories: config.fan_out_categories.clone(),
            keyword_probes: config.keyword_probes.clone(),
        }
    }

    /// Fetches places for a region, deriving the radius from its span.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Upstream`] when every sub-query fails (or the single
    /// query fails for a non-`All` category).
    pub async fn fetch_places(
        &self,
        region: &Region,
        category: CategoryFilter,
    ) -> Result<HashMap<PlaceId, Place>> {
        self.fetch_with_radius(region.center, region.search_radius_m(), category)
            .await
    }

    /// Fetches places around a center with an explicit radius.
    ///
    /// For `All`, fans out one nearby-search per configured secondary
    /// category plus one text-search per keyword probe, all in parallel over
    /// the same center and radius; successful responses are folded last-write-
    /// wins. A single sub-query failure is logged and excluded; only total
    /// failure surfaces as an error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Upstream`] when no sub-query succeeds.
    pub async fn fetch_with_radius(
        &self,
        center: LatLng,
        radius_m: u32,
        category: CategoryFilter,
    ) -> Result<HashMap<PlaceId, Place>> {
        if category == CategoryFilter::All {
            self.fan_out(center, radius_m).await
        } else {
            let places = self
                .api
                .nearby_search(center, radius_m, Some(category))
                .await?;
            Ok(into_mapping(places))
        }
    }

    async fn fan_out(&self, center: LatLng, radius_m: u32) -> Result<HashMap<PlaceId, Place>> {
        let mut sub_queries: Vec<BoxFuture<'_, (String, Result<Vec<Place>>)>> = Vec::new();

        for &sub_category in &self.fan_out_categories {
            let api = Arc::clone(&self.api);
            sub_queries.push(
                async move {
                    let result = api.nearby_search(center, radius_m, Some(sub_category)).await;
                    (format!("nearby:{sub_category}"), result)
                }
                .boxed(),
            );
        }
        for keyword in &self.keyword_probes {
            let api = Arc::clone(&self.api);
            sub_queries.push(
                async move {
                    let result = api.text_search(keyword, center, radius_m).await;
                    (format!("keyword:{keyword}"), result)
                }
                .boxed(),
            );
        }

        let total = sub_queries.len();
        let mut merged = HashMap::new();
        let mut succeeded = 0usize;
        let mut last_cause = String::new();

        for (label, result) in join_all(sub_queries).await {
            match result {
                Ok(places) => {
                    succeeded += 1;
                    for place in places {
                        merged.insert(place.id.clone(), place);
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        sub_query = %label,
                        error = %e,
                        "sub-query failed, excluding from merge"
                    );
                    last_cause = e.to_string();
                }
            }
        }

        if succeeded == 0 && total > 0 {
            return Err(Error::Upstream {
                operation: "fetch_places".to_string(),
                cause: format!("all {total} sub-queries failed, last: {last_cause}"),
            });
        }

        tracing::debug!(
            merged = merged.len(),
            succeeded,
            total,
            "fan-out fetch merged"
        );
        Ok(merged)
    }
}

/// Folds a place list into an id-keyed mapping, last write wins.
fn into_mapping(places: Vec<Place>) -> HashMap<PlaceId, Place> {
    places.into_iter().map(|p| (p.id.clone(), p)).collect()
}
