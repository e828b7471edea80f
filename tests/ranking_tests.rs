//! Ranking service end-to-end against fake collaborators.

mod support;

use accessmap_core::models::{CategoryFilter, LatLng};
use accessmap_core::services::{GeoFetcher, RankingService};
use accessmap_core::{CoreConfig, Error};
use std::sync::Arc;
use support::{FakePlaces, FakeReviews, place, review};

fn config() -> CoreConfig {
    CoreConfig::default()
        .with_fan_out_categories(vec![CategoryFilter::Restaurant])
        .with_keyword_probes(Vec::new())
}

#[tokio::test]
async fn ranks_fetched_places_by_accessibility() {
    let api = Arc::new(FakePlaces::new().with_nearby(|_, radius, _| {
        // Ranking always fetches at the fixed ranking radius.
        assert_eq!(radius, 5000);
        Ok(vec![place("a", 0.0, 0.0), place("b", 0.001, 0.0)])
    }));
    let reviews = Arc::new(FakeReviews::with_reviews(vec![
        review("a", 5),
        review("a", 3),
        review("orphan", 5),
    ]));
    let config = config();
    let service = RankingService::new(
        GeoFetcher::new(api, &config),
        reviews,
        config.ranking_radius_m,
    );

    let ranked = service
        .rank_around(LatLng::new(0.0, 0.0), CategoryFilter::All)
        .await
        .expect("ranking succeeds");

    assert_eq!(ranked.len(), 2);
    assert_eq!(ranked[0].place.id.as_str(), "a");
    assert!((ranked[0].accessibility_mean - 4.0).abs() < f64::EPSILON);
    assert_eq!(ranked[0].review_count, 2);
    assert_eq!(ranked[1].review_count, 0);
}

#[tokio::test]
async fn review_backend_failure_propagates() {
    let api = Arc::new(FakePlaces::new().with_nearby(|_, _, _| Ok(vec![place("a", 0.0, 0.0)])));
    let config = config();
    let service = RankingService::new(
        GeoFetcher::new(api, &config),
        Arc::new(FakeReviews::failing()),
        config.ranking_radius_m,
    );

    let err = service
        .rank_around(LatLng::new(0.0, 0.0), CategoryFilter::All)
        .await
        .expect_err("reviews unavailable");
    assert!(matches!(err, Error::ReviewBackend { .. }));
}

#[tokio::test]
async fn place_fetch_failure_propagates() {
    let api = Arc::new(
        FakePlaces::new().with_nearby(|_, _, _| Err(support::upstream_err("nearby_search"))),
    );
    let config = config();
    let service = RankingService::new(
        GeoFetcher::new(api, &config),
        Arc::new(FakeReviews::default()),
        config.ranking_radius_m,
    );

    let err = service
        .rank_around(LatLng::new(0.0, 0.0), CategoryFilter::All)
        .await
        .expect_err("no sub-query succeeded");
    assert!(matches!(err, Error::Upstream { .. }));
}
