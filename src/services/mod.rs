//! Service layer: fetch, merge, suggest, rank, orchestrate.

mod aggregator;
mod geo_fetcher;
mod ranking;
mod suggestions;
mod viewport;

pub use aggregator::{MergeMode, PlaceAggregator};
pub use geo_fetcher::GeoFetcher;
pub use ranking::{RankingService, rank};
pub use suggestions::{SuggestionResolver, SuggestionState};
pub use viewport::{MapPhase, MapState, ViewportController};
