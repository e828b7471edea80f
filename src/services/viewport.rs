//! Viewport state machine driving fetch and merge.
//!
//! Owns the region/category/sequence-number triple and the place aggregator,
//! and decides when the geo fetcher re-runs: debounced on viewport settle,
//! immediately on category change and manual recenter, never while zoomed
//! out. Overlapping fetches are serialized by outcome, not by cancellation: a
//! monotonically increasing request sequence number is checked, under the
//! same lock as the merge, before any result touches shared state, so an
//! older slower response can never overwrite a newer one.

use super::aggregator::{MergeMode, PlaceAggregator};
use super::geo_fetcher::GeoFetcher;
use super::suggestions::{SuggestionResolver, SuggestionState};
use crate::config::CoreConfig;
use crate::models::{CategoryFilter, LatLng, Place, PlaceId, Region, Suggestion};
use crate::places::{LocationProvider, PlacesApi};
use crate::{Error, Result};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::watch;

/// Top-level lifecycle of the map session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MapPhase {
    /// Nothing started yet.
    #[default]
    Uninitialized,
    /// Waiting for a device location fix.
    Locating,
    /// Location access denied; terminal for this session.
    PermissionDenied,
    /// Region established, fetching on movement (unless zoomed out).
    Ready,
}

/// Observable state exposed to the UI.
///
/// The map must stay interactive even when every fetch is failing;
/// `last_error` is a non-blocking inline indicator, never a hard stop.
#[derive(Debug, Clone, Default)]
pub struct MapState {
    /// Lifecycle phase.
    pub phase: MapPhase,
    /// Current viewport, once established.
    pub region: Option<Region>,
    /// Active category filter.
    pub category: CategoryFilter,
    /// The canonical place set.
    pub places: HashMap<PlaceId, Place>,
    /// True while waiting for the initial location fix.
    pub loading: bool,
    /// True while a place fetch is in flight.
    pub loading_places: bool,
    /// True when the viewport is wider than the zoom threshold.
    pub is_zoomed_out: bool,
    /// Current search query text.
    pub query: String,
    /// Autocomplete candidates for the query.
    pub suggestions: Vec<Suggestion>,
    /// Whether the suggestion list should be shown.
    pub show_suggestions: bool,
    /// Last fetch failure, if any (cleared by the next success).
    pub last_error: Option<String>,
}

/// Mutable state owned by the controller.
///
/// Mutated only under its mutex; the staleness check and the merge happen in
/// the same critical section.
#[derive(Debug, Default)]
struct ControllerState {
    phase: MapPhase,
    home: Option<LatLng>,
    region: Option<Region>,
    category: CategoryFilter,
    aggregator: PlaceAggregator,
    zoomed_out: bool,
    /// Sequence number of the most recently issued fetch. A completed fetch
    /// whose number is older than this is superseded and discarded.
    fetch_seq: u64,
    /// Generation of the most recently armed viewport debounce timer.
    debounce_gen: u64,
    pending_region: Option<Region>,
    loading_places: bool,
    last_error: Option<String>,
}

struct Inner<P: PlacesApi, L: LocationProvider> {
    fetcher: GeoFetcher<P>,
    locator: L,
    suggestions: SuggestionResolver<P>,
    suggestion_rx: watch::Receiver<SuggestionState>,
    config: CoreConfig,
    state: Mutex<ControllerState>,
    tx: watch::Sender<MapState>,
}

/// Orchestrates the geo fetcher, aggregator, and suggestion resolver, and
/// exposes the combined observable state.
pub struct ViewportController<P: PlacesApi, L: LocationProvider> {
    inner: Arc<Inner<P, L>>,
}

impl<P: PlacesApi, L: LocationProvider> Clone for ViewportController<P, L> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<P, L> ViewportController<P, L>
where
    P: PlacesApi + 'static,
    L: LocationProvider + 'static,
{
    /// Creates a controller over the given collaborators.
    #[must_use]
    pub fn new(api: Arc<P>, locator: L, config: CoreConfig) -> Self {
        let fetcher = GeoFetcher::new(Arc::clone(&api), &config);
        let suggestions = SuggestionResolver::new(api, &config);
        let suggestion_rx = suggestions.subscribe();
        let (tx, _rx) = watch::channel(MapState::default());
        Self {
            inner: Arc::new(Inner {
                fetcher,
                locator,
                suggestions,
                suggestion_rx,
                config,
                state: Mutex::new(ControllerState::default()),
                tx,
            }),
        }
    }

    /// Subscribes to state changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<MapState> {
        self.inner.tx.subscribe()
    }

    /// Returns a snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> MapState {
        self.inner.tx.borrow().clone()
    }

    /// Starts the session: requests a location fix, initializes the viewport
    /// at the default zoom around it, and runs the first fetch.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Permission`] when location access is denied. This is
    /// terminal for the session; the controller stays without a working
    /// region and does not retry.
    pub async fn start(&self) -> Result<()> {
        {
            let mut st = self.lock();
            st.phase = MapPhase::Locating;
            self.publish(&st);
        }

        let location = match self.inner.locator.current_location().await {
            Ok(location) => location,
            Err(e) => {
                let mut st = self.lock();
                st.phase = if matches!(e, Error::Permission(_)) {
                    MapPhase::PermissionDenied
                } else {
                    MapPhase::Uninitialized
                };
                st.last_error = Some(e.to_string());
                self.publish(&st);
                return Err(e);
            }
        };

        self.spawn_suggestion_mirror();

        let (region, category) = {
            let mut st = self.lock();
            st.home = Some(location);
            let region = self.default_region(location);
            st.region = Some(region);
            st.phase = MapPhase::Ready;
            st.zoomed_out = false;
            self.publish(&st);
            (region, st.category)
        };
        self.run_fetch(region, category, None).await;
        Ok(())
    }

    /// Handles a viewport-change event (map pan/zoom settle).
    ///
    /// Debounced: rapid intermediate events collapse and only the last
    /// settled region within the window is acted upon.
    pub fn on_region_change(&self, region: Region) {
        let generation = {
            let mut st = self.lock();
            if st.phase != MapPhase::Ready {
                return;
            }
            st.debounce_gen += 1;
            st.pending_region = Some(region);
            st.debounce_gen
        };

        let controller = self.clone();
        let debounce = self.inner.config.viewport_debounce;
        tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            controller.settle_region(generation).await;
        });
    }

    /// Switches the category filter and re-fetches immediately (no debounce)
    /// for the current region.
    pub async fn set_category(&self, category: CategoryFilter) {
        let fetch_target = {
            let mut st = self.lock();
            st.category = category;
            let target = if st.phase == MapPhase::Ready && !st.zoomed_out {
                st.region
            } else {
                None
            };
            self.publish(&st);
            target
        };
        if let Some(region) = fetch_target {
            self.run_fetch(region, category, None).await;
        }
    }

    /// Recenters the viewport on the device location at the default zoom and
    /// fetches immediately with the fixed recenter radius.
    ///
    /// The derived-radius formula is bypassed on purpose so a manual recenter
    /// always covers the same area regardless of the previous zoom.
    pub async fn recenter(&self) {
        let fetch_target = {
            let mut st = self.lock();
            let Some(home) = st.home else {
                return;
            };
            let region = self.default_region(home);
            st.region = Some(region);
            st.zoomed_out = false;
            self.publish(&st);
            (region, st.category)
        };
        let (region, category) = fetch_target;
        self.run_fetch(region, category, Some(self.inner.config.recenter_radius_m))
            .await;
    }

    /// Handles a search-field text change (debounced autocomplete).
    pub fn on_change_query(&self, text: impl Into<String>) {
        let bias = {
            let st = self.lock();
            st.region.map(|r| r.center).or(st.home)
        };
        // No location fix yet: nothing to bias toward, match the map screen
        // behavior and ignore input until located.
        let Some(bias) = bias else { return };
        self.inner.suggestions.on_query_change(text, bias);
    }

    /// Hides the suggestion list.
    pub fn dismiss_suggestions(&self) {
        self.inner.suggestions.clear();
    }

    /// Resolves a selected suggestion, merges it into the place set as the
    /// pinned selection, and centers the viewport on it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DetailFetch`] when the details lookup fails;
    /// selection state is unchanged.
    pub async fn select_suggestion(&self, candidate_id: &str) -> Result<Place> {
        match self.inner.suggestions.resolve_selection(candidate_id).await {
            Ok(place) => {
                let mut st = self.lock();
                st.aggregator.pin_selection(place.clone());
                let span = self.inner.config.selection_span;
                st.region = Some(Region::new(place.location, span, span));
                st.zoomed_out = false;
                self.publish(&st);
                Ok(place)
            }
            Err(e) => {
                let mut st = self.lock();
                st.last_error = Some(e.to_string());
                self.publish(&st);
                Err(e)
            }
        }
    }

    async fn settle_region(&self, generation: u64) {
        let fetch_target = {
            let mut st = self.lock();
            if generation != st.debounce_gen {
                // A later viewport event re-armed the window.
                return;
            }
            let Some(region) = st.pending_region else {
                return;
            };
            st.region = Some(region);

            if region.is_zoomed_out(self.inner.config.zoom_threshold_span_lat) {
                st.zoomed_out = true;
                st.aggregator.clear();
                // Supersede any in-flight fetch so a slow response cannot
                // repopulate the cleared set.
                st.fetch_seq += 1;
                st.loading_places = false;
                self.publish(&st);
                return;
            }

            st.zoomed_out = false;
            (region, st.category)
        };
        let (region, category) = fetch_target;
        self.run_fetch(region, category, None).await;
    }

    /// Issues one fetch and merges the result unless it was superseded.
    async fn run_fetch(&self, region: Region, category: CategoryFilter, radius_m: Option<u32>) {
        let seq = {
            let mut st = self.lock();
            st.fetch_seq += 1;
            st.loading_places = true;
            self.publish(&st);
            st.fetch_seq
        };

        let result = match radius_m {
            Some(radius) => {
                self.inner
                    .fetcher
                    .fetch_with_radius(region.center, radius, category)
                    .await
            }
            None => self.inner.fetcher.fetch_places(&region, category).await,
        };

        // Staleness check and merge are one critical section.
        let mut st = self.lock();
        if seq != st.fetch_seq {
            tracing::debug!(seq, latest = st.fetch_seq, "discarding superseded fetch");
            return;
        }
        match result {
            Ok(places) => {
                tracing::debug!(seq, count = places.len(), category = %category, "merging fetch result");
                st.aggregator.merge(places, MergeMode::Replace(region));
                st.last_error = None;
            }
            Err(e) => {
                tracing::warn!(seq, error = %e, "fetch failed");
                st.last_error = Some(e.to_string());
            }
        }
        st.loading_places = false;
        self.publish(&st);
    }

    fn spawn_suggestion_mirror(&self) {
        let controller = self.clone();
        let mut rx = self.inner.suggestions.subscribe();
        tokio::spawn(async move {
            while rx.changed().await.is_ok() {
                let st = controller.lock();
                controller.publish(&st);
            }
        });
    }

    fn default_region(&self, center: LatLng) -> Region {
        Region::new(
            center,
            self.inner.config.default_span_lat,
            self.inner.config.default_span_lng,
        )
    }

    fn lock(&self) -> MutexGuard<'_, ControllerState> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn publish(&self, st: &ControllerState) {
        let suggest = self.inner.suggestion_rx.borrow().clone();
        self.inner.tx.send_replace(MapState {
            phase: st.phase,
            region: st.region,
            category: st.category,
            places: st.aggregator.current_set().clone(),
            loading: st.phase == MapPhase::Locating,
            loading_places: st.loading_places,
            is_zoomed_out: st.zoomed_out,
            query: suggest.query,
            suggestions: suggest.suggestions,
            show_suggestions: suggest.visible,
            last_error: st.last_error.clone(),
        });
    }
}
