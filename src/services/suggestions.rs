//! Debounced text-to-place autocomplete resolution.
//!
//! Each keystroke arms a fresh debounce timer and cancels its predecessor
//! (last-write coalescing). Two monotonic counters replace timer-and-closure
//! bookkeeping: `debounce_gen` identifies the latest armed timer, and
//! `fired_seq` identifies the latest autocomplete request actually issued.
//! A stale response is recognized and discarded on arrival instead of being
//! aborted in flight; clearing, shortening the query below the minimum
//! length, or resolving a selection also advances `fired_seq` so that an
//! in-flight response cannot repopulate a list the user just dismissed.

use crate::config::CoreConfig;
use crate::models::{LatLng, Place, Suggestion};
use crate::places::PlacesApi;
use crate::{Error, Result};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::watch;

/// Observable autocomplete state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuggestionState {
    /// Current query text.
    pub query: String,
    /// Candidate suggestions for the query.
    pub suggestions: Vec<Suggestion>,
    /// Whether the suggestion list should be shown.
    pub visible: bool,
}

/// Debounce bookkeeping. States: idle (no timer newer than the last fire),
/// pending (a timer armed for `debounce_gen`), fetching (request `fired_seq`
/// in flight).
#[derive(Debug, Default)]
struct ResolverState {
    debounce_gen: u64,
    fired_seq: u64,
}

impl ResolverState {
    /// Invalidates both the pending timer and any request already in flight.
    fn supersede(&mut self) {
        self.debounce_gen += 1;
        self.fired_seq += 1;
    }
}

fn lock(state: &Mutex<ResolverState>) -> MutexGuard<'_, ResolverState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Debounced autocomplete plus on-selection detail fetch.
pub struct SuggestionResolver<P: PlacesApi> {
    api: Arc<P>,
    debounce: Duration,
    min_query_len: usize,
    bias_radius_m: u32,
    state: Arc<Mutex<ResolverState>>,
    tx: watch::Sender<SuggestionState>,
}

impl<P: PlacesApi + 'static> SuggestionResolver<P> {
    /// Creates a resolver over the given places collaborator.
    #[must_use]
    pub fn new(api: Arc<P>, config: &CoreConfig) -> Self {
        let (tx, _rx) = watch::channel(SuggestionState::default());
        Self {
            api,
            debounce: config.suggestion_debounce,
            min_query_len: config.min_query_len,
            bias_radius_m: config.autocomplete_radius_m,
            state: Arc::new(Mutex::new(ResolverState::default())),
            tx,
        }
    }

    /// Subscribes to autocomplete state changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SuggestionState> {
        self.tx.subscribe()
    }

    /// Handles a query text change (fire-and-forget, debounced).
    ///
    /// Below the minimum query length the suggestion list is cleared
    /// immediately without a network call. Otherwise an autocomplete request
    /// biased toward `bias_center` fires once the debounce window settles.
    pub fn on_query_change(&self, text: impl Into<String>, bias_center: LatLng) {
        let text = text.into();
        let below_min = text.chars().count() < self.min_query_len;
        let generation = {
            let mut st = lock(&self.state);
            if below_min {
                // No request will fire, and anything already in flight must
                // not repopulate the list we are about to clear.
                st.supersede();
            } else {
                st.debounce_gen += 1;
            }
            st.debounce_gen
        };
        self.tx.send_modify(|s| s.query.clone_from(&text));

        if below_min {
            self.tx.send_modify(|s| {
                s.suggestions.clear();
                s.visible = false;
            });
            return;
        }

        let api = Arc::clone(&self.api);
        let state = Arc::clone(&self.state);
        let tx = self.tx.clone();
        let debounce = self.debounce;
        let radius = self.bias_radius_m;
        tokio::spawn(async move {
            tokio::time::sleep(debounce).await;

            let seq = {
                let mut st = lock(&state);
                if generation != st.debounce_gen {
                    // A newer keystroke re-armed the timer; this one is dead.
                    return;
                }
                st.fired_seq += 1;
                st.fired_seq
            };

            let result = api.autocomplete(&text, bias_center, radius).await;

            let st = lock(&state);
            if seq != st.fired_seq {
                tracing::debug!(seq, latest = st.fired_seq, "discarding stale autocomplete");
                return;
            }
            match result {
                Ok(suggestions) => {
                    tx.send_modify(|s| {
                        s.visible = !suggestions.is_empty();
                        s.suggestions = suggestions;
                    });
                }
                Err(e) => {
                    // Non-fatal: retried implicitly on the next keystroke.
                    tracing::debug!(error = %e, "autocomplete failed, clearing suggestions");
                    tx.send_modify(|s| {
                        s.suggestions.clear();
                        s.visible = false;
                    });
                }
            }
        });
    }

    /// Clears suggestions, cancels any pending debounce timer, and marks any
    /// in-flight autocomplete request stale.
    pub fn clear(&self) {
        lock(&self.state).supersede();
        self.tx.send_modify(|s| {
            s.suggestions.clear();
            s.visible = false;
        });
    }

    /// Fetches full details for a selected candidate.
    ///
    /// On success the query text becomes the place name and the suggestion
    /// list is hidden; the caller is responsible for merging the place into
    /// the aggregator and centering the viewport on it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DetailFetch`]; suggestion state is left unchanged.
    pub async fn resolve_selection(&self, candidate_id: &str) -> Result<Place> {
        let place = self
            .api
            .place_details(candidate_id)
            .await
            .map_err(|e| Error::DetailFetch {
                place_id: candidate_id.to_string(),
                cause: e.to_string(),
            })?;

        lock(&self.state).supersede();
        self.tx.send_modify(|s| {
            s.query.clone_from(&place.name);
            s.suggestions.clear();
            s.visible = false;
        });
        Ok(place)
    }
}
