//! Canonical in-memory place set.

use crate::models::{Place, PlaceId, Region};
use std::collections::HashMap;

/// How a batch of places is folded into the working set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MergeMode {
    /// The new mapping becomes the entire set, except that a place pinned via
    /// suggestion selection survives while it lies within the given region's
    /// bounds. Used after a fresh fetch for a new region or category.
    Replace(Region),
    /// Adds or overwrites entries without touching the rest. Used for
    /// suggestion-selection merges.
    Upsert,
}

/// Owns the canonical set of currently displayed places.
///
/// The set never contains two entries with the same id; later writes for an
/// id replace earlier ones. Iteration order is not guaranteed and consumers
/// must not rely on it.
#[derive(Debug, Default)]
pub struct PlaceAggregator {
    places: HashMap<PlaceId, Place>,
    /// Place injected via suggestion selection; survives Replace merges while
    /// it stays within the replacing region's bounds.
    pinned: Option<PlaceId>,
}

impl PlaceAggregator {
    /// Creates an empty aggregator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The current working set.
    #[must_use]
    pub const fn current_set(&self) -> &HashMap<PlaceId, Place> {
        &self.places
    }

    /// Number of places in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.places.len()
    }

    /// Returns true when the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }

    /// Folds a batch of places into the set and returns the result.
    pub fn merge(
        &mut self,
        new_places: HashMap<PlaceId, Place>,
        mode: MergeMode,
    ) -> &HashMap<PlaceId, Place> {
        match mode {
            MergeMode::Replace(region) => self.replace(new_places, &region),
            MergeMode::Upsert => self.places.extend(new_places),
        }
        &self.places
    }

    /// Upserts one place and pins it so the next Replace merge keeps it.
    pub fn pin_selection(&mut self, place: Place) {
        self.pinned = Some(place.id.clone());
        self.places.insert(place.id.clone(), place);
    }

    /// Drops everything, including any pinned selection.
    ///
    /// Used when the viewport zooms out past the gating threshold; the empty
    /// set invariant there takes precedence over pin preservation.
    pub fn clear(&mut self) {
        self.places.clear();
        self.pinned = None;
    }

    fn replace(&mut self, mut new_places: HashMap<PlaceId, Place>, region: &Region) {
        if let Some(pin) = self.pinned.clone() {
            if !new_places.contains_key(&pin) {
                match self.places.get(&pin) {
                    Some(place) if region.contains(place.location) => {
                        new_places.insert(pin, place.clone());
                    }
                    // Pinned place left the viewport (or was never here);
                    // the pin expires with this replace.
                    _ => self.pinned = None,
                }
            }
        }
        self.places = new_places;
    }
}
