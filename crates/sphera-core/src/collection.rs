//! Needed-element filter and collection counter for one AR session.
//!
//! Only two mutation paths exist: [`CollectionState::set_needed`] (which
//! resets the counter) and [`CollectionState::record_collection`] (which
//! increments it). That is what guarantees the counter is monotone between
//! resets and never negative.

use crate::element::Element;
use serde::{Deserialize, Serialize};

/// The active element filter and the count of collections made under it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionState {
    needed: Option<Element>,
    collected: u32,
}

impl CollectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// The element currently gating collection. `None` means no filter.
    pub fn needed(&self) -> Option<Element> {
        self.needed
    }

    /// Collections made since the needed element was last set.
    pub fn collected(&self) -> u32 {
        self.collected
    }

    /// Overwrite the needed element. Always resets the counter to zero,
    /// even when the value is unchanged.
    pub fn set_needed(&mut self, needed: Option<Element>) {
        self.needed = needed;
        self.collected = 0;
    }

    /// Whether an anchor of the given element may currently be collected.
    pub fn eligible(&self, element: Element) -> bool {
        self.needed.is_none() || self.needed == Some(element)
    }

    /// Record one successful collection.
    pub fn record_collection(&mut self) {
        self.collected += 1;
    }
}
