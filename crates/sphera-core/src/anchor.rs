//! The anchor store: exclusive owner of every live collectible sphere.
//!
//! Anchors are created when the detection pipeline (or the host directly)
//! places an object in world space, and destroyed on successful collection
//! or an explicit clear. Positions are in the same coordinate frame as the
//! camera pose used for projection.

use crate::element::Element;
use crate::id::AnchorId;
use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use slotmap::SlotMap;

/// A collectible element sphere anchored in world space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    pub element: Element,
    pub position: Point3<f32>,
}

impl Anchor {
    pub fn new(element: Element, position: Point3<f32>) -> Self {
        Self { element, position }
    }
}

/// Owns the set of live anchors, keyed by generational [`AnchorId`].
///
/// During normal operation the frame thread is the only mutator; the
/// detection pipeline's additions arrive through the command queue and are
/// applied at frame boundaries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnchorStore {
    anchors: SlotMap<AnchorId, Anchor>,
}

impl AnchorStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an anchor and return its id. Every insert yields a distinct id,
    /// even when a storage slot is reused.
    pub fn insert(&mut self, element: Element, position: Point3<f32>) -> AnchorId {
        self.anchors.insert(Anchor::new(element, position))
    }

    /// Remove an anchor, returning it if it was still live. Removing an
    /// already-collected (stale) id is a no-op.
    pub fn remove(&mut self, id: AnchorId) -> Option<Anchor> {
        self.anchors.remove(id)
    }

    pub fn get(&self, id: AnchorId) -> Option<&Anchor> {
        self.anchors.get(id)
    }

    /// Remove all anchors. Idempotent.
    pub fn clear(&mut self) {
        self.anchors.clear();
    }

    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    /// Iterate over live anchors. Borrows the store; use [`Self::snapshot`]
    /// when mutation must happen mid-iteration.
    pub fn iter(&self) -> impl Iterator<Item = (AnchorId, &Anchor)> {
        self.anchors.iter()
    }

    /// Clone out the current anchor set for iterate-then-mutate patterns.
    pub fn snapshot(&self) -> Vec<(AnchorId, Anchor)> {
        self.anchors.iter().map(|(id, a)| (id, a.clone())).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(elements: &[Element]) -> AnchorStore {
        let mut store = AnchorStore::new();
        for (i, &e) in elements.iter().enumerate() {
            store.insert(e, Point3::new(i as f32, 0.0, -1.0));
        }
        store
    }

    #[test]
    fn insert_and_get() {
        let mut store = AnchorStore::new();
        let id = store.insert(Element::Fire, Point3::new(1.0, 2.0, -3.0));
        let anchor = store.get(id).unwrap();
        assert_eq!(anchor.element, Element::Fire);
        assert_eq!(anchor.position, Point3::new(1.0, 2.0, -3.0));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn remove_returns_anchor_once() {
        let mut store = AnchorStore::new();
        let id = store.insert(Element::Water, Point3::new(0.0, 0.0, -1.0));
        assert!(store.remove(id).is_some());
        assert!(store.remove(id).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn clear_is_idempotent() {
        let mut store = store_with(&[Element::Fire, Element::Wood, Element::Metal]);
        store.clear();
        assert_eq!(store.len(), 0);
        store.clear();
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn snapshot_is_detached_from_store() {
        let mut store = store_with(&[Element::Fire, Element::Water]);
        let snap = store.snapshot();
        store.clear();
        assert_eq!(snap.len(), 2);
        assert!(store.is_empty());
    }
}
