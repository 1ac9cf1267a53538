//! Versioned binary snapshots of engine session state.
//!
//! A snapshot captures what a session would want back after an
//! interruption: the live anchors and the collection state. Transient
//! state (pending taps, queued commands, buffered events) is deliberately
//! not captured -- it is meaningless outside the frame that produced it.
//!
//! Encoding is bitcode over serde. The version field is checked on
//! restore so a stale save from an incompatible build fails loudly
//! instead of restoring garbage.

use crate::anchor::{Anchor, AnchorStore};
use crate::collection::CollectionState;
use crate::engine::CollectionEngine;
use serde::{Deserialize, Serialize};

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u16 = 1;

/// A serializable copy of a session's persistent state.
///
/// Anchor ids are not preserved across a restore: the store is rebuilt
/// and hands out fresh generational keys, so handles from before the
/// snapshot can never alias restored anchors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    version: u16,
    anchors: Vec<Anchor>,
    collection: CollectionState,
}

impl EngineSnapshot {
    /// Capture the persistent state of an engine.
    pub fn capture(engine: &CollectionEngine) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            anchors: engine.store().iter().map(|(_, a)| a.clone()).collect(),
            collection: engine.collection_state().clone(),
        }
    }

    /// Replace an engine's anchors and collection state with this
    /// snapshot's. Emits no events; the UI should re-read state after a
    /// restore anyway.
    pub fn restore(&self, engine: &mut CollectionEngine) -> Result<(), SnapshotError> {
        self.check_version()?;
        let mut store = AnchorStore::new();
        for anchor in &self.anchors {
            store.insert(anchor.element, anchor.position);
        }
        engine.restore_state(store, self.collection.clone());
        Ok(())
    }

    /// Encode to compact binary.
    pub fn to_bytes(&self) -> Result<Vec<u8>, SnapshotError> {
        bitcode::serialize(self).map_err(SnapshotError::Encode)
    }

    /// Decode from binary, rejecting unsupported versions.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SnapshotError> {
        let snapshot: EngineSnapshot =
            bitcode::deserialize(bytes).map_err(SnapshotError::Decode)?;
        snapshot.check_version()?;
        Ok(snapshot)
    }

    pub fn version(&self) -> u16 {
        self.version
    }

    pub fn anchor_count(&self) -> usize {
        self.anchors.len()
    }

    fn check_version(&self) -> Result<(), SnapshotError> {
        if self.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion {
                found: self.version,
                supported: SNAPSHOT_VERSION,
            });
        }
        Ok(())
    }
}

/// Errors produced while encoding, decoding, or restoring snapshots.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("failed to encode snapshot: {0}")]
    Encode(#[source] bitcode::Error),

    #[error("failed to decode snapshot: {0}")]
    Decode(#[source] bitcode::Error),

    #[error("unsupported snapshot version {found} (supported: {supported})")]
    UnsupportedVersion { found: u16, supported: u16 },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Element;
    use crate::test_utils::*;

    #[test]
    fn round_trip_preserves_session_state() {
        let mut engine = engine();
        engine.set_needed_element(Some(Element::Fire));
        engine.place_anchor(Element::Fire, world(0.0, 0.0, -1.0));
        engine.place_anchor(Element::Water, world(1.0, 0.0, -2.0));
        let pose = identity_pose();
        let center = pose.project(world(0.0, 0.0, -1.0)).unwrap();
        tap_and_resolve(&mut engine, &pose, center.x, center.y);

        let bytes = EngineSnapshot::capture(&engine).to_bytes().unwrap();
        let snapshot = EngineSnapshot::from_bytes(&bytes).unwrap();

        let mut restored = crate::test_utils::engine();
        snapshot.restore(&mut restored).unwrap();

        assert_eq!(restored.store().len(), 1);
        assert_eq!(restored.needed_element(), Some(Element::Fire));
        assert_eq!(restored.collected_count(), 1);
        let survivor = restored.store().iter().next().unwrap().1;
        assert_eq!(survivor.element, Element::Water);
    }

    #[test]
    fn empty_engine_round_trips() {
        let engine = engine();
        let bytes = EngineSnapshot::capture(&engine).to_bytes().unwrap();
        let snapshot = EngineSnapshot::from_bytes(&bytes).unwrap();
        assert_eq!(snapshot.anchor_count(), 0);
        assert_eq!(snapshot.version(), SNAPSHOT_VERSION);
    }

    #[test]
    fn wrong_version_is_rejected() {
        let mut snapshot = EngineSnapshot::capture(&engine());
        snapshot.version = SNAPSHOT_VERSION + 1;
        let bytes = bitcode::serialize(&snapshot).unwrap();
        assert!(matches!(
            EngineSnapshot::from_bytes(&bytes),
            Err(SnapshotError::UnsupportedVersion { .. })
        ));
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        assert!(matches!(
            EngineSnapshot::from_bytes(&[0xff, 0x00, 0x13, 0x37]),
            Err(SnapshotError::Decode(_) | SnapshotError::UnsupportedVersion { .. })
        ));
    }
}
