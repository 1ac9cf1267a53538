//! End-to-end session tests across the engine and stream crates.
//!
//! These drive the engine the way the host AR view controller would:
//! detection callbacks place anchors, the frame loop resolves taps, the
//! UI drains events and reads the caption stream.

use sphera_core::element::Element;
use sphera_core::engine::CollectionEngine;
use sphera_core::event::EngineEvent;
use sphera_core::snapshot::EngineSnapshot;
use sphera_core::test_utils::*;
use sphera_stream::detect::{DetectionBridge, DetectionReport};
use sphera_stream::stream::{DescriptionStream, StreamPhase};

// ===========================================================================
// Test 1: the concrete collect-then-miss scenario
// ===========================================================================
//
// A FIRE anchor at (0,0,-1) and a WATER anchor at (1,0,-1), filter FIRE.
// Tapping the fire anchor's projection collects it; tapping again at the
// same spot finds nothing.

#[test]
fn fire_anchor_collected_once_then_gone() {
    let mut engine = engine();
    let pose = identity_pose();

    engine.set_needed_element(Some(Element::Fire));
    let fire = engine.place_anchor(Element::Fire, world(0.0, 0.0, -1.0));
    engine.place_anchor(Element::Water, world(1.0, 0.0, -1.0));
    assert_eq!(engine.store().len(), 2);

    let screen = pose.project(world(0.0, 0.0, -1.0)).unwrap();
    let collected = tap_and_resolve(&mut engine, &pose, screen.x, screen.y).unwrap();
    assert_eq!(collected.id, fire);
    assert_eq!(collected.anchor.element, Element::Fire);
    assert_eq!(engine.store().len(), 1);
    assert_eq!(engine.collected_count(), 1);

    // Same coordinates again: the fire anchor is gone and the water
    // anchor is filtered out, so nothing happens.
    let second = tap_and_resolve(&mut engine, &pose, screen.x, screen.y);
    assert!(second.is_none());
    assert_eq!(engine.store().len(), 1);
    assert_eq!(engine.collected_count(), 1);
}

// ===========================================================================
// Test 2: detection pipeline to collection, full loop
// ===========================================================================

#[test]
fn detection_to_collection_full_loop() {
    let mut engine = engine();
    let pose = identity_pose();
    let bridge = DetectionBridge::new(DescriptionStream::new(), engine.detection_handle());
    let captions = bridge.stream().subscribe();

    // Detection thread side: stream a description, then report an object.
    bridge.analysis_started();
    for token in ["Metal", " ", "element", " ", "detected"] {
        bridge.token(token);
    }
    let caption = bridge.analysis_completed(&[DetectionReport::new(
        Element::Metal,
        world(0.0, 0.0, -2.0),
        0.95,
    )]);
    assert_eq!(caption, "Metal element detected");
    assert_eq!(bridge.stream().phase(), StreamPhase::Completed);
    assert!(captions.try_iter().count() >= 7); // started + 5 tokens + completed

    // Frame side: the anchor appears at the frame boundary and is
    // collectible under the matching filter.
    engine.set_needed_element(Some(Element::Metal));
    engine.begin_frame();
    assert_eq!(engine.store().len(), 1);

    let screen = pose.project(world(0.0, 0.0, -2.0)).unwrap();
    let collected = tap_and_resolve(&mut engine, &pose, screen.x, screen.y).unwrap();
    assert_eq!(collected.anchor.element, Element::Metal);
    assert_eq!(engine.collected_count(), 1);
}

// ===========================================================================
// Test 3: count reset on needed-element change
// ===========================================================================

#[test]
fn changing_needed_element_resets_count() {
    let mut engine = engine();
    let pose = identity_pose();

    for x in [0.0f32, 0.4] {
        engine.place_anchor(Element::Fire, world(x, 0.0, -5.0));
        let screen = pose.project(world(x, 0.0, -5.0)).unwrap();
        tap_and_resolve(&mut engine, &pose, screen.x, screen.y).unwrap();
    }
    assert_eq!(engine.collected_count(), 2);

    engine.set_needed_element(Some(Element::Earth));
    assert_eq!(engine.collected_count(), 0);
    assert_eq!(engine.needed_element(), Some(Element::Earth));
}

// ===========================================================================
// Test 4: event stream matches what the session did
// ===========================================================================

#[test]
fn ui_event_stream_reflects_session() {
    let mut engine = engine();
    let pose = identity_pose();
    let detections = engine.detection_handle();

    detections.place_anchor(Element::Wood, world(0.0, 0.0, -1.0));
    engine.begin_frame();
    let screen = pose.project(world(0.0, 0.0, -1.0)).unwrap();
    tap_and_resolve(&mut engine, &pose, screen.x, screen.y).unwrap();
    engine.clear_anchors();

    let events = engine.drain_events();
    assert!(matches!(events[0], EngineEvent::AnchorPlaced { element: Element::Wood, .. }));
    assert!(matches!(events[1], EngineEvent::AnchorCollected { .. }));
    assert!(matches!(events[2], EngineEvent::AnchorsCleared { removed: 0 }));
}

// ===========================================================================
// Test 5: snapshot round trip mid-session
// ===========================================================================

#[test]
fn snapshot_restores_a_session_in_progress() {
    let mut engine = engine();
    let pose = identity_pose();

    engine.set_needed_element(Some(Element::Water));
    engine.place_anchor(Element::Water, world(0.0, 0.0, -1.0));
    engine.place_anchor(Element::Water, world(0.8, 0.3, -2.0));
    let screen = pose.project(world(0.0, 0.0, -1.0)).unwrap();
    tap_and_resolve(&mut engine, &pose, screen.x, screen.y).unwrap();

    let bytes = EngineSnapshot::capture(&engine).to_bytes().unwrap();
    drop(engine);

    let mut resumed = sphera_core::test_utils::engine();
    EngineSnapshot::from_bytes(&bytes)
        .unwrap()
        .restore(&mut resumed)
        .unwrap();

    assert_eq!(resumed.needed_element(), Some(Element::Water));
    assert_eq!(resumed.collected_count(), 1);
    assert_eq!(resumed.store().len(), 1);

    // The restored anchor is still collectible.
    let screen = pose.project(world(0.8, 0.3, -2.0)).unwrap();
    let collected = tap_and_resolve(&mut resumed, &pose, screen.x, screen.y).unwrap();
    assert_eq!(collected.anchor.element, Element::Water);
    assert_eq!(resumed.collected_count(), 2);
}

// ===========================================================================
// Test 6: engine construction rejects bad config
// ===========================================================================

#[test]
fn engine_rejects_invalid_threshold() {
    use sphera_core::config::EngineConfig;
    assert!(CollectionEngine::new(EngineConfig::with_threshold(0.0)).is_err());
    assert!(CollectionEngine::new(EngineConfig::default()).is_ok());
}
