//! Bridge between the external vision service and the engine.
//!
//! The service calls [`DetectionBridge::analysis_started`],
//! [`DetectionBridge::token`], and [`DetectionBridge::analysis_completed`]
//! from its own thread. Tokens flow into the caption stream; completed
//! detections become anchor placement commands, which the engine applies
//! at its next frame boundary. Nothing here blocks the caller or touches
//! the anchor store directly.

use crate::stream::DescriptionStream;
use nalgebra::Point3;
use sphera_core::command::DetectionHandle;
use sphera_core::element::Element;
use tracing::{debug, trace};

/// One detected object: what it is, where it sits in world space, and
/// how confident the model was.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionReport {
    pub element: Element,
    pub world_position: Point3<f32>,
    pub confidence: f32,
}

impl DetectionReport {
    pub fn new(element: Element, world_position: Point3<f32>, confidence: f32) -> Self {
        Self {
            element,
            world_position,
            confidence,
        }
    }
}

/// Callback surface for the vision service.
///
/// Safe to drive after the engine has been detached: anchor commands are
/// dropped by the handle, while the caption stream still completes
/// locally so the service never observes an error.
#[derive(Debug, Clone)]
pub struct DetectionBridge {
    stream: DescriptionStream,
    anchors: DetectionHandle,
    min_confidence: f32,
}

impl DetectionBridge {
    pub fn new(stream: DescriptionStream, anchors: DetectionHandle) -> Self {
        Self {
            stream,
            anchors,
            min_confidence: 0.0,
        }
    }

    /// Drop detections below `min_confidence` instead of placing anchors
    /// for them. Defaults to 0.0 (accept everything).
    pub fn with_min_confidence(mut self, min_confidence: f32) -> Self {
        self.min_confidence = min_confidence;
        self
    }

    /// The stream this bridge feeds, for UI-side subscription.
    pub fn stream(&self) -> &DescriptionStream {
        &self.stream
    }

    /// Frame analysis began: open a fresh caption stream.
    pub fn analysis_started(&self) {
        self.stream.start();
    }

    /// One description token arrived.
    pub fn token(&self, text: &str) {
        self.stream.append_token(text);
    }

    /// Analysis finished: freeze the caption and submit detected objects
    /// as anchor placements. Returns the final caption ("" if the stream
    /// had already been cleared).
    pub fn analysis_completed(&self, reports: &[DetectionReport]) -> String {
        let caption = self.stream.complete().unwrap_or_default();

        for report in reports {
            if report.confidence < self.min_confidence {
                trace!(
                    element = %report.element,
                    confidence = report.confidence,
                    "detection below confidence floor, skipped"
                );
                continue;
            }
            self.anchors
                .place_anchor(report.element, report.world_position);
        }

        debug!(
            detections = reports.len(),
            caption_len = caption.len(),
            "analysis completed"
        );
        caption
    }
}
