use crate::pipeline::detector::ObjectDetector;
use crate::pipeline::tracker::{IouTracker, TrackerConfig};
use crate::pipeline::types::Detection;
use anyhow::Result;
use opencv::core::Mat;

/// The external detect-and-track capability, one call per frame.
///
/// Within a session, the same physical object yields the same identity on
/// consecutive frames for as long as the implementation can associate it.
/// The frame loop relies on that stability contract and nothing else.
pub trait TrackSource {
    fn track(&mut self, frame: &Mat) -> Result<Vec<Detection>>;
}

/// Production session: ONNX detector inference plus IoU track association.
pub struct DetectorTracker {
    detector: ObjectDetector,
    tracker: IouTracker,
}

impl DetectorTracker {
    pub fn new(model_path: &str) -> Result<Self> {
        Ok(Self {
            detector: ObjectDetector::new(model_path)?,
            tracker: IouTracker::new(TrackerConfig::default()),
        })
    }
}

impl TrackSource for DetectorTracker {
    fn track(&mut self, frame: &Mat) -> Result<Vec<Detection>> {
        let raw = self.detector.detect(frame)?;
        Ok(self.tracker.update(&raw))
    }
}
