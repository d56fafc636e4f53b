use serde::Serialize;

/// A single tracked detection on one frame: pixel box, persistent track
/// identity, confidence score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Detection {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
    pub id: u32,
    pub score: f32,
}

impl Detection {
    /// Integer midpoint of the box.
    pub fn centroid(&self) -> (i32, i32) {
        ((self.x1 + self.x2) / 2, (self.y1 + self.y2) / 2)
    }
}

/// Keep only detections strictly above `threshold`, in input order.
pub fn filter_confident(detections: Vec<Detection>, threshold: f32) -> Vec<Detection> {
    detections
        .into_iter()
        .filter(|d| d.score > threshold)
        .collect()
}

/// One row of the position log.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogRecord {
    pub frame: usize,
    #[serde(rename = "ID")]
    pub id: u32,
    pub x: i32,
    pub y: i32,
}
