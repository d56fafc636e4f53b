use crate::pipeline::detector::RawDetection;
use crate::pipeline::types::Detection;

/// Tunables for track association.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Minimum IoU to match a detection to an existing track
    pub min_iou: f32,
    /// Frames a track survives without a detection before deletion
    pub max_coast_frames: u32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            min_iou: 0.3,
            max_coast_frames: 30,
        }
    }
}

struct Track {
    id: u32,
    bbox: [f32; 4],
    coast: u32,
}

/// Greedy-IoU associator handing out persistent integer identities.
///
/// An identity stays attached to whatever detection keeps overlapping the
/// track's last box; tracks coast through brief detection gaps before being
/// dropped. Sufficient for the low object counts of a fixed staff camera.
pub struct IouTracker {
    config: TrackerConfig,
    tracks: Vec<Track>,
    next_id: u32,
}

impl IouTracker {
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            config,
            tracks: Vec::new(),
            next_id: 1,
        }
    }

    /// Associate one frame's detections with the live tracks, returning them
    /// in input order with identities attached.
    pub fn update(&mut self, detections: &[RawDetection]) -> Vec<Detection> {
        let original_len = self.tracks.len();

        // All (iou, track, detection) pairs above the floor, best first
        let mut candidates = Vec::new();
        for (ti, track) in self.tracks.iter().enumerate() {
            for (di, det) in detections.iter().enumerate() {
                let overlap = iou(&track.bbox, &[det.x1, det.y1, det.x2, det.y2]);
                if overlap >= self.config.min_iou {
                    candidates.push((overlap, ti, di));
                }
            }
        }
        candidates.sort_by(|a, b| b.0.total_cmp(&a.0));

        let mut track_taken = vec![false; original_len];
        let mut det_track: Vec<Option<usize>> = vec![None; detections.len()];
        for (_, ti, di) in candidates {
            if track_taken[ti] || det_track[di].is_some() {
                continue;
            }
            track_taken[ti] = true;
            det_track[di] = Some(ti);
        }

        let mut out = Vec::with_capacity(detections.len());
        for (di, det) in detections.iter().enumerate() {
            let bbox = [det.x1, det.y1, det.x2, det.y2];
            let id = match det_track[di] {
                Some(ti) => {
                    let track = &mut self.tracks[ti];
                    track.bbox = bbox;
                    track.coast = 0;
                    track.id
                }
                None => {
                    let id = self.next_id;
                    self.next_id += 1;
                    self.tracks.push(Track { id, bbox, coast: 0 });
                    id
                }
            };
            out.push(Detection {
                x1: det.x1.round() as i32,
                y1: det.y1.round() as i32,
                x2: det.x2.round() as i32,
                y2: det.y2.round() as i32,
                id,
                score: det.score,
            });
        }

        for ti in 0..original_len {
            if !track_taken[ti] {
                self.tracks[ti].coast += 1;
            }
        }
        let max_coast = self.config.max_coast_frames;
        self.tracks.retain(|t| t.coast <= max_coast);

        out
    }
}

fn iou(a: &[f32; 4], b: &[f32; 4]) -> f32 {
    let ix1 = a[0].max(b[0]);
    let iy1 = a[1].max(b[1]);
    let ix2 = a[2].min(b[2]);
    let iy2 = a[3].min(b[3]);

    let intersection = (ix2 - ix1).max(0.0) * (iy2 - iy1).max(0.0);
    let area_a = (a[2] - a[0]).max(0.0) * (a[3] - a[1]).max(0.0);
    let area_b = (b[2] - b[0]).max(0.0) * (b[3] - b[1]).max(0.0);
    let union = area_a + area_b - intersection;

    if union <= 0.0 {
        0.0
    } else {
        intersection / union
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(x1: f32, y1: f32, x2: f32, y2: f32) -> RawDetection {
        RawDetection {
            x1,
            y1,
            x2,
            y2,
            score: 0.9,
        }
    }

    #[test]
    fn iou_of_identical_boxes_is_one() {
        let b = [10.0, 10.0, 50.0, 50.0];
        assert!((iou(&b, &b) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn iou_of_disjoint_boxes_is_zero() {
        assert_eq!(iou(&[0.0, 0.0, 10.0, 10.0], &[100.0, 100.0, 110.0, 110.0]), 0.0);
    }

    #[test]
    fn overlapping_detection_keeps_its_identity() {
        let mut tracker = IouTracker::new(TrackerConfig::default());
        let first = tracker.update(&[raw(10.0, 10.0, 50.0, 50.0)]);
        let second = tracker.update(&[raw(12.0, 11.0, 52.0, 51.0)]);
        assert_eq!(first[0].id, second[0].id);
    }

    #[test]
    fn disjoint_detections_get_distinct_identities() {
        let mut tracker = IouTracker::new(TrackerConfig::default());
        let tracks = tracker.update(&[raw(0.0, 0.0, 40.0, 40.0), raw(200.0, 0.0, 240.0, 40.0)]);
        assert_eq!(tracks.len(), 2);
        assert_ne!(tracks[0].id, tracks[1].id);

        // Same two objects next frame, slightly moved, reported in swapped order
        let tracks2 = tracker.update(&[raw(201.0, 1.0, 241.0, 41.0), raw(1.0, 1.0, 41.0, 41.0)]);
        assert_eq!(tracks2[0].id, tracks[1].id);
        assert_eq!(tracks2[1].id, tracks[0].id);
    }

    #[test]
    fn track_coasts_through_a_short_gap() {
        let mut tracker = IouTracker::new(TrackerConfig::default());
        let first = tracker.update(&[raw(10.0, 10.0, 50.0, 50.0)]);
        tracker.update(&[]);
        tracker.update(&[]);
        let back = tracker.update(&[raw(11.0, 10.0, 51.0, 50.0)]);
        assert_eq!(back[0].id, first[0].id);
    }

    #[test]
    fn expired_track_is_not_resurrected() {
        let mut tracker = IouTracker::new(TrackerConfig {
            min_iou: 0.3,
            max_coast_frames: 2,
        });
        let first = tracker.update(&[raw(10.0, 10.0, 50.0, 50.0)]);
        for _ in 0..4 {
            tracker.update(&[]);
        }
        let back = tracker.update(&[raw(10.0, 10.0, 50.0, 50.0)]);
        assert_ne!(back[0].id, first[0].id);
    }

    #[test]
    fn output_preserves_detection_order() {
        let mut tracker = IouTracker::new(TrackerConfig::default());
        tracker.update(&[raw(0.0, 0.0, 40.0, 40.0), raw(200.0, 0.0, 240.0, 40.0)]);
        let tracks = tracker.update(&[raw(200.0, 0.0, 240.0, 40.0), raw(0.0, 0.0, 40.0, 40.0)]);
        assert_eq!(tracks[0].x1, 200);
        assert_eq!(tracks[1].x1, 0);
    }
}
