use crate::pipeline::types::Detection;
use anyhow::{anyhow, Result};
use opencv::core::{Mat, Rect, Vector};
use opencv::imgcodecs::imwrite;
use opencv::prelude::*;
use std::path::Path;

/// Padding applied around a detection box before cropping. The top gets more
/// room than the other sides so the label drawn above the box stays in frame.
#[derive(Debug, Clone, Copy)]
pub struct CropPadding {
    pub top: i32,
    pub sides: i32,
}

impl Default for CropPadding {
    fn default() -> Self {
        Self { top: 60, sides: 20 }
    }
}

/// Padded crop rectangle around `det`, clamped to the frame bounds.
/// `None` when the clamped region has no area.
pub fn crop_region(det: &Detection, frame_w: i32, frame_h: i32, pad: CropPadding) -> Option<Rect> {
    let top = (det.y1 - pad.top).max(0);
    let bottom = (det.y2 + pad.sides).min(frame_h);
    let left = (det.x1 - pad.sides).max(0);
    let right = (det.x2 + pad.sides).min(frame_w);

    let width = right - left;
    let height = bottom - top;
    if width <= 0 || height <= 0 {
        return None;
    }

    Some(Rect::new(left, top, width, height))
}

/// Extract `region` from the (already annotated) frame as an owned image.
pub fn extract_region(frame: &Mat, region: Rect) -> Result<Mat> {
    let roi = Mat::roi(frame, region)?;
    let mut out = Mat::default();
    roi.copy_to(&mut out)?;
    Ok(out)
}

/// Write a crop image to disk.
pub fn save_crop(image: &Mat, path: &Path) -> Result<()> {
    let path_str = path
        .to_str()
        .ok_or_else(|| anyhow!("non-UTF-8 crop path: {}", path.display()))?;
    if !imwrite(path_str, image, &Vector::new())? {
        return Err(anyhow!("failed to encode {}", path.display()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn det(x1: i32, y1: i32, x2: i32, y2: i32) -> Detection {
        Detection {
            x1,
            y1,
            x2,
            y2,
            id: 1,
            score: 0.9,
        }
    }

    #[test]
    fn interior_box_gets_full_padding() {
        let r = crop_region(&det(100, 100, 200, 220), 640, 480, CropPadding::default()).unwrap();
        assert_eq!(r, Rect::new(80, 40, 140, 200));
    }

    #[test]
    fn padding_clamps_to_frame_bounds() {
        let r = crop_region(&det(5, 30, 630, 470), 640, 480, CropPadding::default()).unwrap();
        assert_eq!(r.x, 0);
        assert_eq!(r.y, 0);
        assert_eq!(r.width, 640);
        assert_eq!(r.height, 480);
    }

    #[test]
    fn degenerate_region_is_none() {
        // Box entirely off the right edge after clamping
        let r = crop_region(&det(700, 100, 800, 200), 640, 480, CropPadding::default());
        assert!(r.is_none());
    }

    #[test]
    fn zero_area_box_is_none_without_padding() {
        let r = crop_region(
            &det(100, 100, 100, 100),
            640,
            480,
            CropPadding { top: 0, sides: 0 },
        );
        assert!(r.is_none());
    }
}
