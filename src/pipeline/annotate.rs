use crate::pipeline::types::Detection;
use anyhow::Result;
use opencv::core::{Mat, Point, Rect, Scalar};
use opencv::imgproc::{put_text, rectangle, FONT_HERSHEY_SIMPLEX, LINE_8};

/// Vertical offset of the label above the box top, in pixels.
const LABEL_OFFSET: i32 = 15;

/// Draw the detection's rectangle outline and `ID: .. Staff cx, cy` label
/// onto the frame in place. Must run before cropping so crops capture the
/// overlay.
pub fn draw_detection(frame: &mut Mat, det: &Detection) -> Result<()> {
    let (cx, cy) = det.centroid();
    let color = Scalar::new(0.0, 255.0, 0.0, 0.0); // Green

    let rect = Rect::new(det.x1, det.y1, det.x2 - det.x1, det.y2 - det.y1);
    rectangle(frame, rect, color, 2, LINE_8, 0)?;

    let label = format!("ID: {} Staff {}, {}", det.id, cx, cy);
    put_text(
        frame,
        &label,
        Point::new(det.x1, det.y1 - LABEL_OFFSET),
        FONT_HERSHEY_SIMPLEX,
        0.6,
        color,
        2,
        LINE_8,
        false,
    )?;

    Ok(())
}
