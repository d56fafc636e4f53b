use crate::error::PipelineError;
use anyhow::{anyhow, Result};
use opencv::{
    core::Mat,
    prelude::*,
    videoio::{
        VideoCapture, CAP_ANY, CAP_PROP_FPS, CAP_PROP_FRAME_COUNT, CAP_PROP_FRAME_HEIGHT,
        CAP_PROP_FRAME_WIDTH,
    },
};
use std::path::Path;

/// Sequential frame source over an opencv `VideoCapture`.
///
/// Width, height, frame rate, and the container's reported frame count are
/// queried once at open and assumed constant for the run.
pub struct VideoSource {
    capture: VideoCapture,
    width: i32,
    height: i32,
    fps: f64,
    frame_count: usize,
}

impl VideoSource {
    pub fn open(path: &Path) -> Result<Self, PipelineError> {
        Self::try_open(path).map_err(|e| PipelineError::SourceUnavailable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    fn try_open(path: &Path) -> Result<Self> {
        let capture = VideoCapture::from_file(path.to_string_lossy().as_ref(), CAP_ANY)?;
        if !capture.is_opened()? {
            return Err(anyhow!("container could not be opened"));
        }

        let width = capture.get(CAP_PROP_FRAME_WIDTH)? as i32;
        let height = capture.get(CAP_PROP_FRAME_HEIGHT)? as i32;
        let mut fps = capture.get(CAP_PROP_FPS)?;
        if fps <= 0.0 {
            tracing::warn!("no frame rate in metadata, falling back to 30.0");
            fps = 30.0;
        }
        // Zero when the container does not report a count; callers must cope.
        let frame_count = capture.get(CAP_PROP_FRAME_COUNT)?.max(0.0) as usize;

        tracing::info!(
            "opened {}: {}x{} @ {:.2} fps, {} frames reported",
            path.display(),
            width,
            height,
            fps,
            frame_count
        );

        Ok(Self {
            capture,
            width,
            height,
            fps,
            frame_count,
        })
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn fps(&self) -> f64 {
        self.fps
    }

    /// Frame count reported by the container; 0 when the metadata is absent.
    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    /// Next frame in decode order, or `None` once the stream is exhausted.
    pub fn next_frame(&mut self) -> Result<Option<Mat>> {
        let mut frame = Mat::default();
        let success = self.capture.read(&mut frame)?;
        if !success || frame.empty() {
            return Ok(None);
        }
        Ok(Some(frame))
    }
}
