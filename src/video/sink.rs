use crate::error::PipelineError;
use anyhow::{anyhow, Result};
use opencv::{
    core::{Mat, Size},
    prelude::*,
    videoio::VideoWriter,
};
use std::path::Path;

/// Frame-by-frame writer producing an mp4 at a fixed size and frame rate.
///
/// Uses the `mp4v` fourcc for broad player compatibility. Frames are appended
/// in call order; the underlying writer is released by `finish`, or by `Drop`
/// if the run is torn down early.
pub struct VideoSink {
    writer: VideoWriter,
    frames_written: usize,
}

impl VideoSink {
    pub fn create(path: &Path, frame_size: Size, fps: f64) -> Result<Self, PipelineError> {
        Self::try_create(path, frame_size, fps).map_err(|e| PipelineError::SinkUnavailable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    fn try_create(path: &Path, frame_size: Size, fps: f64) -> Result<Self> {
        let fourcc = VideoWriter::fourcc('m', 'p', '4', 'v')?;
        let writer = VideoWriter::new(path.to_string_lossy().as_ref(), fourcc, fps, frame_size, true)?;
        if !writer.is_opened()? {
            return Err(anyhow!("encoder could not be opened"));
        }

        tracing::info!(
            "writing {}: {}x{} @ {:.2} fps",
            path.display(),
            frame_size.width,
            frame_size.height,
            fps
        );

        Ok(Self {
            writer,
            frames_written: 0,
        })
    }

    pub fn write(&mut self, frame: &Mat) -> Result<()> {
        self.writer.write(frame)?;
        self.frames_written += 1;
        Ok(())
    }

    /// Flush and release the encoder, returning the number of frames written.
    pub fn finish(mut self) -> Result<usize> {
        self.writer.release()?;
        Ok(self.frames_written)
    }
}
