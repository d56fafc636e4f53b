use std::path::PathBuf;
use thiserror::Error;

/// Failure kinds the pipelines distinguish.
///
/// `SourceUnavailable` and `SinkUnavailable` are fatal to a run;
/// `DetectionFailure` downgrades the affected frame to pass-through;
/// `EmptyRegion` only skips the crop it describes.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("video source unavailable: {path}: {reason}")]
    SourceUnavailable { path: PathBuf, reason: String },

    #[error("output sink unavailable: {path}: {reason}")]
    SinkUnavailable { path: PathBuf, reason: String },

    #[error("crop region for track {id} has zero area")]
    EmptyRegion { id: u32 },

    #[error("detector failed on frame {frame}: {reason}")]
    DetectionFailure { frame: usize, reason: String },
}
