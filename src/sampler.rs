// Frame sampler: save an evenly spaced subset of video frames as stills,
// typically to seed a labeling dataset.

use crate::cli::SampleConfig;
use crate::video::VideoSource;
use anyhow::{anyhow, Result};
use indicatif::{ProgressBar, ProgressStyle};
use opencv::core::Vector;
use opencv::imgcodecs::imwrite;
use std::fs;

/// Frame-selection arithmetic, kept separate from the decode loop so the
/// sampling properties can be checked without a real video.
#[derive(Debug, Clone, Copy)]
pub struct SamplePlan {
    stride: usize,
    max_images: usize,
}

impl SamplePlan {
    /// `stride = max(1, total_frames / max_images)` (integer division).
    /// An unknown or zero frame count falls back to stride 1: every frame is
    /// considered, still bounded by `max_images`.
    pub fn new(total_frames: usize, max_images: usize) -> Self {
        let stride = if max_images == 0 {
            1
        } else {
            (total_frames / max_images).max(1)
        };
        Self { stride, max_images }
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Whether the frame at `frame_idx` should be kept, given `taken` frames
    /// already emitted.
    pub fn wants(&self, frame_idx: usize, taken: usize) -> bool {
        taken < self.max_images && frame_idx % self.stride == 0
    }

    pub fn is_complete(&self, taken: usize) -> bool {
        taken >= self.max_images
    }
}

pub fn run(cfg: &SampleConfig) -> Result<()> {
    fs::create_dir_all(&cfg.output_dir)?;

    let mut source = VideoSource::open(&cfg.video)?;
    let plan = SamplePlan::new(source.frame_count(), cfg.max_images);

    tracing::info!(
        "sampling up to {} frames at stride {} from {}",
        cfg.max_images,
        plan.stride(),
        cfg.video.display()
    );

    let pb = ProgressBar::new(cfg.max_images as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec:.1.yellow} fps, {eta})")?
            .progress_chars("#>-"),
    );

    let mut taken = 0usize;
    let mut frame_idx = 0usize;

    while let Some(frame) = source.next_frame()? {
        if plan.is_complete(taken) {
            break;
        }

        if plan.wants(frame_idx, taken) {
            taken += 1;
            let path = cfg.output_dir.join(format!("sample_frame_{:03}.jpg", taken));
            let path_str = path
                .to_str()
                .ok_or_else(|| anyhow!("non-UTF-8 output path: {}", path.display()))?;
            if !imwrite(path_str, &frame, &Vector::new())? {
                return Err(anyhow!("failed to encode {}", path.display()));
            }
            pb.inc(1);
        }

        frame_idx += 1;
    }

    pb.finish_and_clear();
    tracing::info!("saved {} images to {}", taken, cfg.output_dir.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Walk `actual` decodable frames through a plan built from the container's
    /// reported count, returning the selected indices.
    fn simulate_stream(reported: usize, actual: usize, max_images: usize) -> Vec<usize> {
        let plan = SamplePlan::new(reported, max_images);
        let mut taken = 0;
        let mut selected = Vec::new();
        for frame_idx in 0..actual {
            if plan.is_complete(taken) {
                break;
            }
            if plan.wants(frame_idx, taken) {
                taken += 1;
                selected.push(frame_idx);
            }
        }
        selected
    }

    #[test]
    fn stride_is_floor_of_total_over_target() {
        assert_eq!(SamplePlan::new(1000, 300).stride(), 3);
        assert_eq!(SamplePlan::new(900, 300).stride(), 3);
        assert_eq!(SamplePlan::new(899, 300).stride(), 2);
        assert_eq!(SamplePlan::new(300, 300).stride(), 1);
    }

    #[test]
    fn short_or_unreported_videos_fall_back_to_every_frame() {
        assert_eq!(SamplePlan::new(0, 300).stride(), 1);
        assert_eq!(SamplePlan::new(100, 300).stride(), 1);
    }

    #[test]
    fn selects_the_arithmetic_sequence() {
        let selected = simulate_stream(1000, 1000, 300);
        assert_eq!(selected.len(), 300);
        assert_eq!(selected.first(), Some(&0));
        assert_eq!(selected.last(), Some(&897));
        assert!(selected.windows(2).all(|w| w[1] - w[0] == 3));
    }

    #[test]
    fn emitted_count_is_min_of_target_and_available_strides() {
        // count = min(N, ceil(T / stride)) with stride = max(1, T / N)
        for &(total, target) in &[(1000usize, 300usize), (10, 3), (7, 10), (0, 5), (301, 300)] {
            let stride = SamplePlan::new(total, target).stride();
            let expected = target.min(total.div_ceil(stride));
            let got = simulate_stream(total, total, target).len();
            assert_eq!(got, expected, "T={total} N={target}");
        }
    }

    #[test]
    fn stream_ending_early_yields_fewer_images_without_error() {
        // Container reports 1000 frames but only 500 decode: stride stays 3,
        // output is simply short of the target.
        let selected = simulate_stream(1000, 500, 300);
        assert_eq!(selected.len(), 167);
        assert_eq!(selected.last(), Some(&498));
    }

    #[test]
    fn selection_is_deterministic() {
        assert_eq!(
            simulate_stream(1234, 1234, 300),
            simulate_stream(1234, 1234, 300)
        );
    }
}
