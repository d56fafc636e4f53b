// Annotated-tracking pipeline: one synchronous pass over the video.
// Each frame is read, tracked, filtered, annotated, cropped, logged, and
// written before the next one is read.

use crate::cli::TrackConfig;
use crate::error::PipelineError;
use crate::pipeline::annotate::draw_detection;
use crate::pipeline::crop::{crop_region, extract_region, save_crop, CropPadding};
use crate::pipeline::log::PositionLog;
use crate::pipeline::session::{DetectorTracker, TrackSource};
use crate::pipeline::types::{filter_confident, Detection, LogRecord};
use crate::video::{VideoSink, VideoSource};
use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use indicatif::{ProgressBar, ProgressStyle};
use opencv::core::{Mat, Size};
use opencv::prelude::*;
use serde::Serialize;
use std::collections::HashSet;
use std::fs;

/// End-of-run record written next to the output video.
#[derive(Debug, Serialize)]
struct RunSummary {
    finished_at: DateTime<Utc>,
    frames_processed: usize,
    rows_logged: usize,
    identities_cropped: usize,
    detection_failures: usize,
}

/// A first-sighting crop pending persistence.
pub struct IdentityCrop {
    pub id: u32,
    pub image: Mat,
}

/// Annotate `frame` in place for every filtered detection and collect the
/// frame's log rows plus any first-sighting crops.
///
/// Order per detection: draw, then crop (so the crop captures the overlay),
/// then log. `saved_ids` is write-once; later sightings of an identity never
/// produce another crop.
pub fn process_frame(
    frame: &mut Mat,
    detections: &[Detection],
    frame_idx: usize,
    saved_ids: &mut HashSet<u32>,
    pad: CropPadding,
) -> Result<(Vec<LogRecord>, Vec<IdentityCrop>)> {
    let size = frame.size()?;
    let mut records = Vec::with_capacity(detections.len());
    let mut crops = Vec::new();

    for det in detections {
        draw_detection(frame, det)?;

        if !saved_ids.contains(&det.id) {
            match crop_region(det, size.width, size.height, pad) {
                Some(region) => {
                    crops.push(IdentityCrop {
                        id: det.id,
                        image: extract_region(frame, region)?,
                    });
                    saved_ids.insert(det.id);
                }
                None => {
                    tracing::debug!("{}", PipelineError::EmptyRegion { id: det.id });
                }
            }
        }

        let (cx, cy) = det.centroid();
        records.push(LogRecord {
            frame: frame_idx,
            id: det.id,
            x: cx,
            y: cy,
        });
    }

    Ok((records, crops))
}

pub fn run(cfg: &TrackConfig) -> Result<()> {
    let mut source = VideoSource::open(&cfg.video)?;
    let frame_size = Size::new(source.width(), source.height());
    let mut sink = VideoSink::create(&cfg.video_out, frame_size, source.fps())?;

    fs::create_dir_all(&cfg.crop_dir)?;
    let mut log = PositionLog::create(&cfg.log_path)?;

    let model_path = cfg
        .model
        .to_str()
        .ok_or_else(|| anyhow!("non-UTF-8 model path: {}", cfg.model.display()))?;
    let mut session = DetectorTracker::new(model_path)?;

    let pad = CropPadding {
        top: cfg.pad_top,
        sides: cfg.pad,
    };

    let pb = if source.frame_count() > 0 {
        let pb = ProgressBar::new(source.frame_count() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec:.1.yellow} fps, {eta})")?
                .progress_chars("#>-"),
        );
        pb
    } else {
        ProgressBar::new_spinner()
    };

    let mut saved_ids: HashSet<u32> = HashSet::new();
    let mut frame_idx = 0usize;
    let mut detection_failures = 0usize;

    while let Some(mut frame) = source.next_frame()? {
        let detections: Vec<Detection> = match session.track(&frame) {
            Ok(dets) => filter_confident(dets, cfg.threshold),
            Err(e) => {
                // Degraded frame passes through unannotated; the output video
                // stays frame-complete.
                detection_failures += 1;
                tracing::warn!(
                    "{}",
                    PipelineError::DetectionFailure {
                        frame: frame_idx,
                        reason: e.to_string(),
                    }
                );
                Vec::new()
            }
        };

        let (records, crops) = process_frame(&mut frame, &detections, frame_idx, &mut saved_ids, pad)?;

        for crop in &crops {
            let path = cfg.crop_dir.join(format!("staff_{}.jpg", crop.id));
            save_crop(&crop.image, &path)?;
        }
        for record in &records {
            log.append(record)?;
        }

        // Every frame reaches the output, annotated or not
        sink.write(&frame)?;
        frame_idx += 1;
        pb.inc(1);
    }

    pb.finish_and_clear();

    // Release order: reader, video writer, table writer
    drop(source);
    let frames_written = sink.finish()?;
    let rows_logged = log.finish()?;

    let summary = RunSummary {
        finished_at: Utc::now(),
        frames_processed: frame_idx,
        rows_logged,
        identities_cropped: saved_ids.len(),
        detection_failures,
    };
    let summary_path = cfg.video_out.with_file_name("run_summary.json");
    fs::write(&summary_path, serde_json::to_string_pretty(&summary)?)?;

    tracing::info!(
        "finished: {} frames -> {}, {} rows -> {}, {} crops -> {}",
        frames_written,
        cfg.video_out.display(),
        rows_logged,
        cfg.log_path.display(),
        saved_ids.len(),
        cfg.crop_dir.display()
    );

    Ok(())
}
