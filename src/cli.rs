use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Save an evenly spaced subset of video frames as still images
    Sample(SampleConfig),
    /// Track staff through a video: annotate, crop first sightings, log positions
    Track(TrackConfig),
    /// Launch a detector training run against a labeled dataset
    Train(TrainConfig),
}

impl Args {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[derive(ClapArgs, Debug, Clone)]
pub struct SampleConfig {
    /// Video file to sample
    #[arg(long, env = "STAFF_WATCH_VIDEO", default_value = "sample.mp4")]
    pub video: PathBuf,

    /// Directory the numbered stills are written to
    #[arg(long, default_value = "dataset/images")]
    pub output_dir: PathBuf,

    /// Upper bound on emitted images
    #[arg(long, default_value_t = 300)]
    pub max_images: usize,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct TrackConfig {
    /// Video file to process
    #[arg(long, env = "STAFF_WATCH_VIDEO", default_value = "sample.mp4")]
    pub video: PathBuf,

    /// Detector weights (ONNX)
    #[arg(long, env = "STAFF_WATCH_MODEL", default_value = "best.onnx")]
    pub model: PathBuf,

    /// Detections at or below this confidence are discarded
    #[arg(long, default_value_t = 0.75)]
    pub threshold: f32,

    /// Directory for one-per-identity crop images
    #[arg(long, default_value = "crops")]
    pub crop_dir: PathBuf,

    /// CSV position log
    #[arg(long, default_value = "staff_logs.csv")]
    pub log_path: PathBuf,

    /// Annotated output video
    #[arg(long, default_value = "staff_tracked_out.mp4")]
    pub video_out: PathBuf,

    /// Extra pixels above the box when cropping, so the label stays in frame
    #[arg(long, default_value_t = 60)]
    pub pad_top: i32,

    /// Extra pixels on the other three sides when cropping
    #[arg(long, default_value_t = 20)]
    pub pad: i32,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct TrainConfig {
    /// Dataset descriptor handed to the trainer verbatim
    #[arg(long, default_value = "config.yaml")]
    pub data: PathBuf,

    /// Base weights to fine-tune
    #[arg(long, default_value = "yolov8n.pt")]
    pub weights: PathBuf,

    /// Number of training epochs
    #[arg(long, default_value_t = 100)]
    pub epochs: u32,

    /// Batch size
    #[arg(long, default_value_t = 4)]
    pub batch: u32,

    /// Dataloader workers; 0 keeps VRAM use bounded
    #[arg(long, default_value_t = 0)]
    pub workers: u32,

    /// Early-stopping patience in epochs
    #[arg(long, default_value_t = 10)]
    pub patience: u32,

    /// Target device passed through to the trainer
    #[arg(long, default_value = "0")]
    pub device: String,

    /// Square input resolution
    #[arg(long, default_value_t = 640)]
    pub imgsz: u32,
}
