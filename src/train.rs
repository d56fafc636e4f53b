// Training invocation: assemble a fixed configuration and hand it to the
// external `yolo` trainer process. No training logic lives here.

use crate::cli::TrainConfig;
use anyhow::{bail, Context, Result};
use std::process::Command;

/// Probe for CUDA-capable hardware by querying the NVIDIA driver.
pub fn cuda_available() -> bool {
    Command::new("nvidia-smi")
        .arg("-L")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Key=value arguments handed to the trainer, in a fixed order.
pub fn trainer_args(cfg: &TrainConfig) -> Vec<String> {
    vec![
        "detect".to_string(),
        "train".to_string(),
        format!("data={}", cfg.data.display()),
        format!("model={}", cfg.weights.display()),
        format!("epochs={}", cfg.epochs),
        format!("batch={}", cfg.batch),
        format!("workers={}", cfg.workers),
        format!("patience={}", cfg.patience),
        format!("device={}", cfg.device),
        format!("imgsz={}", cfg.imgsz),
    ]
}

pub fn run(cfg: &TrainConfig) -> Result<()> {
    tracing::info!("CUDA available: {}", cuda_available());

    let args = trainer_args(cfg);
    tracing::info!("launching trainer: yolo {}", args.join(" "));

    // Inherited stdio streams the trainer's own progress output through
    let status = Command::new("yolo")
        .args(&args)
        .status()
        .context("failed to launch the yolo trainer (is ultralytics installed?)")?;

    if !status.success() {
        bail!("trainer exited with {}", status);
    }

    tracing::info!("training finished; the trainer reports the best checkpoint as best.pt");
    Ok(())
}
