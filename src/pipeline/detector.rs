use anyhow::{anyhow, Result};
use image::{DynamicImage, ImageBuffer, Rgb};
use opencv::core::Mat;
use opencv::prelude::*;
use usls::models::YOLO;
use usls::{Config, Image};

/// Raw detector output before track association: pixel box plus confidence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawDetection {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    pub score: f32,
}

/// A wrapper around a USLS YOLO model that handles the BGR-to-RGB conversion
/// opencv frames need before inference.
pub struct ObjectDetector {
    model: YOLO,
}

impl ObjectDetector {
    /// Create a new detector with the given model path.
    pub fn new(model_path: &str) -> Result<Self> {
        let config = Config::default()
            .with_model_file(model_path)
            .with_class_names(&["staff"]);

        #[cfg(target_os = "macos")]
        let config = config.with_model_device(usls::Device::CoreMl);

        let config = config.commit()?;
        let model = YOLO::new(config)?;
        Ok(Self { model })
    }

    /// Run detection on an OpenCV Mat.
    pub fn detect(&mut self, frame: &Mat) -> Result<Vec<RawDetection>> {
        let dynamic_image = mat_to_dynamic_image(frame)?;
        let results = self.model.forward(&[Image::from(dynamic_image)])?;

        let detections = results
            .into_iter()
            .next()
            .map(|y| {
                y.hbbs
                    .into_iter()
                    .map(|hbb| RawDetection {
                        x1: hbb.xmin(),
                        y1: hbb.ymin(),
                        x2: hbb.xmin() + hbb.width(),
                        y2: hbb.ymin() + hbb.height(),
                        score: hbb.confidence().unwrap_or(0.0),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(detections)
    }
}

/// Convert an OpenCV Mat (BGR) to an image::DynamicImage (RGB)
fn mat_to_dynamic_image(mat: &Mat) -> Result<DynamicImage> {
    let mut rgb_mat = Mat::default();
    opencv::imgproc::cvt_color_def(mat, &mut rgb_mat, opencv::imgproc::COLOR_BGR2RGB)?;

    let size = rgb_mat.size()?;
    let width = size.width as u32;
    let height = size.height as u32;

    if !rgb_mat.is_continuous() {
        return Err(anyhow!("Mat is not continuous"));
    }

    let data_bytes = rgb_mat.data_bytes()?;
    let buffer = data_bytes.to_vec();

    let img_buffer = ImageBuffer::<Rgb<u8>, _>::from_vec(width, height, buffer)
        .ok_or_else(|| anyhow!("Failed to create ImageBuffer from Mat data"))?;

    Ok(DynamicImage::ImageRgb8(img_buffer))
}
