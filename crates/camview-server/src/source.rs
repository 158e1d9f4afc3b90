use std::{path::Path, str::FromStr};

use image::{
    codecs::{jpeg::JpegEncoder, png::PngEncoder},
    ColorType, ImageEncoder, Rgb, RgbImage,
};
use log::info;

use crate::error::ServerError;

/// Supplies the encoded image sent for each frame request.
pub trait FrameSource: Send {
    fn next_frame(&mut self) -> Result<Vec<u8>, ServerError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameFormat {
    Jpeg { quality: u8 },
    Png,
}

impl FromStr for FrameFormat {
    type Err = ServerError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "jpeg" | "jpg" => Ok(FrameFormat::Jpeg { quality: 90 }),
            "png" => Ok(FrameFormat::Png),
            other => Err(ServerError::UnsupportedFormat(other.to_string())),
        }
    }
}

impl FrameFormat {
    pub fn encode(&self, image: &RgbImage) -> Result<Vec<u8>, ServerError> {
        let mut encoded = Vec::new();

        match *self {
            FrameFormat::Jpeg { quality } => {
                JpegEncoder::new_with_quality(&mut encoded, quality).encode_image(image)?
            }
            FrameFormat::Png => PngEncoder::new(&mut encoded).write_image(
                image.as_raw(),
                image.width(),
                image.height(),
                ColorType::Rgb8,
            )?,
        }

        Ok(encoded)
    }
}

const BARS: [[u8; 3]; 8] = [
    [255, 255, 255],
    [255, 255, 0],
    [0, 255, 255],
    [0, 255, 0],
    [255, 0, 255],
    [255, 0, 0],
    [0, 0, 255],
    [0, 0, 0],
];

/// Scrolling color bars, so that a running stream is easy to tell apart from a frozen one.
pub struct TestPatternSource {
    width: u32,
    height: u32,
    format: FrameFormat,
    frame_index: u32,
}

impl TestPatternSource {
    pub fn new(width: u32, height: u32, format: FrameFormat) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
            format,
            frame_index: 0,
        }
    }

    fn draw(&self) -> RgbImage {
        let bar_width = (self.width / BARS.len() as u32).max(1);
        let offset = self.frame_index.wrapping_mul(4);
        let marker_row = self.frame_index % self.height;

        RgbImage::from_fn(self.width, self.height, |x, y| {
            if y == marker_row {
                return Rgb([128, 128, 128]);
            }

            let bar = (x.wrapping_add(offset) / bar_width) as usize % BARS.len();
            Rgb(BARS[bar])
        })
    }
}

impl FrameSource for TestPatternSource {
    fn next_frame(&mut self) -> Result<Vec<u8>, ServerError> {
        let encoded = self.format.encode(&self.draw())?;
        self.frame_index = self.frame_index.wrapping_add(1);
        Ok(encoded)
    }
}

/// Serves the same image file over and over.
pub struct StillImageSource {
    encoded: Vec<u8>,
}

impl StillImageSource {
    pub fn open(path: &Path) -> Result<Self, ServerError> {
        let encoded = std::fs::read(path)?;
        let format = image::guess_format(&encoded)?;
        info!("Serving {} ({:?}, {} bytes)", path.display(), format, encoded.len());

        Ok(Self { encoded })
    }
}

impl FrameSource for StillImageSource {
    fn next_frame(&mut self) -> Result<Vec<u8>, ServerError> {
        Ok(self.encoded.clone())
    }
}

impl FrameSource for Box<dyn FrameSource> {
    fn next_frame(&mut self) -> Result<Vec<u8>, ServerError> {
        (**self).next_frame()
    }
}
