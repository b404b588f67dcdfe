use image::{RgbaImage, imageops};

use crate::error::FetchError;

/// Weather icon bitmap decoded from the provider's image CDN.
#[derive(Debug, Clone)]
pub struct WeatherIcon {
    image: RgbaImage,
}

impl WeatherIcon {
    /// Decode raw CDN bytes. The CDN serves PNG; any format the `image` crate
    /// sniffs is accepted.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, FetchError> {
        let image = image::load_from_memory(bytes)
            .map_err(|e| FetchError::Decode(format!("icon bitmap: {e}")))?
            .to_rgba8();

        Ok(Self { image })
    }

    /// Build directly from raw RGBA pixels. Returns `None` when the buffer
    /// does not hold `width * height` pixels.
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Option<Self> {
        RgbaImage::from_raw(width, height, pixels).map(|image| Self { image })
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// RGBA pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.image.get_pixel(x, y).0
    }

    /// Downscaled copy fitting within `max_width` x `max_height`, preserving
    /// aspect ratio. Never upscales.
    pub fn thumbnail(&self, max_width: u32, max_height: u32) -> Self {
        let (width, height) = (self.image.width().max(1), self.image.height().max(1));
        let scale = f64::min(
            f64::from(max_width) / f64::from(width),
            f64::from(max_height) / f64::from(height),
        )
        .min(1.0);

        let target_w = ((f64::from(width) * scale).round() as u32).max(1);
        let target_h = ((f64::from(height) * scale).round() as u32).max(1);

        Self {
            image: imageops::thumbnail(&self.image, target_w, target_h),
        }
    }
}
