//! Frame buffers produced by the sampler.

use image::RgbaImage;

/// A decoded video frame as raw RGBA pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameImage {
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// Raw RGBA pixel data, `width * height * 4` bytes
    pub data: Vec<u8>,
}

impl FrameImage {
    /// Create a frame from raw RGBA bytes.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Self {
        Self { width, height, data }
    }

    /// The sentinel used for frames that failed to decode.
    pub fn empty() -> Self {
        Self {
            width: 0,
            height: 0,
            data: Vec::new(),
        }
    }

    /// Whether this is the decode-failure sentinel.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// View the buffer as an [`RgbaImage`].
    ///
    /// Returns `None` for the empty sentinel or a buffer whose length does
    /// not match the dimensions.
    pub fn to_rgba(&self) -> Option<RgbaImage> {
        if self.is_empty() {
            return None;
        }
        RgbaImage::from_raw(self.width, self.height, self.data.clone())
    }

    /// Wrap an [`RgbaImage`] back into a frame buffer.
    pub fn from_rgba(image: RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            width,
            height,
            data: image.into_raw(),
        }
    }
}

/// One entry of the sampled frame sequence.
#[derive(Debug, Clone)]
pub struct SampledFrame {
    /// Sampling index, `0..total_frames`
    pub index: u64,
    /// Seconds from the start of the video (`index * interval`)
    pub timestamp: f64,
    /// Decoded pixels, or the empty sentinel if the decode failed
    pub image: FrameImage,
}
