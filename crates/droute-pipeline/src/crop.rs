//! Region cropping with origin conversion.
//!
//! Crop rectangles are configured in normalized top-left coordinates, but
//! a source buffer may natively store rows bottom-first. The conversion
//! lives in one explicit function ([`to_native_rect`]) so both conventions
//! stay pinned by tests.

use image::imageops;

use droute_media::FrameImage;
use droute_models::OcrRegion;

/// Vertical origin convention of a pixel buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PixelOrigin {
    /// Row 0 is the top of the picture
    #[default]
    TopLeft,
    /// Row 0 is the bottom of the picture
    BottomLeft,
}

/// A clamped crop rectangle in pixels, top-left origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Crops produced for one frame.
#[derive(Debug, Clone)]
pub struct CropResult {
    /// Top-left-oriented pixels for the recognition engine
    pub ocr: FrameImage,
    /// Independent copy for display and diagnostics
    pub display: FrameImage,
}

/// Scale a normalized region to pixels and clamp it inside the image.
///
/// The result always has `width, height >= 1` and lies fully inside a
/// non-degenerate image.
pub fn region_to_pixel_rect(region: &OcrRegion, img_width: u32, img_height: u32) -> PixelRect {
    let x = (region.x.max(0.0) * img_width as f64) as u32;
    let y = (region.y.max(0.0) * img_height as f64) as u32;
    let w = (region.width * img_width as f64) as u32;
    let h = (region.height * img_height as f64) as u32;

    let x = x.min(img_width.saturating_sub(1));
    let y = y.min(img_height.saturating_sub(1));
    let w = w.clamp(1, img_width - x);
    let h = h.clamp(1, img_height - y);

    PixelRect {
        x,
        y,
        width: w,
        height: h,
    }
}

/// Convert a top-left-specified rectangle to the buffer's native origin.
///
/// For a bottom-left buffer, picture row `y` lives at stored row
/// `height - y - rect_height`, so only the vertical offset changes.
pub fn to_native_rect(rect: PixelRect, img_height: u32, origin: PixelOrigin) -> PixelRect {
    match origin {
        PixelOrigin::TopLeft => rect,
        PixelOrigin::BottomLeft => PixelRect {
            y: img_height - rect.y - rect.height,
            ..rect
        },
    }
}

/// Crop `region` out of `image`, normalizing the result to top-left
/// orientation regardless of the source origin convention.
///
/// The source image is never mutated. Returns `None` for the empty
/// sentinel (nothing to crop).
pub fn crop_region(
    image: &FrameImage,
    region: &OcrRegion,
    origin: PixelOrigin,
) -> Option<CropResult> {
    let rgba = image.to_rgba()?;

    let rect = region_to_pixel_rect(region, image.width, image.height);
    let native = to_native_rect(rect, image.height, origin);

    let mut cropped =
        imageops::crop_imm(&rgba, native.x, native.y, native.width, native.height).to_image();

    // A bottom-left buffer stores the crop's rows bottom-first; flip so the
    // recognition engine always receives top-left-oriented pixels.
    if origin == PixelOrigin::BottomLeft {
        cropped = imageops::flip_vertical(&cropped);
    }

    let display = FrameImage::from_rgba(cropped.clone());
    let ocr = FrameImage::from_rgba(cropped);

    Some(CropResult { ocr, display })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 2x4 frame whose red channel encodes the picture row, top to bottom.
    fn frame_with_row_markers(origin: PixelOrigin) -> FrameImage {
        let rows: Vec<u8> = match origin {
            PixelOrigin::TopLeft => vec![0, 1, 2, 3],
            // Same picture stored bottom row first
            PixelOrigin::BottomLeft => vec![3, 2, 1, 0],
        };

        let mut data = Vec::new();
        for row in rows {
            for _ in 0..2 {
                data.extend_from_slice(&[row, 0, 0, 255]);
            }
        }
        FrameImage::new(2, 4, data)
    }

    fn red_rows(image: &FrameImage) -> Vec<u8> {
        image
            .data
            .chunks(4 * image.width as usize)
            .map(|row| row[0])
            .collect()
    }

    #[test]
    fn test_pixel_rect_scaling() {
        let rect = region_to_pixel_rect(&OcrRegion::new(0.25, 0.5, 0.5, 0.25), 100, 80);
        assert_eq!(
            rect,
            PixelRect {
                x: 25,
                y: 40,
                width: 50,
                height: 20
            }
        );
    }

    #[test]
    fn test_pixel_rect_clamps_to_image() {
        // Region hanging past the right/bottom edge
        let rect = region_to_pixel_rect(&OcrRegion::new(0.9, 0.9, 0.5, 0.5), 100, 100);
        assert_eq!(rect.x + rect.width, 100);
        assert_eq!(rect.y + rect.height, 100);

        // Degenerate region still yields at least one pixel
        let rect = region_to_pixel_rect(&OcrRegion::new(0.5, 0.5, 0.0, 0.0), 100, 100);
        assert_eq!(rect.width, 1);
        assert_eq!(rect.height, 1);
    }

    #[test]
    fn test_native_rect_both_conventions() {
        let rect = PixelRect {
            x: 0,
            y: 1,
            width: 2,
            height: 2,
        };

        assert_eq!(to_native_rect(rect, 4, PixelOrigin::TopLeft), rect);

        // Picture rows 1..3 of a 4-row image live at stored rows 1..3 from
        // the bottom, i.e. native y = 4 - 1 - 2 = 1 here; a top strip moves.
        let top_strip = PixelRect {
            x: 0,
            y: 0,
            width: 2,
            height: 1,
        };
        let native = to_native_rect(top_strip, 4, PixelOrigin::BottomLeft);
        assert_eq!(native.y, 3);
    }

    #[test]
    fn test_crop_top_left_origin() {
        let frame = frame_with_row_markers(PixelOrigin::TopLeft);
        // Picture rows 1..3
        let region = OcrRegion::new(0.0, 0.25, 1.0, 0.5);

        let result = crop_region(&frame, &region, PixelOrigin::TopLeft).unwrap();
        assert_eq!(red_rows(&result.ocr), vec![1, 2]);
    }

    #[test]
    fn test_crop_bottom_left_origin_matches_top_left() {
        // The same picture stored with either convention must produce the
        // same top-left-oriented crop.
        let region = OcrRegion::new(0.0, 0.25, 1.0, 0.5);

        let from_top = crop_region(
            &frame_with_row_markers(PixelOrigin::TopLeft),
            &region,
            PixelOrigin::TopLeft,
        )
        .unwrap();
        let from_bottom = crop_region(
            &frame_with_row_markers(PixelOrigin::BottomLeft),
            &region,
            PixelOrigin::BottomLeft,
        )
        .unwrap();

        assert_eq!(red_rows(&from_top.ocr), vec![1, 2]);
        assert_eq!(from_bottom.ocr, from_top.ocr);
        assert_eq!(from_bottom.display, from_top.display);
    }

    #[test]
    fn test_source_not_mutated() {
        let frame = frame_with_row_markers(PixelOrigin::TopLeft);
        let before = frame.data.clone();

        let _ = crop_region(&frame, &OcrRegion::full_frame(), PixelOrigin::TopLeft);
        assert_eq!(frame.data, before);
    }

    #[test]
    fn test_empty_sentinel_not_croppable() {
        assert!(crop_region(
            &FrameImage::empty(),
            &OcrRegion::full_frame(),
            PixelOrigin::TopLeft
        )
        .is_none());
    }
}
