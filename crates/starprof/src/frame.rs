//! Pixel-frame conventions shared by every engine operation.
//!
//! Image data is a single-channel `f32` buffer ([`Gray32FImage`]) in raw
//! ADU. Following guider convention the slow axis is `i` (image row, the
//! `y` of the `image` crate) and the fast axis is `j` (column, `x`), so
//! `data[i][j]` is `get_pixel(j, i)`.
//!
//! The bad-pixel mask is a same-shape [`GrayImage`] where **nonzero means
//! ignore the pixel** (slit edges, dead columns, bleed trails). This is
//! the masked-array polarity of the upstream guider stack; it is the
//! opposite of a "valid" mask and must not be inverted. A missing mask is
//! equivalent to an all-zero one.

use image::GrayImage;

use crate::error::RadialError;

/// Single-channel `f32` frame in raw ADU.
///
/// The `image` crate ships no luma-f32 alias of its own, so this names
/// the buffer type once for the whole crate.
pub type Gray32FImage = image::ImageBuffer<image::Luma<f32>, Vec<f32>>;

/// Check that a mask, when present, has the same shape as the data frame.
pub(crate) fn check_mask_shape(
    data: &Gray32FImage,
    mask: Option<&GrayImage>,
) -> Result<(), RadialError> {
    if let Some(mask) = mask {
        if mask.dimensions() != data.dimensions() {
            let (dw, dh) = data.dimensions();
            let (mw, mh) = mask.dimensions();
            return Err(RadialError::MaskShapeMismatch {
                data: [dw, dh],
                mask: [mw, mh],
            });
        }
    }
    Ok(())
}

/// Convert an 8-bit grayscale frame to the `f32` ADU frame the engine
/// consumes. Values map 1:1 (0..=255), not normalized.
pub fn from_luma8(img: &GrayImage) -> Gray32FImage {
    let (w, h) = img.dimensions();
    let raw: Vec<f32> = img.as_raw().iter().map(|&v| v as f32).collect();
    Gray32FImage::from_raw(w, h, raw).expect("shape preserved by 1:1 conversion")
}
