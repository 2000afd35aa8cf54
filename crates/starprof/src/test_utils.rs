//! Shared synthetic-frame painters for unit tests.

use image::{GrayImage, Luma};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::frame::Gray32FImage;
use crate::radindex::RadIndexMap;

/// FWHM of a Gaussian in units of its sigma.
const FWHM_PER_SIGMA: f64 = 2.354_820_045_030_949;

/// Paint a frame whose value is a function of the Mirage radial index
/// about `ij_ctr`.
///
/// Every annulus bin is internally constant (value `200 - 20 * bin`), so
/// a radial-index profile about `ij_ctr` has zero variance everywhere
/// and the asymmetry about that exact center vanishes. Pixels beyond
/// `rad` hold `bg`.
pub(crate) fn draw_bin_symmetric_image(
    w: u32,
    h: u32,
    ij_ctr: [i64; 2],
    rad: usize,
    bg: f32,
) -> Gray32FImage {
    let mut map = RadIndexMap::new();
    map.ensure_radius(rad).unwrap();
    let table = map.as_slice();
    let max_rad_sq = (rad * rad) as i64;

    let mut img = Gray32FImage::new(w, h);
    for y in 0..h {
        for x in 0..w {
            let di = y as i64 - ij_ctr[0];
            let dj = x as i64 - ij_ctr[1];
            let d_sq = di * di + dj * dj;
            let v = if d_sq <= max_rad_sq {
                200.0 - 20.0 * table[d_sq as usize] as f32
            } else {
                bg
            };
            img.put_pixel(x, y, Luma([v]));
        }
    }
    img
}

/// Paint a circular Gaussian star on a flat background.
pub(crate) fn draw_gaussian_star(
    w: u32,
    h: u32,
    ij_ctr: [i64; 2],
    peak: f32,
    fwhm: f64,
    bg: f32,
) -> Gray32FImage {
    let sigma = fwhm / FWHM_PER_SIGMA;
    let two_sigma_sq = 2.0 * sigma * sigma;
    let mut img = Gray32FImage::new(w, h);
    for y in 0..h {
        for x in 0..w {
            let di = (y as i64 - ij_ctr[0]) as f64;
            let dj = (x as i64 - ij_ctr[1]) as f64;
            let d_sq = di * di + dj * dj;
            let v = bg + peak * (-d_sq / two_sigma_sq).exp() as f32;
            img.put_pixel(x, y, Luma([v]));
        }
    }
    img
}

/// Uniform integer-valued noise in `[0, 1000]`, deterministic per seed.
///
/// Integer values stay exact through f32, which keeps the shift/scale
/// invariance checks tight.
pub(crate) fn noise_frame(w: u32, h: u32, seed: u64) -> Gray32FImage {
    let mut rng = StdRng::seed_from_u64(seed);
    let raw: Vec<f32> = (0..w as usize * h as usize)
        .map(|_| rng.gen_range(0..=1000) as f32)
        .collect();
    Gray32FImage::from_raw(w, h, raw).expect("raw length matches dimensions")
}

/// Mask roughly `fraction` of all pixels, deterministic per seed.
pub(crate) fn speckle_mask(w: u32, h: u32, seed: u64, fraction: f64) -> GrayImage {
    let mut rng = StdRng::seed_from_u64(seed);
    let raw: Vec<u8> = (0..w as usize * h as usize)
        .map(|_| u8::from(rng.gen_bool(fraction)))
        .collect();
    GrayImage::from_raw(w, h, raw).expect("raw length matches dimensions")
}

/// Apply `f` to every pixel value.
pub(crate) fn map_pixels(img: &Gray32FImage, f: impl Fn(f32) -> f32) -> Gray32FImage {
    let raw: Vec<f32> = img.as_raw().iter().map(|&v| f(v)).collect();
    Gray32FImage::from_raw(img.width(), img.height(), raw).expect("shape preserved")
}
