use image::Luma;
use starprof::{CcdInfo, Gray32FImage, RadialEngine, RadialError};

/// Paint a Gaussian star on a flat bias pedestal.
fn synth_star(w: u32, h: u32, ctr_ij: [i64; 2], peak: f32, fwhm: f32, bg: f32) -> Gray32FImage {
    let sigma = fwhm / 2.354_820_1;
    let two_sigma_sq = 2.0 * sigma * sigma;
    let mut img = Gray32FImage::new(w, h);
    for y in 0..h {
        for x in 0..w {
            let di = y as f32 - ctr_ij[0] as f32;
            let dj = x as f32 - ctr_ij[1] as f32;
            let v = bg + peak * (-(di * di + dj * dj) / two_sigma_sq).exp();
            img.put_pixel(x, y, Luma([v]));
        }
    }
    img
}

fn main() -> Result<(), RadialError> {
    let star_ij = [21i64, 14i64];
    let frame = synth_star(48, 48, star_ij, 4000.0, 3.1, 1100.0);
    let ccd = CcdInfo {
        bias: 1080.0,
        read_noise: 9.0,
        ccd_gain: 1.6,
    };

    // Coarse integer grid search around a rough guess; an outer
    // minimiser would refine the winner to sub-pixel precision.
    let guess = [19i64, 16i64];
    let rad = 8;
    let mut engine = RadialEngine::new();
    let mut best = (f64::INFINITY, guess);
    for i in guess[0] - 4..=guess[0] + 4 {
        for j in guess[1] - 4..=guess[1] + 4 {
            let stats = engine.rad_asymm_weighted(&frame, None, [i, j], rad, &ccd)?;
            if stats.tot_pts > 0 && stats.asymm < best.0 {
                best = (stats.asymm, [i, j]);
            }
        }
    }

    println!(
        "asymmetry minimum {:.4} at (i, j) = ({}, {}); star is at ({}, {})",
        best.0, best.1[0], best.1[1], star_ij[0], star_ij[1]
    );
    Ok(())
}
