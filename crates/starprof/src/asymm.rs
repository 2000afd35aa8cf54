//! Radial asymmetry reductions and the CCD noise model.
//!
//! Both reductions consume a radial-index profile. The unweighted form
//! totals the within-annulus scatter; the weighted form divides each
//! bin's variance by the expected sigma of that variance under photon +
//! read noise, so peak annuli (shot-noise dominated) and background
//! annuli (read-noise dominated) pull on the centroid objective with
//! comparable strength.

use serde::{Deserialize, Serialize};

/// CCD noise and offset parameters for the weighted asymmetry measure.
///
/// Units are deliberately raw: the image and `bias` are in ADU,
/// `read_noise` in electrons, `ccd_gain` in electrons per ADU.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CcdInfo {
    /// Additive offset present in every pixel (ADU).
    pub bias: f64,
    /// Per-pixel Gaussian read-out noise (e-).
    pub read_noise: f64,
    /// Inverse gain (e-/ADU).
    pub ccd_gain: f64,
}

/// Scalar asymmetry together with the sweep totals it was computed from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RadAsymm {
    /// Radial asymmetry; zero iff every annulus is internally constant.
    pub asymm: f64,
    /// Sum of every unmasked visited pixel value (ADU).
    pub tot_counts: f64,
    /// Number of unmasked visited pixels.
    pub tot_pts: u64,
}

/// `sum over bins of var * nPts`. Empty bins contribute zero.
pub(crate) fn unweighted(var: &[f64], n_pts: &[i32]) -> f64 {
    var.iter().zip(n_pts).map(|(&v, &n)| v * n as f64).sum()
}

/// `sum over bins of var / weight`, where `weight` is the expected sigma
/// of the bin variance from pixel noise:
///
/// ```text
/// pix_noise_sq = (read_noise / gain)^2 + (mean - bias) / gain
/// weight       = pix_noise_sq * sqrt(2 (nPts - 1)) / nPts
/// ```
///
/// Bins with fewer than two points carry no variance information and are
/// skipped (their pixels still count toward the sweep totals).
pub(crate) fn noise_weighted(mean: &[f64], var: &[f64], n_pts: &[i32], ccd: &CcdInfo) -> f64 {
    // Floor the bias at the smallest populated-bin mean so a bogus large
    // bias cannot drive the photon term negative.
    let bias = mean
        .iter()
        .zip(n_pts)
        .filter(|&(_, &n)| n > 0)
        .map(|(&m, _)| m)
        .fold(ccd.bias, f64::min);

    let read_noise_sq_adu = (ccd.read_noise / ccd.ccd_gain) * (ccd.read_noise / ccd.ccd_gain);
    let mut asymm = 0.0;
    for ((&m, &v), &n) in mean.iter().zip(var).zip(n_pts) {
        if n > 1 {
            let n = n as f64;
            let pix_noise_sq = read_noise_sq_adu + (m - bias) / ccd.ccd_gain;
            let weight = pix_noise_sq * (2.0 * (n - 1.0)).sqrt() / n;
            asymm += v / weight;
        }
    }
    asymm
}
