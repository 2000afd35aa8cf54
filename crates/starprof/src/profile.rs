//! Bin-sweeping profile kernels.
//!
//! Both kernels walk the axis-aligned square of half-width `rad` around
//! the center, clipped to the frame, and accumulate per-bin sums in f64.
//! They differ only in how a pixel's squared distance becomes an output
//! bin, so the sweep itself is a single policy-free core parameterised by
//! that mapping; `rad_prof_kernel` bins by Mirage radial index,
//! `rad_sq_prof_kernel` bins by raw squared distance.

use image::GrayImage;
use serde::{Deserialize, Serialize};

use crate::error::RadialError;
use crate::frame::Gray32FImage;
use crate::radindex::RadIndexMap;

/// Scalar totals accumulated by one profile sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileTotals {
    /// Sum of every unmasked visited pixel value (ADU, f64 to avoid
    /// overflow on bright frames).
    pub tot_counts: f64,
    /// Number of unmasked visited pixels.
    pub tot_pts: u64,
}

/// Caller-supplied per-bin output buffers for one profile call.
///
/// All three slices must share one length. The kernel zeroes the full
/// provided length, then finalizes only the populated prefix (`rad + 2`
/// bins for `rad_prof`, `rad² + 1` for `rad_sq_prof`); over-allocated
/// trailing slots stay zero.
pub struct ProfileBuffers<'a> {
    /// Per-bin mean; 0 where the bin holds no points.
    pub mean: &'a mut [f64],
    /// Per-bin population variance; 0 where the bin holds no points.
    pub var: &'a mut [f64],
    /// Per-bin point count.
    pub n_pts: &'a mut [i32],
}

impl ProfileBuffers<'_> {
    /// Validate the common buffer length against the kernel minimum.
    pub(crate) fn require_len(&self, needed: usize) -> Result<usize, RadialError> {
        let got = self.mean.len();
        if self.var.len() != got || self.n_pts.len() != got {
            return Err(RadialError::OutputLenMismatch {
                mean: self.mean.len(),
                var: self.var.len(),
                n_pts: self.n_pts.len(),
            });
        }
        if got < needed {
            return Err(RadialError::OutputTooSmall { needed, got });
        }
        Ok(got)
    }
}

/// Profile by Mirage radial index. Needs `rad + 2` output bins and an
/// index table already grown to cover `rad²`.
pub(crate) fn rad_prof_kernel(
    data: &Gray32FImage,
    mask: Option<&GrayImage>,
    ij_ctr: [i64; 2],
    rad: usize,
    map: &RadIndexMap,
    out: &mut ProfileBuffers<'_>,
) -> Result<ProfileTotals, RadialError> {
    let des_out_len = rad + 2;
    let max_rad_sq = rad * rad;
    let table = map.as_slice();
    debug_assert!(table.len() > max_rad_sq, "index table not grown by caller");
    sweep(data, mask, ij_ctr, rad, out, des_out_len, |d_sq| {
        if d_sq > max_rad_sq {
            return Ok(None);
        }
        let bin = table[d_sq] as usize;
        if bin >= des_out_len {
            return Err(RadialError::RadialIndexRange { rad_ind: bin, rad });
        }
        Ok(Some(bin))
    })
}

/// Profile by raw squared distance. Needs `rad² + 1` output bins.
pub(crate) fn rad_sq_prof_kernel(
    data: &Gray32FImage,
    mask: Option<&GrayImage>,
    ij_ctr: [i64; 2],
    rad: usize,
    out: &mut ProfileBuffers<'_>,
) -> Result<ProfileTotals, RadialError> {
    let des_out_len = rad * rad + 1;
    sweep(data, mask, ij_ctr, rad, out, des_out_len, |d_sq| {
        Ok((d_sq < des_out_len).then_some(d_sq))
    })
}

/// Shared accumulation core.
///
/// `bin_for` maps a squared distance to `Some(bin)`, `None` to skip the
/// pixel, or an error to abort the sweep.
fn sweep<B>(
    data: &Gray32FImage,
    mask: Option<&GrayImage>,
    ij_ctr: [i64; 2],
    rad: usize,
    out: &mut ProfileBuffers<'_>,
    des_out_len: usize,
    mut bin_for: B,
) -> Result<ProfileTotals, RadialError>
where
    B: FnMut(usize) -> Result<Option<usize>, RadialError>,
{
    out.require_len(des_out_len)?;
    debug_assert!(mask.map_or(true, |m| m.dimensions() == data.dimensions()));

    out.mean.fill(0.0);
    out.var.fill(0.0);
    out.n_pts.fill(0);

    let mut totals = ProfileTotals::default();

    let (w, h) = data.dimensions();
    let [i_ctr, j_ctr] = ij_ctr;
    let rad = rad as i64;
    let min_ii = (i_ctr - rad).max(0);
    let max_ii = (i_ctr + rad).min(h as i64 - 1);
    let min_jj = (j_ctr - rad).max(0);
    let max_jj = (j_ctr + rad).min(w as i64 - 1);
    if min_ii > max_ii || min_jj > max_jj {
        // scan box does not intersect the frame
        return Ok(totals);
    }
    let (min_jj, max_jj) = (min_jj as usize, max_jj as usize);

    let width = w as usize;
    let raw = data.as_raw().as_slice();
    let mask_raw = mask.map(|m| m.as_raw().as_slice());

    for ii in min_ii..=max_ii {
        let row_base = ii as usize * width;
        let row = &raw[row_base..row_base + width];
        let mask_row = mask_raw.map(|m| &m[row_base..row_base + width]);
        let d_i_sq = (ii - i_ctr) * (ii - i_ctr);
        for jj in min_jj..=max_jj {
            if let Some(mask_row) = mask_row {
                if mask_row[jj] != 0 {
                    continue;
                }
            }
            let d_j = jj as i64 - j_ctr;
            let d_sq = (d_i_sq + d_j * d_j) as usize;
            let Some(bin) = bin_for(d_sq)? else {
                continue;
            };
            let d = row[jj] as f64;
            out.mean[bin] += d;
            out.var[bin] += d * d;
            out.n_pts[bin] += 1;
            totals.tot_counts += d;
            totals.tot_pts += 1;
        }
    }

    for bin in 0..des_out_len {
        let n = out.n_pts[bin];
        if n != 0 {
            let n = n as f64;
            let mean = out.mean[bin] / n;
            out.mean[bin] = mean;
            // one-pass population variance; cancellation on constant
            // bins can dip a few ulps below zero, so clamp
            out.var[bin] = (out.var[bin] / n - mean * mean).max(0.0);
        }
    }

    Ok(totals)
}
