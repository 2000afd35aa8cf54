//! The engine handle: public operations over engine-owned caches.
//!
//! The radial-index table and the asymmetry scratch buffers are reused
//! across calls and grown monotonically, because asymmetry evaluations
//! arrive in bursts from a centroid minimiser and per-call allocation of
//! the scratch would dominate at small radii. The caches make the engine
//! single-threaded state: create one [`RadialEngine`] per thread, or put
//! a shared one behind a lock.

use image::GrayImage;

use crate::asymm::{self, CcdInfo, RadAsymm};
use crate::error::RadialError;
use crate::frame::{self, Gray32FImage};
use crate::profile::{self, ProfileBuffers, ProfileTotals};
use crate::radindex::{self, RadIndexMap};

/// Reusable scratch backing the asymmetry reductions.
///
/// The three buffers share one length. On growth failure all three are
/// released together.
#[derive(Debug, Default)]
struct AccumBuffers {
    mean: Vec<f64>,
    var: Vec<f64>,
    n_pts: Vec<i32>,
}

impl AccumBuffers {
    fn ensure_len(&mut self, n_elt: usize) -> Result<(), RadialError> {
        if self.mean.len() >= n_elt {
            return Ok(());
        }
        let ok = self.mean.try_reserve_exact(n_elt - self.mean.len()).is_ok()
            && self.var.try_reserve_exact(n_elt - self.var.len()).is_ok()
            && self
                .n_pts
                .try_reserve_exact(n_elt - self.n_pts.len())
                .is_ok();
        if !ok {
            self.release();
            return Err(RadialError::Allocation { requested: n_elt });
        }
        tracing::trace!(to = n_elt, "growing asymmetry scratch");
        self.mean.resize(n_elt, 0.0);
        self.var.resize(n_elt, 0.0);
        self.n_pts.resize(n_elt, 0);
        Ok(())
    }

    fn release(&mut self) {
        self.mean = Vec::new();
        self.var = Vec::new();
        self.n_pts = Vec::new();
    }
}

/// Radial statistics engine for star centroiding.
///
/// Owns the radial-index table and the asymmetry scratch. Create once,
/// evaluate on many frames and centers.
///
/// # Examples
///
/// ```
/// use image::Luma;
/// use starprof::{Gray32FImage, RadialEngine};
///
/// let frame = Gray32FImage::from_pixel(64, 64, Luma([100.0f32]));
/// let mut engine = RadialEngine::new();
/// let stats = engine.rad_asymm(&frame, None, [32, 32], 8).unwrap();
/// assert_eq!(stats.asymm, 0.0);
/// ```
#[derive(Debug, Default)]
pub struct RadialEngine {
    rad_index: RadIndexMap,
    accum: AccumBuffers,
}

impl RadialEngine {
    /// Create an engine with empty caches; they grow lazily.
    pub fn new() -> Self {
        Self::default()
    }

    /// Radial profile keyed by Mirage radial index.
    ///
    /// Fills the leading `rad + 2` bins of `out` with per-annulus mean,
    /// population variance and point count; trailing slots are zeroed.
    /// Pixels farther than `rad` from the center, masked pixels and
    /// pixels off the frame are not counted. Returns the sweep totals;
    /// `tot_pts == 0` (empty box or everything masked) is a valid
    /// outcome, not an error.
    pub fn rad_prof(
        &mut self,
        data: &Gray32FImage,
        mask: Option<&GrayImage>,
        ij_ctr: [i64; 2],
        rad: usize,
        mut out: ProfileBuffers<'_>,
    ) -> Result<ProfileTotals, RadialError> {
        frame::check_mask_shape(data, mask)?;
        out.require_len(rad + 2)?;
        self.rad_index.ensure_radius(rad)?;
        profile::rad_prof_kernel(data, mask, ij_ctr, rad, &self.rad_index, &mut out)
    }

    /// Radial profile keyed by raw squared distance.
    ///
    /// Same contract as [`rad_prof`](Self::rad_prof) with bins indexed
    /// by `dSq` directly; `out` needs `rad² + 1` slots. Touches no
    /// caches.
    pub fn rad_sq_prof(
        &self,
        data: &Gray32FImage,
        mask: Option<&GrayImage>,
        ij_ctr: [i64; 2],
        rad: usize,
        mut out: ProfileBuffers<'_>,
    ) -> Result<ProfileTotals, RadialError> {
        frame::check_mask_shape(data, mask)?;
        profile::rad_sq_prof_kernel(data, mask, ij_ctr, rad, &mut out)
    }

    /// Unweighted radial asymmetry: `sum over bins of var * nPts`.
    ///
    /// Zero iff every annulus within `rad` of the center is internally
    /// constant, which is what makes it a centroiding objective.
    pub fn rad_asymm(
        &mut self,
        data: &Gray32FImage,
        mask: Option<&GrayImage>,
        ij_ctr: [i64; 2],
        rad: usize,
    ) -> Result<RadAsymm, RadialError> {
        let totals = self.profile_into_accum(data, mask, ij_ctr, rad)?;
        if totals.tot_pts == 0 {
            return Ok(RadAsymm::default());
        }
        let n_elt = rad + 2;
        let asymm = asymm::unweighted(&self.accum.var[..n_elt], &self.accum.n_pts[..n_elt]);
        Ok(RadAsymm {
            asymm,
            tot_counts: totals.tot_counts,
            tot_pts: totals.tot_pts,
        })
    }

    /// Noise-weighted radial asymmetry.
    ///
    /// Each annulus contributes `var / weight` where `weight` is the
    /// expected sigma of the bin variance under the photon + read-noise
    /// model of `ccd` (see [`CcdInfo`]); annuli with fewer than two
    /// points are skipped but still counted in the totals.
    pub fn rad_asymm_weighted(
        &mut self,
        data: &Gray32FImage,
        mask: Option<&GrayImage>,
        ij_ctr: [i64; 2],
        rad: usize,
        ccd: &CcdInfo,
    ) -> Result<RadAsymm, RadialError> {
        let totals = self.profile_into_accum(data, mask, ij_ctr, rad)?;
        if totals.tot_pts == 0 {
            return Ok(RadAsymm::default());
        }
        let n_elt = rad + 2;
        let asymm = asymm::noise_weighted(
            &self.accum.mean[..n_elt],
            &self.accum.var[..n_elt],
            &self.accum.n_pts[..n_elt],
            ccd,
        );
        Ok(RadAsymm {
            asymm,
            tot_counts: totals.tot_counts,
            tot_pts: totals.tot_pts,
        })
    }

    /// A fresh `n_elt`-length copy of the radial-index table
    /// (grown first if needed).
    pub fn rad_ind_by_rad_sq(&mut self, n_elt: usize) -> Result<Vec<i32>, RadialError> {
        self.rad_index.ensure_len(n_elt)?;
        Ok(self.rad_index.as_slice()[..n_elt].to_vec())
    }

    /// A fresh `n_elt`-length inverse table (radius squared by radial
    /// index). Pure computation, no cache involved.
    pub fn rad_sq_by_rad_ind(&self, n_elt: usize) -> Vec<i32> {
        radindex::rad_sq_by_rad_ind(n_elt)
    }

    /// Release both caches. The engine stays usable; caches regrow
    /// lazily on the next call.
    pub fn free_caches(&mut self) {
        tracing::debug!("releasing radial-index table and asymmetry scratch");
        self.rad_index.release();
        self.accum.release();
    }

    /// Run `rad_prof` into the engine-owned scratch for the asymmetry
    /// reductions.
    fn profile_into_accum(
        &mut self,
        data: &Gray32FImage,
        mask: Option<&GrayImage>,
        ij_ctr: [i64; 2],
        rad: usize,
    ) -> Result<ProfileTotals, RadialError> {
        frame::check_mask_shape(data, mask)?;
        let n_elt = rad + 2;
        self.accum.ensure_len(n_elt)?;
        self.rad_index.ensure_radius(rad)?;
        let Self { rad_index, accum } = self;
        let mut out = ProfileBuffers {
            mean: &mut accum.mean[..n_elt],
            var: &mut accum.var[..n_elt],
            n_pts: &mut accum.n_pts[..n_elt],
        };
        profile::rad_prof_kernel(data, mask, ij_ctr, rad, rad_index, &mut out)
    }
}
