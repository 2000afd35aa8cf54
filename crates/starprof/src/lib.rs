//! starprof — radial statistics for star centroiding.
//!
//! The numeric core of a telescope-guiding centroider. Given a CCD
//! frame (optionally with a bad-pixel mask) and an integer pixel center,
//! the engine computes:
//!
//! 1. **Radial index tables** – the Mirage-convention mapping between
//!    squared distance and annulus bin, cached and grown on demand.
//! 2. **Profiles** – per-annulus mean, variance and count keyed by
//!    radial index ([`RadialEngine::rad_prof`]) or by raw squared
//!    distance ([`RadialEngine::rad_sq_prof`]).
//! 3. **Asymmetry** – scalar measures of within-annulus scatter, plain
//!    ([`RadialEngine::rad_asymm`]) and CCD-noise-weighted
//!    ([`RadialEngine::rad_asymm_weighted`]). The scalar is minimised
//!    when the chosen center sits on a radially symmetric light
//!    distribution, so an outer search can drive it to a sub-pixel star
//!    position even when a slit or fiber bundle occludes much of the
//!    star.
//!
//! The engine is pure compute: single-threaded, synchronous, no I/O.
//! Centers may lie off the frame (the scan clips), masks use the
//! masked-array polarity (*nonzero = ignore*), and an all-masked or
//! fully clipped scan reports zero points rather than an error.
//!
//! # Public API
//! - [`RadialEngine`] as the primary entry point, one per thread
//! - [`ProfileBuffers`] for caller-owned profile output
//! - [`CcdInfo`] describing the detector noise model
//! - [`RadialError`] for the failure taxonomy

mod asymm;
mod engine;
mod error;
pub mod frame;
mod profile;
mod radindex;

#[cfg(test)]
mod test_utils;

pub use asymm::{CcdInfo, RadAsymm};
pub use engine::RadialEngine;
pub use error::RadialError;
pub use frame::Gray32FImage;
pub use profile::{ProfileBuffers, ProfileTotals};
pub use radindex::rad_sq_by_rad_ind;
