//! Error types for the radial statistics engine.

/// Errors returned by the profile kernels and asymmetry reductions.
///
/// A sweep that visits zero unmasked in-bounds pixels is *not* an error:
/// it returns `Ok` with `tot_pts == 0` and zeroed outputs, and the caller
/// decides what that means.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RadialError {
    /// Output buffers are shorter than the kernel's required minimum
    /// (`rad + 2` for [`rad_prof`], `rad² + 1` for [`rad_sq_prof`]).
    ///
    /// [`rad_prof`]: crate::RadialEngine::rad_prof
    /// [`rad_sq_prof`]: crate::RadialEngine::rad_sq_prof
    OutputTooSmall {
        /// Required minimum output length.
        needed: usize,
        /// Provided output length.
        got: usize,
    },
    /// The three output buffers disagree in length.
    OutputLenMismatch {
        /// Length of the mean buffer.
        mean: usize,
        /// Length of the variance buffer.
        var: usize,
        /// Length of the count buffer.
        n_pts: usize,
    },
    /// Mask dimensions differ from the image dimensions.
    MaskShapeMismatch {
        /// Image dimensions `[width, height]`.
        data: [u32; 2],
        /// Mask dimensions `[width, height]`.
        mask: [u32; 2],
    },
    /// Growing an internal cache failed; the caches involved have been
    /// released. Retrying at a smaller radius may succeed.
    Allocation {
        /// Number of elements the cache tried to hold.
        requested: usize,
    },
    /// A radial-index lookup escaped the populated profile range.
    /// Formally impossible; signals a bug in the index table.
    RadialIndexRange {
        /// The offending radial index.
        rad_ind: usize,
        /// The working radius of the call.
        rad: usize,
    },
}

impl std::fmt::Display for RadialError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OutputTooSmall { needed, got } => {
                write!(f, "output buffers too short: need {}, got {}", needed, got)
            }
            Self::OutputLenMismatch { mean, var, n_pts } => {
                write!(
                    f,
                    "output buffer lengths disagree: mean {}, var {}, nPts {}",
                    mean, var, n_pts
                )
            }
            Self::MaskShapeMismatch { data, mask } => {
                write!(
                    f,
                    "mask shape {}x{} does not match data shape {}x{}",
                    mask[0], mask[1], data[0], data[1]
                )
            }
            Self::Allocation { requested } => {
                write!(f, "cache growth to {} elements failed", requested)
            }
            Self::RadialIndexRange { rad_ind, rad } => {
                write!(
                    f,
                    "radial index {} out of range for radius {} (bug)",
                    rad_ind, rad
                )
            }
        }
    }
}

impl std::error::Error for RadialError {}
