//! Radial-index lookup tables (Mirage convention).
//!
//! Binning annuli by raw squared distance wastes bins (most squared
//! distances are unreachable) while binning by `floor(sqrt(dSq))` merges
//! the three central pixels into two bins. The Mirage convention keeps
//! the center, the axial neighbors and the diagonal neighbors separate
//! and thereafter assigns one bin per integer radius:
//!
//! ```text
//! rad_ind[dSq] = dSq                        for dSq < 3
//! rad_ind[dSq] = floor(sqrt(dSq) + 1.5)     for dSq >= 3
//! ```
//!
//! so `rad_ind[rad²] == rad + 1` for `rad > 1` and a profile of radius
//! `rad` needs `rad + 2` bins. The forward table is cached and grown
//! monotonically; the inverse is cheap enough to compute on demand.

use crate::error::RadialError;

/// Cached forward table: radial index, indexed by radius squared.
#[derive(Debug, Default)]
pub(crate) struct RadIndexMap {
    by_rad_sq: Vec<i32>,
}

impl RadIndexMap {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Grow the table to cover every squared distance reachable at
    /// `rad`, i.e. to `max(rad² + 1, 3)` entries.
    pub(crate) fn ensure_radius(&mut self, rad: usize) -> Result<(), RadialError> {
        self.ensure_len(rad * rad + 1)
    }

    /// Grow the table to at least `max(n_elt, 3)` entries.
    ///
    /// Entries are a pure function of their index, so growth extends the
    /// existing table in place. On allocation failure the table is
    /// released before reporting the error.
    pub(crate) fn ensure_len(&mut self, n_elt: usize) -> Result<(), RadialError> {
        let n_elt = n_elt.max(3);
        let len = self.by_rad_sq.len();
        if len >= n_elt {
            return Ok(());
        }
        if self.by_rad_sq.try_reserve_exact(n_elt - len).is_err() {
            self.release();
            return Err(RadialError::Allocation { requested: n_elt });
        }
        tracing::trace!(from = len, to = n_elt, "growing radial-index table");
        for rad_sq in len..n_elt {
            self.by_rad_sq.push(rad_ind_for(rad_sq));
        }
        Ok(())
    }

    #[inline]
    pub(crate) fn as_slice(&self) -> &[i32] {
        &self.by_rad_sq
    }

    /// Drop the backing storage. The table regrows lazily on next use.
    pub(crate) fn release(&mut self) {
        self.by_rad_sq = Vec::new();
    }
}

#[inline]
fn rad_ind_for(rad_sq: usize) -> i32 {
    if rad_sq < 3 {
        rad_sq as i32
    } else {
        ((rad_sq as f64).sqrt() + 1.5) as i32
    }
}

/// Radius squared, indexed by radial index: `[0, 1, 2, 4, 9, 16, ...]`.
///
/// Computed directly; does not touch the cached forward table.
pub fn rad_sq_by_rad_ind(n_elt: usize) -> Vec<i32> {
    (0..n_elt)
        .map(|rad_ind| {
            if rad_ind < 3 {
                rad_ind as i32
            } else {
                ((rad_ind - 1) * (rad_ind - 1)) as i32
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_table_first_ten() {
        let mut map = RadIndexMap::new();
        map.ensure_len(10).unwrap();
        assert_eq!(map.as_slice(), &[0, 1, 2, 3, 3, 3, 3, 4, 4, 4]);
    }

    #[test]
    fn inverse_table_first_six() {
        assert_eq!(rad_sq_by_rad_ind(6), vec![0, 1, 2, 4, 9, 16]);
    }

    #[test]
    fn inverse_of_zero_elements_is_empty() {
        assert!(rad_sq_by_rad_ind(0).is_empty());
    }

    #[test]
    fn minimum_three_entries_even_for_tiny_requests() {
        let mut map = RadIndexMap::new();
        map.ensure_len(0).unwrap();
        assert_eq!(map.as_slice(), &[0, 1, 2]);
        map.ensure_radius(0).unwrap();
        assert_eq!(map.as_slice().len(), 3);
    }

    #[test]
    fn growth_is_monotonic_and_stable() {
        let mut map = RadIndexMap::new();
        map.ensure_radius(5).unwrap();
        let small: Vec<i32> = map.as_slice().to_vec();
        assert_eq!(small.len(), 26);

        map.ensure_radius(12).unwrap();
        assert_eq!(map.as_slice().len(), 145);
        assert_eq!(&map.as_slice()[..small.len()], &small[..]);

        // shrinking requests leave the table alone
        map.ensure_radius(3).unwrap();
        assert_eq!(map.as_slice().len(), 145);
    }

    #[test]
    fn forward_table_is_non_decreasing() {
        let mut map = RadIndexMap::new();
        map.ensure_len(500).unwrap();
        for pair in map.as_slice().windows(2) {
            assert!(pair[0] <= pair[1]);
        }
    }

    #[test]
    fn inverse_is_strictly_increasing_from_two() {
        let inv = rad_sq_by_rad_ind(40);
        for k in 2..inv.len() - 1 {
            assert!(inv[k] < inv[k + 1], "k={k}");
        }
    }

    #[test]
    fn forward_inverse_round_trip() {
        let mut map = RadIndexMap::new();
        map.ensure_len(1500).unwrap();
        let fwd = map.as_slice();
        let inv = rad_sq_by_rad_ind(30);
        for (rad_ind, &rad_sq) in inv.iter().enumerate() {
            let rad_sq = rad_sq as usize;
            if rad_sq < fwd.len() {
                assert_eq!(fwd[rad_sq] as usize, rad_ind, "rad_sq={rad_sq}");
            }
        }
    }

    #[test]
    fn forward_table_bounded_by_rad_plus_one() {
        let mut map = RadIndexMap::new();
        for rad in [0usize, 1, 2, 3, 7, 20, 64] {
            map.ensure_radius(rad).unwrap();
            for (rad_sq, &ind) in map.as_slice()[..=rad * rad].iter().enumerate() {
                assert!(
                    ind as usize <= rad + 1,
                    "rad={rad} rad_sq={rad_sq} ind={ind}"
                );
            }
        }
    }

    #[test]
    fn release_then_regrow() {
        let mut map = RadIndexMap::new();
        map.ensure_radius(8).unwrap();
        map.release();
        assert!(map.as_slice().is_empty());
        map.ensure_len(10).unwrap();
        assert_eq!(map.as_slice(), &[0, 1, 2, 3, 3, 3, 3, 4, 4, 4]);
    }
}
