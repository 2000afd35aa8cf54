//! numpy-facing bindings for the starprof radial statistics engine.
//!
//! Data arrays are `(H, W)` float32 in ADU, masks are same-shape bool
//! arrays with True marking pixels to ignore, and centers are `(i, j)`
//! integer pairs (`i` = row). Profile operations return freshly
//! allocated numpy arrays; the engine scratch stays on the Rust side
//! inside [`RadialProfiler`].

use image::GrayImage;
use numpy::{IntoPyArray, PyArray1, PyReadonlyArrayDyn, PyUntypedArrayMethods};
use pyo3::exceptions::{PyMemoryError, PyRuntimeError, PyTypeError, PyValueError};
use pyo3::prelude::*;

use starprof::{CcdInfo, Gray32FImage, ProfileBuffers, RadialEngine, RadialError};

fn radial_err(err: RadialError) -> PyErr {
    match err {
        RadialError::Allocation { .. } => PyMemoryError::new_err(err.to_string()),
        RadialError::RadialIndexRange { .. } => PyRuntimeError::new_err(err.to_string()),
        _ => PyValueError::new_err(err.to_string()),
    }
}

fn frame_from_array(array: PyReadonlyArrayDyn<'_, f32>) -> PyResult<Gray32FImage> {
    let shape = array.shape();
    let view = array.as_array();
    match shape {
        [h, w] => {
            let mut out = Vec::with_capacity(h.saturating_mul(*w));
            for y in 0..*h {
                for x in 0..*w {
                    out.push(view[[y, x]]);
                }
            }
            Gray32FImage::from_raw(*w as u32, *h as u32, out)
                .ok_or_else(|| PyRuntimeError::new_err("failed to build data frame"))
        }
        _ => Err(PyTypeError::new_err(
            "expected data array with shape (H, W)",
        )),
    }
}

fn mask_from_array(array: PyReadonlyArrayDyn<'_, bool>) -> PyResult<GrayImage> {
    let shape = array.shape();
    let view = array.as_array();
    match shape {
        [h, w] => {
            let mut out = Vec::with_capacity(h.saturating_mul(*w));
            for y in 0..*h {
                for x in 0..*w {
                    out.push(u8::from(view[[y, x]]));
                }
            }
            GrayImage::from_raw(*w as u32, *h as u32, out)
                .ok_or_else(|| PyRuntimeError::new_err("failed to build mask frame"))
        }
        _ => Err(PyTypeError::new_err(
            "expected mask array with shape (H, W)",
        )),
    }
}

/// Stateful profiler owning the radial-index table and asymmetry
/// scratch. Create once and reuse across centroid iterations.
#[pyclass(module = "starprof._starprof")]
#[derive(Default)]
struct RadialProfiler {
    engine: RadialEngine,
}

#[pymethods]
impl RadialProfiler {
    #[new]
    fn new() -> Self {
        Self::default()
    }

    /// Unweighted radial asymmetry about `ij_ctr` within `rad`.
    ///
    /// Returns `(asymm, tot_counts, tot_pts)`.
    #[pyo3(signature = (data, mask, ij_ctr, rad))]
    fn rad_asymm(
        &mut self,
        data: PyReadonlyArrayDyn<'_, f32>,
        mask: Option<PyReadonlyArrayDyn<'_, bool>>,
        ij_ctr: (i64, i64),
        rad: usize,
    ) -> PyResult<(f64, f64, u64)> {
        let frame = frame_from_array(data)?;
        let mask = mask.map(mask_from_array).transpose()?;
        let stats = self
            .engine
            .rad_asymm(&frame, mask.as_ref(), [ij_ctr.0, ij_ctr.1], rad)
            .map_err(radial_err)?;
        Ok((stats.asymm, stats.tot_counts, stats.tot_pts))
    }

    /// Noise-weighted radial asymmetry.
    ///
    /// `bias` is in ADU, `read_noise` in electrons, `ccd_gain` in
    /// electrons per ADU. Returns `(asymm, tot_counts, tot_pts)`.
    #[pyo3(signature = (data, mask, ij_ctr, rad, bias, read_noise, ccd_gain))]
    #[allow(clippy::too_many_arguments)]
    fn rad_asymm_weighted(
        &mut self,
        data: PyReadonlyArrayDyn<'_, f32>,
        mask: Option<PyReadonlyArrayDyn<'_, bool>>,
        ij_ctr: (i64, i64),
        rad: usize,
        bias: f64,
        read_noise: f64,
        ccd_gain: f64,
    ) -> PyResult<(f64, f64, u64)> {
        let frame = frame_from_array(data)?;
        let mask = mask.map(mask_from_array).transpose()?;
        let ccd = CcdInfo {
            bias,
            read_noise,
            ccd_gain,
        };
        let stats = self
            .engine
            .rad_asymm_weighted(&frame, mask.as_ref(), [ij_ctr.0, ij_ctr.1], rad, &ccd)
            .map_err(radial_err)?;
        Ok((stats.asymm, stats.tot_counts, stats.tot_pts))
    }

    /// Radial profile keyed by Mirage radial index (`rad + 2` bins).
    ///
    /// Returns `(mean, var, n_pts, tot_counts, tot_pts)` with freshly
    /// allocated arrays.
    #[pyo3(signature = (data, mask, ij_ctr, rad))]
    fn rad_prof<'py>(
        &mut self,
        py: Python<'py>,
        data: PyReadonlyArrayDyn<'_, f32>,
        mask: Option<PyReadonlyArrayDyn<'_, bool>>,
        ij_ctr: (i64, i64),
        rad: usize,
    ) -> PyResult<ProfReturn<'py>> {
        let frame = frame_from_array(data)?;
        let mask = mask.map(mask_from_array).transpose()?;
        let n = rad + 2;
        let mut mean = vec![0.0f64; n];
        let mut var = vec![0.0f64; n];
        let mut n_pts = vec![0i32; n];
        let totals = self
            .engine
            .rad_prof(
                &frame,
                mask.as_ref(),
                [ij_ctr.0, ij_ctr.1],
                rad,
                ProfileBuffers {
                    mean: &mut mean,
                    var: &mut var,
                    n_pts: &mut n_pts,
                },
            )
            .map_err(radial_err)?;
        Ok((
            mean.into_pyarray_bound(py),
            var.into_pyarray_bound(py),
            n_pts.into_pyarray_bound(py),
            totals.tot_counts,
            totals.tot_pts,
        ))
    }

    /// Radial profile keyed by squared distance (`rad² + 1` bins).
    ///
    /// Returns `(mean, var, n_pts, tot_counts, tot_pts)`.
    #[pyo3(signature = (data, mask, ij_ctr, rad))]
    fn rad_sq_prof<'py>(
        &self,
        py: Python<'py>,
        data: PyReadonlyArrayDyn<'_, f32>,
        mask: Option<PyReadonlyArrayDyn<'_, bool>>,
        ij_ctr: (i64, i64),
        rad: usize,
    ) -> PyResult<ProfReturn<'py>> {
        let frame = frame_from_array(data)?;
        let mask = mask.map(mask_from_array).transpose()?;
        let n = rad * rad + 1;
        let mut mean = vec![0.0f64; n];
        let mut var = vec![0.0f64; n];
        let mut n_pts = vec![0i32; n];
        let totals = self
            .engine
            .rad_sq_prof(
                &frame,
                mask.as_ref(),
                [ij_ctr.0, ij_ctr.1],
                rad,
                ProfileBuffers {
                    mean: &mut mean,
                    var: &mut var,
                    n_pts: &mut n_pts,
                },
            )
            .map_err(radial_err)?;
        Ok((
            mean.into_pyarray_bound(py),
            var.into_pyarray_bound(py),
            n_pts.into_pyarray_bound(py),
            totals.tot_counts,
            totals.tot_pts,
        ))
    }

    /// Release the engine caches; they regrow lazily.
    fn free_caches(&mut self) {
        self.engine.free_caches();
    }
}

type ProfReturn<'py> = (
    Bound<'py, PyArray1<f64>>,
    Bound<'py, PyArray1<f64>>,
    Bound<'py, PyArray1<i32>>,
    f64,
    u64,
);

/// Radial index, indexed by radius squared.
#[pyfunction]
fn rad_ind_by_rad_sq(py: Python<'_>, n_elt: usize) -> PyResult<Bound<'_, PyArray1<i32>>> {
    let mut engine = RadialEngine::new();
    let table = engine.rad_ind_by_rad_sq(n_elt).map_err(radial_err)?;
    Ok(table.into_pyarray_bound(py))
}

/// Radius squared, indexed by radial index.
#[pyfunction]
fn rad_sq_by_rad_ind(py: Python<'_>, n_elt: usize) -> Bound<'_, PyArray1<i32>> {
    starprof::rad_sq_by_rad_ind(n_elt).into_pyarray_bound(py)
}

#[pyfunction]
fn package_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[pymodule]
fn _starprof(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<RadialProfiler>()?;
    m.add_function(wrap_pyfunction!(rad_ind_by_rad_sq, m)?)?;
    m.add_function(wrap_pyfunction!(rad_sq_by_rad_ind, m)?)?;
    m.add_function(wrap_pyfunction!(package_version, m)?)?;
    Ok(())
}
