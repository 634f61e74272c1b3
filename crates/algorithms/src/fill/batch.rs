//! Fills from many seeds at once
//!
//! Each seed is an independent traversal over a shared read-only DEM, so
//! seeds are spread across the rayon pool when the `parallel` feature is on.

use ndarray::Zip;
use relieffill_core::raster::Raster;
use relieffill_core::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{altitude_fill, basin_fill, AltitudeFillParams, BasinFillParams};
use crate::maybe_rayon::*;

/// Which fill to run for each seed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum FillMode {
    Altitude(AltitudeFillParams),
    Basin(BasinFillParams),
}

impl Default for FillMode {
    fn default() -> Self {
        FillMode::Altitude(AltitudeFillParams::default())
    }
}

impl FillMode {
    fn run(&self, dem: &Raster<f64>, seed: (usize, usize)) -> Result<Raster<u8>> {
        match *self {
            FillMode::Altitude(params) => altitude_fill(dem, seed, params),
            FillMode::Basin(params) => basin_fill(dem, seed, params),
        }
    }
}

/// Run one fill per seed.
///
/// Masks are returned in seed order. If any seed is invalid an error from
/// one of the failing seeds is returned; with the `parallel` feature which
/// one is not determined by seed order.
pub fn fill_many(
    dem: &Raster<f64>,
    seeds: &[(usize, usize)],
    mode: FillMode,
) -> Result<Vec<Raster<u8>>> {
    debug!("running {} fills", seeds.len());
    seeds.into_par_iter().map(|&seed| mode.run(dem, seed)).collect()
}

/// Union of the masks from every seed (1 where any fill selected the cell).
///
/// # Errors
/// `InvalidParameter` when `seeds` is empty, plus any error from the
/// individual fills.
pub fn fill_union(
    dem: &Raster<f64>,
    seeds: &[(usize, usize)],
    mode: FillMode,
) -> Result<Raster<u8>> {
    if seeds.is_empty() {
        return Err(Error::InvalidParameter {
            name: "seeds",
            value: "[]".to_string(),
            reason: "at least one seed is required".to_string(),
        });
    }

    let masks = fill_many(dem, seeds, mode)?;
    let (rows, cols) = dem.shape();
    let mut union = dem.with_same_meta::<u8>(rows, cols);

    for mask in &masks {
        Zip::from(union.data_mut())
            .and(mask.data())
            .for_each(|u, &m| *u |= m);
    }

    Ok(union)
}
