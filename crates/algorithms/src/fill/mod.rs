//! Seeded flood fills over a DEM
//!
//! Every fill starts from one seed cell and grows a region across adjacent
//! cells (4- or 8-connected) that satisfy an elevation predicate. The result
//! is a `u8` mask on the DEM's grid: 1 for selected cells, 0 elsewhere.
//!
//! - Altitude fill: all connected cells at or below (downstream) or at or
//!   above (upstream) a threshold, by default the seed's elevation
//! - Basin fill: cells reachable from the seed along paths that never climb
//!   (downstream) or never descend (upstream)
//! - Batch: one fill per seed, in parallel, optionally merged

mod altitude;
mod basin;
mod batch;

pub use altitude::{altitude_fill, AltitudeFill, AltitudeFillParams};
pub use basin::{basin_fill, BasinFill, BasinFillParams};
pub use batch::{fill_many, fill_union, FillMode};

use ndarray::Array2;
use relieffill_core::raster::{Connectivity, Raster};
use relieffill_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which side of the reference elevation a fill selects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FillDirection {
    /// Cells at or below the reference
    #[default]
    Downstream,
    /// Cells at or above the reference
    Upstream,
}

impl FillDirection {
    /// Whether `value` lies on this direction's side of `reference` (ties included)
    #[inline]
    pub fn admits(self, value: f64, reference: f64) -> bool {
        match self {
            FillDirection::Downstream => value <= reference,
            FillDirection::Upstream => value >= reference,
        }
    }
}

impl fmt::Display for FillDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FillDirection::Downstream => write!(f, "downstream"),
            FillDirection::Upstream => write!(f, "upstream"),
        }
    }
}

impl FromStr for FillDirection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "downstream" | "down" | "d" => Ok(FillDirection::Downstream),
            "upstream" | "up" | "u" => Ok(FillDirection::Upstream),
            _ => Err(Error::InvalidParameter {
                name: "direction",
                value: s.to_string(),
                reason: "expected downstream or upstream".to_string(),
            }),
        }
    }
}

/// Cell count and area covered by a fill mask
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FillSummary {
    /// Number of selected cells
    pub cells: usize,
    /// Selected area in map units squared
    pub area: f64,
}

impl FillSummary {
    pub fn from_mask(mask: &Raster<u8>) -> Self {
        let cells = mask.count_equal(1);
        Self {
            cells,
            area: cells as f64 * mask.cell_area(),
        }
    }
}

/// Elevation of the seed, after checking it is inside the grid and valid.
fn seed_elevation(dem: &Raster<f64>, seed: (usize, usize)) -> Result<f64> {
    let (row, col) = seed;
    let z = dem.get(row, col)?;
    if dem.is_nodata(z) {
        return Err(Error::NodataSeed { row, col });
    }
    Ok(z)
}

/// Grow a region from `seed`.
///
/// A valid neighbour `to` of an already selected cell `from` joins the region
/// when `admit(z_from, z_to)` holds. Cells are marked when they join, so each
/// is expanded once; a neighbour rejected from one side can still be admitted
/// from another. The seed itself is selected unconditionally and must be
/// validated by the caller.
fn grow<F>(
    dem: &Raster<f64>,
    seed: (usize, usize),
    connectivity: Connectivity,
    admit: F,
) -> Raster<u8>
where
    F: Fn(f64, f64) -> bool,
{
    let (rows, cols) = dem.shape();
    let mut selected = Array2::<u8>::zeros((rows, cols));
    let mut stack = vec![seed];
    selected[seed] = 1;

    while let Some((row, col)) = stack.pop() {
        let z = unsafe { dem.get_unchecked(row, col) };

        for (nr, nc) in connectivity.neighbors(row, col, rows, cols) {
            if selected[(nr, nc)] != 0 {
                continue;
            }
            let nz = unsafe { dem.get_unchecked(nr, nc) };
            if dem.is_nodata(nz) || !admit(z, nz) {
                continue;
            }
            selected[(nr, nc)] = 1;
            stack.push((nr, nc));
        }
    }

    let mut mask = dem.with_same_meta::<u8>(rows, cols);
    *mask.data_mut() = selected;
    mask
}

/// All-zero mask on the DEM's grid
fn empty_mask(dem: &Raster<f64>) -> Raster<u8> {
    let (rows, cols) = dem.shape();
    dem.with_same_meta::<u8>(rows, cols)
}
