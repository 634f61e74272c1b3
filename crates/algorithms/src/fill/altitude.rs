//! Altitude fill: connected cells above or below a threshold elevation

use relieffill_core::raster::{Connectivity, Raster};
use relieffill_core::{Algorithm, Error, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{empty_mask, grow, seed_elevation, FillDirection};

/// Parameters for altitude fill
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AltitudeFillParams {
    /// Select cells below (downstream) or above (upstream) the threshold
    pub direction: FillDirection,
    /// Adjacency used to grow the region
    pub connectivity: Connectivity,
    /// Reference elevation. `None` uses the seed's own elevation.
    pub threshold: Option<f64>,
}

/// Altitude fill algorithm
#[derive(Debug, Clone, Default)]
pub struct AltitudeFill;

impl Algorithm for AltitudeFill {
    type Input = (Raster<f64>, (usize, usize));
    type Output = Raster<u8>;
    type Params = AltitudeFillParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "Altitude fill"
    }

    fn description(&self) -> &'static str {
        "Select cells connected to a seed that lie above or below a threshold elevation"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        let (dem, seed) = input;
        altitude_fill(&dem, seed, params)
    }
}

/// Select every cell connected to `seed` whose elevation is on the
/// requested side of the threshold.
///
/// A cell belongs to the mask when it is valid, satisfies
/// `z <= threshold` (downstream) or `z >= threshold` (upstream), and is
/// linked to the seed through cells that satisfy the same test. Nodata
/// cells block the fill.
///
/// # Arguments
/// * `dem` - Input DEM
/// * `seed` - Starting cell as (row, col)
/// * `params` - Direction, connectivity and optional explicit threshold
///
/// # Returns
/// `Raster<u8>` mask on the DEM's grid (1 = selected). Empty when an explicit
/// threshold excludes the seed.
///
/// # Errors
/// `IndexOutOfBounds` if the seed is outside the grid, `NodataSeed` if it is nodata,
/// `InvalidParameter` if the threshold is NaN.
pub fn altitude_fill(
    dem: &Raster<f64>,
    seed: (usize, usize),
    params: AltitudeFillParams,
) -> Result<Raster<u8>> {
    let seed_z = seed_elevation(dem, seed)?;

    let threshold = match params.threshold {
        Some(t) if t.is_nan() => {
            return Err(Error::InvalidParameter {
                name: "threshold",
                value: t.to_string(),
                reason: "must be a number".to_string(),
            });
        }
        Some(t) => t,
        None => seed_z,
    };

    let direction = params.direction;
    if !direction.admits(seed_z, threshold) {
        warn!(
            "seed elevation {} is not {} of threshold {}, mask is empty",
            seed_z, direction, threshold
        );
        return Ok(empty_mask(dem));
    }

    let mask = grow(dem, seed, params.connectivity, |_, z| direction.admits(z, threshold));

    debug!(
        "altitude fill from {:?} ({}, {}-connected, threshold {}): {} cells",
        seed,
        direction,
        params.connectivity,
        threshold,
        mask.count_equal(1)
    );

    Ok(mask)
}
