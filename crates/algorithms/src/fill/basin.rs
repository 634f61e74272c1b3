//! Basin fill: cells hydrologically continuous with the seed
//!
//! Downstream, the fill follows every path that never climbs, so it covers
//! the terrain water released at the seed could run over. Upstream, it
//! follows paths that never descend, covering the slopes that drain
//! towards the seed.

use relieffill_core::raster::{Connectivity, Raster};
use relieffill_core::{Algorithm, Error, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{grow, seed_elevation, FillDirection};

/// Parameters for basin fill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BasinFillParams {
    /// Follow descending (downstream) or ascending (upstream) paths
    pub direction: FillDirection,
    /// Adjacency used to grow the region
    pub connectivity: Connectivity,
}

/// Basin fill algorithm
#[derive(Debug, Clone, Default)]
pub struct BasinFill;

impl Algorithm for BasinFill {
    type Input = (Raster<f64>, (usize, usize));
    type Output = Raster<u8>;
    type Params = BasinFillParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "Basin fill"
    }

    fn description(&self) -> &'static str {
        "Select cells linked to a seed by monotonic downstream or upstream paths"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        let (dem, seed) = input;
        basin_fill(&dem, seed, params)
    }
}

/// Select the cells reachable from `seed` along monotonic paths.
///
/// A neighbour joins the mask when it is valid, lies on the requested side
/// of the seed's elevation, and is not above (downstream) or not below
/// (upstream) the selected cell it is entered from. Flat steps are allowed
/// in both directions.
///
/// The result is always a subset of the [`altitude_fill`](super::altitude_fill)
/// mask for the same seed, direction and connectivity.
///
/// # Errors
/// `IndexOutOfBounds` if the seed is outside the grid, `NodataSeed` if it is nodata.
pub fn basin_fill(
    dem: &Raster<f64>,
    seed: (usize, usize),
    params: BasinFillParams,
) -> Result<Raster<u8>> {
    let seed_z = seed_elevation(dem, seed)?;
    let direction = params.direction;

    let mask = grow(dem, seed, params.connectivity, |from, to| {
        direction.admits(to, seed_z) && direction.admits(to, from)
    });

    debug!(
        "basin fill from {:?} ({}, {}-connected): {} cells",
        seed,
        direction,
        params.connectivity,
        mask.count_equal(1)
    );

    Ok(mask)
}
