//! # ReliefFill Core
//!
//! Core types and I/O for seeded DEM fills.
//!
//! This crate provides:
//! - `Raster<T>`: georeferenced 2D grid
//! - `GeoTransform`: affine transform between cells and map coordinates
//! - `Connectivity`: 4- and 8-neighbour adjacency
//! - `CRS`: GeoTIFF reference-system keys carried from input to output
//! - Native GeoTIFF reading and writing
//! - The `Algorithm` trait shared by every fill

pub mod crs;
pub mod error;
pub mod io;
pub mod raster;

pub use crs::CRS;
pub use error::{Error, Result};
pub use raster::{Connectivity, GeoTransform, Raster, RasterElement};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::crs::CRS;
    pub use crate::error::{Error, Result};
    pub use crate::raster::{Connectivity, GeoTransform, Raster, RasterElement};
    pub use crate::Algorithm;
}

/// Core trait for all algorithms in ReliefFill.
///
/// Algorithms are pure functions that transform input data according to parameters.
pub trait Algorithm {
    /// Input type for the algorithm
    type Input;
    /// Output type for the algorithm
    type Output;
    /// Parameters controlling algorithm behavior
    type Params: Default;
    /// Error type for algorithm execution
    type Error: std::error::Error;

    /// Returns the algorithm name
    fn name(&self) -> &'static str;

    /// Returns a description of what the algorithm does
    fn description(&self) -> &'static str;

    /// Execute the algorithm
    fn execute(
        &self,
        input: Self::Input,
        params: Self::Params,
    ) -> std::result::Result<Self::Output, Self::Error>;

    /// Execute with default parameters
    fn execute_default(
        &self,
        input: Self::Input,
    ) -> std::result::Result<Self::Output, Self::Error> {
        self.execute(input, Self::Params::default())
    }
}
