//! # ReliefFill Algorithms
//!
//! Seeded region growing over Digital Elevation Models.
//!
//! - **fill**: altitude fill (every connected cell above/below a threshold),
//!   basin fill (cells reached along monotonic paths), and batch fills over
//!   many seeds

pub mod fill;
pub(crate) mod maybe_rayon;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::fill::{
        altitude_fill, basin_fill, fill_many, fill_union, AltitudeFill, AltitudeFillParams,
        BasinFill, BasinFillParams, FillDirection, FillMode, FillSummary,
    };
    pub use relieffill_core::prelude::*;
}
