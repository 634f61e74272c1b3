//! Coordinate reference system carried through GeoTIFF files
//!
//! The reference system is kept as the raw GeoKey tags of the source image
//! (GeoKeyDirectory, GeoDoubleParams, GeoAsciiParams), so a mask written from
//! a DEM declares the same system without any interpretation or reprojection.

use serde::{Deserialize, Serialize};

const GT_MODEL_TYPE: u16 = 1024;
const GEOGRAPHIC_TYPE: u16 = 2048;
const PROJECTED_CS_TYPE: u16 = 3072;

/// Raw GeoTIFF georeferencing keys
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CRS {
    /// GeoKeyDirectory (tag 34735): header then 4-value key entries
    directory: Vec<u16>,
    /// GeoDoubleParams (tag 34736)
    double_params: Vec<f64>,
    /// GeoAsciiParams (tag 34737)
    ascii_params: Option<String>,
}

impl CRS {
    /// Build from the three GeoKey tags as stored in the file
    pub fn from_geokeys(
        directory: Vec<u16>,
        double_params: Vec<f64>,
        ascii_params: Option<String>,
    ) -> Self {
        Self {
            directory,
            double_params,
            ascii_params,
        }
    }

    pub fn directory(&self) -> &[u16] {
        &self.directory
    }

    pub fn double_params(&self) -> &[f64] {
        &self.double_params
    }

    pub fn ascii_params(&self) -> Option<&str> {
        self.ascii_params.as_deref()
    }

    /// Value of a short key stored inline in the directory
    fn key(&self, id: u16) -> Option<u16> {
        self.directory
            .get(4..)?
            .chunks_exact(4)
            .find(|entry| entry[0] == id && entry[1] == 0)
            .map(|entry| entry[3])
    }

    /// GTModelTypeGeoKey: 1 projected, 2 geographic, 3 geocentric
    pub fn model_type(&self) -> Option<u16> {
        self.key(GT_MODEL_TYPE)
    }

    /// EPSG code of the projected or geographic system, if declared by code
    pub fn epsg(&self) -> Option<u32> {
        self.key(PROJECTED_CS_TYPE)
            .or_else(|| self.key(GEOGRAPHIC_TYPE))
            .filter(|&code| code != 0 && code != 32767)
            .map(u32::from)
    }
}
