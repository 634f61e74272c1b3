//! Affine geotransformation for rasters

use serde::{Deserialize, Serialize};

/// Affine transformation coefficients for georeferencing rasters.
///
/// Converts between pixel coordinates (col, row) and map coordinates (x, y):
/// ```text
/// x = origin_x + col * pixel_width + row * row_rotation
/// y = origin_y + col * col_rotation + row * pixel_height
/// ```
///
/// For north-up images, `row_rotation` and `col_rotation` are 0,
/// and `pixel_height` is negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoTransform {
    /// X coordinate of the upper-left corner
    pub origin_x: f64,
    /// Y coordinate of the upper-left corner
    pub origin_y: f64,
    /// Pixel width (cell size in X direction)
    pub pixel_width: f64,
    /// Pixel height (cell size in Y direction, usually negative)
    pub pixel_height: f64,
    /// Rotation about X axis (usually 0)
    pub row_rotation: f64,
    /// Rotation about Y axis (usually 0)
    pub col_rotation: f64,
}

impl GeoTransform {
    /// Create a new GeoTransform with no rotation (north-up image)
    pub fn new(origin_x: f64, origin_y: f64, pixel_width: f64, pixel_height: f64) -> Self {
        Self {
            origin_x,
            origin_y,
            pixel_width,
            pixel_height,
            row_rotation: 0.0,
            col_rotation: 0.0,
        }
    }

    /// Create from GDAL-style array
    /// [origin_x, pixel_width, row_rotation, origin_y, col_rotation, pixel_height]
    pub fn from_gdal(coeffs: [f64; 6]) -> Self {
        Self {
            origin_x: coeffs[0],
            pixel_width: coeffs[1],
            row_rotation: coeffs[2],
            origin_y: coeffs[3],
            col_rotation: coeffs[4],
            pixel_height: coeffs[5],
        }
    }

    /// Convert to GDAL-style array
    pub fn to_gdal(&self) -> [f64; 6] {
        [
            self.origin_x,
            self.pixel_width,
            self.row_rotation,
            self.origin_y,
            self.col_rotation,
            self.pixel_height,
        ]
    }

    /// Map coordinates of the centre of cell (col, row)
    pub fn pixel_to_geo(&self, col: usize, row: usize) -> (f64, f64) {
        self.apply(col as f64 + 0.5, row as f64 + 0.5)
    }

    /// Map coordinates of the top-left corner of cell (col, row)
    pub fn pixel_to_geo_corner(&self, col: usize, row: usize) -> (f64, f64) {
        self.apply(col as f64, row as f64)
    }

    fn apply(&self, col: f64, row: f64) -> (f64, f64) {
        let x = self.origin_x + col * self.pixel_width + row * self.row_rotation;
        let y = self.origin_y + col * self.col_rotation + row * self.pixel_height;
        (x, y)
    }

    /// Convert map coordinates to fractional pixel coordinates (col, row).
    ///
    /// Returns NaN for a degenerate transform.
    pub fn geo_to_pixel(&self, x: f64, y: f64) -> (f64, f64) {
        let det = self.pixel_width * self.pixel_height - self.row_rotation * self.col_rotation;

        if det.abs() < 1e-10 {
            return (f64::NAN, f64::NAN);
        }

        let dx = x - self.origin_x;
        let dy = y - self.origin_y;

        let col = (self.pixel_height * dx - self.row_rotation * dy) / det;
        let row = (-self.col_rotation * dx + self.pixel_width * dy) / det;

        (col, row)
    }

    /// Integer cell index (col, row) containing a map coordinate.
    ///
    /// Uses `ceil(offset / size) - 1` along each axis, so a point lying
    /// exactly on a cell's left or top edge belongs to the preceding cell.
    /// Rotation terms are ignored. The result may be negative or past the
    /// raster extent; [`Raster::locate`](crate::Raster::locate) checks it.
    pub fn geo_to_cell(&self, x: f64, y: f64) -> (isize, isize) {
        let index = |offset: f64, size: f64| {
            let i = (offset / size).ceil() - 1.0;
            // `as` maps NaN to 0, which would be a valid cell
            if i.is_nan() { isize::MIN } else { i as isize }
        };
        (
            index(x - self.origin_x, self.pixel_width),
            index(y - self.origin_y, self.pixel_height),
        )
    }

    /// Cell size (assumes square pixels and no rotation)
    pub fn cell_size(&self) -> f64 {
        self.pixel_width.abs()
    }

    /// Area of one cell in map units squared
    pub fn cell_area(&self) -> f64 {
        (self.pixel_width * self.pixel_height - self.row_rotation * self.col_rotation).abs()
    }

    /// Calculate the bounding box (min_x, min_y, max_x, max_y) for a raster of given dimensions
    pub fn bounds(&self, width: usize, height: usize) -> (f64, f64, f64, f64) {
        let (x0, y0) = self.pixel_to_geo_corner(0, 0);
        let (x1, y1) = self.pixel_to_geo_corner(width, 0);
        let (x2, y2) = self.pixel_to_geo_corner(0, height);
        let (x3, y3) = self.pixel_to_geo_corner(width, height);

        let min_x = x0.min(x1).min(x2).min(x3);
        let max_x = x0.max(x1).max(x2).max(x3);
        let min_y = y0.min(y1).min(y2).min(y3);
        let max_y = y0.max(y1).max(y2).max(y3);

        (min_x, min_y, max_x, max_y)
    }
}

impl Default for GeoTransform {
    fn default() -> Self {
        Self::new(0.0, 0.0, 1.0, -1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_pixel_to_geo_roundtrip() {
        let gt = GeoTransform::new(100.0, 200.0, 10.0, -10.0);

        let (x, y) = gt.pixel_to_geo(5, 10);
        let (col, row) = gt.geo_to_pixel(x, y);

        assert_relative_eq!(col, 5.5, epsilon = 1e-10);
        assert_relative_eq!(row, 10.5, epsilon = 1e-10);
    }

    #[test]
    fn test_geo_to_cell_interior() {
        let gt = GeoTransform::new(100.0, 200.0, 10.0, -10.0);
        assert_eq!(gt.geo_to_cell(105.0, 195.0), (0, 0));
        assert_eq!(gt.geo_to_cell(157.0, 141.0), (5, 5));

        // Every cell centre maps back to its own cell
        for row in 0..8 {
            for col in 0..8 {
                let (x, y) = gt.pixel_to_geo(col, row);
                assert_eq!(gt.geo_to_cell(x, y), (col as isize, row as isize));
            }
        }
    }

    #[test]
    fn test_geo_to_cell_edges_belong_to_previous_cell() {
        let gt = GeoTransform::new(100.0, 200.0, 10.0, -10.0);
        // Right edge of column 0 / bottom edge of row 0
        assert_eq!(gt.geo_to_cell(110.0, 190.0), (0, 0));
        // The raster's own left/top edge lies before the first cell
        assert_eq!(gt.geo_to_cell(100.0, 200.0), (-1, -1));
    }

    #[test]
    fn test_geo_to_cell_outside() {
        let gt = GeoTransform::new(0.0, 0.0, 1.0, -1.0);
        let (col, row) = gt.geo_to_cell(-5.5, 3.0);
        assert!(col < 0);
        assert!(row < 0);

        assert_eq!(gt.geo_to_cell(f64::NAN, 0.5).0, isize::MIN);
    }

    #[test]
    fn test_cell_area() {
        let gt = GeoTransform::new(0.0, 0.0, 30.0, -30.0);
        assert_relative_eq!(gt.cell_area(), 900.0, epsilon = 1e-10);
        assert_relative_eq!(gt.cell_size(), 30.0, epsilon = 1e-10);
    }

    #[test]
    fn test_bounds() {
        let gt = GeoTransform::new(0.0, 100.0, 1.0, -1.0);
        let (min_x, min_y, max_x, max_y) = gt.bounds(100, 100);

        assert_relative_eq!(min_x, 0.0, epsilon = 1e-10);
        assert_relative_eq!(min_y, 0.0, epsilon = 1e-10);
        assert_relative_eq!(max_x, 100.0, epsilon = 1e-10);
        assert_relative_eq!(max_y, 100.0, epsilon = 1e-10);
    }

    #[test]
    fn test_gdal_coefficients() {
        let coeffs = [500_000.0, 30.0, 0.0, 4_200_000.0, 0.0, -30.0];
        let gt = GeoTransform::from_gdal(coeffs);
        assert_eq!(gt.origin_y, 4_200_000.0);
        assert_eq!(gt.pixel_height, -30.0);
        assert_eq!(gt.to_gdal(), coeffs);
    }
}
