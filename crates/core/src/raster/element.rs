//! Raster element trait for generic cell values

use num_traits::{NumCast, Zero};
use std::fmt::Debug;

/// Trait for types that can be stored in a raster cell.
///
/// DEMs are read as `f64`; masks are written as `u8`. Any primitive numeric
/// type works so that integer DEMs decode without a detour through floats.
pub trait RasterElement:
    Copy + Clone + Debug + PartialOrd + PartialEq + NumCast + Zero + Send + Sync + 'static
{
    /// Default no-data value for this type
    fn default_nodata() -> Self;

    /// Check if this value represents no-data.
    ///
    /// NaN is always no-data for float types, declared or not.
    fn is_nodata(&self, nodata: Option<Self>) -> bool;

    /// Convert self to f64
    fn to_f64(self) -> Option<f64> {
        NumCast::from(self)
    }

    /// Convert from f64, `None` when the value does not fit
    fn from_f64(value: f64) -> Option<Self> {
        NumCast::from(value)
    }
}

macro_rules! impl_raster_element_int {
    ($t:ty) => {
        impl RasterElement for $t {
            fn default_nodata() -> Self {
                <$t>::MIN
            }

            fn is_nodata(&self, nodata: Option<Self>) -> bool {
                nodata.map_or(false, |nd| *self == nd)
            }
        }
    };
}

macro_rules! impl_raster_element_float {
    ($t:ty) => {
        impl RasterElement for $t {
            fn default_nodata() -> Self {
                <$t>::NAN
            }

            fn is_nodata(&self, nodata: Option<Self>) -> bool {
                if self.is_nan() {
                    return true;
                }
                match nodata {
                    Some(nd) => (self - nd).abs() < <$t>::EPSILON * 100.0,
                    None => false,
                }
            }
        }
    };
}

impl_raster_element_int!(i8);
impl_raster_element_int!(i16);
impl_raster_element_int!(i32);
impl_raster_element_int!(i64);
impl_raster_element_int!(u8);
impl_raster_element_int!(u16);
impl_raster_element_int!(u32);
impl_raster_element_int!(u64);
impl_raster_element_float!(f32);
impl_raster_element_float!(f64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_nan_is_always_nodata() {
        assert!(f64::NAN.is_nodata(None));
        assert!(f32::NAN.is_nodata(Some(-9999.0)));
        assert!(!1.0_f64.is_nodata(None));
    }

    #[test]
    fn test_declared_nodata() {
        assert!((-9999.0_f64).is_nodata(Some(-9999.0)));
        assert!(!(-9998.0_f64).is_nodata(Some(-9999.0)));
        assert!(0_u8.is_nodata(Some(0)));
        assert!(!1_u8.is_nodata(Some(0)));
        assert!(!0_u8.is_nodata(None));
    }
}
