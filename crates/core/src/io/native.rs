//! Native GeoTIFF reading/writing
//!
//! Uses the `tiff` crate for single-band grey images. Georeferencing is
//! carried by the ModelPixelScale and ModelTiepoint tags, the reference
//! system by the GeoKey tags (copied verbatim), the declared no-data value by
//! the GDAL_NODATA ASCII tag.

use crate::crs::CRS;
use crate::error::{Error, Result};
use crate::raster::{GeoTransform, Raster, RasterElement};
use std::fs::File;
use std::io::{BufReader, BufWriter, Cursor};
use std::path::Path;
use tiff::decoder::{Decoder, DecodingResult};
use tiff::encoder::colortype::Gray32Float;
use tiff::encoder::TiffEncoder;
use tiff::tags::Tag;

const MODEL_PIXEL_SCALE: u16 = 33550;
const MODEL_TIEPOINT: u16 = 33922;
const GEO_KEY_DIRECTORY: u16 = 34735;
const GEO_DOUBLE_PARAMS: u16 = 34736;
const GEO_ASCII_PARAMS: u16 = 34737;
const GDAL_NODATA: u16 = 42113;

/// Options for writing GeoTIFF files
#[derive(Debug, Clone, Default)]
pub struct GeoTiffOptions {
    /// Leave out the GDAL_NODATA tag even when the raster declares a no-data value
    pub skip_nodata_tag: bool,
}

/// Read a GeoTIFF file into a Raster
///
/// Only single-band images are supported; `band` must be `None` or `Some(1)`.
pub fn read_geotiff<T, P>(path: P, band: Option<usize>) -> Result<Raster<T>>
where
    T: RasterElement,
    P: AsRef<Path>,
{
    let file = File::open(path.as_ref())?;
    decode_geotiff(BufReader::new(file), band)
}

/// Read a GeoTIFF from an in-memory buffer into a Raster
pub fn read_geotiff_from_buffer<T>(data: &[u8], band: Option<usize>) -> Result<Raster<T>>
where
    T: RasterElement,
{
    decode_geotiff(Cursor::new(data), band)
}

/// Round a value to what a sample of type `S` can hold
fn narrow<S: num_traits::NumCast>(value: f64) -> Option<f64> {
    num_traits::cast::<f64, S>(value).and_then(num_traits::cast)
}

/// Convert decoded samples to `T`, along with the rounding of the stored type
fn cast_all<S, T>(buf: Vec<S>) -> (Vec<T>, fn(f64) -> Option<f64>)
where
    S: num_traits::NumCast + Copy,
    T: RasterElement,
{
    let data = buf
        .into_iter()
        .map(|v| num_traits::cast(v).unwrap_or(T::default_nodata()))
        .collect();
    (data, narrow::<S>)
}

fn decode_geotiff<T, R>(reader: R, band: Option<usize>) -> Result<Raster<T>>
where
    T: RasterElement,
    R: std::io::Read + std::io::Seek,
{
    if let Some(b) = band.filter(|&b| b != 1) {
        return Err(Error::InvalidParameter {
            name: "band",
            value: b.to_string(),
            reason: "only single-band rasters are supported".to_string(),
        });
    }

    let mut decoder =
        Decoder::new(reader).map_err(|e| Error::Other(format!("TIFF decode error: {}", e)))?;

    let (width, height) = decoder
        .dimensions()
        .map_err(|e| Error::Other(format!("Cannot read dimensions: {}", e)))?;

    let rows = height as usize;
    let cols = width as usize;

    let result = decoder
        .read_image()
        .map_err(|e| Error::Other(format!("Cannot read image data: {}", e)))?;

    let (data, narrow_to_sample): (Vec<T>, _) = match result {
        DecodingResult::F32(buf) => cast_all(buf),
        DecodingResult::F64(buf) => cast_all(buf),
        DecodingResult::U8(buf) => cast_all(buf),
        DecodingResult::U16(buf) => cast_all(buf),
        DecodingResult::U32(buf) => cast_all(buf),
        DecodingResult::I8(buf) => cast_all(buf),
        DecodingResult::I16(buf) => cast_all(buf),
        DecodingResult::I32(buf) => cast_all(buf),
        _ => return Err(Error::UnsupportedDataType("Unsupported TIFF pixel format".to_string())),
    };

    // Multi-sample images decode to more values than cells
    if data.len() != rows * cols {
        return Err(Error::InvalidDimensions {
            width: cols,
            height: rows,
        });
    }

    let mut raster = Raster::from_vec(data, rows, cols)?;

    if let Some(transform) = read_geotransform(&mut decoder) {
        raster.set_transform(transform);
    }
    raster.set_crs(read_crs(&mut decoder));

    // The tag holds the value as text; compare against cells at their stored precision
    let nodata = read_nodata(&mut decoder)
        .and_then(narrow_to_sample)
        .and_then(T::from_f64);
    raster.set_nodata(nodata);

    Ok(raster)
}

fn read_geotransform<R: std::io::Read + std::io::Seek>(
    decoder: &mut Decoder<R>,
) -> Option<GeoTransform> {
    let scale = decoder
        .get_tag_f64_vec(Tag::from_u16_exhaustive(MODEL_PIXEL_SCALE))
        .ok()?;
    let tiepoint = decoder
        .get_tag_f64_vec(Tag::from_u16_exhaustive(MODEL_TIEPOINT))
        .ok()?;

    if scale.len() < 2 || tiepoint.len() < 6 {
        return None;
    }

    // tiepoint: [I, J, K, X, Y, Z], scale: [ScaleX, ScaleY, ScaleZ]
    let origin_x = tiepoint[3] - tiepoint[0] * scale[0];
    let origin_y = tiepoint[4] + tiepoint[1] * scale[1];

    Some(GeoTransform::new(origin_x, origin_y, scale[0], -scale[1]))
}

fn read_crs<R: std::io::Read + std::io::Seek>(decoder: &mut Decoder<R>) -> Option<CRS> {
    let directory = decoder
        .get_tag_u16_vec(Tag::from_u16_exhaustive(GEO_KEY_DIRECTORY))
        .ok()?;
    let double_params = decoder
        .get_tag_f64_vec(Tag::from_u16_exhaustive(GEO_DOUBLE_PARAMS))
        .unwrap_or_default();
    let ascii_params = decoder
        .get_tag_ascii_string(Tag::from_u16_exhaustive(GEO_ASCII_PARAMS))
        .ok();
    Some(CRS::from_geokeys(directory, double_params, ascii_params))
}

fn read_nodata<R: std::io::Read + std::io::Seek>(decoder: &mut Decoder<R>) -> Option<f64> {
    let text = decoder
        .get_tag_ascii_string(Tag::from_u16_exhaustive(GDAL_NODATA))
        .ok()?;
    text.trim_matches(|c: char| c == '\0' || c.is_whitespace())
        .parse()
        .ok()
}

/// Write a Raster to a GeoTIFF file
///
/// Cells are written as 32-bit float whatever `T` is.
pub fn write_geotiff<T, P>(
    raster: &Raster<T>,
    path: P,
    options: Option<GeoTiffOptions>,
) -> Result<()>
where
    T: RasterElement,
    P: AsRef<Path>,
{
    let file = File::create(path.as_ref())?;
    encode_geotiff(raster, BufWriter::new(file), &options.unwrap_or_default())
}

/// Write a Raster to an in-memory GeoTIFF buffer
pub fn write_geotiff_to_buffer<T>(
    raster: &Raster<T>,
    options: Option<GeoTiffOptions>,
) -> Result<Vec<u8>>
where
    T: RasterElement,
{
    let mut buf = Vec::new();
    encode_geotiff(raster, Cursor::new(&mut buf), &options.unwrap_or_default())?;
    Ok(buf)
}

fn encode_geotiff<T, W>(raster: &Raster<T>, writer: W, options: &GeoTiffOptions) -> Result<()>
where
    T: RasterElement,
    W: std::io::Write + std::io::Seek,
{
    let mut encoder =
        TiffEncoder::new(writer).map_err(|e| Error::Other(format!("TIFF encoder error: {}", e)))?;

    let (rows, cols) = raster.shape();

    let data: Vec<f32> = raster
        .data()
        .iter()
        .map(|&v| num_traits::cast(v).unwrap_or(f32::NAN))
        .collect();

    let mut image = encoder
        .new_image::<Gray32Float>(cols as u32, rows as u32)
        .map_err(|e| Error::Other(format!("Cannot create TIFF image: {}", e)))?;

    let gt = raster.transform();

    let scale = [gt.pixel_width, gt.pixel_height.abs(), 0.0];
    image
        .encoder()
        .write_tag(Tag::from_u16_exhaustive(MODEL_PIXEL_SCALE), &scale[..])
        .map_err(|e| Error::Other(format!("Cannot write scale tag: {}", e)))?;

    let tiepoint = [0.0, 0.0, 0.0, gt.origin_x, gt.origin_y, 0.0];
    image
        .encoder()
        .write_tag(Tag::from_u16_exhaustive(MODEL_TIEPOINT), &tiepoint[..])
        .map_err(|e| Error::Other(format!("Cannot write tiepoint tag: {}", e)))?;

    match raster.crs() {
        Some(crs) => {
            image
                .encoder()
                .write_tag(Tag::from_u16_exhaustive(GEO_KEY_DIRECTORY), crs.directory())
                .map_err(|e| Error::Other(format!("Cannot write geokey tag: {}", e)))?;
            if !crs.double_params().is_empty() {
                image
                    .encoder()
                    .write_tag(Tag::from_u16_exhaustive(GEO_DOUBLE_PARAMS), crs.double_params())
                    .map_err(|e| Error::Other(format!("Cannot write geokey tag: {}", e)))?;
            }
            if let Some(ascii) = crs.ascii_params() {
                image
                    .encoder()
                    .write_tag(Tag::from_u16_exhaustive(GEO_ASCII_PARAMS), ascii)
                    .map_err(|e| Error::Other(format!("Cannot write geokey tag: {}", e)))?;
            }
        }
        None => {
            // Minimal GeoKey directory: projected model, pixel-is-area
            let geokeys: [u16; 12] = [
                1, 1, 0, 2, // version 1.1.0, 2 keys
                1024, 0, 1, 1, // GTModelTypeGeoKey = ModelTypeProjected
                1025, 0, 1, 1, // GTRasterTypeGeoKey = RasterPixelIsArea
            ];
            image
                .encoder()
                .write_tag(Tag::from_u16_exhaustive(GEO_KEY_DIRECTORY), &geokeys[..])
                .map_err(|e| Error::Other(format!("Cannot write geokey tag: {}", e)))?;
        }
    }

    if !options.skip_nodata_tag {
        if let Some(nodata) = raster.nodata().and_then(RasterElement::to_f64) {
            let text = nodata.to_string();
            image
                .encoder()
                .write_tag(Tag::from_u16_exhaustive(GDAL_NODATA), text.as_str())
                .map_err(|e| Error::Other(format!("Cannot write nodata tag: {}", e)))?;
        }
    }

    image
        .write_data(&data)
        .map_err(|e| Error::Other(format!("Cannot write image data: {}", e)))?;

    Ok(())
}
