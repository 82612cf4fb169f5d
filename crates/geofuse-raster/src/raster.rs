//! Single-band elevation raster backed by GeoTIFF files.

use crate::{GridTransform, RasterError, Result};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tiff::decoder::{Decoder, DecodingResult, Limits};
use tiff::encoder::{colortype, TiffEncoder};
use tiff::tags::Tag;

/// Nodata sentinel assigned to cells absent from every source.
pub const NODATA: f32 = -9999.0;

/// CRS assigned to rasters that carry no projection key.
///
/// Both providers deliver their products in EPSG:25832 (ETRS89 / UTM 32N);
/// sources without a GeoKeyDirectory are assumed to already be in it.
pub const DEFAULT_EPSG: u32 = 25832;

// GeoTIFF tag ids carried by both providers' products.
const TAG_MODEL_PIXEL_SCALE: u16 = 33550;
const TAG_MODEL_TIEPOINT: u16 = 33922;
const TAG_GEO_KEY_DIRECTORY: u16 = 34735;
const TAG_GDAL_NODATA: u16 = 42113;

// GeoKey id for the projected CRS code.
const KEY_PROJECTED_CS_TYPE: u32 = 3072;

/// A single-band f32 raster with georeferencing.
///
/// Data is row-major from the north-west corner. Written once, read-only
/// afterwards; the file handle used to decode it is released as soon as the
/// constructor returns, on success and error paths alike.
#[derive(Debug, Clone)]
pub struct ElevationRaster {
    data: Vec<f32>,
    width: u32,
    height: u32,
    transform: GridTransform,
    epsg: u32,
    nodata: f32,
}

impl ElevationRaster {
    /// Assemble a raster from parts, checking the band length.
    pub fn new(
        data: Vec<f32>,
        width: u32,
        height: u32,
        transform: GridTransform,
        epsg: u32,
        nodata: f32,
    ) -> Result<Self> {
        if data.len() != (width as usize) * (height as usize) {
            return Err(RasterError::InvalidGeoTiff(format!(
                "band length {} does not match {}x{}",
                data.len(),
                width,
                height
            )));
        }
        Ok(Self {
            data,
            width,
            height,
            transform,
            epsg,
            nodata,
        })
    }

    /// Load a raster from a GeoTIFF file.
    ///
    /// The file must carry ModelPixelScale and ModelTiepoint tags; a missing
    /// CRS key falls back to [`DEFAULT_EPSG`], a missing nodata tag to
    /// [`NODATA`].
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let mut decoder = Decoder::new(file)?;

        // Raise the decode limits: a merged county-scale mosaic at 1 m easily
        // exceeds the crate defaults.
        let mut limits = Limits::default();
        limits.decoding_buffer_size = 1024 * 1024 * 1024;
        limits.intermediate_buffer_size = 1024 * 1024 * 1024;
        limits.ifd_value_size = 1024 * 1024 * 1024;
        decoder = decoder.with_limits(limits);

        let (width, height) = decoder.dimensions()?;
        let transform = read_transform(&mut decoder)?;
        let epsg = read_epsg(&mut decoder).unwrap_or(DEFAULT_EPSG);
        let nodata = read_nodata(&mut decoder).unwrap_or(NODATA);
        let data = decode_band(&mut decoder)?;

        Self::new(data, width, height, transform, epsg, nodata)
    }

    /// Write the raster as a single-band Gray32Float GeoTIFF.
    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = BufWriter::new(File::create(path.as_ref())?);
        let mut encoder = TiffEncoder::new(file)?;
        let mut image = encoder.new_image::<colortype::Gray32Float>(self.width, self.height)?;
        write_geo_tags(
            image.encoder(),
            &self.transform,
            self.epsg,
            Some(self.nodata),
        )?;
        image.write_data(&self.data)?;
        Ok(())
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The pixel-to-projected transform.
    pub fn transform(&self) -> &GridTransform {
        &self.transform
    }

    /// EPSG code of the raster's CRS.
    pub fn epsg(&self) -> u32 {
        self.epsg
    }

    /// The nodata sentinel.
    pub fn nodata(&self) -> f32 {
        self.nodata
    }

    /// The raw band, row-major.
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Value at a pixel coordinate.
    pub fn value_at(&self, col: u32, row: u32) -> f32 {
        self.data[(row * self.width + col) as usize]
    }
}

/// Write a georeferenced 3-band RGB GeoTIFF (the WMS overlay format).
pub fn write_rgb_geotiff<P: AsRef<Path>>(
    path: P,
    rgb: &[u8],
    width: u32,
    height: u32,
    transform: &GridTransform,
    epsg: u32,
) -> Result<()> {
    if rgb.len() != (width as usize) * (height as usize) * 3 {
        return Err(RasterError::InvalidGeoTiff(format!(
            "RGB buffer length {} does not match {}x{}x3",
            rgb.len(),
            width,
            height
        )));
    }
    let file = BufWriter::new(File::create(path.as_ref())?);
    let mut encoder = TiffEncoder::new(file)?;
    let mut image = encoder.new_image::<colortype::RGB8>(width, height)?;
    write_geo_tags(image.encoder(), transform, epsg, None)?;
    image.write_data(rgb)?;
    Ok(())
}

fn write_geo_tags<W, K>(
    encoder: &mut tiff::encoder::DirectoryEncoder<'_, W, K>,
    transform: &GridTransform,
    epsg: u32,
    nodata: Option<f32>,
) -> Result<()>
where
    W: std::io::Write + std::io::Seek,
    K: tiff::encoder::TiffKind,
{
    let scale = [transform.pixel_width, transform.pixel_height, 0.0];
    encoder.write_tag(Tag::Unknown(TAG_MODEL_PIXEL_SCALE), &scale[..])?;

    let tiepoint = [0.0, 0.0, 0.0, transform.origin_x, transform.origin_y, 0.0];
    encoder.write_tag(Tag::Unknown(TAG_MODEL_TIEPOINT), &tiepoint[..])?;

    // Minimal GeoKeyDirectory: projected model, pixel-is-area, CRS code.
    let keys: [u16; 16] = [
        1, 1, 0, 3, // directory header, 3 keys follow
        1024, 0, 1, 1, // GTModelType = projected
        1025, 0, 1, 1, // GTRasterType = pixel is area
        3072, 0, 1, epsg as u16, // ProjectedCSType
    ];
    encoder.write_tag(Tag::Unknown(TAG_GEO_KEY_DIRECTORY), &keys[..])?;

    if let Some(nodata) = nodata {
        encoder.write_tag(Tag::Unknown(TAG_GDAL_NODATA), format!("{nodata}").as_str())?;
    }
    Ok(())
}

fn read_transform<R: std::io::Read + std::io::Seek>(
    decoder: &mut Decoder<R>,
) -> Result<GridTransform> {
    let scale = decoder.get_tag_f64_vec(Tag::Unknown(TAG_MODEL_PIXEL_SCALE));
    let tiepoint = decoder.get_tag_f64_vec(Tag::Unknown(TAG_MODEL_TIEPOINT));

    if let (Ok(scale), Ok(tiepoint)) = (scale, tiepoint) {
        // Tiepoint is [i, j, k, x, y, z]: pixel (i, j) anchors at (x, y).
        if scale.len() >= 2 && tiepoint.len() >= 6 && tiepoint[0] == 0.0 && tiepoint[1] == 0.0 {
            return Ok(GridTransform {
                origin_x: tiepoint[3],
                origin_y: tiepoint[4],
                pixel_width: scale[0],
                pixel_height: scale[1],
            });
        }
    }

    Err(RasterError::InvalidGeoTiff(
        "missing or unusable georeferencing tags".to_string(),
    ))
}

fn read_epsg<R: std::io::Read + std::io::Seek>(decoder: &mut Decoder<R>) -> Option<u32> {
    let directory = decoder
        .get_tag_u32_vec(Tag::Unknown(TAG_GEO_KEY_DIRECTORY))
        .ok()?;
    // Entries of 4 shorts after the 4-short header: (key, location, count, value).
    for entry in directory.get(4..)?.chunks_exact(4) {
        if entry[0] == KEY_PROJECTED_CS_TYPE && entry[1] == 0 {
            return Some(entry[3]);
        }
    }
    None
}

fn read_nodata<R: std::io::Read + std::io::Seek>(decoder: &mut Decoder<R>) -> Option<f32> {
    decoder
        .get_tag_ascii_string(Tag::Unknown(TAG_GDAL_NODATA))
        .ok()
        .and_then(|s| s.trim().parse().ok())
}

fn decode_band<R: std::io::Read + std::io::Seek>(decoder: &mut Decoder<R>) -> Result<Vec<f32>> {
    let result = decoder.read_image()?;
    let data = match result {
        DecodingResult::F32(data) => data,
        DecodingResult::F64(data) => data.into_iter().map(|v| v as f32).collect(),
        DecodingResult::I8(data) => data.into_iter().map(|v| v as f32).collect(),
        DecodingResult::I16(data) => data.into_iter().map(|v| v as f32).collect(),
        DecodingResult::I32(data) => data.into_iter().map(|v| v as f32).collect(),
        DecodingResult::I64(data) => data.into_iter().map(|v| v as f32).collect(),
        DecodingResult::U8(data) => data.into_iter().map(|v| v as f32).collect(),
        DecodingResult::U16(data) => data.into_iter().map(|v| v as f32).collect(),
        DecodingResult::U32(data) => data.into_iter().map(|v| v as f32).collect(),
        DecodingResult::U64(data) => data.into_iter().map(|v| v as f32).collect(),
    };
    Ok(data)
}
