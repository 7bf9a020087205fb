//! Minimal TIFF/BigTIFF metadata probe
//!
//! Reads the first IFD of a TIFF or BigTIFF file and pulls out the image
//! dimensions and GeoTIFF geo-referencing tags. Unreadable or non-TIFF
//! files surface as errors the catalog builder treats as non-fatal.

use byteorder::{BigEndian, LittleEndian, ReadBytesExt};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use crate::errors::{SceneError, SceneResult};
use crate::geometry::{GeoTransform, GeographicCrs, Reprojection, WebMercatorCrs};

/// TIFF tags the probe cares about
mod tags {
    pub const IMAGE_WIDTH: u16 = 256;
    pub const IMAGE_LENGTH: u16 = 257;
    pub const MODEL_PIXEL_SCALE: u16 = 33550;
    pub const MODEL_TIEPOINT: u16 = 33922;
    pub const MODEL_TRANSFORMATION: u16 = 34264;
    pub const GEO_KEY_DIRECTORY: u16 = 34735;
}

/// GeoKey IDs and values used for CRS detection
mod geo_keys {
    pub const MODEL_TYPE: u16 = 1024;
    pub const PROJECTED_CS_TYPE: u16 = 3072;

    pub const MODEL_TYPE_PROJECTED: u16 = 1;
    pub const MODEL_TYPE_GEOGRAPHIC: u16 = 2;

    pub const EPSG_WEB_MERCATOR: u16 = 3857;
}

/// Coordinate reference system kinds the probe can classify
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrsKind {
    /// Geographic longitude/latitude (EPSG:4326)
    Geographic,
    /// Web Mercator (EPSG:3857)
    WebMercator,
}

impl CrsKind {
    /// Reprojection implementation for this CRS
    pub fn reprojection(&self) -> Box<dyn Reprojection> {
        match self {
            CrsKind::Geographic => Box::new(GeographicCrs),
            CrsKind::WebMercator => Box::new(WebMercatorCrs),
        }
    }
}

/// Geo-referencing metadata of a probed raster
#[derive(Debug, Clone)]
pub struct RasterInfo {
    /// Raster width in pixels
    pub width: u32,
    /// Raster height in pixels
    pub height: u32,
    /// Pixel-to-CRS affine transform
    pub transform: GeoTransform,
    /// Native coordinate reference system
    pub crs: CrsKind,
}

/// Byte order of the TIFF file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ByteOrder {
    /// Little-endian byte order (II)
    LittleEndian,
    /// Big-endian byte order (MM)
    BigEndian,
}

impl ByteOrder {
    fn detect(marker: u16) -> SceneResult<Self> {
        match marker {
            0x4949 => Ok(ByteOrder::LittleEndian), // "II" (Intel)
            0x4D4D => Ok(ByteOrder::BigEndian),    // "MM" (Motorola)
            _ => Err(SceneError::GenericError(format!(
                "invalid byte order marker: {:#06x}",
                marker
            ))),
        }
    }

    fn read_u16<R: Read>(&self, reader: &mut R) -> std::io::Result<u16> {
        match self {
            ByteOrder::LittleEndian => reader.read_u16::<LittleEndian>(),
            ByteOrder::BigEndian => reader.read_u16::<BigEndian>(),
        }
    }

    fn read_u32<R: Read>(&self, reader: &mut R) -> std::io::Result<u32> {
        match self {
            ByteOrder::LittleEndian => reader.read_u32::<LittleEndian>(),
            ByteOrder::BigEndian => reader.read_u32::<BigEndian>(),
        }
    }

    fn read_u64<R: Read>(&self, reader: &mut R) -> std::io::Result<u64> {
        match self {
            ByteOrder::LittleEndian => reader.read_u64::<LittleEndian>(),
            ByteOrder::BigEndian => reader.read_u64::<BigEndian>(),
        }
    }

    fn read_f64<R: Read>(&self, reader: &mut R) -> std::io::Result<f64> {
        match self {
            ByteOrder::LittleEndian => reader.read_f64::<LittleEndian>(),
            ByteOrder::BigEndian => reader.read_f64::<BigEndian>(),
        }
    }
}

/// One IFD entry with its raw inline value field
struct TagEntry {
    field_type: u16,
    count: u64,
    raw: [u8; 8],
}

/// Upper bound on a single tag's value data
const MAX_TAG_BYTES: u64 = 1 << 20;

/// Byte width of a TIFF field type, or 0 for types the probe never reads
fn field_type_size(field_type: u16) -> u64 {
    match field_type {
        1 | 2 | 6 | 7 => 1, // BYTE, ASCII, SBYTE, UNDEFINED
        3 | 8 => 2,         // SHORT, SSHORT
        4 | 9 | 11 => 4,    // LONG, SLONG, FLOAT
        5 | 10 | 12 | 16 | 17 => 8, // RATIONAL, SRATIONAL, DOUBLE, LONG8, SLONG8
        _ => 0,
    }
}

/// Probes a raster file for catalog metadata
///
/// # Arguments
/// * `path` - Path to the raster file
///
/// # Returns
/// The raster's dimensions, transform and CRS, or an error when the file is
/// unreadable, not a TIFF, or carries no geo-referencing
pub fn probe(path: &Path) -> SceneResult<RasterInfo> {
    let file = File::open(path)
        .map_err(|e| SceneError::InvalidRaster(path.to_path_buf(), e.to_string()))?;
    let mut reader = BufReader::new(file);
    probe_reader(&mut reader).map_err(|e| match e {
        // Carry the path in raster-shape errors so diagnostics name the file
        SceneError::GenericError(msg) => SceneError::InvalidRaster(path.to_path_buf(), msg),
        SceneError::IoError(io) => {
            SceneError::InvalidRaster(path.to_path_buf(), io.to_string())
        }
        SceneError::MissingGeoReference(_) => {
            SceneError::MissingGeoReference(path.to_path_buf())
        }
        other => other,
    })
}

/// Probes TIFF metadata from any seekable reader
///
/// Split out from `probe` so tests can run against in-memory buffers.
pub fn probe_reader<R: Read + Seek>(reader: &mut R) -> SceneResult<RasterInfo> {
    let marker = reader.read_u16::<LittleEndian>()?;
    let order = ByteOrder::detect(marker)?;

    let version = order.read_u16(reader)?;
    let (is_big_tiff, first_ifd_offset) = match version {
        42 => (false, u64::from(order.read_u32(reader)?)),
        43 => {
            let offset_size = order.read_u16(reader)?;
            let reserved = order.read_u16(reader)?;
            if offset_size != 8 || reserved != 0 {
                return Err(SceneError::GenericError(
                    "invalid BigTIFF header".to_string(),
                ));
            }
            (true, order.read_u64(reader)?)
        }
        v => {
            return Err(SceneError::GenericError(format!(
                "unsupported TIFF version: {}",
                v
            )))
        }
    };

    let entries = read_first_ifd(reader, first_ifd_offset, order, is_big_tiff)?;

    let width = scalar_u32(&entries, tags::IMAGE_WIDTH, order)
        .ok_or_else(|| SceneError::GenericError("missing image width".to_string()))?;
    let height = scalar_u32(&entries, tags::IMAGE_LENGTH, order)
        .ok_or_else(|| SceneError::GenericError("missing image height".to_string()))?;
    if width == 0 || height == 0 {
        return Err(SceneError::GenericError(format!(
            "degenerate dimensions {}x{}",
            width, height
        )));
    }

    let transform = read_geo_transform(reader, &entries, order, is_big_tiff)?;
    let crs = read_crs(reader, &entries, order, is_big_tiff)?;

    Ok(RasterInfo {
        width,
        height,
        transform,
        crs,
    })
}

/// Reads the first IFD, keeping only the tags the probe understands
fn read_first_ifd<R: Read + Seek>(
    reader: &mut R,
    offset: u64,
    order: ByteOrder,
    is_big_tiff: bool,
) -> SceneResult<HashMap<u16, TagEntry>> {
    reader.seek(SeekFrom::Start(offset))?;

    let entry_count = if is_big_tiff {
        order.read_u64(reader)?
    } else {
        u64::from(order.read_u16(reader)?)
    };

    // An IFD bigger than this is corrupt rather than real
    if entry_count > 4096 {
        return Err(SceneError::GenericError(format!(
            "implausible IFD entry count: {}",
            entry_count
        )));
    }

    let inline_size = if is_big_tiff { 8 } else { 4 };
    let wanted = [
        tags::IMAGE_WIDTH,
        tags::IMAGE_LENGTH,
        tags::MODEL_PIXEL_SCALE,
        tags::MODEL_TIEPOINT,
        tags::MODEL_TRANSFORMATION,
        tags::GEO_KEY_DIRECTORY,
    ];

    let mut entries = HashMap::new();
    for _ in 0..entry_count {
        let tag = order.read_u16(reader)?;
        let field_type = order.read_u16(reader)?;
        let count = if is_big_tiff {
            order.read_u64(reader)?
        } else {
            u64::from(order.read_u32(reader)?)
        };

        let mut raw = [0u8; 8];
        reader.read_exact(&mut raw[..inline_size])?;

        if wanted.contains(&tag) {
            entries.insert(
                tag,
                TagEntry {
                    field_type,
                    count,
                    raw,
                },
            );
        }
    }

    Ok(entries)
}

/// Reads a single SHORT or LONG tag value from its inline field
fn scalar_u32(entries: &HashMap<u16, TagEntry>, tag: u16, order: ByteOrder) -> Option<u32> {
    let entry = entries.get(&tag)?;
    let mut slice: &[u8] = &entry.raw;
    match entry.field_type {
        3 => order.read_u16(&mut slice).ok().map(u32::from),
        4 => order.read_u32(&mut slice).ok(),
        _ => None,
    }
}

/// Loads a tag's full value data, following the offset when not inline
fn entry_data<R: Read + Seek>(
    reader: &mut R,
    entry: &TagEntry,
    order: ByteOrder,
    is_big_tiff: bool,
) -> SceneResult<Vec<u8>> {
    let total = field_type_size(entry.field_type)
        .checked_mul(entry.count)
        .ok_or_else(|| SceneError::GenericError("tag value overflow".to_string()))?;
    // The tags read here hold a handful of doubles or shorts; a count
    // asking for more than this is corrupt rather than real
    if total > MAX_TAG_BYTES {
        return Err(SceneError::GenericError(format!(
            "implausible tag value size: {} bytes",
            total
        )));
    }
    let inline_size: u64 = if is_big_tiff { 8 } else { 4 };

    if total <= inline_size {
        return Ok(entry.raw[..total as usize].to_vec());
    }

    let mut slice: &[u8] = &entry.raw;
    let offset = if is_big_tiff {
        order.read_u64(&mut slice)?
    } else {
        u64::from(order.read_u32(&mut slice)?)
    };

    reader.seek(SeekFrom::Start(offset))?;
    let mut data = vec![0u8; total as usize];
    reader.read_exact(&mut data)?;
    Ok(data)
}

/// Reads a DOUBLE-array tag
fn read_doubles<R: Read + Seek>(
    reader: &mut R,
    entry: &TagEntry,
    order: ByteOrder,
    is_big_tiff: bool,
) -> SceneResult<Vec<f64>> {
    let data = entry_data(reader, entry, order, is_big_tiff)?;
    let mut slice: &[u8] = &data;
    let mut values = Vec::with_capacity(data.len() / 8);
    while slice.len() >= 8 {
        values.push(order.read_f64(&mut slice)?);
    }
    Ok(values)
}

/// Reads a SHORT-array tag
fn read_shorts<R: Read + Seek>(
    reader: &mut R,
    entry: &TagEntry,
    order: ByteOrder,
    is_big_tiff: bool,
) -> SceneResult<Vec<u16>> {
    let data = entry_data(reader, entry, order, is_big_tiff)?;
    let mut slice: &[u8] = &data;
    let mut values = Vec::with_capacity(data.len() / 2);
    while slice.len() >= 2 {
        values.push(order.read_u16(&mut slice)?);
    }
    Ok(values)
}

/// Builds the affine transform from GeoTIFF tags
///
/// ModelTransformation wins when present; otherwise the tiepoint/pixel-scale
/// pair is used. Neither tag means the raster is not geo-referenced.
fn read_geo_transform<R: Read + Seek>(
    reader: &mut R,
    entries: &HashMap<u16, TagEntry>,
    order: ByteOrder,
    is_big_tiff: bool,
) -> SceneResult<GeoTransform> {
    if let Some(entry) = entries.get(&tags::MODEL_TRANSFORMATION) {
        let m = read_doubles(reader, entry, order, is_big_tiff)?;
        if m.len() >= 8 {
            // Row-major 4x4 matrix; only the 2D terms matter here
            return Ok(GeoTransform::new([m[3], m[0], m[1], m[7], m[4], m[5]]));
        }
    }

    let tiepoint = entries.get(&tags::MODEL_TIEPOINT);
    let scale = entries.get(&tags::MODEL_PIXEL_SCALE);
    if let (Some(tiepoint), Some(scale)) = (tiepoint, scale) {
        let tp = read_doubles(reader, tiepoint, order, is_big_tiff)?;
        let sc = read_doubles(reader, scale, order, is_big_tiff)?;
        if tp.len() >= 6 && sc.len() >= 2 {
            let (i, j, x, y) = (tp[0], tp[1], tp[3], tp[4]);
            let (sx, sy) = (sc[0], sc[1]);
            return Ok(GeoTransform::new([
                x - i * sx,
                sx,
                0.0,
                y + j * sy,
                0.0,
                -sy,
            ]));
        }
    }

    Err(SceneError::MissingGeoReference(Default::default()))
}

/// Determines the CRS from the GeoKey directory
///
/// Projected rasters are only accepted in Web Mercator; anything else would
/// need a real reprojection library. A missing directory is treated as
/// geographic, which is what bare lon/lat rasters ship as.
fn read_crs<R: Read + Seek>(
    reader: &mut R,
    entries: &HashMap<u16, TagEntry>,
    order: ByteOrder,
    is_big_tiff: bool,
) -> SceneResult<CrsKind> {
    let entry = match entries.get(&tags::GEO_KEY_DIRECTORY) {
        Some(entry) => entry,
        None => return Ok(CrsKind::Geographic),
    };

    let shorts = read_shorts(reader, entry, order, is_big_tiff)?;
    if shorts.len() < 4 {
        return Ok(CrsKind::Geographic);
    }

    let mut model_type = None;
    let mut projected_cs = None;
    // Header is 4 shorts, then 4 shorts per key
    for key in shorts[4..].chunks_exact(4) {
        let (key_id, location, value) = (key[0], key[1], key[3]);
        if location != 0 {
            continue;
        }
        match key_id {
            geo_keys::MODEL_TYPE => model_type = Some(value),
            geo_keys::PROJECTED_CS_TYPE => projected_cs = Some(value),
            _ => {}
        }
    }

    match model_type {
        Some(geo_keys::MODEL_TYPE_GEOGRAPHIC) | None => Ok(CrsKind::Geographic),
        Some(geo_keys::MODEL_TYPE_PROJECTED) => match projected_cs {
            Some(geo_keys::EPSG_WEB_MERCATOR) => Ok(CrsKind::WebMercator),
            Some(code) => Err(SceneError::GenericError(format!(
                "unsupported projected CRS: EPSG:{}",
                code
            ))),
            None => Err(SceneError::GenericError(
                "projected raster without CRS code".to_string(),
            )),
        },
        Some(other) => Err(SceneError::GenericError(format!(
            "unsupported model type: {}",
            other
        ))),
    }
}
