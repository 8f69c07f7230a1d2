//! Scatter rendering and coordinate export.
//!
//! The canvas is a monochrome raster: white background, one black pixel per
//! point.  Dense regions darken while empty lattice gaps stay white, which is
//! all the comparison needs.  Images are written as 24-bit BMP files.

use crate::assemble::CoordinateList;
use crate::error::ScatterError;
use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

const WHITE: u8 = 255;
const INK: u8 = 0;
const GUTTER_SHADE: u8 = 200;

/// Largest raster, in pixels, the renderer will allocate.
pub const MAX_CANVAS_PIXELS: usize = 1 << 28;

/// Grayscale raster holding one or more scatter panels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScatterCanvas {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl ScatterCanvas {
    /// Creates a blank white canvas.
    ///
    /// Fails when `width * height` overflows or exceeds [`MAX_CANVAS_PIXELS`].
    pub fn new(width: usize, height: usize) -> Result<Self, ScatterError> {
        let area = width
            .checked_mul(height)
            .filter(|&area| area <= MAX_CANVAS_PIXELS)
            .ok_or_else(|| {
                ScatterError::InvalidParameter(format!(
                    "canvas {width}x{height} exceeds {MAX_CANVAS_PIXELS} pixels"
                ))
            })?;
        Ok(Self {
            width,
            height,
            pixels: vec![WHITE; area],
        })
    }

    /// Canvas width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Canvas height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the shade at `(x, y)`, with `y = 0` the top row.
    pub fn get(&self, x: usize, y: usize) -> Option<u8> {
        if x < self.width && y < self.height {
            Some(self.pixels[y * self.width + x])
        } else {
            None
        }
    }

    #[inline]
    fn set(&mut self, x: usize, y: usize, shade: u8) {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x] = shade;
        }
    }

    /// Counts pixels that carry ink.
    pub fn inked_pixels(&self) -> usize {
        self.pixels.iter().filter(|&&p| p == INK).count()
    }

    /// Plots `points` into the square panel whose left edge sits at `offset_x`.
    ///
    /// The vertical axis points up, so `y = 0` lands on the bottom row.
    pub fn plot(&mut self, points: &CoordinateList, offset_x: usize) {
        let side = points.domain_limit() as usize;
        for point in points.iter() {
            let px = offset_x + point.x as usize;
            let py = side - 1 - point.y as usize;
            self.set(px, py, INK);
        }
    }

    /// Saves the canvas as a 24-bit bottom-up BMP.
    pub fn save_bmp(&self, path: impl AsRef<Path>) -> Result<(), ScatterError> {
        let file = File::create(path.as_ref())?;
        let mut writer = BufWriter::new(file);
        self.write_bmp(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Encodes the canvas as a 24-bit BMP into `out`.
    pub fn write_bmp<W: Write>(&self, out: &mut W) -> Result<(), ScatterError> {
        let row_stride = (self.width * 3 + 3) / 4 * 4;
        let image_size = row_stride * self.height;
        let file_size = 14 + 40 + image_size;
        let too_large = || ScatterError::InvalidParameter("canvas too large for BMP".to_string());
        let width = u32::try_from(self.width).map_err(|_| too_large())?;
        let height = i32::try_from(self.height).map_err(|_| too_large())?;
        let image_size = u32::try_from(image_size).map_err(|_| too_large())?;
        let file_size = u32::try_from(file_size).map_err(|_| too_large())?;

        out.write_all(b"BM")?;
        out.write_all(&file_size.to_le_bytes())?;
        out.write_all(&0u32.to_le_bytes())?;
        out.write_all(&54u32.to_le_bytes())?;

        out.write_all(&40u32.to_le_bytes())?;
        out.write_all(&width.to_le_bytes())?;
        out.write_all(&height.to_le_bytes())?;
        out.write_all(&1u16.to_le_bytes())?;
        out.write_all(&24u16.to_le_bytes())?;
        out.write_all(&0u32.to_le_bytes())?;
        out.write_all(&image_size.to_le_bytes())?;
        // 300 dpi
        out.write_all(&11811u32.to_le_bytes())?;
        out.write_all(&11811u32.to_le_bytes())?;
        out.write_all(&0u32.to_le_bytes())?;
        out.write_all(&0u32.to_le_bytes())?;

        let mut row = vec![0u8; row_stride];
        for y in (0..self.height).rev() {
            for x in 0..self.width {
                let shade = self.pixels[y * self.width + x];
                row[x * 3..x * 3 + 3].copy_from_slice(&[shade, shade, shade]);
            }
            out.write_all(&row)?;
        }
        Ok(())
    }
}

/// Returns the `(width, height)` of a two-panel comparison for `domain_limit`.
///
/// Lets callers reject an unrenderable canvas before generating any points.
pub fn comparison_dimensions(
    domain_limit: u64,
    gutter: usize,
) -> Result<(usize, usize), ScatterError> {
    let too_large = || {
        ScatterError::InvalidParameter(format!(
            "domain limit {domain_limit} with gutter {gutter} is too large to render"
        ))
    };
    let side = usize::try_from(domain_limit).map_err(|_| too_large())?;
    let width = side
        .checked_mul(2)
        .and_then(|w| w.checked_add(gutter))
        .ok_or_else(too_large)?;
    match width.checked_mul(side) {
        Some(area) if area <= MAX_CANVAS_PIXELS => Ok((width, side)),
        _ => Err(too_large()),
    }
}

/// Renders both point sets side by side, left then right, split by a gutter.
///
/// Both lists must share the same domain limit so their axes line up.
pub fn render_comparison(
    left: &CoordinateList,
    right: &CoordinateList,
    gutter: usize,
) -> Result<ScatterCanvas, ScatterError> {
    if left.domain_limit() != right.domain_limit() {
        return Err(ScatterError::InvalidInput(format!(
            "domain limits differ: {} vs {}",
            left.domain_limit(),
            right.domain_limit()
        )));
    }
    let (width, side) = comparison_dimensions(left.domain_limit(), gutter)?;
    let mut canvas = ScatterCanvas::new(width, side)?;
    for y in 0..side {
        for x in side..side + gutter {
            canvas.set(x, y, GUTTER_SHADE);
        }
    }
    canvas.plot(left, 0);
    canvas.plot(right, side + gutter);
    Ok(canvas)
}

/// Writes `x,y` rows to `dir/prefix.csv` and returns the file path.
pub fn write_coordinates_csv(
    dir: impl AsRef<Path>,
    prefix: &str,
    points: &CoordinateList,
) -> Result<PathBuf, ScatterError> {
    let dir = dir.as_ref();
    create_dir_all(dir)?;
    let path = dir.join(format!("{prefix}.csv"));
    let file = File::create(&path)?;
    let mut writer = BufWriter::new(file);
    writeln!(writer, "x,y")?;
    for point in points.iter() {
        writeln!(writer, "{},{}", point.x, point.y)?;
    }
    writer.flush()?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assemble::assemble;
    use std::fs;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn unique_dir(tag: &str) -> PathBuf {
        let unique = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("lattice_scatter_{tag}_{unique}"))
    }

    #[test]
    fn test_plot_orientation() {
        let list = assemble(&[0, 3, 0, 3], 2, 4).unwrap();
        let mut canvas = ScatterCanvas::new(4, 4).unwrap();
        canvas.plot(&list, 0);
        // (0, 0) is bottom-left, (3, 3) is top-right.
        assert_eq!(canvas.get(0, 3), Some(INK));
        assert_eq!(canvas.get(3, 0), Some(INK));
        assert_eq!(canvas.inked_pixels(), 2);
    }

    #[test]
    fn test_comparison_layout() {
        let left = assemble(&[0, 0], 1, 4).unwrap();
        let right = assemble(&[0, 0], 1, 4).unwrap();
        let canvas = render_comparison(&left, &right, 2).unwrap();
        assert_eq!(canvas.width(), 10);
        assert_eq!(canvas.height(), 4);
        assert_eq!(canvas.get(0, 3), Some(INK));
        assert_eq!(canvas.get(6, 3), Some(INK));
        assert_eq!(canvas.get(4, 0), Some(GUTTER_SHADE));
    }

    #[test]
    fn test_comparison_rejects_mismatched_domains() {
        let left = assemble(&[0, 0], 1, 4).unwrap();
        let right = assemble(&[0, 0], 1, 5).unwrap();
        assert!(render_comparison(&left, &right, 0).is_err());
    }

    #[test]
    fn test_oversized_canvas_is_rejected() {
        assert!(matches!(
            ScatterCanvas::new(usize::MAX, 2),
            Err(ScatterError::InvalidParameter(_))
        ));
        assert!(ScatterCanvas::new(MAX_CANVAS_PIXELS + 1, 1).is_err());
    }

    #[test]
    fn test_huge_domain_from_validated_run_is_rejected() {
        let cfg = crate::config::RunConfig {
            n_points: 1,
            canvas_size: 1 << 33,
            bits_per_number: 34,
            ..crate::config::RunConfig::default()
        };
        assert!(cfg.validate().is_ok());
        let list = crate::compare::generate_prng_points(&cfg).unwrap();
        assert!(matches!(
            render_comparison(&list, &list, 16),
            Err(ScatterError::InvalidParameter(_))
        ));
        assert!(comparison_dimensions(u64::MAX, usize::MAX).is_err());
        assert_eq!(comparison_dimensions(1000, 16).unwrap(), (2016, 1000));
    }

    #[test]
    fn test_bmp_header() {
        let canvas = ScatterCanvas::new(3, 2).unwrap();
        let mut buf = Vec::new();
        canvas.write_bmp(&mut buf).unwrap();
        // 3 px * 3 bytes = 9, padded to 12 per row.
        assert_eq!(buf.len(), 54 + 12 * 2);
        assert_eq!(&buf[0..2], b"BM");
        assert_eq!(u32::from_le_bytes([buf[2], buf[3], buf[4], buf[5]]), 78);
        assert_eq!(u32::from_le_bytes([buf[18], buf[19], buf[20], buf[21]]), 3);
        assert_eq!(buf[54], WHITE);
    }

    #[test]
    fn test_save_bmp_and_csv() {
        let dir = unique_dir("render");
        fs::create_dir_all(&dir).unwrap();
        let list = assemble(&[1, 2, 3, 4], 2, 8).unwrap();
        let canvas = render_comparison(&list, &list, 1).unwrap();
        let image = dir.join("out.bmp");
        canvas.save_bmp(&image).unwrap();
        assert!(fs::metadata(&image).unwrap().len() > 54);

        let csv = write_coordinates_csv(&dir, "prng", &list).unwrap();
        assert!(csv.ends_with("prng.csv"));
        assert_eq!(fs::read_to_string(csv).unwrap(), "x,y\n1,3\n2,4\n");
        fs::remove_dir_all(&dir).unwrap();
    }
}
