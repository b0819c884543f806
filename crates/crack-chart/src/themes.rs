//! Colors, legend placement and image geometry shared by both charts.

use crack_core::settings::ImageArgs;
pub use crack_core::settings::RASTER_DPI;
use plotters::chart::SeriesLabelPosition;
use plotters::style::RGBColor;

use crate::error::{PlotError, Result};

// ── Palettes ─────────────────────────────────────────────────────────────────

/// ColorBrewer qualitative `Dark2`.
pub const DARK2: [RGBColor; 8] = [
    RGBColor(0x1B, 0x9E, 0x77),
    RGBColor(0xD9, 0x5F, 0x02),
    RGBColor(0x75, 0x70, 0xB3),
    RGBColor(0xE7, 0x29, 0x8A),
    RGBColor(0x66, 0xA6, 0x1E),
    RGBColor(0xE6, 0xAB, 0x02),
    RGBColor(0xA6, 0x76, 0x1D),
    RGBColor(0x66, 0x66, 0x66),
];

/// ColorBrewer qualitative `Paired`.
pub const PAIRED: [RGBColor; 12] = [
    RGBColor(0xA6, 0xCE, 0xE3),
    RGBColor(0x1F, 0x78, 0xB4),
    RGBColor(0xB2, 0xDF, 0x8A),
    RGBColor(0x33, 0xA0, 0x2C),
    RGBColor(0xFB, 0x9A, 0x99),
    RGBColor(0xE3, 0x1A, 0x1C),
    RGBColor(0xFD, 0xBF, 0x6F),
    RGBColor(0xFF, 0x7F, 0x00),
    RGBColor(0xCA, 0xB2, 0xD6),
    RGBColor(0x6A, 0x3D, 0x9A),
    RGBColor(0xFF, 0xFF, 0x99),
    RGBColor(0xB1, 0x59, 0x28),
];

/// Grid line color.
pub const GRID: RGBColor = RGBColor(0xED, 0xED, 0xED);

/// Color of the `index`-th of `count` series: `Dark2` for up to eight series,
/// `Paired` (cycling past twelve) beyond that.
pub fn series_color(index: usize, count: usize) -> RGBColor {
    if count <= DARK2.len() {
        DARK2[index % DARK2.len()]
    } else {
        PAIRED[index % PAIRED.len()]
    }
}

// ── Legend ───────────────────────────────────────────────────────────────────

/// Legend placement, numbered like matplotlib's `loc` codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegendLocation {
    /// Code 0, "best"; there is no overlap search, so it sits upper left.
    Best,
    UpperRight,
    UpperLeft,
    LowerLeft,
    LowerRight,
    Right,
    CenterLeft,
    CenterRight,
    LowerCenter,
    UpperCenter,
    Center,
}

impl LegendLocation {
    /// Map a matplotlib location code; unknown codes fall back to `Best`.
    pub fn from_code(code: u8) -> Self {
        match code {
            1 => LegendLocation::UpperRight,
            2 => LegendLocation::UpperLeft,
            3 => LegendLocation::LowerLeft,
            4 => LegendLocation::LowerRight,
            5 => LegendLocation::Right,
            6 => LegendLocation::CenterLeft,
            7 => LegendLocation::CenterRight,
            8 => LegendLocation::LowerCenter,
            9 => LegendLocation::UpperCenter,
            10 => LegendLocation::Center,
            _ => LegendLocation::Best,
        }
    }

    pub fn position(self) -> SeriesLabelPosition {
        match self {
            LegendLocation::Best | LegendLocation::UpperLeft => SeriesLabelPosition::UpperLeft,
            LegendLocation::UpperRight => SeriesLabelPosition::UpperRight,
            LegendLocation::LowerLeft => SeriesLabelPosition::LowerLeft,
            LegendLocation::LowerRight => SeriesLabelPosition::LowerRight,
            LegendLocation::Right | LegendLocation::CenterRight => SeriesLabelPosition::MiddleRight,
            LegendLocation::CenterLeft => SeriesLabelPosition::MiddleLeft,
            LegendLocation::LowerCenter => SeriesLabelPosition::LowerMiddle,
            LegendLocation::UpperCenter => SeriesLabelPosition::UpperMiddle,
            LegendLocation::Center => SeriesLabelPosition::MiddleMiddle,
        }
    }
}

// ── Image geometry ───────────────────────────────────────────────────────────

/// Physical image size; pixel dimensions depend on the target DPI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageSpec {
    pub width_in: u32,
    pub height_in: u32,
    /// DPI of the vector output.
    pub dpi: u32,
}

impl Default for ImageSpec {
    fn default() -> Self {
        Self {
            width_in: 8,
            height_in: 6,
            dpi: 100,
        }
    }
}

impl ImageSpec {
    /// Pixel size at `dpi`.
    pub fn pixels(&self, dpi: u32) -> Result<(u32, u32)> {
        match (self.width_in.checked_mul(dpi), self.height_in.checked_mul(dpi)) {
            (Some(width), Some(height)) => Ok((width, height)),
            _ => Err(PlotError::InvalidData(format!(
                "{}x{} in at {} DPI does not fit a pixel size",
                self.width_in, self.height_in, dpi
            ))),
        }
    }
}

impl From<&ImageArgs> for ImageSpec {
    fn from(args: &ImageArgs) -> Self {
        Self {
            width_in: args.width,
            height_in: args.height,
            dpi: args.dpi,
        }
    }
}

/// Converts typographic points to pixels at a given DPI.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PointSize {
    dpi: u32,
}

impl PointSize {
    pub(crate) fn new(dpi: u32) -> Self {
        Self { dpi }
    }

    /// Font size in pixels for a size in points.
    pub(crate) fn font(&self, points: f64) -> f64 {
        (points * self.dpi as f64 / 72.0).max(1.0)
    }

    /// Length in whole pixels for a length in points.
    pub(crate) fn px(&self, points: f64) -> u32 {
        self.font(points).round() as u32
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_series_color_dark2_for_small_counts() {
        assert_eq!(series_color(0, 1), DARK2[0]);
        assert_eq!(series_color(7, 8), DARK2[7]);
    }

    #[test]
    fn test_series_color_paired_for_many() {
        assert_eq!(series_color(0, 9), PAIRED[0]);
        assert_eq!(series_color(11, 12), PAIRED[11]);
        // Wraps past the end of the palette.
        assert_eq!(series_color(12, 14), PAIRED[0]);
    }

    #[test]
    fn test_series_colors_distinct_within_palette() {
        let colors: Vec<RGBColor> = (0..8).map(|i| series_color(i, 8)).collect();
        for (i, a) in colors.iter().enumerate() {
            for b in &colors[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_legend_location_codes() {
        assert_eq!(LegendLocation::from_code(0), LegendLocation::Best);
        assert_eq!(LegendLocation::from_code(1), LegendLocation::UpperRight);
        assert_eq!(LegendLocation::from_code(2), LegendLocation::UpperLeft);
        assert_eq!(LegendLocation::from_code(4), LegendLocation::LowerRight);
        assert_eq!(LegendLocation::from_code(10), LegendLocation::Center);
        assert_eq!(LegendLocation::from_code(99), LegendLocation::Best);
    }

    #[test]
    fn test_image_spec_pixels() {
        let spec = ImageSpec::default();
        assert_eq!(spec.pixels(spec.dpi).unwrap(), (800, 600));
        assert_eq!(spec.pixels(RASTER_DPI).unwrap(), (1600, 1200));
    }

    #[test]
    fn test_image_spec_pixels_overflow() {
        let spec = ImageSpec {
            width_in: 100_000,
            height_in: 6,
            dpi: 100_000,
        };
        let err = spec.pixels(spec.dpi).unwrap_err();
        assert!(matches!(err, PlotError::InvalidData(_)));
    }

    #[test]
    fn test_image_spec_from_args() {
        let args = ImageArgs {
            width: 10,
            height: 4,
            dpi: 150,
            output_dir: PathBuf::from("."),
        };
        let spec = ImageSpec::from(&args);
        assert_eq!(spec.pixels(spec.dpi).unwrap(), (1500, 600));
    }

    #[test]
    fn test_scale_points_to_pixels() {
        let size = PointSize::new(72);
        assert_eq!(size.px(10.0), 10);
        let size = PointSize::new(144);
        assert_eq!(size.px(10.0), 20);
        assert!((size.font(9.0) - 18.0).abs() < 1e-9);
    }
}
