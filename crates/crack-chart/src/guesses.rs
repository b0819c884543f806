//! Line chart of cumulative guess series.
//!
//! The chart is written twice: `chart.svg` at the requested DPI and
//! `chart.png` at [`RASTER_DPI`].

use std::ops::Range;
use std::path::{Path, PathBuf};

use crack_core::formatting::{format_count, x_axis_label, y_axis_label};
use crack_core::models::Series;
use plotters::coord::Shift;
use plotters::prelude::*;
use tracing::debug;

use crate::error::{PlotError, Result};
use crate::themes::{series_color, ImageSpec, LegendLocation, PointSize, GRID, RASTER_DPI};

pub const SVG_FILE: &str = "chart.svg";
pub const PNG_FILE: &str = "chart.png";

/// Everything needed to draw the guess chart.
#[derive(Debug, Clone, Copy)]
pub struct GuessChart<'a> {
    pub series: &'a [Series],
    /// Y values are percentages of the target population.
    pub percent: bool,
    /// Each status line stands for `10^scale` guesses.
    pub scale: u32,
    pub legend: LegendLocation,
}

/// Axis ranges covering every point of every series.
///
/// Empty input still yields non-degenerate `0..1` ranges.
pub fn guess_ranges(series: &[Series]) -> (Range<f64>, Range<f64>) {
    let x_max = series
        .iter()
        .filter_map(Series::max_x)
        .max()
        .map(|x| x as f64)
        .unwrap_or(0.0);
    let y_max = series
        .iter()
        .filter_map(Series::max_y)
        .fold(0.0, f64::max);

    let x_end = if x_max > 0.0 { x_max } else { 1.0 };
    let y_end = if y_max > 0.0 { y_max * 1.05 } else { 1.0 };
    (0.0..x_end, 0.0..y_end)
}

/// Render the chart into `output_dir`, creating the directory if needed.
///
/// Returns the paths of the written images.
pub fn render_guess_chart(
    chart: &GuessChart<'_>,
    image: &ImageSpec,
    output_dir: &Path,
) -> Result<Vec<PathBuf>> {
    if image.width_in == 0 || image.height_in == 0 || image.dpi == 0 {
        return Err(PlotError::InvalidData(format!(
            "image size {}x{} at {} DPI",
            image.width_in, image.height_in, image.dpi
        )));
    }
    let svg_size = image.pixels(image.dpi)?;
    let png_size = image.pixels(RASTER_DPI)?;
    std::fs::create_dir_all(output_dir)?;

    let svg_path = output_dir.join(SVG_FILE);
    {
        let root = SVGBackend::new(&svg_path, svg_size).into_drawing_area();
        draw_guess_chart(&root, chart, PointSize::new(image.dpi))?;
    }
    debug!("Wrote {}", svg_path.display());

    let png_path = output_dir.join(PNG_FILE);
    {
        let root = BitMapBackend::new(&png_path, png_size).into_drawing_area();
        draw_guess_chart(&root, chart, PointSize::new(RASTER_DPI))?;
    }
    debug!("Wrote {}", png_path.display());

    Ok(vec![svg_path, png_path])
}

fn draw_guess_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    chart: &GuessChart<'_>,
    size: PointSize,
) -> Result<()> {
    root.fill(&WHITE)
        .map_err(|e| PlotError::DrawingArea(e.to_string()))?;

    let (x_range, y_range) = guess_ranges(chart.series);
    let x_desc = x_axis_label(chart.scale);
    let label_font = ("sans-serif", size.font(10.0));

    let mut ctx = ChartBuilder::on(root)
        .margin(size.px(8.0))
        .x_label_area_size(size.px(32.0))
        .y_label_area_size(size.px(48.0))
        .build_cartesian_2d(x_range, y_range)
        .map_err(|e| PlotError::ChartConfig(e.to_string()))?;

    let percent = chart.percent;
    ctx.configure_mesh()
        .bold_line_style(GRID.stroke_width(1))
        .light_line_style(WHITE.stroke_width(0))
        .x_desc(x_desc.as_str())
        .y_desc(y_axis_label(percent))
        .axis_desc_style(label_font)
        .label_style(("sans-serif", size.font(9.0)))
        .x_label_formatter(&|x| format_count(x.round() as u64))
        .y_label_formatter(&|y| {
            if percent {
                format!("{:.0}", y)
            } else {
                format_count(y.round() as u64)
            }
        })
        .draw()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    let count = chart.series.len();
    let line_width = size.px(1.5);
    let legend_len = size.px(20.0) as i32;
    for (index, series) in chart.series.iter().enumerate() {
        let color = series_color(index, count);
        ctx.draw_series(LineSeries::new(
            series.points.iter().map(|p| (p.x as f64, p.y)),
            color.stroke_width(line_width),
        ))
        .map_err(|e| PlotError::Drawing(e.to_string()))?
        .label(series.label.as_str())
        .legend(move |(x, y)| {
            PathElement::new(vec![(x, y), (x + legend_len, y)], color.stroke_width(line_width))
        });
    }

    if count > 0 {
        ctx.configure_series_labels()
            .position(chart.legend.position())
            .background_style(WHITE.mix(0.8))
            .border_style(GRID)
            .label_font(label_font)
            .draw()
            .map_err(|e| PlotError::Drawing(e.to_string()))?;
    }

    root.present()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crack_core::models::Point;
    use tempfile::TempDir;

    fn series(label: &str, points: &[(u64, f64)]) -> Series {
        let mut s = Series::new(label);
        s.points = points.iter().map(|&(x, y)| Point { x, y }).collect();
        s.records = points.len() as u64;
        s
    }

    #[test]
    fn test_guess_ranges_cover_all_series() {
        let a = series("a", &[(1, 10.0), (5, 40.0)]);
        let b = series("b", &[(1, 3.0), (9, 20.0)]);
        let (x, y) = guess_ranges(&[a, b]);
        assert_eq!(x, 0.0..9.0);
        assert_eq!(y.start, 0.0);
        assert!((y.end - 42.0).abs() < 1e-9);
    }

    #[test]
    fn test_guess_ranges_empty_input() {
        assert_eq!(guess_ranges(&[]), (0.0..1.0, 0.0..1.0));
        let empty = Series::new("empty");
        assert_eq!(guess_ranges(&[empty]), (0.0..1.0, 0.0..1.0));
    }

    #[test]
    fn test_guess_ranges_zero_counts() {
        let flat = series("flat", &[(1, 0.0), (2, 0.0)]);
        let (x, y) = guess_ranges(&[flat]);
        assert_eq!(x, 0.0..2.0);
        assert_eq!(y, 0.0..1.0);
    }

    #[test]
    fn test_render_rejects_zero_size() {
        let dir = TempDir::new().unwrap();
        let chart = GuessChart {
            series: &[],
            percent: false,
            scale: 6,
            legend: LegendLocation::UpperLeft,
        };
        let image = ImageSpec {
            width_in: 0,
            ..Default::default()
        };
        let err = render_guess_chart(&chart, &image, dir.path()).unwrap_err();
        assert!(matches!(err, PlotError::InvalidData(_)));
        assert!(!dir.path().join(SVG_FILE).exists());
    }

    #[test]
    fn test_render_rejects_overflowing_size() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("charts");
        let chart = GuessChart {
            series: &[],
            percent: false,
            scale: 6,
            legend: LegendLocation::UpperLeft,
        };
        let image = ImageSpec {
            width_in: 100_000,
            height_in: 6,
            dpi: 100_000,
        };
        let err = render_guess_chart(&chart, &image, &out).unwrap_err();
        assert!(matches!(err, PlotError::InvalidData(_)));
        assert!(!out.exists());
    }

    #[test]
    #[ignore = "Font rendering not available in test environment"]
    fn test_render_writes_svg_and_png() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("charts");
        let data = vec![
            series("wordlist", &[(1, 10.0), (2, 25.0), (3, 40.0)]),
            series("incremental", &[(1, 2.0), (3, 7.0)]),
            Series::new("empty"),
        ];
        let chart = GuessChart {
            series: &data,
            percent: false,
            scale: 6,
            legend: LegendLocation::from_code(2),
        };

        let written = render_guess_chart(&chart, &ImageSpec::default(), &out).unwrap();
        assert_eq!(written, vec![out.join(SVG_FILE), out.join(PNG_FILE)]);
        for path in written {
            assert!(std::fs::metadata(path).unwrap().len() > 0);
        }
    }
}
