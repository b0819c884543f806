//! Grouped bar chart of policy compliance.
//!
//! Policies run along the x axis; each collection gets one bar per policy.

use std::path::{Path, PathBuf};

use crack_core::formatting::format_count;
use crack_core::models::ComplianceTable;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use tracing::debug;

use crate::error::{PlotError, Result};
use crate::themes::{series_color, ImageSpec, PointSize, GRID, RASTER_DPI};

pub const COMPOSITION_FILE: &str = "composition.png";

/// Share of a policy slot covered by its group of bars.
const GROUP_WIDTH: f64 = 0.8;

#[derive(Debug, Clone, Copy)]
pub struct CompositionChart<'a> {
    pub table: &'a ComplianceTable,
    /// Bars show the compliant share of each collection instead of counts.
    pub relative: bool,
}

/// Y-axis caption for the composition chart.
pub fn value_label(relative: bool) -> &'static str {
    if relative {
        "% of passwords"
    } else {
        "matches"
    }
}

/// Horizontal extent of the bar for `collection` within the group of `policy`.
///
/// Policy `i` is centred on `x = i`.
pub fn bar_span(policy: usize, collection: usize, collections: usize) -> (f64, f64) {
    let width = GROUP_WIDTH / collections.max(1) as f64;
    let left = policy as f64 - GROUP_WIDTH / 2.0 + collection as f64 * width;
    (left, left + width)
}

/// Render `composition.png` into `output_dir`, creating the directory if
/// needed.
pub fn render_composition_chart(
    chart: &CompositionChart<'_>,
    image: &ImageSpec,
    output_dir: &Path,
) -> Result<PathBuf> {
    if chart.table.policies().is_empty() {
        return Err(PlotError::InvalidData("no policies to chart".to_string()));
    }
    if image.width_in == 0 || image.height_in == 0 {
        return Err(PlotError::InvalidData(format!(
            "image size {}x{}",
            image.width_in, image.height_in
        )));
    }
    let size = image.pixels(RASTER_DPI)?;
    std::fs::create_dir_all(output_dir)?;

    let path = output_dir.join(COMPOSITION_FILE);
    {
        let root = BitMapBackend::new(&path, size).into_drawing_area();
        draw_composition_chart(&root, chart, PointSize::new(RASTER_DPI))?;
    }
    debug!("Wrote {}", path.display());
    Ok(path)
}

fn draw_composition_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    chart: &CompositionChart<'_>,
    size: PointSize,
) -> Result<()> {
    root.fill(&WHITE)
        .map_err(|e| PlotError::DrawingArea(e.to_string()))?;

    let table = chart.table;
    let relative = chart.relative;
    let policies = table.policies();
    let collections = table.collections();

    let max = table.max_value(relative);
    let y_end = if max > 0.0 { max * 1.1 } else { 1.0 };
    let x_range = -0.5..(policies.len() as f64 - 0.5);

    let label_font = ("sans-serif", size.font(10.0));
    let tick_font = ("sans-serif", size.font(9.0));

    let mut ctx = ChartBuilder::on(root)
        .margin(size.px(8.0))
        .x_label_area_size(size.px(36.0))
        .y_label_area_size(size.px(48.0))
        .build_cartesian_2d(x_range, 0.0..y_end)
        .map_err(|e| PlotError::ChartConfig(e.to_string()))?;

    ctx.configure_mesh()
        .disable_x_mesh()
        .bold_line_style(GRID.stroke_width(1))
        .light_line_style(WHITE.stroke_width(0))
        .x_desc("policy")
        .y_desc(value_label(relative))
        .axis_desc_style(label_font)
        .label_style(tick_font)
        .x_label_formatter(&|_| String::new())
        .y_label_formatter(&|y| {
            if relative {
                format!("{:.0}", y)
            } else {
                format_count(y.round() as u64)
            }
        })
        .draw()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    let legend_box = size.px(5.0) as i32;
    for (j, collection) in collections.iter().enumerate() {
        let color = series_color(j, collections.len());
        let bars: Vec<Rectangle<(f64, f64)>> = policies
            .iter()
            .enumerate()
            .filter_map(|(i, _)| {
                let row = table.row(j, i)?;
                let (left, right) = bar_span(i, j, collections.len());
                Some(Rectangle::new(
                    [(left, 0.0), (right, row.value(relative))],
                    color.filled(),
                ))
            })
            .collect();

        ctx.draw_series(bars)
            .map_err(|e| PlotError::Drawing(e.to_string()))?
            .label(collection.as_str())
            .legend(move |(x, y)| {
                Rectangle::new(
                    [(x, y - legend_box), (x + 2 * legend_box, y + legend_box)],
                    color.filled(),
                )
            });
    }

    ctx.configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(GRID)
        .label_font(label_font)
        .draw()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    // Policy names go under their groups; the mesh only knows numeric ticks.
    let name_style = tick_font
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Top));
    let gap = size.px(4.0) as i32;
    for (i, policy) in policies.iter().enumerate() {
        let (x, y) = ctx.backend_coord(&(i as f64, 0.0));
        root.draw(&Text::new(policy.as_str(), (x, y + gap), name_style.clone()))
            .map_err(|e| PlotError::Drawing(e.to_string()))?;
    }

    root.present()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn table() -> ComplianceTable {
        let mut table = ComplianceTable::new(vec!["Abcdef1".to_string(), "abcdefgh".to_string()]);
        table.push_collection("leak-a", &[2, 0], 3);
        table.push_collection("leak-b", &[0, 1], 2);
        table
    }

    #[test]
    fn test_value_label() {
        assert_eq!(value_label(false), "matches");
        assert_eq!(value_label(true), "% of passwords");
    }

    #[test]
    fn test_bar_span_splits_group() {
        let (l0, r0) = bar_span(0, 0, 2);
        let (l1, r1) = bar_span(0, 1, 2);
        assert!((l0 + 0.4).abs() < 1e-9);
        assert!((r0 - l1).abs() < 1e-9);
        assert!((r1 - 0.4).abs() < 1e-9);

        // Second policy is shifted by one slot.
        let (l, r) = bar_span(1, 0, 2);
        assert!((l - 0.6).abs() < 1e-9);
        assert!((r - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_bar_span_single_collection() {
        let (l, r) = bar_span(2, 0, 1);
        assert!((l - 1.6).abs() < 1e-9);
        assert!((r - 2.4).abs() < 1e-9);
        // Zero collections behaves like one.
        assert_eq!(bar_span(2, 0, 0), (l, r));
    }

    #[test]
    fn test_render_requires_policies() {
        let dir = TempDir::new().unwrap();
        let empty = ComplianceTable::new(vec![]);
        let chart = CompositionChart {
            table: &empty,
            relative: false,
        };
        let err = render_composition_chart(&chart, &ImageSpec::default(), dir.path()).unwrap_err();
        assert!(matches!(err, PlotError::InvalidData(_)));
        assert!(!dir.path().join(COMPOSITION_FILE).exists());
    }

    #[test]
    #[ignore = "Font rendering not available in test environment"]
    fn test_render_writes_png() {
        let dir = TempDir::new().unwrap();
        let table = table();
        for relative in [false, true] {
            let chart = CompositionChart {
                table: &table,
                relative,
            };
            let path = render_composition_chart(&chart, &ImageSpec::default(), dir.path()).unwrap();
            assert_eq!(path, dir.path().join(COMPOSITION_FILE));
            assert!(std::fs::metadata(&path).unwrap().len() > 0);
        }
    }
}
