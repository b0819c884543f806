mod bootstrap;

use std::path::PathBuf;

use anyhow::{Context, Result};
use crack_chart::composition::{render_composition_chart, CompositionChart};
use crack_chart::guesses::{render_guess_chart, GuessChart};
use crack_chart::themes::{ImageSpec, LegendLocation};
use crack_core::settings::{Command, CompositionArgs, LogsArgs, Settings};
use crack_data::analysis::{analyze_composition, analyze_logs};
use crack_data::corpus::MalformedLines;
use crack_data::series::SeriesOptions;
use crack_data::summary::{format_compliance_table, format_policy_table, format_series_table};

fn main() -> Result<()> {
    let settings = Settings::load()?;

    bootstrap::setup_logging(&settings.log_level)?;
    tracing::debug!("crackplot v{} starting", env!("CARGO_PKG_VERSION"));

    let written = run(&settings)?;
    for path in &written {
        tracing::info!("Wrote {}", path.display());
    }

    Ok(())
}

/// Run the selected subcommand and return the paths of the written charts.
fn run(settings: &Settings) -> Result<Vec<PathBuf>> {
    match &settings.command {
        Command::Logs(args) => run_logs(args, settings.verbose),
        Command::Composition(args) => run_composition(args, settings.verbose),
    }
}

fn series_options(args: &LogsArgs) -> SeriesOptions {
    SeriesOptions {
        format: args.format(),
        interval: args.interval,
        total: args.total_count(),
        cutoff: args.cutoff,
    }
}

fn run_logs(args: &LogsArgs, verbose: bool) -> Result<Vec<PathBuf>> {
    let options = series_options(args);
    tracing::debug!(
        "Reading {} input(s) in {} format, interval {}",
        args.files.len(),
        options.format,
        options.interval
    );

    let analysis = analyze_logs(&args.files, &options)?;
    if verbose {
        println!("{}", format_series_table(&analysis.series, analysis.percent));
    }

    let chart = GuessChart {
        series: &analysis.series,
        percent: analysis.percent,
        scale: args.scale,
        legend: LegendLocation::from_code(args.location),
    };
    let written = render_guess_chart(&chart, &ImageSpec::from(&args.image), &args.image.output_dir)
        .with_context(|| format!("rendering chart into {}", args.image.output_dir.display()))?;
    Ok(written)
}

fn run_composition(args: &CompositionArgs, verbose: bool) -> Result<Vec<PathBuf>> {
    let mode = MalformedLines::from_strict_flag(args.strict);
    let analysis = analyze_composition(&args.files, &args.policies, mode)?;
    for path in &analysis.files {
        tracing::debug!("Collection {}", path.display());
    }
    if analysis.malformed > 0 {
        tracing::warn!(
            "Skipped {} malformed line(s) across {} collection(s)",
            analysis.malformed,
            analysis.files.len()
        );
    }
    if verbose {
        println!("{}", format_policy_table(&analysis.policies));
        println!("{}", format_compliance_table(&analysis.table));
    }

    let chart = CompositionChart {
        table: &analysis.table,
        relative: args.relative,
    };
    let written =
        render_composition_chart(&chart, &ImageSpec::from(&args.image), &args.image.output_dir)
            .with_context(|| {
                format!("rendering chart into {}", args.image.output_dir.display())
            })?;
    Ok(vec![written])
}

// ── Tests ──────────────────────────────────────────────────────────────────────
