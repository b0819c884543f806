//! Cumulative guess curves from John the Ripper session logs.
//!
//! Every status line JtR prints carries the number of passwords guessed so
//! far. A log may hold several concatenated sessions, in which case the count
//! starts over; the builder detects the drop and keeps the curve cumulative by
//! adding the last count before the restart to every later value.

use std::io::BufRead;
use std::path::Path;

use crack_core::error::{CrackError, Result};
use crack_core::models::{LogFormat, LogRecord, Point, Series};
use regex::Regex;
use tracing::{debug, warn};

use crate::reader::{lossy_lines, open_file};

// ── SeriesOptions ─────────────────────────────────────────────────────────────

/// How log records are turned into chart points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SeriesOptions {
    pub format: LogFormat,
    /// Records to skip between two retained ones.
    pub interval: u64,
    /// Target population; when set, values are percentages of it.
    pub total: Option<u64>,
    /// Last record index to read from each file.
    pub cutoff: Option<u64>,
}

impl SeriesOptions {
    pub fn is_percent(&self) -> bool {
        matches!(self.total, Some(t) if t > 0)
    }
}

// ── SeriesBuilder ─────────────────────────────────────────────────────────────

/// Incremental builder for one file's [`Series`].
pub struct SeriesBuilder {
    pattern: Regex,
    options: SeriesOptions,
    series: Series,
    /// Raw count of the previous record.
    last_y: u64,
    /// Records seen since the last retained one.
    since_retained: u64,
    done: bool,
}

impl SeriesBuilder {
    pub fn new(label: impl Into<String>, options: SeriesOptions) -> Self {
        Self {
            pattern: Regex::new(options.format.pattern()).expect("regex is valid"),
            options,
            series: Series::new(label),
            last_y: 0,
            since_retained: 0,
            done: false,
        }
    }

    /// Extract the guess count from a status line, if it is one.
    pub fn parse_count(&self, line: &str) -> Option<u64> {
        let caps = self.pattern.captures(line)?;
        match caps[1].parse::<u64>() {
            Ok(n) => Some(n),
            Err(e) => {
                debug!("Ignoring status line with unparsable count {:?}: {}", &caps[1], e);
                None
            }
        }
    }

    /// Feed one log line. Returns `false` once the cutoff has been reached;
    /// later lines are ignored.
    pub fn push_line(&mut self, line: &str) -> bool {
        if self.done {
            return false;
        }
        let Some(raw_count) = self.parse_count(line) else {
            return true;
        };
        let record = LogRecord {
            sequence_index: self.series.records + 1,
            raw_count,
        };
        self.push_record(record)
    }

    /// Feed one already extracted record. Records must arrive in sequence
    /// order.
    pub fn push_record(&mut self, record: LogRecord) -> bool {
        if self.done {
            return false;
        }
        let index = record.sequence_index;
        self.series.records = index;

        if record.raw_count < self.last_y {
            self.series.offset = self.series.offset.saturating_add(self.last_y);
            self.series.restarts += 1;
            debug!(
                "{}: counter restart at record {} ({} -> {}), offset now {}",
                self.series.label, index, self.last_y, record.raw_count, self.series.offset
            );
        }

        // Always keep the first record, then every (interval + 1)-th one.
        self.since_retained += 1;
        if index == 1 || self.since_retained > self.options.interval {
            self.since_retained = 0;
            let y = self.value(record.raw_count);
            self.series.points.push(Point { x: index, y });
        }

        self.last_y = record.raw_count;

        if self.options.cutoff == Some(index) {
            self.done = true;
        }
        !self.done
    }

    /// Corrected and optionally rescaled value of a raw count.
    fn value(&self, raw_count: u64) -> f64 {
        let corrected = raw_count.saturating_add(self.series.offset) as f64;
        match self.options.total {
            Some(total) if total > 0 => corrected * 100.0 / total as f64,
            _ => corrected,
        }
    }

    pub fn finish(self) -> Series {
        self.series
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Extract every status-line record from `lines`, numbering them 1, 2, ...
pub fn extract_records<I, S>(lines: I, format: LogFormat) -> impl Iterator<Item = LogRecord>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let builder = SeriesBuilder::new("", SeriesOptions {
        format,
        ..Default::default()
    });
    lines
        .into_iter()
        .filter_map(move |line| builder.parse_count(line.as_ref()))
        .enumerate()
        .map(|(i, raw_count)| LogRecord {
            sequence_index: i as u64 + 1,
            raw_count,
        })
}

/// Build a series from in-memory lines.
pub fn series_from_lines<I, S>(lines: I, label: &str, options: SeriesOptions) -> Series
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut builder = SeriesBuilder::new(label, options);
    for line in lines {
        if !builder.push_line(line.as_ref()) {
            break;
        }
    }
    builder.finish()
}

/// Build a series from a reader, stopping early at the cutoff.
pub fn build_series<R: BufRead>(
    reader: R,
    label: &str,
    options: SeriesOptions,
) -> std::io::Result<Series> {
    let mut builder = SeriesBuilder::new(label, options);
    let mut read_error = None;
    let lines = lossy_lines(reader).map_while(|line| line.map_err(|e| read_error = Some(e)).ok());
    for record in extract_records(lines, options.format) {
        if !builder.push_record(record) {
            break;
        }
    }
    match read_error {
        Some(e) => Err(e),
        None => Ok(builder.finish()),
    }
}

/// Read one log file into a series. A file without status lines yields an
/// empty series and a warning.
pub fn load_series(path: &Path, label: &str, options: SeriesOptions) -> Result<Series> {
    let reader = open_file(path)?;
    let series = build_series(reader, label, options).map_err(|source| CrackError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    if series.records == 0 {
        warn!(
            "No {} format status lines found in {}",
            options.format,
            path.display()
        );
    }

    debug!(
        "File {}: {} records, {} points, {} restarts",
        path.display(),
        series.records,
        series.points.len(),
        series.restarts,
    );

    Ok(series)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
