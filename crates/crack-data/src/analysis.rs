//! The two reporting pipelines.
//!
//! Each pipeline expands its inputs, processes the files one after another in
//! argument order and returns a result ready for the chart layer.

use std::path::PathBuf;

use crack_core::error::{CrackError, Result};
use crack_core::formatting::{file_label, unique_labels};
use crack_core::models::{ComplianceTable, Series};
use crack_core::policy::{parse_policies, Policy};
use tracing::{debug, info};

use crate::corpus::{count_file, MalformedLines};
use crate::reader::expand_inputs;
use crate::series::{load_series, SeriesOptions};

// ── Public types ──────────────────────────────────────────────────────────────

/// Output of [`analyze_logs`].
#[derive(Debug, Clone)]
pub struct LogAnalysis {
    /// One series per input file, in input order.
    pub series: Vec<Series>,
    /// The files the series were read from.
    pub files: Vec<PathBuf>,
    /// Whether series values are percentages of a target population.
    pub percent: bool,
}

impl LogAnalysis {
    /// Matching records across all files.
    pub fn total_records(&self) -> u64 {
        self.series.iter().map(|s| s.records).sum()
    }
}

/// Output of [`analyze_composition`].
#[derive(Debug, Clone)]
pub struct CompositionAnalysis {
    /// Policies in the order their examples were given.
    pub policies: Vec<Policy>,
    pub table: ComplianceTable,
    /// The files the collections were read from.
    pub files: Vec<PathBuf>,
    /// Corpus lines skipped for lacking a colon, over all files.
    pub malformed: u64,
}

// ── Public functions ──────────────────────────────────────────────────────────

/// Build one cumulative guess series per log file.
///
/// Fails when an input cannot be read, or when not a single file contains a
/// status line in the selected format.
pub fn analyze_logs(inputs: &[PathBuf], options: &SeriesOptions) -> Result<LogAnalysis> {
    let files = resolve_files(inputs)?;
    let labels = unique_labels(files.iter().map(|p| file_label(p)).collect());

    let mut series = Vec::with_capacity(files.len());
    for (path, label) in files.iter().zip(labels) {
        series.push(load_series(path, &label, *options)?);
    }

    let analysis = LogAnalysis {
        series,
        files,
        percent: options.is_percent(),
    };

    if analysis.total_records() == 0 {
        return Err(CrackError::NoRecords(analysis.files.len()));
    }

    info!(
        "Parsed {} records from {} log file(s)",
        analysis.total_records(),
        analysis.files.len()
    );
    Ok(analysis)
}

/// Count, for every corpus and every policy inferred from `examples`, the
/// passwords compliant with the policy.
///
/// Fails before reading anything when `examples` is empty, and after reading
/// when no corpus held a single password.
pub fn analyze_composition(
    inputs: &[PathBuf],
    examples: &[String],
    mode: MalformedLines,
) -> Result<CompositionAnalysis> {
    if examples.is_empty() {
        return Err(CrackError::NoPolicies);
    }

    let policies = parse_policies(examples);
    for policy in &policies {
        debug!("Policy {}", policy);
    }

    let files = resolve_files(inputs)?;
    let labels = unique_labels(files.iter().map(|p| file_label(p)).collect());

    let mut table = ComplianceTable::new(examples.to_vec());
    let mut passwords = 0u64;
    let mut malformed = 0u64;

    for (path, label) in files.iter().zip(labels) {
        let counts = count_file(path, &policies, mode)?;
        passwords += counts.passwords;
        malformed += counts.malformed;
        table.push_collection(label, &counts.counts, counts.passwords);
    }

    if passwords == 0 {
        return Err(CrackError::NoRecords(files.len()));
    }

    info!(
        "Checked {} passwords from {} collection(s) against {} policies",
        passwords,
        files.len(),
        policies.len()
    );

    Ok(CompositionAnalysis {
        policies,
        table,
        files,
        malformed,
    })
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn resolve_files(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let files = expand_inputs(inputs)?;
    if files.is_empty() {
        return Err(CrackError::Config("no input files found".to_string()));
    }
    Ok(files)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crack_core::models::LogFormat;
    use std::io::Write;
    use std::path::Path;
    use tempfile::TempDir;

    fn write_lines(dir: &Path, name: &str, lines: &[&str]) -> PathBuf {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
        path
    }

    // ── analyze_logs ──────────────────────────────────────────────────────────

    #[test]
    fn test_analyze_logs_one_series_per_file() {
        let dir = TempDir::new().unwrap();
        let a = write_lines(dir.path(), "wordlist.log", &["10g 0:00:00:01", "25g 0:00:00:02"]);
        let b = write_lines(dir.path(), "incremental.log", &["noise", "3g 0:00:00:01"]);

        let analysis = analyze_logs(&[a, b], &SeriesOptions::default()).unwrap();
        assert_eq!(analysis.series.len(), 2);
        assert_eq!(analysis.series[0].label, "wordlist");
        assert_eq!(analysis.series[1].label, "incremental");
        assert_eq!(analysis.total_records(), 3);
        assert!(!analysis.percent);
    }

    #[test]
    fn test_analyze_logs_keeps_empty_series() {
        let dir = TempDir::new().unwrap();
        let a = write_lines(dir.path(), "good.log", &["10g 0:00:00:01"]);
        let b = write_lines(dir.path(), "empty.log", &["nothing to see"]);

        let analysis = analyze_logs(&[a, b], &SeriesOptions::default()).unwrap();
        assert_eq!(analysis.series.len(), 2);
        assert!(analysis.series[1].is_empty());
    }

    #[test]
    fn test_analyze_logs_no_records_anywhere() {
        let dir = TempDir::new().unwrap();
        let a = write_lines(dir.path(), "a.log", &["10g 0:00:00:01"]);

        // Old format selected, new format lines present.
        let options = SeriesOptions {
            format: LogFormat::Old,
            ..Default::default()
        };
        let err = analyze_logs(&[a], &options).unwrap_err();
        assert!(matches!(err, CrackError::NoRecords(1)));
    }

    #[test]
    fn test_analyze_logs_missing_file_aborts() {
        let dir = TempDir::new().unwrap();
        let a = write_lines(dir.path(), "a.log", &["10g"]);
        let missing = dir.path().join("missing.log");

        let err = analyze_logs(&[a, missing], &SeriesOptions::default()).unwrap_err();
        assert!(matches!(err, CrackError::FileRead { .. }));
    }

    #[test]
    fn test_analyze_logs_duplicate_stems_get_unique_labels() {
        let dir = TempDir::new().unwrap();
        let one = dir.path().join("one");
        let two = dir.path().join("two");
        std::fs::create_dir_all(&one).unwrap();
        std::fs::create_dir_all(&two).unwrap();
        let a = write_lines(&one, "run.log", &["1g"]);
        let b = write_lines(&two, "run.log", &["2g"]);

        let analysis = analyze_logs(&[a, b], &SeriesOptions::default()).unwrap();
        assert_eq!(analysis.series[0].label, "run");
        assert_eq!(analysis.series[1].label, "run (2)");
    }

    #[test]
    fn test_analyze_logs_empty_directory() {
        let dir = TempDir::new().unwrap();
        let err = analyze_logs(&[dir.path().to_path_buf()], &SeriesOptions::default())
            .unwrap_err();
        assert!(matches!(err, CrackError::Config(_)));
    }

    // ── analyze_composition ───────────────────────────────────────────────────

    #[test]
    fn test_analyze_composition_long_form_table() {
        let dir = TempDir::new().unwrap();
        let a = write_lines(dir.path(), "leak-a.txt", &["u1:Abcdef1", "u2:abcdef", "u3:ABCDEFG1"]);
        let b = write_lines(dir.path(), "leak-b.txt", &["x:abcdefgh", "y:short"]);
        let examples = vec!["Abcdef1".to_string(), "abcdefgh".to_string()];

        let analysis = analyze_composition(&[a, b], &examples, MalformedLines::Skip).unwrap();
        let table = &analysis.table;

        assert_eq!(table.len(), 2 * 2);
        assert_eq!(table.collections(), ["leak-a", "leak-b"]);
        assert_eq!(table.policies(), examples.as_slice());
        assert_eq!(table.row(0, 0).unwrap().passwords, 2);
        assert_eq!(table.row(0, 1).unwrap().passwords, 0);
        assert_eq!(table.row(1, 0).unwrap().passwords, 0);
        assert_eq!(table.row(1, 1).unwrap().passwords, 1);
        assert_eq!(table.row(1, 1).unwrap().total, 2);
        assert_eq!(analysis.policies.len(), 2);
    }

    #[test]
    fn test_analyze_composition_requires_policies() {
        let dir = TempDir::new().unwrap();
        // The input does not even exist: the policy check comes first.
        let missing = dir.path().join("missing.txt");
        let err = analyze_composition(&[missing], &[], MalformedLines::Skip).unwrap_err();
        assert!(matches!(err, CrackError::NoPolicies));
    }

    #[test]
    fn test_analyze_composition_no_passwords() {
        let dir = TempDir::new().unwrap();
        let a = write_lines(dir.path(), "bad.txt", &["no colon here", ""]);
        let err = analyze_composition(&[a], &["a".to_string()], MalformedLines::Skip)
            .unwrap_err();
        assert!(matches!(err, CrackError::NoRecords(1)));
    }

    #[test]
    fn test_analyze_composition_strict_mode() {
        let dir = TempDir::new().unwrap();
        let a = write_lines(dir.path(), "bad.txt", &["u1:ok", "no colon here"]);
        let err = analyze_composition(&[a], &["a".to_string()], MalformedLines::Fail)
            .unwrap_err();
        assert!(matches!(err, CrackError::MalformedLine { line_number: 2, .. }));
    }

    #[test]
    fn test_analyze_composition_counts_malformed() {
        let dir = TempDir::new().unwrap();
        let a = write_lines(dir.path(), "a.txt", &["u1:ok", "junk"]);
        let b = write_lines(dir.path(), "b.txt", &["junk", "u2:fine"]);
        let analysis =
            analyze_composition(&[a, b], &["ok".to_string()], MalformedLines::Skip).unwrap();
        assert_eq!(analysis.malformed, 2);
        assert_eq!(analysis.table.row(0, 0).unwrap().passwords, 1);
        assert_eq!(analysis.table.row(1, 0).unwrap().passwords, 1);
    }
}
