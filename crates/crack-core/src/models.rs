use std::fmt;

use serde::{Deserialize, Serialize};

// ── LogFormat ─────────────────────────────────────────────────────────────────

/// Status-line layout of a John the Ripper session log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JtR 1.8 and later: `4175g 0:00:00:02 1512g/s 362358p/s ...`
    #[default]
    New,
    /// Before JtR 1.8: `guesses: 16479  time: 0:00:55:04  c/s: 210782M ...`
    Old,
}

impl LogFormat {
    /// Regular expression whose first capture group is the guess count.
    pub fn pattern(self) -> &'static str {
        match self {
            LogFormat::New => r"^(\d+)g",
            LogFormat::Old => r"guesses: (\d+)",
        }
    }

    /// Select the format from the `--old` flag.
    pub fn from_old_flag(old: bool) -> Self {
        if old {
            LogFormat::Old
        } else {
            LogFormat::New
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::New => write!(f, "new"),
            LogFormat::Old => write!(f, "old"),
        }
    }
}

// ── LogRecord ─────────────────────────────────────────────────────────────────

/// One status line extracted from a session log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogRecord {
    /// 1-based position among the matching lines of one file.
    pub sequence_index: u64,
    /// Guess count as printed on the line.
    pub raw_count: u64,
}

// ── Series ────────────────────────────────────────────────────────────────────

/// A single (x, y) sample of a guess curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    /// Record sequence index.
    pub x: u64,
    /// Cumulative cracked count, or percentage of the target population.
    pub y: f64,
}

/// Cumulative guess curve built from one log file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Series {
    /// Legend label, usually the file stem.
    pub label: String,
    /// Retained samples, `x` strictly increasing.
    pub points: Vec<Point>,
    /// Correction accumulated over detected counter restarts.
    pub offset: u64,
    /// Number of matching records consumed (before subsampling).
    pub records: u64,
    /// Number of counter restarts detected.
    pub restarts: u32,
}

impl Series {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The y value of the last retained sample.
    pub fn last_value(&self) -> Option<f64> {
        self.points.last().map(|p| p.y)
    }

    /// Largest sequence index present in the series.
    pub fn max_x(&self) -> Option<u64> {
        self.points.last().map(|p| p.x)
    }

    /// Largest y value present in the series.
    pub fn max_y(&self) -> Option<f64> {
        self.points.iter().map(|p| p.y).reduce(f64::max)
    }
}

// ── ComplianceTable ───────────────────────────────────────────────────────────

/// One observation of the long-form compliance table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplianceRow {
    /// Corpus name, usually the file stem.
    pub collection: String,
    /// Policy name, i.e. the example password it was inferred from.
    pub policy: String,
    /// Number of passwords in `collection` compliant with `policy`.
    pub passwords: u64,
    /// Number of valid passwords in `collection`.
    pub total: u64,
}

impl ComplianceRow {
    /// Compliant share of the collection in percent; `0.0` for an empty one.
    pub fn relative(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.passwords as f64 * 100.0 / self.total as f64
        }
    }

    /// Bar height: absolute count, or percentage when `relative` is set.
    pub fn value(&self, relative: bool) -> f64 {
        if relative {
            self.relative()
        } else {
            self.passwords as f64
        }
    }
}

/// Collection × policy compliance counts in long form.
///
/// Rows are stored collection-major, policy-minor; every collection contributes
/// exactly one row per policy.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ComplianceTable {
    policies: Vec<String>,
    collections: Vec<String>,
    rows: Vec<ComplianceRow>,
}

impl ComplianceTable {
    /// Create an empty table over the given policy names.
    pub fn new(policies: Vec<String>) -> Self {
        Self {
            policies,
            collections: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// Append one collection's counts, one per policy in table order.
    ///
    /// # Panics
    ///
    /// Panics if `counts` does not have one entry per policy.
    pub fn push_collection(&mut self, collection: impl Into<String>, counts: &[u64], total: u64) {
        assert_eq!(
            counts.len(),
            self.policies.len(),
            "one count per policy is required"
        );
        let collection = collection.into();
        for (policy, &passwords) in self.policies.iter().zip(counts) {
            self.rows.push(ComplianceRow {
                collection: collection.clone(),
                policy: policy.clone(),
                passwords,
                total,
            });
        }
        self.collections.push(collection);
    }

    pub fn policies(&self) -> &[String] {
        &self.policies
    }

    pub fn collections(&self) -> &[String] {
        &self.collections
    }

    pub fn rows(&self) -> &[ComplianceRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The row for the `collection`-th collection and `policy`-th policy, in
    /// insertion order. Repeated policy names keep separate rows.
    pub fn row(&self, collection: usize, policy: usize) -> Option<&ComplianceRow> {
        if policy >= self.policies.len() {
            return None;
        }
        self.rows.get(collection * self.policies.len() + policy)
    }

    /// Largest bar height over all rows.
    pub fn max_value(&self, relative: bool) -> f64 {
        self.rows
            .iter()
            .map(|r| r.value(relative))
            .fold(0.0, f64::max)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
