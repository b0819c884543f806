//! Plain-text tables of intermediate results, printed in verbose mode.
//!
//! Formatting uses the [`tabled`] crate.

use crack_core::formatting::{format_count, format_value};
use crack_core::models::{ComplianceTable, Series};
use crack_core::policy::Policy;
use tabled::{Table, Tabled};

/// One line of the per-series summary.
#[derive(Debug, Clone, Tabled)]
pub struct SeriesSummary {
    #[tabled(rename = "Series")]
    pub label: String,
    #[tabled(rename = "Records")]
    pub records: String,
    #[tabled(rename = "Points")]
    pub points: usize,
    #[tabled(rename = "Restarts")]
    pub restarts: u32,
    #[tabled(rename = "Final")]
    pub final_value: String,
}

impl SeriesSummary {
    pub fn new(series: &Series, percent: bool) -> Self {
        Self {
            label: series.label.clone(),
            records: format_count(series.records),
            points: series.points.len(),
            restarts: series.restarts,
            final_value: series
                .last_value()
                .map(|v| format_value(v, percent))
                .unwrap_or_else(|| "-".to_string()),
        }
    }
}

/// One row of the long-form compliance table.
#[derive(Debug, Clone, Tabled)]
pub struct ComplianceEntry {
    #[tabled(rename = "Collection")]
    pub collection: String,
    #[tabled(rename = "Policy")]
    pub policy: String,
    #[tabled(rename = "Passwords")]
    pub passwords: String,
    #[tabled(rename = "Share")]
    pub share: String,
}

/// Minimums of one inferred policy.
#[derive(Debug, Clone, Tabled)]
pub struct PolicySummary {
    #[tabled(rename = "Policy")]
    pub name: String,
    #[tabled(rename = "Length")]
    pub length: usize,
    #[tabled(rename = "Letters")]
    pub letters: usize,
    #[tabled(rename = "Digits")]
    pub digits: usize,
    #[tabled(rename = "Symbols")]
    pub symbols: usize,
    #[tabled(rename = "Capitals")]
    pub capitals: usize,
}

impl From<&Policy> for PolicySummary {
    fn from(policy: &Policy) -> Self {
        Self {
            name: policy.name.clone(),
            length: policy.min_length,
            letters: policy.min_lowercase_inferred,
            digits: policy.min_digits,
            symbols: policy.min_symbols,
            capitals: policy.min_capital,
        }
    }
}

/// Format the per-series summary as an ASCII table.
pub fn format_series_table(series: &[Series], percent: bool) -> String {
    if series.is_empty() {
        return "No series".to_string();
    }
    let rows: Vec<SeriesSummary> = series
        .iter()
        .map(|s| SeriesSummary::new(s, percent))
        .collect();
    with_title("Guess series", Table::new(rows).to_string())
}

/// Format the compliance table, one row per (collection, policy) pair.
pub fn format_compliance_table(table: &ComplianceTable) -> String {
    if table.is_empty() {
        return "No compliance data".to_string();
    }
    let rows: Vec<ComplianceEntry> = table
        .rows()
        .iter()
        .map(|r| ComplianceEntry {
            collection: r.collection.clone(),
            policy: r.policy.clone(),
            passwords: format_count(r.passwords),
            share: format_value(r.relative(), true),
        })
        .collect();
    with_title("Policy compliance", Table::new(rows).to_string())
}

/// Format the inferred policy minimums, one row per policy.
pub fn format_policy_table(policies: &[Policy]) -> String {
    if policies.is_empty() {
        return "No policies".to_string();
    }
    let rows: Vec<PolicySummary> = policies.iter().map(PolicySummary::from).collect();
    with_title("Inferred policies", Table::new(rows).to_string())
}

fn with_title(title: &str, table: String) -> String {
    format!("{}\n{}\n{}", title, "=".repeat(title.len()), table)
}
