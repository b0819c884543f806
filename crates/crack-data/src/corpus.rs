//! Compliance counting over password corpora.
//!
//! A corpus line has the form `<identifier>:<password>`; the password is the
//! second colon-separated field, so a password containing `:` is truncated at
//! its first colon.

use std::io::BufRead;
use std::path::Path;

use crack_core::error::{CrackError, Result};
use crack_core::policy::Policy;
use tracing::{debug, warn};

use crate::reader::{lossy_lines, open_file};

// ── Types ─────────────────────────────────────────────────────────────────────

/// What to do with a non-blank line that has no colon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MalformedLines {
    /// Skip the line and report it.
    #[default]
    Skip,
    /// Stop with [`CrackError::MalformedLine`].
    Fail,
}

impl MalformedLines {
    pub fn from_strict_flag(strict: bool) -> Self {
        if strict {
            MalformedLines::Fail
        } else {
            MalformedLines::Skip
        }
    }
}

/// Result of scanning one corpus.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CorpusCounts {
    /// Compliant passwords, one slot per policy.
    pub counts: Vec<u64>,
    /// Lines a password was extracted from.
    pub passwords: u64,
    /// Lines skipped for lacking a colon.
    pub malformed: u64,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// The password field of a corpus line, after trailing whitespace is removed.
pub fn extract_password(line: &str) -> Option<&str> {
    line.trim_end().split(':').nth(1)
}

/// Count the passwords of `reader` compliant with each of `policies`.
///
/// `source` only names the corpus in diagnostics.
pub fn count_per_policy<R: BufRead>(
    reader: R,
    policies: &[Policy],
    mode: MalformedLines,
    source: &Path,
) -> Result<CorpusCounts> {
    let mut result = CorpusCounts {
        counts: vec![0; policies.len()],
        ..Default::default()
    };

    for (idx, line) in lossy_lines(reader).enumerate() {
        let line = line.map_err(|e| CrackError::FileRead {
            path: source.to_path_buf(),
            source: e,
        })?;
        let trimmed = line.trim_end();
        if trimmed.is_empty() {
            continue;
        }

        let Some(password) = extract_password(trimmed) else {
            match mode {
                MalformedLines::Fail => {
                    return Err(CrackError::MalformedLine {
                        path: source.to_path_buf(),
                        line_number: idx + 1,
                        line: trimmed.to_string(),
                    })
                }
                MalformedLines::Skip => {
                    if result.malformed == 0 {
                        warn!(
                            "Skipping malformed line {} in {} (expected <identifier>:<password>)",
                            idx + 1,
                            source.display()
                        );
                    }
                    result.malformed += 1;
                    continue;
                }
            }
        };

        result.passwords += 1;
        for (count, policy) in result.counts.iter_mut().zip(policies) {
            if policy.is_compliant(password) {
                *count += 1;
            }
        }
    }

    if result.malformed > 1 {
        warn!(
            "Skipped {} malformed lines in {}",
            result.malformed,
            source.display()
        );
    }

    Ok(result)
}

/// Open and scan one corpus file.
pub fn count_file(path: &Path, policies: &[Policy], mode: MalformedLines) -> Result<CorpusCounts> {
    let reader = open_file(path)?;
    let result = count_per_policy(reader, policies, mode, path)?;

    if result.passwords == 0 {
        warn!("No passwords found in {}", path.display());
    }

    debug!(
        "File {}: {} passwords, {} malformed, counts {:?}",
        path.display(),
        result.passwords,
        result.malformed,
        result.counts
    );

    Ok(result)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
