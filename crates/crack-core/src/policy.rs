//! Password composition policies.
//!
//! A policy is reverse-engineered from a single example password: every
//! character class count in the example becomes a minimum. The heuristic only
//! works well when the example is the minimal acceptable password under the
//! policy (e.g. `Abcdef1` → 7 characters, 1 capital, 1 digit).

use std::fmt;

// ── Character classes ─────────────────────────────────────────────────────────

/// Number of characters (not bytes) in `s`.
pub fn char_count(s: &str) -> usize {
    s.chars().count()
}

pub fn count_digits(s: &str) -> usize {
    s.chars().filter(|c| c.is_ascii_digit()).count()
}

pub fn count_lowercase(s: &str) -> usize {
    s.chars().filter(|c| c.is_ascii_lowercase()).count()
}

pub fn count_uppercase(s: &str) -> usize {
    s.chars().filter(|c| c.is_ascii_uppercase()).count()
}

/// Letters of either case, `A`–`Z` and `a`–`z`.
pub fn count_alpha(s: &str) -> usize {
    s.chars().filter(|c| c.is_ascii_alphabetic()).count()
}

/// Characters outside `[A-Za-z0-9]` that are not whitespace.
pub fn count_symbols(s: &str) -> usize {
    s.chars()
        .filter(|c| !c.is_ascii_alphanumeric() && !c.is_whitespace())
        .count()
}

/// The only character the inference step recognises as a symbol.
pub const INFERRED_SYMBOL: char = '%';

// ── Policy ────────────────────────────────────────────────────────────────────

/// Minimum character-class requirements inferred from one example password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Policy {
    /// The example password the policy was inferred from.
    pub name: String,
    pub min_length: usize,
    /// Lowercase letters in the example. The compliance check compares this
    /// against letters of *either* case, see [`PolicyCheck::alpha_check_any_case`].
    pub min_lowercase_inferred: usize,
    pub min_digits: usize,
    /// Occurrences of [`INFERRED_SYMBOL`] in the example.
    pub min_symbols: usize,
    pub min_capital: usize,
}

impl Policy {
    /// Infer a policy from one example password. Never fails; an empty
    /// example yields a policy every password complies with.
    pub fn infer(example: &str) -> Self {
        Self {
            name: example.to_string(),
            min_length: char_count(example),
            min_lowercase_inferred: count_lowercase(example),
            min_digits: count_digits(example),
            min_symbols: example.chars().filter(|&c| c == INFERRED_SYMBOL).count(),
            min_capital: count_uppercase(example),
        }
    }

    /// Evaluate every criterion of the policy against `password`.
    pub fn check(&self, password: &str) -> PolicyCheck {
        PolicyCheck {
            length: char_count(password) >= self.min_length,
            digits: count_digits(password) >= self.min_digits,
            alpha_check_any_case: count_alpha(password) >= self.min_lowercase_inferred,
            symbols: count_symbols(password) >= self.min_symbols,
            capital: count_uppercase(password) >= self.min_capital,
        }
    }

    pub fn is_compliant(&self, password: &str) -> bool {
        self.check(password).is_compliant()
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (length>={}, alpha>={}, digits>={}, symbols>={}, capital>={})",
            self.name,
            self.min_length,
            self.min_lowercase_inferred,
            self.min_digits,
            self.min_symbols,
            self.min_capital
        )
    }
}

/// Infer one policy per example, preserving input order.
pub fn parse_policies<S: AsRef<str>>(examples: &[S]) -> Vec<Policy> {
    examples.iter().map(|e| Policy::infer(e.as_ref())).collect()
}

// ── PolicyCheck ───────────────────────────────────────────────────────────────

/// Per-criterion outcome of [`Policy::check`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolicyCheck {
    pub length: bool,
    pub digits: bool,
    /// Letters of either case meet the lowercase count of the example.
    pub alpha_check_any_case: bool,
    pub symbols: bool,
    pub capital: bool,
}

impl PolicyCheck {
    /// All five criteria hold.
    pub fn is_compliant(&self) -> bool {
        self.length && self.digits && self.alpha_check_any_case && self.symbols && self.capital
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
