use std::collections::HashMap;
use std::path::Path;

/// Format an integer count with thousands separators.
///
/// # Examples
///
/// ```
/// use crack_core::formatting::format_count;
///
/// assert_eq!(format_count(0), "0");
/// assert_eq!(format_count(1234567), "1,234,567");
/// ```
pub fn format_count(value: u64) -> String {
    group_thousands(&value.to_string())
}

/// Format a series value: a percentage with two decimals, or a whole count
/// with thousands separators.
///
/// # Examples
///
/// ```
/// use crack_core::formatting::format_value;
///
/// assert_eq!(format_value(12.5, true), "12.50%");
/// assert_eq!(format_value(4175.0, false), "4,175");
/// ```
pub fn format_value(value: f64, percent: bool) -> String {
    if percent {
        format!("{:.2}%", value)
    } else {
        format_count(value.round().max(0.0) as u64)
    }
}

/// Derive a legend/collection label from a file path: the file name without
/// its final extension.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use crack_core::formatting::file_label;
///
/// assert_eq!(file_label(Path::new("/logs/wordlist-run.log")), "wordlist-run");
/// assert_eq!(file_label(Path::new("rockyou")), "rockyou");
/// ```
pub fn file_label(path: &Path) -> String {
    path.file_stem()
        .or_else(|| path.file_name())
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

/// Make labels unique by suffixing repeats with ` (2)`, ` (3)`, ...
///
/// Two inputs with the same file stem in different directories would otherwise
/// collapse into one legend entry / one table key.
pub fn unique_labels(labels: Vec<String>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    labels
        .into_iter()
        .map(|label| {
            let n = seen.entry(label.clone()).or_insert(0);
            *n += 1;
            if *n == 1 {
                label
            } else {
                format!("{} ({})", label, n)
            }
        })
        .collect()
}

/// Y-axis caption for the guess chart.
pub fn y_axis_label(percent: bool) -> &'static str {
    if percent {
        "% of passwords guessed"
    } else {
        "Passwords guessed"
    }
}

/// X-axis caption for the guess chart; each status line stands for
/// `10^scale` guesses.
pub fn x_axis_label(scale: u32) -> String {
    format!("Number of guesses (10^{})", scale)
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Insert commas every three digits from the right of an integer string.
fn group_thousands(s: &str) -> String {
    if s.len() <= 3 {
        return s.to_string();
    }
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    let remainder = chars.len() % 3;
    for (i, &c) in chars.iter().enumerate() {
        if i != 0 && (i % 3 == remainder) {
            result.push(',');
        }
        result.push(c);
    }
    result
}

// ── Tests ──────────────────────────────────────────────────────────────────────
