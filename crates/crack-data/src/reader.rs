//! Input discovery and line reading.
//!
//! Inputs are plain paths; each file is opened, consumed and closed by the
//! caller in turn. Lines are decoded lossily so that password corpora with
//! stray non-UTF-8 bytes stay readable.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crack_core::error::{CrackError, Result};
use tracing::{debug, warn};

// ── Public API ────────────────────────────────────────────────────────────────

/// Expand the given paths into a list of files.
///
/// Files are kept in argument order. A directory is replaced by every regular
/// file beneath it, sorted by path. A path that does not exist is an error:
/// silently dropping an input would change what the chart means.
pub fn expand_inputs(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::with_capacity(paths.len());

    for path in paths {
        let metadata = std::fs::metadata(path).map_err(|source| CrackError::FileRead {
            path: path.clone(),
            source,
        })?;

        if metadata.is_dir() {
            let found = find_files(path);
            if found.is_empty() {
                warn!("No files found in directory {}", path.display());
            }
            files.extend(found);
        } else {
            files.push(path.clone());
        }
    }

    debug!("Expanded {} input path(s) to {} file(s)", paths.len(), files.len());
    Ok(files)
}

/// Find all regular files recursively under `dir`, sorted by path.
pub fn find_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("Skipping unreadable entry under {}: {}", dir.display(), e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .collect();

    files.sort();
    files
}

/// Open `path` for buffered reading.
pub fn open_file(path: &Path) -> Result<BufReader<File>> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|source| CrackError::FileRead {
            path: path.to_path_buf(),
            source,
        })
}

/// Iterate over the lines of `reader`, without line terminators, replacing
/// invalid UTF-8 with U+FFFD.
pub fn lossy_lines<R: BufRead>(reader: R) -> LossyLines<R> {
    LossyLines {
        reader,
        buf: Vec::new(),
    }
}

// ── LossyLines ────────────────────────────────────────────────────────────────

/// Iterator returned by [`lossy_lines`].
pub struct LossyLines<R> {
    reader: R,
    buf: Vec<u8>,
}

impl<R: BufRead> Iterator for LossyLines<R> {
    type Item = std::io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.buf.clear();
        match self.reader.read_until(b'\n', &mut self.buf) {
            Ok(0) => None,
            Ok(_) => {
                if self.buf.last() == Some(&b'\n') {
                    self.buf.pop();
                    if self.buf.last() == Some(&b'\r') {
                        self.buf.pop();
                    }
                }
                Some(Ok(String::from_utf8_lossy(&self.buf).into_owned()))
            }
            Err(e) => Some(Err(e)),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
