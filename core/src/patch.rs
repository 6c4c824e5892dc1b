//! # Text Patcher
//!
//! Literal, line-oriented edits of the copied YAML files. There is no YAML
//! parsing here: a line is identified by a marker substring and replaced
//! wholesale, and a placeholder literal is replaced throughout the text.
//!
//! A file is read once, every edit is applied in memory, and the result
//! replaces the original through a rename, so a crash never leaves a file
//! half patched.

use std::fs;
use std::io::Write;
use std::path::Path;

use proxyup_common::error::PatchError;
use tempfile::NamedTempFile;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchMode {
    /// Only the first line containing the marker.
    First,
    /// Every line containing the marker.
    All,
}

/// A single edit applied by [`apply`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Edit {
    /// Replace lines containing `marker` with `replacement`.
    Line {
        marker: String,
        replacement: String,
        mode: MatchMode,
    },
    /// Replace every occurrence of `from` with `to`.
    Literal { from: String, to: String },
}

impl Edit {
    pub fn line(marker: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self::Line {
            marker: marker.into(),
            replacement: replacement.into(),
            mode: MatchMode::First,
        }
    }

    pub fn literal(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self::Literal {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// How many replacements each edit made, in edit order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PatchReport {
    pub hits: Vec<usize>,
}

impl PatchReport {
    /// Indices of edits that matched nothing.
    pub fn misses(&self) -> impl Iterator<Item = usize> + '_ {
        self.hits
            .iter()
            .enumerate()
            .filter(|(_, hits)| **hits == 0)
            .map(|(idx, _)| idx)
    }
}

/// Replaces matching lines and returns how many were replaced.
///
/// Lines that do not contain `marker` are left untouched. An absent marker
/// is not an error.
pub fn replace_lines(
    lines: &mut [String],
    marker: &str,
    replacement: &str,
    mode: MatchMode,
) -> usize {
    let mut replaced: usize = 0;
    for line in lines.iter_mut() {
        if !line.contains(marker) {
            continue;
        }
        *line = replacement.to_string();
        replaced += 1;
        if mode == MatchMode::First {
            break;
        }
    }
    replaced
}

/// Replaces every occurrence of `from` and reports the count.
///
/// An empty `from` matches nothing.
pub fn replace_literal(text: &str, from: &str, to: &str) -> (String, usize) {
    if from.is_empty() {
        return (text.to_string(), 0);
    }
    let count: usize = text.matches(from).count();
    (text.replace(from, to), count)
}

/// Applies `edits` in order to `text`.
///
/// Lines are rejoined with `\n`; a trailing newline survives only if the
/// input had one.
pub fn apply(text: &str, edits: &[Edit]) -> (String, PatchReport) {
    let mut current: String = text.to_string();
    let mut report: PatchReport = PatchReport::default();

    for edit in edits {
        let hits: usize = match edit {
            Edit::Line {
                marker,
                replacement,
                mode,
            } => {
                let trailing_newline: bool = current.ends_with('\n');
                let mut lines: Vec<String> = current.lines().map(str::to_string).collect();
                let hits: usize = replace_lines(&mut lines, marker, replacement, *mode);

                current = lines.join("\n");
                if trailing_newline {
                    current.push('\n');
                }
                hits
            }
            Edit::Literal { from, to } => {
                let (replaced, hits) = replace_literal(&current, from, to);
                current = replaced;
                hits
            }
        };
        report.hits.push(hits);
    }

    (current, report)
}

/// Reads `path`, applies `edits` and atomically replaces the file.
///
/// The original permissions are carried over to the new file.
pub fn patch_file(path: &Path, edits: &[Edit]) -> Result<PatchReport, PatchError> {
    let read_err = |source| PatchError::Read {
        path: path.to_path_buf(),
        source,
    };
    let write_err = |source| PatchError::Write {
        path: path.to_path_buf(),
        source,
    };

    let original: String = fs::read_to_string(path).map_err(read_err)?;
    let permissions: fs::Permissions = fs::metadata(path).map_err(read_err)?.permissions();
    let (patched, report) = apply(&original, edits);

    let dir: &Path = path.parent().unwrap_or_else(|| Path::new("."));
    let mut staged: NamedTempFile = NamedTempFile::new_in(dir).map_err(write_err)?;
    staged.write_all(patched.as_bytes()).map_err(write_err)?;
    staged.as_file().sync_all().map_err(write_err)?;
    staged
        .as_file()
        .set_permissions(permissions)
        .map_err(write_err)?;
    staged.persist(path).map_err(|e| write_err(e.error))?;

    Ok(report)
}
