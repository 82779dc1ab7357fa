//! User lexicon filtering
//!
//! A lexicon line maps a reading chain to a candidate value with an optional
//! weight, e.g. `ㄓㄨㄥ-ㄍㄨㄥˇ 中共 50`. The rescue removes every
//! "single-kanji" record: a one-character value keyed by a single unhyphenated
//! reading. Comment lines, blank lines, and malformed lines are preserved
//! verbatim.

use std::fmt;
use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::Context;
use unicode_segmentation::UnicodeSegmentation;

use crate::paths::USER_DATA_FILES;

/// Result of filtering one lexicon's text content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilteredLexicon {
    /// Retained lines rejoined with `\n`.
    pub content: String,
    /// Number of single-kanji records dropped.
    pub removed: usize,
}

/// Per-file outcome of the cleanup stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexiconOutcome {
    /// File rewritten with this many records dropped.
    Cleaned { removed: usize },
    /// Dry-run mode: this many records counted, rewrite withheld.
    WouldClean { removed: usize },
    /// File does not exist; nothing to do, nothing created.
    NotPresent,
    /// Read or write failed; later files and stages still run.
    Failed(String),
}

impl fmt::Display for LexiconOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cleaned { removed } => write!(f, "removed {} single-kanji records", removed),
            Self::WouldClean { removed } => {
                write!(f, "would remove {} single-kanji records", removed)
            }
            Self::NotPresent => write!(f, "not present"),
            Self::Failed(reason) => write!(f, "failed: {}", reason),
        }
    }
}

/// Check whether a trimmed, non-comment line is a single-kanji record.
///
/// Tokenized on spaces (empties omitted, at most 3 components with the tail
/// left unsplit), a record qualifies iff the value is exactly one character
/// and the reading chain is a single hyphen-free segment that is non-empty
/// and does not start with `_`. Underscore readings key punctuation entries
/// and must survive. "One character" means one extended grapheme cluster, so
/// a kanji plus variation selector still counts as a single character. The
/// emptiness check cannot fire after an omit-empties split; it is kept to
/// mirror the upstream predicate exactly.
#[inline]
pub fn is_single_kanji_record(trimmed: &str) -> bool {
    let mut tokens = trimmed.split(' ').filter(|t| !t.is_empty());

    let reading_chain = match tokens.next() {
        Some(t) => t,
        None => return false,
    };
    let value = match tokens.next() {
        Some(t) => t,
        None => return false,
    };

    if value.graphemes(true).count() != 1 {
        return false;
    }

    let segments: Vec<&str> = reading_chain.split('-').filter(|s| !s.is_empty()).collect();
    segments.len() == 1
        && segments
            .iter()
            .all(|s| !s.is_empty() && !s.starts_with('_'))
}

/// Filter the full text of one lexicon file.
///
/// Lines split on universal newline boundaries (`\r\n` counts once); the
/// rejoined output always uses `\n`, so line endings normalize as a side
/// effect. A trailing newline survives as a trailing empty line.
pub fn filter_content(content: &str) -> FilteredLexicon {
    let mut kept: Vec<&str> = Vec::new();
    let mut removed = 0usize;

    for line in split_lines(content) {
        let trimmed = line.trim();

        // Comments and blank lines are never records.
        if trimmed.is_empty() || trimmed.starts_with('#') {
            kept.push(line);
            continue;
        }

        if is_single_kanji_record(trimmed) {
            removed += 1;
            continue;
        }

        kept.push(line);
    }

    FilteredLexicon {
        content: kept.join("\n"),
        removed,
    }
}

/// Split on `\r\n`, `\n`, or `\r`, keeping empty lines (including a trailing
/// one). `str::lines` drops the trailing boundary, which would eat the final
/// newline on rewrite.
fn split_lines(content: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let bytes = content.as_bytes();
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                lines.push(&content[start..i]);
                i += 1;
                start = i;
            }
            b'\r' => {
                lines.push(&content[start..i]);
                i += 1;
                if i < bytes.len() && bytes[i] == b'\n' {
                    i += 1;
                }
                start = i;
            }
            _ => i += 1,
        }
    }
    lines.push(&content[start..]);
    lines
}

/// Clean both fixed lexicon files under `dir`.
///
/// Outcomes come back in the fixed filename order; any failure is recorded and
/// the next file is still attempted.
pub fn clean_user_data_files(dir: &Path, dry_run: bool) -> Vec<(&'static str, LexiconOutcome)> {
    USER_DATA_FILES
        .iter()
        .map(|&name| {
            let path = dir.join(name);
            let outcome = if path.is_file() {
                match clean_one_file(&path, dry_run) {
                    Ok(removed) if dry_run => LexiconOutcome::WouldClean { removed },
                    Ok(removed) => LexiconOutcome::Cleaned { removed },
                    Err(e) => {
                        log::warn!("cleanup of {:?} failed: {:#}", path, e);
                        LexiconOutcome::Failed(format!("{:#}", e))
                    }
                }
            } else {
                LexiconOutcome::NotPresent
            };
            (name, outcome)
        })
        .collect()
}

fn clean_one_file(path: &Path, dry_run: bool) -> anyhow::Result<usize> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading {:?}", path))?;

    let filtered = filter_content(&content);
    log::debug!(
        "{:?}: {} records removed, {} bytes retained",
        path,
        filtered.removed,
        filtered.content.len()
    );

    if !dry_run {
        write_atomically(path, &filtered.content)
            .with_context(|| format!("rewriting {:?}", path))?;
    }

    Ok(filtered.removed)
}

/// Durable replace: write a temp file next to the target, then rename over it.
fn write_atomically(path: &Path, content: &str) -> anyhow::Result<()> {
    let dir = path.parent().context("target file has no parent directory")?;
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(content.as_bytes())?;
    tmp.flush()?;
    tmp.persist(path)?;
    Ok(())
}
