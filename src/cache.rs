//! Override model cache removal
//!
//! The override model ("fading memory") persists prior user selections in two
//! data files plus journal companions. Deleting them resets the model; the
//! input method recreates them on demand.

use std::fmt;
use std::fs;
use std::path::Path;

use crate::paths::OVERRIDE_MODEL_FILES;

/// Per-file outcome of the cache removal stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheOutcome {
    /// File existed and was deleted.
    Removed,
    /// Dry-run mode: file exists and deletion was withheld.
    WouldRemove,
    /// File does not exist; expected, not an error.
    NotPresent,
    /// Deletion failed; remaining files are still attempted.
    Failed(String),
}

impl fmt::Display for CacheOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Removed => write!(f, "removed"),
            Self::WouldRemove => write!(f, "would be removed"),
            Self::NotPresent => write!(f, "not present"),
            Self::Failed(reason) => write!(f, "failed: {}", reason),
        }
    }
}

/// Delete the fixed set of override model files under `base_dir`.
///
/// Outcomes come back in the fixed filename order. The rescue calls this twice,
/// once for the resolved user-data directory and once for the sandbox
/// Application Support root.
pub fn remove_override_model_files(
    base_dir: &Path,
    dry_run: bool,
) -> Vec<(&'static str, CacheOutcome)> {
    OVERRIDE_MODEL_FILES
        .iter()
        .map(|&name| {
            let path = base_dir.join(name);
            let outcome = if !path.exists() {
                CacheOutcome::NotPresent
            } else if dry_run {
                CacheOutcome::WouldRemove
            } else {
                match fs::remove_file(&path) {
                    Ok(()) => {
                        log::debug!("deleted {:?}", path);
                        CacheOutcome::Removed
                    }
                    Err(e) => {
                        log::warn!("failed to delete {:?}: {}", path, e);
                        CacheOutcome::Failed(e.to_string())
                    }
                }
            };
            (name, outcome)
        })
        .collect()
}
