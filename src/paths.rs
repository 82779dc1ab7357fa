//! Fixed paths, filenames, and preference keys for the target vChewing install
//!
//! Everything the rescue touches on disk is named here so the stages can be
//! pointed at temporary directories in tests.

use std::path::{Path, PathBuf};

use crate::prefs::PrefStore;

/// Preference domain of the vChewing input method.
pub const PREF_DOMAIN: &str = "org.atelierInmu.vChewing";

/// String preference holding a user-chosen data directory, if any.
pub const KEY_USER_DATA_FOLDER: &str = "UserDataFolderSpecified";

/// Boolean preference cleared by the rescue.
pub const KEY_ALLOW_BOOSTING: &str = "AllowBoostingSingleKanjiAsUserPhrase";

/// Override model data files and their journals, deleted outright.
pub const OVERRIDE_MODEL_FILES: [&str; 4] = [
    "vChewing_override-model-data-cht.dat",
    "vChewing_override-model-data-chs.dat",
    "vChewing_override-model-data-cht.dat.journal",
    "vChewing_override-model-data-chs.dat.journal",
];

/// User lexicon files, rewritten in place with single-kanji records stripped.
pub const USER_DATA_FILES: [&str; 2] = ["userdata-cht.txt", "userdata-chs.txt"];

/// Application Support root inside the vChewing sandbox container,
/// relative to the user's home directory.
const CONTAINER_APP_SUPPORT: &str =
    "Library/Containers/org.atelierInmu.inputmethod.vChewing/Data/Library/Application Support";

/// Sandbox Application Support root (override model caches live here too).
pub fn sandbox_app_support_dir(home: &Path) -> PathBuf {
    home.join(CONTAINER_APP_SUPPORT)
}

/// Default user-data directory when no override preference is set.
pub fn default_user_data_dir(home: &Path) -> PathBuf {
    sandbox_app_support_dir(home).join("vChewing")
}

/// Resolve the effective user-data directory.
///
/// A non-empty `UserDataFolderSpecified` preference wins; otherwise the
/// sandboxed default under the user's home directory is used. A store that
/// cannot be read degrades to the default path.
pub fn resolve_user_data_dir(prefs: &dyn PrefStore, home: &Path) -> PathBuf {
    match prefs.string(KEY_USER_DATA_FOLDER) {
        Ok(Some(path)) if !path.is_empty() => PathBuf::from(path),
        Ok(_) => default_user_data_dir(home),
        Err(e) => {
            log::debug!("preference store unreadable ({}), using default path", e);
            default_user_data_dir(home)
        }
    }
}

/// Current user's home directory, falling back to `/` when undeterminable.
pub fn home_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("/"))
}
