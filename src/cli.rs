//! Command-line interface definition for vchewing-rescue
//!
//! The tool takes no positional arguments; flags only adjust where it looks
//! and whether it actually mutates anything.

use clap::Parser;
use std::path::PathBuf;

/// Rescue tool for vChewing user lexicons
///
/// Deletes the override model ("fading memory") cache files, strips all
/// single-kanji records from the user lexicons, clears the boosting
/// preference, and terminates the running input method.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "vchewing-rescue",
    version,
    about = "Rescue tool for vChewing user lexicons",
    long_about = r#"
Rescue tool for the vChewing input method. In one pass it:

    1. Deletes the override model data files
       (the "fading memory" module's caches and journals)
    2. Removes all single-kanji records from the user lexicons
       (userdata-cht.txt and userdata-chs.txt)
    3. Clears the "allow boosting single kanji" preference
    4. Terminates the running vChewing process

The operation is IRREVERSIBLE. vChewing relaunches automatically on the
next input-source switch.

EXAMPLES:
    # Interactive run against the configured data directory
    vchewing-rescue

    # Show what would be removed without touching anything
    vchewing-rescue --dry-run

    # Non-interactive, explicit directory, leave the process running
    vchewing-rescue -y --data-dir ~/Documents/vChewing --skip-kill
"#,
    after_help = "For more information, visit: https://github.com/vChewing/vchewing-rescue"
)]
pub struct Args {
    /// User data directory (overrides the UserDataFolderSpecified preference)
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Skip the confirmation prompt
    #[arg(short = 'y', long, default_value_t = false)]
    pub yes: bool,

    /// Report what would be done without deleting, rewriting, or killing
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,

    /// Do not terminate the running vChewing process
    #[arg(long, default_value_t = false)]
    pub skip_kill: bool,

    /// Quiet mode - report lines only
    #[arg(short, long, default_value_t = false)]
    pub quiet: bool,

    /// Verbose mode - detailed logging
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}
