//! # vchewing-rescue
//!
//! One-shot rescue tool for the vChewing input method's on-disk state.
//!
//! ## What it does
//!
//! - **Override model reset**: deletes the "fading memory" cache files and
//!   their journals
//! - **Lexicon cleanup**: strips every single-kanji record from
//!   `userdata-cht.txt` and `userdata-chs.txt`, rewriting the files atomically
//! - **Preference reset**: clears `AllowBoostingSingleKanjiAsUserPhrase`
//! - **Process restart**: force-terminates the running input method so it
//!   relaunches with clean state
//!
//! Both the user-configured data directory and the sandbox container are
//! probed; no stage failure aborts the run.
//!
//! ## Example
//!
//! ```rust,no_run
//! use vchewing_rescue::prefs::DefaultsStore;
//! use vchewing_rescue::rescue::{RescueConfig, Rescuer};
//!
//! let config = RescueConfig::new(Box::new(DefaultsStore::new()));
//! let report = Rescuer::new(config).run();
//! for line in report.lines() {
//!     println!("{}", line);
//! }
//! ```

pub mod cache;
pub mod cli;
pub mod console;
pub mod lexicon;
pub mod paths;
pub mod prefs;
pub mod process;
pub mod rescue;

pub use cli::Args;
pub use rescue::{RescueConfig, RescueReport, Rescuer};
