//! Rescue orchestration
//!
//! Runs the stages in fixed order: resolve the data directory, delete override
//! model caches (both candidate directories), strip single-kanji records from
//! the user lexicons (both candidate directories), clear the boosting
//! preference, and terminate the running input method. No stage aborts the
//! run; every outcome becomes a line in the final report.

use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;

use crate::cache::remove_override_model_files;
use crate::lexicon::clean_user_data_files;
use crate::paths::{self, KEY_ALLOW_BOOSTING};
use crate::prefs::PrefStore;
use crate::process::{terminate_input_method, KillOutcome};

/// Rescue configuration.
pub struct RescueConfig {
    /// Preference store of the target application.
    pub prefs: Box<dyn PrefStore>,
    /// Explicit data directory; wins over the stored preference.
    pub data_dir: Option<PathBuf>,
    /// Home directory the sandbox paths hang off; overridable for tests.
    pub home: PathBuf,
    /// Report what would happen without deleting, rewriting, or killing.
    pub dry_run: bool,
    /// Leave the input method process running.
    pub skip_kill: bool,
}

impl RescueConfig {
    pub fn new(prefs: Box<dyn PrefStore>) -> Self {
        Self {
            prefs,
            data_dir: None,
            home: paths::home_dir(),
            dry_run: false,
            skip_kill: false,
        }
    }
}

/// Accumulated human-readable log of a completed run.
#[derive(Debug, Default)]
pub struct RescueReport {
    lines: Vec<String>,
}

impl RescueReport {
    fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    fn blank(&mut self) {
        self.lines.push(String::new());
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

/// One-shot rescue runner.
pub struct Rescuer {
    config: RescueConfig,
}

impl Rescuer {
    pub fn new(config: RescueConfig) -> Self {
        Self { config }
    }

    /// Run the whole rescue on the calling thread.
    pub fn run(&self) -> RescueReport {
        let mut report = RescueReport::default();
        let dry_run = self.config.dry_run;

        // Stage 1: resolve the effective user-data directory.
        report.push("Reading vChewing settings...");
        let data_dir = match &self.config.data_dir {
            Some(dir) => dir.clone(),
            None => paths::resolve_user_data_dir(&*self.config.prefs, &self.config.home),
        };
        report.push(format!("User data directory: {}", data_dir.display()));

        // Stage 2: override model caches in the resolved directory.
        report.blank();
        report.push("Deleting override model data...");
        for (name, outcome) in remove_override_model_files(&data_dir, dry_run) {
            report.push(format_file_line(name, &outcome.to_string()));
        }

        // Stage 2b: the sandbox container holds its own copies. Caches sit in
        // the Application Support root, lexicons in its vChewing subdirectory.
        let sandbox_root = paths::sandbox_app_support_dir(&self.config.home);
        report.blank();
        report.push("Cleaning sandbox container...");
        for (name, outcome) in remove_override_model_files(&sandbox_root, dry_run) {
            report.push(format_file_line(name, &outcome.to_string()));
        }
        for (name, outcome) in clean_user_data_files(&sandbox_root.join("vChewing"), dry_run) {
            report.push(format_file_line(name, &outcome.to_string()));
        }

        // Stage 3: single-kanji records in the resolved directory.
        report.blank();
        report.push("Removing single-kanji records from user lexicons...");
        for (name, outcome) in clean_user_data_files(&data_dir, dry_run) {
            report.push(format_file_line(name, &outcome.to_string()));
        }

        // Stage 4: clear the boosting preference.
        report.blank();
        report.push("Resetting preferences...");
        if dry_run {
            report.push(format!("  - {} would be cleared", KEY_ALLOW_BOOSTING));
        } else {
            match self
                .config
                .prefs
                .remove(KEY_ALLOW_BOOSTING)
                .and_then(|()| self.config.prefs.flush())
            {
                Ok(()) => report.push(format!("  ✓ {} cleared", KEY_ALLOW_BOOSTING)),
                Err(e) => report.push(format!("  ✗ {} not cleared: {}", KEY_ALLOW_BOOSTING, e)),
            }
        }

        // Stage 5: kill the running input method.
        report.blank();
        report.push("Terminating vChewing process...");
        if self.config.skip_kill {
            report.push("  - skipped");
        } else if dry_run {
            report.push("  - vChewing would be terminated");
        } else {
            match terminate_input_method() {
                KillOutcome::Signalled => report.push("  ✓ vChewing terminated"),
                KillOutcome::Failed(reason) => {
                    report.push(format!("  ✗ termination failed: {}", reason))
                }
            }
        }

        report.blank();
        if dry_run {
            report.push("Dry run complete. Nothing was modified.");
        } else {
            report.push("Rescue complete.");
        }
        report.push("vChewing relaunches automatically on the next input-source switch.");

        report
    }

    /// Run on a worker thread; the receiver yields the report when done.
    pub fn spawn(self) -> mpsc::Receiver<RescueReport> {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let report = self.run();
            // Receiver gone means the caller stopped caring; nothing to do.
            let _ = tx.send(report);
        });
        rx
    }
}

fn format_file_line(name: &str, outcome: &str) -> String {
    let glyph = if outcome == "not present" || outcome.starts_with("would") {
        "-"
    } else if outcome.starts_with("failed") {
        "✗"
    } else {
        "✓"
    };
    format!("  {} {}: {}", glyph, name, outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paths::{KEY_USER_DATA_FOLDER, OVERRIDE_MODEL_FILES};
    use crate::prefs::MemoryStore;
    use tempfile::TempDir;

    fn seeded_config(home: &TempDir, data: &TempDir) -> RescueConfig {
        let prefs = MemoryStore::default();
        prefs.set(KEY_ALLOW_BOOSTING, "1");
        prefs.set(KEY_USER_DATA_FOLDER, data.path().to_str().unwrap());

        let mut config = RescueConfig::new(Box::new(prefs));
        config.home = home.path().to_path_buf();
        config.skip_kill = true;
        config
    }

    #[test]
    fn test_full_run_touches_both_directories() {
        let home = TempDir::new().unwrap();
        let data = TempDir::new().unwrap();

        std::fs::write(
            data.path().join("vChewing_override-model-data-cht.dat"),
            b"pom",
        )
        .unwrap();
        std::fs::write(
            data.path().join("userdata-cht.txt"),
            "ㄉㄜ˙ 的 100\nㄓㄨㄥ-ㄍㄨㄥˇ 中共 50\n",
        )
        .unwrap();

        let sandbox = paths::sandbox_app_support_dir(home.path());
        std::fs::create_dir_all(sandbox.join("vChewing")).unwrap();
        std::fs::write(sandbox.join("vChewing_override-model-data-chs.dat"), b"pom").unwrap();
        std::fs::write(
            sandbox.join("vChewing/userdata-chs.txt"),
            "ㄇㄚ 媽 8\n# keep\n",
        )
        .unwrap();

        let config = seeded_config(&home, &data);
        let report = Rescuer::new(config).run();

        assert!(!data.path().join("vChewing_override-model-data-cht.dat").exists());
        assert!(!sandbox.join("vChewing_override-model-data-chs.dat").exists());
        assert_eq!(
            std::fs::read_to_string(data.path().join("userdata-cht.txt")).unwrap(),
            "ㄓㄨㄥ-ㄍㄨㄥˇ 中共 50\n"
        );
        assert_eq!(
            std::fs::read_to_string(sandbox.join("vChewing/userdata-chs.txt")).unwrap(),
            "# keep\n"
        );

        let text = report.lines().join("\n");
        assert!(text.contains("userdata-cht.txt: removed 1 single-kanji records"));
        assert!(text.contains("userdata-chs.txt: removed 1 single-kanji records"));
        assert!(text.contains("skipped"));
    }

    #[test]
    fn test_preference_key_is_cleared() {
        let home = TempDir::new().unwrap();
        let data = TempDir::new().unwrap();

        let prefs = MemoryStore::default();
        prefs.set(KEY_ALLOW_BOOSTING, "1");
        let mut config = RescueConfig::new(Box::new(prefs));
        config.home = home.path().to_path_buf();
        config.data_dir = Some(data.path().to_path_buf());
        config.skip_kill = true;

        let report = Rescuer::new(config).run();
        assert!(report
            .lines()
            .iter()
            .any(|l| l.contains("AllowBoostingSingleKanjiAsUserPhrase cleared")));
    }

    #[test]
    fn test_explicit_data_dir_wins_over_preference() {
        let home = TempDir::new().unwrap();
        let preferred = TempDir::new().unwrap();
        let explicit = TempDir::new().unwrap();

        std::fs::write(explicit.path().join("userdata-cht.txt"), "ㄅㄚ 八 3\n").unwrap();

        let prefs = MemoryStore::default();
        prefs.set(KEY_USER_DATA_FOLDER, preferred.path().to_str().unwrap());
        let mut config = RescueConfig::new(Box::new(prefs));
        config.home = home.path().to_path_buf();
        config.data_dir = Some(explicit.path().to_path_buf());
        config.skip_kill = true;

        Rescuer::new(config).run();

        assert_eq!(
            std::fs::read_to_string(explicit.path().join("userdata-cht.txt")).unwrap(),
            ""
        );
    }

    #[test]
    fn test_all_stages_report_when_nothing_exists() {
        let home = TempDir::new().unwrap();
        let data = TempDir::new().unwrap();
        let config = seeded_config(&home, &data);

        let report = Rescuer::new(config).run();
        let text = report.lines().join("\n");

        // 4 cache files x 2 directories, 2 lexicons x 2 directories.
        let absent = report
            .lines()
            .iter()
            .filter(|l| l.contains("not present"))
            .count();
        assert_eq!(absent, 12);
        assert!(text.contains("Rescue complete."));
    }

    #[test]
    fn test_dry_run_mutates_nothing() {
        let home = TempDir::new().unwrap();
        let data = TempDir::new().unwrap();
        let pom = data.path().join("vChewing_override-model-data-cht.dat");
        let lexicon = data.path().join("userdata-cht.txt");
        std::fs::write(&pom, b"pom").unwrap();
        std::fs::write(&lexicon, "ㄉㄜ˙ 的 100\n").unwrap();

        let prefs = MemoryStore::default();
        prefs.set(KEY_ALLOW_BOOSTING, "1");
        prefs.set(KEY_USER_DATA_FOLDER, data.path().to_str().unwrap());
        let mut config = RescueConfig::new(Box::new(prefs));
        config.home = home.path().to_path_buf();
        config.dry_run = true;

        let report = Rescuer::new(config).run();

        assert!(pom.exists());
        assert_eq!(std::fs::read_to_string(&lexicon).unwrap(), "ㄉㄜ˙ 的 100\n");

        let text = report.lines().join("\n");
        assert!(text.contains("would be cleared"));
        assert!(text.contains("would be terminated"));
        assert!(text.contains("vChewing_override-model-data-cht.dat: would be removed"));
        assert!(text.contains("would remove 1 single-kanji records"));
        assert!(!text.contains(": removed"));
    }

    #[test]
    fn test_stage_failure_does_not_stop_the_run() {
        let home = TempDir::new().unwrap();
        let data = TempDir::new().unwrap();

        // Invalid UTF-8 makes the first lexicon fail; the second still runs,
        // as do the preference and termination stages.
        std::fs::write(data.path().join("userdata-cht.txt"), [0xFF, 0xFE, 0x00]).unwrap();
        std::fs::write(data.path().join("userdata-chs.txt"), "ㄅㄚ 八 3\n").unwrap();

        let config = seeded_config(&home, &data);
        let report = Rescuer::new(config).run();
        let text = report.lines().join("\n");

        assert!(text.contains("✗ userdata-cht.txt: failed"));
        assert!(text.contains("✓ userdata-chs.txt: removed 1 single-kanji records"));
        assert!(text.contains("AllowBoostingSingleKanjiAsUserPhrase cleared"));
        assert!(text.contains("Rescue complete."));
        assert_eq!(
            std::fs::read_to_string(data.path().join("userdata-chs.txt")).unwrap(),
            ""
        );
    }

    #[test]
    fn test_background_run_delivers_report() {
        let home = TempDir::new().unwrap();
        let data = TempDir::new().unwrap();
        let config = seeded_config(&home, &data);

        let rx = Rescuer::new(config).spawn();
        let report = rx.recv().expect("worker delivers a report");
        assert!(!report.lines().is_empty());
    }
}
