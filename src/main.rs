//! vchewing-rescue - rescue tool for vChewing user lexicons
//!
//! Main entry point for the command-line application.

use std::io::{self, BufRead, Write};
use std::process;

use clap::Parser;

use vchewing_rescue::cli::Args;
use vchewing_rescue::console::{
    create_spinner, print_banner, print_bullet, print_error, print_header, print_info,
    print_success, print_warning,
};
use vchewing_rescue::prefs::DefaultsStore;
use vchewing_rescue::rescue::{RescueConfig, Rescuer};

fn main() {
    let args = Args::parse();

    // Set up logging
    if args.verbose {
        std::env::set_var("RUST_LOG", "debug");
    } else if !args.quiet {
        std::env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    if let Err(e) = run(args) {
        print_error(&format!("{}", e));

        let mut source = e.source();
        while let Some(err) = source {
            print_error(&format!("  Caused by: {}", err));
            source = err.source();
        }

        process::exit(1);
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    if !args.quiet {
        print_banner();
        print_header("This tool will:");
        print_bullet("Delete the override model data files (fading memory caches)");
        print_bullet("Remove all single-kanji records from the user lexicons");
        print_bullet("Clear the \"allow boosting single kanji\" preference");
        if !args.skip_kill {
            print_bullet("Terminate the running vChewing process");
        }
        if args.dry_run {
            print_warning("Dry run: nothing will be modified.");
        } else {
            print_warning("This operation is irreversible.");
        }
    }

    if !args.yes && !args.dry_run && !confirm()? {
        print_warning("Aborted. Nothing was modified.");
        return Ok(());
    }

    let mut config = RescueConfig::new(Box::new(DefaultsStore::new()));
    config.data_dir = args.data_dir.clone();
    config.dry_run = args.dry_run;
    config.skip_kill = args.skip_kill;

    // The rescue runs off-thread; the report arrives once over the channel.
    let rx = Rescuer::new(config).spawn();

    let spinner = if args.quiet {
        indicatif::ProgressBar::hidden()
    } else {
        create_spinner("Rescuing...")
    };

    let report = rx
        .recv()
        .map_err(|_| anyhow::anyhow!("rescue worker exited without reporting"))?;

    spinner.finish_and_clear();

    if !args.quiet {
        print_header("Report");
    }
    for line in report.lines() {
        println!("{}", line);
    }

    if !args.quiet {
        if args.dry_run {
            print_info("Dry run only - run again without --dry-run to apply.");
        } else {
            print_success("Rescue finished.");
        }
    }

    Ok(())
}

/// Ask the operator to confirm before mutating anything.
fn confirm() -> anyhow::Result<bool> {
    print!("\nProceed? [y/N] ");
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    let answer = answer.trim().to_lowercase();

    Ok(answer == "y" || answer == "yes")
}
