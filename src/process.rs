//! Process termination
//!
//! The input method holds its lexicons open; leaving it running after the
//! rewrite risks it flushing stale state back out. It is force-killed and
//! relaunches automatically on the next input-source switch.

use std::fmt;
use std::process::Command;

/// Termination utility, invoked with a forced-kill signal and a full
/// command-line pattern match.
const PKILL: &str = "/usr/bin/pkill";

/// Substring identifying the deployed input method process.
pub const PROCESS_PATTERN: &str = "vChewing";

/// Outcome of the termination stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KillOutcome {
    /// pkill ran to completion. A nonzero exit (no process matched) still
    /// counts: the goal is "no such process afterwards".
    Signalled,
    /// pkill itself could not be invoked.
    Failed(String),
}

impl fmt::Display for KillOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Signalled => write!(f, "terminated"),
            Self::Failed(reason) => write!(f, "failed: {}", reason),
        }
    }
}

/// Force-terminate every process whose command line contains `PROCESS_PATTERN`.
pub fn terminate_input_method() -> KillOutcome {
    terminate_matching(PKILL, PROCESS_PATTERN)
}

fn terminate_matching(pkill: &str, pattern: &str) -> KillOutcome {
    match Command::new(pkill).args(["-9", "-f", pattern]).status() {
        Ok(status) => {
            log::debug!("{} -9 -f {} exited with {}", pkill, pattern, status);
            KillOutcome::Signalled
        }
        Err(e) => {
            log::warn!("could not invoke {}: {}", pkill, e);
            KillOutcome::Failed(e.to_string())
        }
    }
}
