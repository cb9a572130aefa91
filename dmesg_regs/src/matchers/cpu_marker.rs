//! CPU marker detection
//!
//! The kernel prints `CPU: %d PID: %d Comm: %.20s ...` from `dump_stack_print_info`
//! right before the register dump of an oops, so that line delimits one
//! register set from the next.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

static CPU_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"CPU:\s(?P<cpu>[0-9]+)\s*PID:").expect("valid cpu marker pattern"));

/// Return the CPU index announced by `line`, if any.
///
/// Only the first marker on the line counts. A marker always delimits a new
/// context; an index too large for `u64` saturates to `u64::MAX`.
pub fn match_cpu_marker(line: &str) -> Option<u64> {
    let caps = CPU_MARKER.captures(line)?;
    let digits = caps.name("cpu")?.as_str();
    match digits.parse() {
        Ok(cpu) => Some(cpu),
        Err(err) => {
            debug!(digits, "saturating cpu index: {err}");
            Some(u64::MAX)
        }
    }
}
