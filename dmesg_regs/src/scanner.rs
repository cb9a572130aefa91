//! Line driven scanner over a crash log
//!
//! Lines before the first `CPU: N ... PID:` marker are skipped. Each marker
//! closes the current register set (kept only if it has `pc` and `sp`) and
//! opens a fresh one for CPU `N`. Every line seen while a set is open goes
//! through the `pc`/`lr` matcher and then the general purpose matcher.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::debug;

use crate::error::{Result, ScanError};
use crate::matchers::{gp_regs, match_cpu_marker, pc_lr};
use crate::register_set::RegisterSet;

/// Scanner state between lines
#[derive(Debug, Default)]
enum State {
    #[default]
    NoActiveSet,
    ActiveSet(RegisterSet),
}

/// Accumulates register sets from log lines, one line at a time
#[derive(Debug, Default)]
pub struct LogScanner {
    state: State,
    completed: Vec<RegisterSet>,
    lines: usize,
    dropped: usize,
}

impl LogScanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one line of log text, with or without its line terminator
    pub fn feed_line(&mut self, line: &str) {
        self.lines += 1;

        if let Some(cpu) = match_cpu_marker(line.trim()) {
            debug!(cpu, line = self.lines, "cpu marker");
            self.close_active();
            self.state = State::ActiveSet(RegisterSet::new(cpu));
        }

        if let State::ActiveSet(regs) = &mut self.state {
            pc_lr::apply(line, regs);
            gp_regs::apply(line, regs);
        }
    }

    /// Close the open set, if any, and return all valid sets in marker order
    pub fn finish(mut self) -> Vec<RegisterSet> {
        self.close_active();
        debug!(
            lines = self.lines,
            emitted = self.completed.len(),
            dropped = self.dropped,
            "scan finished"
        );
        self.completed
    }

    /// Register sets completed so far
    pub fn completed(&self) -> &[RegisterSet] {
        &self.completed
    }

    fn close_active(&mut self) {
        if let State::ActiveSet(regs) = std::mem::take(&mut self.state) {
            if regs.is_valid() {
                self.completed.push(regs);
            } else {
                debug!(cpu = regs.cpu(), found = regs.len(), "dropping set without pc and sp");
                self.dropped += 1;
            }
        }
    }
}

/// Scan log text already held in memory
pub fn scan_str(text: &str) -> Vec<RegisterSet> {
    let mut scanner = LogScanner::new();
    for line in text.lines() {
        scanner.feed_line(line);
    }
    scanner.finish()
}

/// Scan a reader line by line. Invalid UTF-8 is replaced rather than rejected,
/// so stray binary bytes in a log do not abort the run.
pub fn scan_reader<R: BufRead>(mut reader: R, origin: &Path) -> Result<Vec<RegisterSet>> {
    let mut scanner = LogScanner::new();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        let read = reader
            .read_until(b'\n', &mut buf)
            .map_err(|err| ScanError::io(origin, err))?;
        if read == 0 {
            break;
        }
        scanner.feed_line(&String::from_utf8_lossy(&buf));
    }

    Ok(scanner.finish())
}

/// Scan the log file at `path`
pub fn scan_file(path: &Path) -> Result<Vec<RegisterSet>> {
    let file = File::open(path).map_err(|err| ScanError::io(path, err))?;
    scan_reader(BufReader::new(file), path)
}
