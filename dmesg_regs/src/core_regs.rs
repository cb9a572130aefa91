//! Report loader
//!
//! Reads a text report back into fixed `pt_regs` style records, one per CPU,
//! the way the crash `arm64_core_set -l regvalue.txt` command consumes it.
//!
//! Values are read as hex, the `cpu=` line included. A report line such as
//! `cpu=0x12` therefore selects CPU 18, exactly as crash does.

use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::{Result, ScanError};

/// Number of general purpose slots, `x0`..`x30`
pub const GP_REG_COUNT: usize = 31;

/// Slot that `lr` is written to
const LR_SLOT: usize = 30;

/// arm64 core registers of one CPU
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CoreRegs {
    pub regs: [u64; GP_REG_COUNT],
    pub sp: u64,
    pub pc: u64,
}

impl CoreRegs {
    pub fn lr(&self) -> u64 {
        self.regs[LR_SLOT]
    }
}

/// Load `path` into `cpu_count` records
pub fn load_core_regs(path: &Path, cpu_count: usize) -> Result<Vec<CoreRegs>> {
    let bytes = fs::read(path).map_err(|err| ScanError::io(path, err))?;
    let cores = parse_core_regs(&String::from_utf8_lossy(&bytes), cpu_count);
    debug!(path = %path.display(), cpu_count, "loaded core regs");
    Ok(cores)
}

/// Parse report text into `cpu_count` records. Entries for CPUs outside
/// `0..cpu_count` and unknown register names are ignored.
pub fn parse_core_regs(text: &str, cpu_count: usize) -> Vec<CoreRegs> {
    let mut cores = vec![CoreRegs::default(); cpu_count];
    let mut cpu: u64 = 0;

    for line in text.lines() {
        let line = line.trim_start_matches([' ', '\t']);
        if line.starts_with('#') {
            continue;
        }
        let Some((name, raw)) = line.split_once('=') else {
            continue;
        };
        let value = match parse_hex_prefix(raw) {
            Some(value) => value,
            None => {
                warn!(name, raw, "skipping report value that does not fit in 64 bits");
                continue;
            }
        };

        if name.starts_with("cpu") {
            cpu = value;
            continue;
        }
        let Some(core) = usize::try_from(cpu).ok().and_then(|idx| cores.get_mut(idx)) else {
            continue;
        };

        if name.starts_with("pc") {
            core.pc = value;
        } else if name.starts_with("sp") {
            core.sp = value;
        } else if name.starts_with("lr") {
            core.regs[LR_SLOT] = value;
        } else if let Some(slot) = gp_slot(name) {
            core.regs[slot] = value;
        }
    }

    cores
}

/// `x7`/`X7` style names to their slot
fn gp_slot(name: &str) -> Option<usize> {
    let rest = name.strip_prefix(['x', 'X'])?;
    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let slot: usize = rest[..digits_end].parse().ok()?;
    (slot < GP_REG_COUNT).then_some(slot)
}

/// Leading hex number of `raw`, with optional whitespace and `0x` prefix.
///
/// Parsing stops at the first non-hex character; no digits reads as 0.
/// Returns `None` when the digits overflow 64 bits.
fn parse_hex_prefix(raw: &str) -> Option<u64> {
    let raw = raw.trim_start();
    let raw = raw
        .strip_prefix("0x")
        .or_else(|| raw.strip_prefix("0X"))
        .unwrap_or(raw);
    let end = raw
        .find(|c: char| !c.is_ascii_hexdigit())
        .unwrap_or(raw.len());
    if end == 0 {
        return Some(0);
    }
    u64::from_str_radix(&raw[..end], 16).ok()
}
