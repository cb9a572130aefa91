//! Register snapshot for one CPU context
//!
//! A `RegisterSet` is opened by a `CPU: N ... PID:` line and filled by the
//! value matchers until the next marker or end of input.

use std::collections::BTreeMap;
use std::fmt;

/// Header line of a text report block
pub const BLOCK_BEGIN: &str = "## ========= begin arm64 core regs =========";
/// Footer line of a text report block
pub const BLOCK_END: &str = "## ========= end arm64 core regs =========";

/// Registers that must be present before a set is emitted
const REQUIRED: [&str; 2] = ["pc", "sp"];

/// Registers captured for one CPU
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterSet {
    cpu: u64,
    // BTreeMap keeps names in byte order, which is the report order.
    regs: BTreeMap<String, u64>,
}

impl RegisterSet {
    pub fn new(cpu: u64) -> Self {
        Self {
            cpu,
            regs: BTreeMap::new(),
        }
    }

    pub fn cpu(&self) -> u64 {
        self.cpu
    }

    /// Store `value` under `name`, replacing an earlier value for the same name
    pub fn set(&mut self, name: &str, value: u64) {
        self.regs.insert(name.to_string(), value);
    }

    pub fn get(&self, name: &str) -> Option<u64> {
        self.regs.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.regs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regs.is_empty()
    }

    /// Registers sorted by name
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.regs.iter().map(|(name, value)| (name.as_str(), *value))
    }

    /// A set is emittable only once both `pc` and `sp` were seen
    pub fn is_valid(&self) -> bool {
        REQUIRED.iter().all(|name| self.regs.contains_key(*name))
    }
}

impl fmt::Display for RegisterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", BLOCK_BEGIN)?;
        // Decimal index behind a hex prefix; existing consumers expect it verbatim.
        writeln!(f, "cpu=0x{}", self.cpu)?;
        for (name, value) in self.iter() {
            writeln!(f, "{}=0x{:016x}", name, value)?;
        }
        writeln!(f, "{}", BLOCK_END)
    }
}
