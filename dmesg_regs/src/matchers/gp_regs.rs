//! General purpose register extraction
//!
//! Matches `sp : ffff00000a2b3d50`, `x29: ffff00000a2b3d50 x28: 0000000000000000`
//! and similar `name: value` fragments. Names are built from `x s p t` followed
//! by `x s p t a e` or digits, which covers `x0`..`x30`, `sp` and `pstate`. At
//! least eight hex digits are required so short numbers in ordinary log text
//! are not taken for register values.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{apply_tokens, scan_tokens, RegToken};
use crate::register_set::RegisterSet;

static GP_REGS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?P<name>[xspt]+[0-9xsptae]+)\s*:\s*(?P<value>[0-9a-fA-F]{8,})")
        .expect("valid general purpose register pattern")
});

/// All register tokens on `line`, in line order
pub fn extract(line: &str) -> Vec<RegToken<'_>> {
    scan_tokens(&GP_REGS, line)
}

/// Store the register values found on `line` into `regs`
pub fn apply(line: &str, regs: &mut RegisterSet) -> usize {
    apply_tokens(&extract(line), regs)
}
