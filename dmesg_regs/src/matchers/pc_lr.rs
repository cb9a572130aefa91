//! `pc`/`lr` extraction from bracketed addresses
//!
//! arm64 `__show_regs` prints the program counter and link register as
//! `pc : [<ffff000008123456>] lr : [<ffff000008123400>] pstate: 60000145`,
//! frequently both on one line.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{apply_tokens, scan_tokens, RegToken};
use crate::register_set::RegisterSet;

static PC_LR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?P<name>lr|pc)\s*:\s*[\[<]+(?P<value>[0-9a-fA-F]+)[\]>]+")
        .expect("valid pc/lr pattern")
});

/// All `pc`/`lr` tokens on `line`, in line order
pub fn extract(line: &str) -> Vec<RegToken<'_>> {
    scan_tokens(&PC_LR, line)
}

/// Store the `pc`/`lr` values found on `line` into `regs`
pub fn apply(line: &str, regs: &mut RegisterSet) -> usize {
    apply_tokens(&extract(line), regs)
}
