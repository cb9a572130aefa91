//! Line matchers for arm64 oops text
//!
//! - `cpu_marker`: `CPU: 2 PID: 441 Comm: foo ...` opens a new register set
//! - `pc_lr`: `pc : [<ffff000008123456>] lr : [<ffff000008123400>]`
//! - `gp_regs`: `x29: ffff00000a2b3d50 x28: 0000000000000000`
//!
//! The value matchers scan a line to exhaustion: after each hit the search
//! resumes on the text following it, so one physical line can carry several
//! registers.

pub mod cpu_marker;
pub mod gp_regs;
pub mod pc_lr;

use regex::Regex;
use tracing::warn;

use crate::error::ValueError;
use crate::register_set::RegisterSet;

pub use cpu_marker::match_cpu_marker;

/// Trailing text after a match stops at this character
const TERMINATOR: char = '$';

/// A `name: value` pair found on a line, value still in its textual form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegToken<'a> {
    pub name: &'a str,
    pub hex: &'a str,
}

impl<'a> RegToken<'a> {
    pub fn value(&self) -> Result<u64, ValueError> {
        u64::from_str_radix(self.hex, 16).map_err(|err| ValueError::new(self.name, self.hex, err))
    }
}

/// Collect every `name`/`value` capture of `pattern` in `line`, resuming on the
/// remainder after each hit.
///
/// The first search sees the whole line. Each remainder is cut at the first
/// terminator character.
pub(crate) fn scan_tokens<'a>(pattern: &Regex, line: &'a str) -> Vec<RegToken<'a>> {
    let mut tokens = Vec::new();
    let mut rest = line;

    while let Some(caps) = pattern.captures(rest) {
        let (Some(whole), Some(name), Some(hex)) = (caps.get(0), caps.name("name"), caps.name("value"))
        else {
            break;
        };
        tokens.push(RegToken {
            name: name.as_str(),
            hex: hex.as_str(),
        });

        let tail = &rest[whole.end()..];
        rest = match tail.find(TERMINATOR) {
            Some(end) => &tail[..end],
            None => tail,
        };
    }

    tokens
}

/// Store every parsable token into `regs`, returning how many were stored.
///
/// Tokens whose value does not fit in 64 bits are logged and skipped.
pub(crate) fn apply_tokens(tokens: &[RegToken<'_>], regs: &mut RegisterSet) -> usize {
    let mut stored = 0;
    for token in tokens {
        match token.value() {
            Ok(value) => {
                regs.set(token.name, value);
                stored += 1;
            }
            Err(err) => warn!(cpu = regs.cpu(), "skipping register token: {err}"),
        }
    }
    stored
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;

    fn pair_pattern() -> Regex {
        Regex::new(r"(?P<name>[a-z]+)=(?P<value>[0-9a-f]+)").unwrap()
    }

    #[test]
    fn test_scan_tokens__no_match__then_empty() {
        assert!(scan_tokens(&pair_pattern(), "nothing here").is_empty());
    }

    #[test]
    fn test_scan_tokens__several_pairs__then_in_line_order() {
        let tokens = scan_tokens(&pair_pattern(), "a=1 b=2 c=3");
        let names: Vec<_> = tokens.iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_scan_tokens__terminator_in_remainder__then_stops_there() {
        let tokens = scan_tokens(&pair_pattern(), "a=1 $ b=2");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].name, "a");
    }

    #[test]
    fn test_scan_tokens__terminator_before_first_hit__then_first_hit_found() {
        let tokens = scan_tokens(&pair_pattern(), "$ a=1 $ b=2");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].hex, "1");
    }

    #[test]
    fn test_reg_token_value__overflow__then_error() {
        let token = RegToken {
            name: "x1",
            hex: "10000000000000000",
        };
        assert!(token.value().is_err());
    }

    #[test]
    fn test_reg_token_value__leading_zeros_past_sixteen_digits__then_parsed() {
        let token = RegToken {
            name: "x1",
            hex: "00000000000000000ff",
        };
        assert_eq!(token.value().unwrap(), 0xff);
    }

    #[test]
    fn test_apply_tokens__overflow_token__then_skipped_and_rest_stored() {
        let tokens = [
            RegToken {
                name: "x0",
                hex: "1ffffffffffffffff",
            },
            RegToken {
                name: "x1",
                hex: "00000000deadbeef",
            },
        ];
        let mut regs = RegisterSet::new(0);
        assert_eq!(apply_tokens(&tokens, &mut regs), 1);
        assert_eq!(regs.get("x0"), None);
        assert_eq!(regs.get("x1"), Some(0xdead_beef));
    }
}
