//! dmesg-regs
//!
//! Pulls arm64 core register dumps out of kernel crash logs and renders one
//! sorted block per CPU context.
//!
//! `core_regs` goes the other way: it loads a finished report into fixed
//! per-CPU `pt_regs` style records for tools that consume it, and backs the
//! `dmesg-regs load` command.
//!
//! ```
//! let log = "\
//! CPU: 1 PID: 441 Comm: kworker/1:2
//! pc : [<ffff0000089abcde>] lr : [<ffff000008912345>]
//! sp : ffff00000a2b3d50
//! ";
//! let sets = dmesg_regs::scan_str(log);
//! assert_eq!(sets.len(), 1);
//! assert_eq!(sets[0].get("pc"), Some(0xffff0000089abcde));
//! ```

pub mod core_regs;
pub mod error;
pub mod matchers;
pub mod output;
pub mod register_set;
pub mod scanner;

pub use core_regs::{load_core_regs, parse_core_regs, CoreRegs};
pub use error::{Result, ScanError, ValueError};
pub use output::{format_core_regs, format_report, OutputFormat};
pub use register_set::RegisterSet;
pub use scanner::{scan_file, scan_reader, scan_str, LogScanner};
