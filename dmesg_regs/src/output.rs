//! Report formatters
//!
//! Supports the text block format consumed by the crash `arm64_core_set`
//! extension, and JSON. `format_core_regs` renders a loaded report.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::core_regs::CoreRegs;
use crate::error::Result;
use crate::register_set::RegisterSet;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format '{}'. Use 'text' or 'json'", s)),
        }
    }
}

/// Render register sets in `format`, preserving their order
pub fn format_report(sets: &[RegisterSet], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(format_report_text(sets)),
        OutputFormat::Json => format_report_json(sets),
    }
}

fn format_report_text(sets: &[RegisterSet]) -> String {
    sets.iter().map(RegisterSet::to_string).collect()
}

fn format_report_json(sets: &[RegisterSet]) -> Result<String> {
    #[derive(Serialize)]
    struct JsonReport {
        count: usize,
        cores: Vec<JsonCore>,
    }

    #[derive(Serialize)]
    struct JsonCore {
        cpu: u64,
        regs: BTreeMap<String, String>,
    }

    let report = JsonReport {
        count: sets.len(),
        cores: sets
            .iter()
            .map(|set| JsonCore {
                cpu: set.cpu(),
                regs: set
                    .iter()
                    .map(|(name, value)| (name.to_string(), format!("0x{:016x}", value)))
                    .collect(),
            })
            .collect(),
    };

    Ok(serde_json::to_string_pretty(&report)?)
}

/// Render loaded core registers, one `## cpu N` section per CPU
pub fn format_core_regs(cores: &[CoreRegs]) -> String {
    let mut output = String::new();
    for (cpu, core) in cores.iter().enumerate() {
        output.push_str(&format!("## cpu {}\n", cpu));
        output.push_str(&format!("pc=0x{:016x}\n", core.pc));
        output.push_str(&format!("sp=0x{:016x}\n", core.sp));
        for (slot, value) in core.regs.iter().enumerate() {
            output.push_str(&format!("x{}=0x{:016x}\n", slot, value));
        }
    }
    output
}
