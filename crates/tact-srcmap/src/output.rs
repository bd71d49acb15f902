//! Output formatting.

use crate::app::{Lookup, Report};
use crate::cli::OutputFormat;
use serde::Serialize;
use source_map::{ByteOffset, Entry};
use std::collections::BTreeMap;
use std::fmt::Write;

/// JSON shape of a report.
#[derive(Serialize)]
struct JsonReport<'a> {
    entrypoint: &'a str,
    locations: &'a [Entry],
    correspondence: &'a BTreeMap<ByteOffset, usize>,
    lookups: &'a [Lookup],
}

/// Formats reports for output.
pub struct Formatter {
    format: OutputFormat,
}

impl Formatter {
    /// Creates a new formatter.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats a report.
    pub fn format(&self, report: &Report) -> Result<String, serde_json::Error> {
        match self.format {
            OutputFormat::Human => Ok(self.format_human(report)),
            OutputFormat::Json => self.format_json(report),
            OutputFormat::Machine => Ok(self.format_machine(report)),
        }
    }

    fn format_human(&self, report: &Report) -> String {
        let map = &report.source_map;
        let mut output = String::new();

        let _ = writeln!(
            output,
            "{}: {} locations, {} mapped offsets",
            report.entrypoint,
            map.len(),
            map.correspondence().len()
        );
        for entry in map.locations() {
            let range = format!("{}..={}", u32::from(entry.start), u32::from(entry.end));
            let _ = writeln!(output, "  {range:>12} -> {}", entry.loc);
        }

        if !report.lookups.is_empty() {
            output.push('\n');
        }
        for lookup in &report.lookups {
            match (&lookup.location, lookup.index) {
                (Some(loc), Some(index)) => {
                    let _ = writeln!(output, "lookup {} -> {} (#{})", lookup.offset, loc, index);
                }
                _ => {
                    let _ = writeln!(output, "lookup {} -> unmapped", lookup.offset);
                }
            }
        }

        for path in &report.written {
            let _ = writeln!(output, "wrote {path}");
        }

        output
    }

    fn format_json(&self, report: &Report) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&JsonReport {
            entrypoint: &report.entrypoint,
            locations: report.source_map.locations(),
            correspondence: report.source_map.correspondence(),
            lookups: &report.lookups,
        })
    }

    fn format_machine(&self, report: &Report) -> String {
        let mut output = String::new();

        for (index, entry) in report.source_map.locations().iter().enumerate() {
            let _ = writeln!(
                output,
                "location\t{}\t{}\t{}\t{}\t{}\t{}",
                index,
                u32::from(entry.start),
                u32::from(entry.end),
                entry.loc.file,
                entry.loc.line,
                entry.loc.col
            );
        }
        for lookup in &report.lookups {
            let index = lookup
                .index
                .map(|index| index.to_string())
                .unwrap_or_else(|| "-".to_string());
            let _ = writeln!(output, "lookup\t{}\t{}", lookup.offset, index);
        }

        output
    }
}
