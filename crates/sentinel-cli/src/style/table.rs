//! Table formatting using comfy-table.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};

use sentinel_core::EvidenceSummary;

use super::colors::SemanticStyle;

/// Creates a key-value info table (two columns: key and value).
pub fn info_table(entries: &[(&str, &str)]) -> Table {
    let mut table = Table::new();

    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);

    for (key, value) in entries {
        let key_cell = if super::no_color() {
            Cell::new(key)
        } else {
            Cell::new(key).fg(Color::DarkGrey)
        };
        table.add_row(vec![key_cell, Cell::new(value)]);
    }

    table
}

/// Prints a key-value info table.
pub fn print_info_table(entries: &[(&str, &str)]) {
    let table = info_table(entries);
    println!("{table}");
}

/// Severity-colored cell, matching the quarantine's priority-eviction
/// ordering (critical is the most alarming).
fn severity_cell(severity: &str) -> Cell {
    if super::no_color() {
        return Cell::new(severity);
    }
    let color = match severity {
        "critical" => Color::Red,
        "high" => Color::Yellow,
        "medium" => Color::Cyan,
        _ => Color::DarkGrey,
    };
    Cell::new(severity).fg(color)
}

/// Creates a table of quarantined-evidence metadata (never the underlying
/// bytes — spec §4.8: "no privileged access to evidence internals").
pub fn evidence_table(entries: &[EvidenceSummary]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);

    let header_cells: Vec<Cell> = ["signature", "severity", "captured_ms", "bytes", "compressed"]
        .iter()
        .map(|h| {
            if super::no_color() {
                Cell::new(h)
            } else {
                Cell::new(h).add_attribute(Attribute::Bold).fg(Color::Cyan)
            }
        })
        .collect();
    table.set_header(header_cells);

    for entry in entries {
        table.add_row(vec![
            Cell::new(entry.signature.as_str()),
            severity_cell(&entry.severity.to_string()),
            Cell::new(entry.captured),
            Cell::new(entry.size),
            Cell::new(entry.compressed),
        ]);
    }

    table
}

/// Prints a table of quarantined-evidence metadata.
pub fn print_evidence_table(entries: &[EvidenceSummary]) {
    if entries.is_empty() {
        println!("{}", "Quarantine is empty.".muted());
        return;
    }
    println!("{}", evidence_table(entries));
    let count = entries.len();
    let word = if count == 1 { "entry" } else { "entries" };
    println!("{}", format!("({count} {word})").muted());
}
