use std::fmt::Write;
use crate::grid::{DisplayStatus, GridSummary, GridView, OccupancyEvent};

/// Single-character marker for a display status
pub fn status_marker(status: DisplayStatus) -> char {
    match status {
        DisplayStatus::Available => '.',
        DisplayStatus::Occupied => '#',
        DisplayStatus::Reserved => 'R',
        DisplayStatus::Selected => '*',
    }
}

/// Formats a rendered grid as text, one layout row per line: `A1. A2# A3*`
pub fn format_grid(view: &GridView) -> String {
    let width = view.cells.iter().map(|c| c.number.len()).max().unwrap_or(0);
    let mut out = String::new();
    for row in view.rows_iter() {
        let line: Vec<String> = row
            .iter()
            .map(|cell| format!("{:>width$}{}", cell.number, status_marker(cell.status), width = width))
            .collect();
        let _ = writeln!(out, "{}", line.join(" "));
    }
    let _ = write!(out, "{:^w$}", "^ ENTRANCE", w = view.cols as usize * (width + 2));
    out
}

/// One-line occupancy summary
pub fn format_summary(summary: &GridSummary) -> String {
    format!(
        "{} slots: {} available, {} occupied, {} reserved",
        summary.total, summary.available, summary.occupied, summary.reserved
    )
}

/// Prints the grid, its summary and the latest occupancy event to stdout
pub fn print_grid(title: &str, view: &GridView, summary: &GridSummary, last_event: Option<&OccupancyEvent>) {
    println!("\n=== {} ===", title);
    println!("{}", format_grid(view));
    println!("{}", format_summary(summary));
    if let Some(event) = last_event {
        println!("Last event: {} ({})", event.description, event.timestamp.format("%H:%M:%S"));
    }
}
