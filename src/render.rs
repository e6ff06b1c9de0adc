//! Plain-text results table

use std::fmt::Write;

use crate::orderer::{OrderedResults, SortMode};

const HEADERS: [&str; 5] = ["POS  DRIVER", "CONSTRUCTOR", "TIME", "FASTEST LAP", "GRID"];

/// Marker appended to the fastest-lap leader's lap time.
pub const LEADER_MARKER: &str = " *";

/// Render the race header followed by one row per driver, in view order.
pub fn render_table(view: &OrderedResults) -> String {
    let race = &view.canonical().race;
    let mut out = String::new();

    let _ = writeln!(out, "RACE: {}", race.race_name);
    let _ = writeln!(out, "CIRCUIT: {}", race.circuit_name);
    let _ = writeln!(out, "CIRCUIT LOCATION: {}", race.location_label);
    if view.mode() == SortMode::FastestLap {
        let _ = writeln!(out, "(sorted by fastest lap)");
    }
    out.push('\n');

    let rows: Vec<[String; 5]> = view
        .rows()
        .map(|row| {
            let record = row.record();
            let mut lap = record.fastest_lap_time.clone();
            if row.is_fastest_lap_leader() {
                lap.push_str(LEADER_MARKER);
            }
            [
                format!("{:>3}  {}", record.finish_position, row.driver_key()),
                record.constructor_name.clone(),
                record.display_time.clone(),
                lap,
                record.grid_position.clone(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    push_line(&mut out, &HEADERS.map(str::to_string), &widths);
    for row in &rows {
        push_line(&mut out, row, &widths);
    }

    if let Some(leader) = view.fastest_lap_leader() {
        let _ = writeln!(out, "\n* fastest lap: {}", leader);
    }
    out
}

fn push_line(out: &mut String, cells: &[String; 5], widths: &[usize; 5]) {
    let mut line = String::new();
    for (i, (cell, width)) in cells.iter().zip(widths).enumerate() {
        if i > 0 {
            line.push_str("  ");
        }
        // Pad by characters, not bytes, so accented names stay aligned
        let pad = width.saturating_sub(cell.chars().count());
        line.push_str(cell);
        line.extend(std::iter::repeat_n(' ', pad));
    }
    out.push_str(line.trim_end());
    out.push('\n');
}
