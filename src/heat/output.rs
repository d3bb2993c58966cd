use std::fmt::Write as _;

use chrono::{NaiveDate, Utc};
use console::style;

use super::contrib::ContributionMap;
use super::matrix::{Cell, Matrix, DAYS_PER_COLUMN};
use super::palette::ColorScale;
use super::parse::CommitIndex;
use super::rank::top_committers;
use crate::error::Result;
use crate::model::{CommitterEntry, DayEntry, HeatOutput, SCHEMA_VERSION};

#[derive(Debug, Clone, Copy, Default)]
pub struct BlockLayout {
    /// Skip blank cells so month separator columns collapse.
    pub month_merge: bool,
    /// Put a space after every cell and a blank line after every row.
    pub separate: bool,
}

pub fn paint(cell: &Cell) -> String {
    match cell.bg {
        Some(bg) => style(cell.text()).on_color256(bg).to_string(),
        None => cell.text(),
    }
}

/// Weekday rows of the matrix, one text line per row.
pub fn render_block(matrix: &Matrix, layout: BlockLayout) -> String {
    let separator = if layout.separate { " " } else { "" };
    let mut out = String::new();
    for row in 0..DAYS_PER_COLUMN {
        for slot in matrix.row(row) {
            if layout.month_merge && slot.is_blank() {
                continue;
            }
            out.push_str(&paint(&slot.cell));
            out.push_str(separator);
        }
        out.push('\n');
        if layout.separate {
            out.push('\n');
        }
    }
    out
}

/// One cell per day with its date label, oldest first, never past `today`.
pub fn render_inline(map: &ContributionMap, colors: &ColorScale, width: usize, today: NaiveDate) -> String {
    let mut out = String::new();
    for (day, _) in map.iter() {
        if day > today {
            continue;
        }
        let level = map.level(day).unwrap_or(0) as usize;
        let cell = Cell::colored(width, colors[level]);
        let _ = writeln!(out, "{} {}", paint(&cell), day.format("%b %d, %Y"));
    }
    out
}

pub fn render_legend(colors: &ColorScale, width: usize) -> String {
    let cells: String = colors
        .iter()
        .map(|bg| paint(&Cell::colored(width, *bg)))
        .collect::<Vec<_>>()
        .join(" ");
    format!("{} {} {}\n", style("Less").dim(), cells, style("More").dim())
}

pub fn render_stats(index: &CommitIndex, n: usize) -> String {
    let mut out = String::new();
    if let Some(top) = top_committers(index.commits(), n) {
        let _ = writeln!(out, "{}", style(format!("Top {n} committers:")).bold());
        for (i, (author, count)) in top.iter().enumerate() {
            let _ = writeln!(out, "{}. {}: {}", i + 1, author, count);
        }
    }
    out
}

pub fn output_json(
    raw: &ContributionMap,
    levels: &ContributionMap,
    index: &CommitIndex,
    repository_path: &str,
    stat_number: Option<usize>,
) -> Result<String> {
    let days: Vec<DayEntry> = raw
        .iter()
        .map(|(date, commits)| DayEntry {
            date,
            commits: commits as u32,
            level: levels.level(date).unwrap_or(0),
        })
        .collect();

    let top_committers = stat_number.map(|n| {
        top_committers(index.commits(), n)
            .unwrap_or_default()
            .into_iter()
            .map(|(author, commits)| CommitterEntry { author, commits })
            .collect()
    });

    let output = HeatOutput {
        version: SCHEMA_VERSION,
        generated_at: Utc::now(),
        repository_path: repository_path.to_string(),
        window_start: raw.first_day().unwrap_or_default(),
        window_end: raw.last_day().unwrap_or_default(),
        days,
        top_committers,
    };
    Ok(serde_json::to_string_pretty(&output)?)
}
