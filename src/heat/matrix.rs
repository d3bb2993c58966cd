//! Week-column layout of the contribution calendar.
//!
//! Days are laid out top to bottom (Sunday..Saturday) inside a column and
//! columns run left to right from the earliest week to the latest. Month
//! boundaries close the current column and may insert a blank separator column.

use chrono::{Datelike, Duration, NaiveDate};
use tracing::debug;

use super::contrib::ContributionMap;
use super::palette::{BlockWidth, ColorScale};
use crate::model::weekday_row;

pub const DAYS_PER_COLUMN: usize = 7;

/// A drawable block: `width` columns of background color, or blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub width: usize,
    pub bg: Option<u8>,
}

impl Cell {
    pub fn blank(width: usize) -> Self {
        Self { width, bg: None }
    }

    pub fn colored(width: usize, bg: u8) -> Self {
        Self { width, bg: Some(bg) }
    }

    pub fn is_blank(&self) -> bool {
        self.bg.is_none()
    }

    pub fn text(&self) -> String {
        " ".repeat(self.width)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    pub day: Option<NaiveDate>,
    pub cell: Cell,
}

impl Slot {
    pub fn blank(width: usize) -> Self {
        Self {
            day: None,
            cell: Cell::blank(width),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.cell.is_blank()
    }
}

#[derive(Debug)]
pub enum AppendStatus {
    Appended,
    /// The column already holds seven slots; the rejected slot is handed back.
    ColumnFull(Slot),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Column {
    slots: Vec<Slot>,
    separator: bool,
}

impl Column {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fully blank seven-slot column placed between months.
    pub fn separator(width: usize) -> Self {
        Self {
            slots: vec![Slot::blank(width); DAYS_PER_COLUMN],
            separator: true,
        }
    }

    pub fn append(&mut self, slot: Slot) -> AppendStatus {
        if self.slots.len() >= DAYS_PER_COLUMN {
            return AppendStatus::ColumnFull(slot);
        }
        self.slots.push(slot);
        AppendStatus::Appended
    }

    /// Append `count` blank slots, never exceeding seven.
    pub fn pad_by(&mut self, count: usize, width: usize) {
        let room = DAYS_PER_COLUMN.saturating_sub(self.slots.len());
        for _ in 0..count.min(room) {
            self.slots.push(Slot::blank(width));
        }
    }

    pub fn pad_to_full(&mut self, width: usize) {
        let missing = DAYS_PER_COLUMN.saturating_sub(self.slots.len());
        self.pad_by(missing, width);
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn is_separator(&self) -> bool {
        self.separator
    }

    pub fn slot(&self, row: usize) -> Option<&Slot> {
        self.slots.get(row)
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.slots.iter().filter_map(|s| s.day)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatrixOptions {
    pub width: BlockWidth,
    pub separate_months: bool,
}

impl Default for MatrixOptions {
    fn default() -> Self {
        Self {
            width: BlockWidth::Reg,
            separate_months: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matrix {
    columns: Vec<Column>,
    cell_width: usize,
}

impl Matrix {
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn cell_width(&self) -> usize {
        self.cell_width
    }

    /// Slots of weekday row `row` (0 = Sunday) across all columns.
    pub fn row(&self, row: usize) -> impl Iterator<Item = &Slot> + '_ {
        self.columns.iter().filter_map(move |c| c.slot(row))
    }

    pub fn first_day(&self) -> Option<NaiveDate> {
        self.columns.iter().flat_map(Column::days).next()
    }

    pub fn last_day(&self) -> Option<NaiveDate> {
        self.columns.iter().rev().find_map(|c| c.days().last())
    }

    /// Width in terminal columns from the column count.
    pub fn column_width(&self, skip_separators: bool) -> usize {
        let count = self
            .columns
            .iter()
            .filter(|c| !(skip_separators && c.is_separator()))
            .count();
        count * self.cell_width
    }

    /// Width in terminal columns from the number of weeks spanned by real days,
    /// ignoring separator and padding columns.
    pub fn merged_width(&self) -> usize {
        let (Some(first), Some(last)) = (self.first_day(), self.last_day()) else {
            return 0;
        };
        let offset = weekday_row(first.weekday()) as i64;
        let weeks = ((last - first).num_days() + offset) / DAYS_PER_COLUMN as i64 + 1;
        weeks as usize * self.cell_width
    }

    pub fn display_width(&self, month_merge: bool) -> usize {
        if month_merge {
            self.merged_width()
        } else {
            self.column_width(false)
        }
    }
}

/// Lay out a normalized contribution map as week columns colored by `colors`.
pub fn build_matrix(map: &ContributionMap, colors: &ColorScale, options: MatrixOptions) -> Matrix {
    let width = options.width.columns();
    let mut columns: Vec<Column> = Vec::new();

    let (Some(first_day), Some(last_day)) = (map.first_day(), map.last_day()) else {
        return Matrix {
            columns,
            cell_width: width,
        };
    };

    let mut leading = Column::new();
    leading.pad_by(weekday_row(first_day.weekday()), width);
    columns.push(leading);

    for (day, _) in map.iter() {
        let level = map.level(day).unwrap_or(0) as usize;
        let slot = Slot {
            day: Some(day),
            cell: Cell::colored(width, colors[level.min(colors.len() - 1)]),
        };

        let Some(current) = columns.last_mut() else {
            continue;
        };
        if let AppendStatus::ColumnFull(slot) = current.append(slot) {
            let mut next = Column::new();
            let _ = next.append(slot);
            columns.push(next);
        }

        let next_day = day + Duration::days(1);
        if day < last_day && next_day.month() != day.month() {
            if let Some(current) = columns.last_mut() {
                current.pad_to_full(width);
            }
            if options.separate_months {
                columns.push(Column::separator(width));
            }
            let mut next = Column::new();
            next.pad_by(weekday_row(next_day.weekday()), width);
            columns.push(next);
        }
    }

    if let Some(last) = columns.last_mut() {
        last.pad_to_full(width);
    }

    debug!(columns = columns.len(), "built graph matrix");
    Matrix {
        columns,
        cell_width: width,
    }
}
