//! Terminal-space picture of the graph: which cell and which day sit at each
//! (row, column). Rebuilt in full on every frame, never patched.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::heat::matrix::{Cell, Matrix, DAYS_PER_COLUMN};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Pos {
    pub row: u16,
    pub col: u16,
}

impl Pos {
    pub fn new(row: u16, col: u16) -> Self {
        Self { row, col }
    }
}

/// Inclusive bounds of the cell start positions drawn for the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphBox {
    pub min_row: u16,
    pub max_row: u16,
    pub min_col: u16,
    pub max_col: u16,
}

impl GraphBox {
    pub fn contains(&self, row: i32, col: i32) -> bool {
        row >= i32::from(self.min_row)
            && row <= i32::from(self.max_row)
            && col >= i32::from(self.min_col)
            && col <= i32::from(self.max_col)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Screen {
    cells: HashMap<Pos, Cell>,
    dates: HashMap<Pos, NaiveDate>,
    bounds: Option<GraphBox>,
    cell_width: u16,
}

impl Screen {
    /// Place every slot of `matrix` with its top-left cell at `origin`.
    ///
    /// With `month_merge` blank slots are skipped and the rest of the row
    /// shifts left, the same way the static block output packs a row.
    pub fn build(matrix: &Matrix, origin: Pos, month_merge: bool) -> Self {
        let cell_width = matrix.cell_width() as u16;
        let mut screen = Screen {
            cell_width,
            ..Screen::default()
        };

        let mut max_col: Option<u16> = None;
        for row in 0..DAYS_PER_COLUMN {
            let y = origin.row + row as u16;
            let mut x = origin.col;
            for slot in matrix.row(row) {
                if month_merge && slot.is_blank() {
                    continue;
                }
                let pos = Pos::new(y, x);
                screen.cells.insert(pos, slot.cell.clone());
                if let Some(day) = slot.day {
                    screen.dates.insert(pos, day);
                }
                max_col = Some(max_col.map_or(x, |m| m.max(x)));
                x = x.saturating_add(cell_width);
            }
        }

        screen.bounds = max_col.map(|max_col| GraphBox {
            min_row: origin.row,
            max_row: origin.row + DAYS_PER_COLUMN as u16 - 1,
            min_col: origin.col,
            max_col,
        });
        screen
    }

    pub fn cell_at(&self, pos: Pos) -> Option<&Cell> {
        self.cells.get(&pos)
    }

    pub fn date_at(&self, pos: Pos) -> Option<NaiveDate> {
        self.dates.get(&pos).copied()
    }

    /// A drawn, non-blank cell is under `pos`.
    pub fn is_populated(&self, pos: Pos) -> bool {
        self.cells.get(&pos).is_some_and(|c| !c.is_blank())
    }

    pub fn position_of(&self, day: NaiveDate) -> Option<Pos> {
        self.dates.iter().find(|(_, d)| **d == day).map(|(pos, _)| *pos)
    }

    /// Position of the most recent day on screen.
    pub fn latest(&self) -> Option<Pos> {
        self.dates
            .iter()
            .max_by_key(|(_, day)| **day)
            .map(|(pos, _)| *pos)
    }

    pub fn bounds(&self) -> Option<GraphBox> {
        self.bounds
    }

    pub fn cell_width(&self) -> u16 {
        self.cell_width
    }

    pub fn cells(&self) -> impl Iterator<Item = (Pos, &Cell)> + '_ {
        self.cells.iter().map(|(pos, cell)| (*pos, cell))
    }

    /// Bottom row of the graph, if anything was drawn.
    pub fn bottom(&self) -> Option<u16> {
        self.bounds.map(|b| b.max_row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heat::contrib::ContributionMap;
    use crate::heat::matrix::{build_matrix, MatrixOptions};
    use crate::heat::output::{render_block, BlockLayout};
    use crate::heat::palette::{BlockWidth, COLORS_GRASS};
    use console::strip_ansi_codes;
    use pretty_assertions::assert_eq;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn matrix(width: BlockWidth) -> Matrix {
        let map = ContributionMap::with_range(ymd(2024, 4, 21), ymd(2024, 5, 11));
        build_matrix(&map, &COLORS_GRASS, MatrixOptions { width, separate_months: true })
    }

    #[test]
    fn every_day_gets_one_position() {
        let matrix = matrix(BlockWidth::Reg);
        let screen = Screen::build(&matrix, Pos::new(5, 10), false);
        assert_eq!(screen.dates.len(), 21);
        assert_eq!(screen.date_at(Pos::new(5, 10)), Some(ymd(2024, 4, 21)));
        assert_eq!(screen.position_of(ymd(2024, 4, 22)), Some(Pos::new(6, 10)));
        assert_eq!(screen.latest(), screen.position_of(ymd(2024, 5, 11)));
        let bounds = screen.bounds().unwrap();
        assert_eq!((bounds.min_row, bounds.max_row), (5, 11));
        assert_eq!((bounds.min_col, bounds.max_col), (10, 10 + 4 * 2));
    }

    #[test]
    fn static_rows_and_screen_agree_on_positions() {
        for merge in [false, true] {
            let matrix = matrix(BlockWidth::Thin);
            let origin = Pos::new(2, 3);
            let screen = Screen::build(&matrix, origin, merge);
            let layout = BlockLayout { month_merge: merge, separate: false };
            let text = strip_ansi_codes(&render_block(&matrix, layout)).to_string();

            for (row, line) in text.lines().enumerate() {
                let slots: Vec<_> = matrix
                    .row(row)
                    .filter(|s| !(merge && s.is_blank()))
                    .collect();
                assert_eq!(line.chars().count(), slots.len());
                for (week, slot) in slots.iter().enumerate() {
                    let pos = Pos::new(origin.row + row as u16, origin.col + week as u16);
                    assert_eq!(screen.date_at(pos), slot.day, "row {row} week {week}");
                }
            }
        }
    }

    #[test]
    fn separator_cells_are_drawn_but_not_populated() {
        let matrix = matrix(BlockWidth::Reg);
        let screen = Screen::build(&matrix, Pos::new(0, 0), false);
        let sep = Pos::new(0, 2 * 2);
        assert!(screen.cell_at(sep).is_some());
        assert!(!screen.is_populated(sep));
        assert_eq!(screen.date_at(sep), None);
    }
}
