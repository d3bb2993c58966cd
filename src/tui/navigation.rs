use super::screen::{Pos, Screen};

/// Cells covered by one shift-modified move.
pub const JUMP: i32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nav {
    Up,
    Down,
    Left,
    Right,
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
    JumpUp,
    JumpDown,
    JumpLeft,
    JumpRight,
    Center,
}

impl Nav {
    /// (rows, cells) moved by this key, `None` for the center jump.
    pub fn delta(self) -> Option<(i32, i32)> {
        let delta = match self {
            Nav::Up => (-1, 0),
            Nav::Down => (1, 0),
            Nav::Left => (0, -1),
            Nav::Right => (0, 1),
            Nav::UpLeft => (-1, -1),
            Nav::UpRight => (-1, 1),
            Nav::DownLeft => (1, -1),
            Nav::DownRight => (1, 1),
            Nav::JumpUp => (-JUMP, 0),
            Nav::JumpDown => (JUMP, 0),
            Nav::JumpLeft => (0, -JUMP),
            Nav::JumpRight => (0, JUMP),
            Nav::Center => return None,
        };
        Some(delta)
    }

    /// Horizontal direction of the move: -1, 0 or 1.
    pub fn horizontal(self) -> i32 {
        self.delta().map_or(0, |(_, cells)| cells.signum())
    }
}

/// Candidate (row, col) for `nav` from `cursor`. Bounds are not checked here.
pub fn move_cursor(nav: Nav, cursor: Pos, cell_width: u16, center: Pos) -> (i32, i32) {
    match nav.delta() {
        Some((rows, cells)) => (
            i32::from(cursor.row) + rows,
            i32::from(cursor.col) + cells * i32::from(cell_width),
        ),
        None => (i32::from(center.row), i32::from(center.col)),
    }
}

/// Resolve a candidate against the drawn graph.
///
/// Outside the graph box the move is rejected. A blank landing cell is
/// scanned past in the direction of `horizontal`; with no horizontal
/// component it is rejected.
pub fn clamp_or_reject(screen: &Screen, candidate: (i32, i32), horizontal: i32) -> Option<Pos> {
    let bounds = screen.bounds()?;
    let (row, col) = candidate;
    if !bounds.contains(row, col) {
        return None;
    }

    let width = i32::from(screen.cell_width().max(1));
    let min_col = i32::from(bounds.min_col);
    let mut col = min_col + (col - min_col) / width * width;

    loop {
        let pos = Pos::new(row as u16, col as u16);
        if screen.is_populated(pos) {
            return Some(pos);
        }
        if horizontal == 0 {
            return None;
        }
        col += horizontal * width;
        if !bounds.contains(row, col) {
            return None;
        }
    }
}

/// Apply `nav` to `cursor`, returning the new cursor when the move is allowed.
pub fn navigate(screen: &Screen, cursor: Pos, nav: Nav, center: Pos) -> Option<Pos> {
    let candidate = move_cursor(nav, cursor, screen.cell_width(), center);
    clamp_or_reject(screen, candidate, nav.horizontal())
}
