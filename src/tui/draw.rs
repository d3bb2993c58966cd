use ratatui::buffer::Buffer;
use ratatui::style::{Color, Modifier, Style};
use unicode_width::UnicodeWidthStr;

use super::state::{Footer, Session, ViewMode, EMPTY_DAY_FOOTER, LEGEND_GAP};
use super::views::detail::draw_detail;
use crate::error::GitheatError;

pub const EXIT_HINT: &str = "ESC, ^C to exit";

const FOOTER_DATE_FORMAT: &str = "%b %d, %Y";

/// Minimal text canvas the calendar is drawn onto.
pub trait Surface {
    fn width(&self) -> u16;
    fn height(&self) -> u16;
    /// Write `text` at (`row`, `col`), clipped at the right edge.
    fn put(&mut self, row: u16, col: u16, text: &str, style: Style);
}

impl Surface for Buffer {
    fn width(&self) -> u16 {
        self.area.width
    }

    fn height(&self) -> u16 {
        self.area.height
    }

    fn put(&mut self, row: u16, col: u16, text: &str, style: Style) {
        if row >= self.area.height || col >= self.area.width {
            return;
        }
        let room = usize::from(self.area.width - col);
        self.set_stringn(self.area.x + col, self.area.y + row, text, room, style);
    }
}

pub fn title() -> String {
    format!("GitHeat {}", env!("CARGO_PKG_VERSION"))
}

/// Row 0: `left` text, the program title centered, `right` text flush right.
pub fn draw_header<S: Surface>(surface: &mut S, left: &str, right: &str) {
    let width = surface.width();
    let title = title();
    let bold = Style::default().add_modifier(Modifier::BOLD);

    surface.put(0, 0, left, Style::default());
    let center = width.saturating_sub(title.width() as u16) / 2;
    surface.put(0, center, &title, bold);
    let right_col = width.saturating_sub(right.width() as u16);
    surface.put(0, right_col, right, Style::default().fg(Color::DarkGray));
}

fn cell_style(bg: u8) -> Style {
    Style::default().bg(Color::Indexed(bg))
}

pub fn draw_grid<S: Surface>(surface: &mut S, session: &Session) {
    let screen = session.screen();
    for (pos, cell) in screen.cells() {
        if let Some(bg) = cell.bg {
            surface.put(pos.row, pos.col, &cell.text(), cell_style(bg));
        }
    }
    if let Some(pos) = session.cursor() {
        let text = " ".repeat(usize::from(screen.cell_width()));
        surface.put(pos.row, pos.col, &text, Style::default().bg(Color::White));
    }
}

/// "Less" then one block per palette level then "More", centered.
pub fn draw_legend<S: Surface>(surface: &mut S, session: &Session, row: u16) {
    let cell = " ".repeat(usize::from(session.screen().cell_width()));
    let colors = session.colors();
    let total = "Less ".len() + colors.len() * (cell.len() + 1) + "More".len();
    let mut col = surface.width().saturating_sub(total as u16) / 2;
    let dim = Style::default().fg(Color::DarkGray);

    surface.put(row, col, "Less ", dim);
    col += 5;
    for bg in colors {
        surface.put(row, col, &cell, cell_style(*bg));
        col += cell.len() as u16 + 1;
    }
    surface.put(row, col, "More", dim);
}

/// Last row: the selected date followed by its committers or a notice.
pub fn draw_footer<S: Surface>(surface: &mut S, session: &Session) {
    let row = surface.height().saturating_sub(1);
    let footer = session.footer();
    let mut col = 0;
    if let Some(day) = footer.day() {
        let date = day.format(FOOTER_DATE_FORMAT).to_string();
        surface.put(row, 0, &date, Style::default().add_modifier(Modifier::BOLD));
        col = date.width() as u16 + 1;
    }
    match footer {
        Footer::Message(text) => surface.put(row, col, text, Style::default()),
        Footer::NoCommits(_) => surface.put(row, col, "No commits", Style::default()),
        Footer::EmptyDay(_) => surface.put(row, col, EMPTY_DAY_FOOTER, Style::default()),
        Footer::Committers(_, top) => {
            let label = "Most committers:";
            surface.put(row, col, label, Style::default().add_modifier(Modifier::BOLD));
            col += label.width() as u16 + 1;
            let colors = session.colors();
            for (i, (name, level)) in top.iter().enumerate() {
                if i > 0 {
                    surface.put(row, col, ", ", Style::default());
                    col += 2;
                }
                let bg = colors[usize::from(*level).min(colors.len() - 1)];
                surface.put(row, col, name, Style::default().fg(Color::Indexed(bg)));
                col += name.width() as u16;
            }
        }
    }
}

/// Active weekday and month filters on row 1, when any are set.
fn draw_filters<S: Surface>(surface: &mut S, session: &Session) {
    let mut parts = Vec::new();
    if !session.days().is_empty() {
        parts.push(format!("Days: {}", session.days().names().join(", ")));
    }
    if !session.months().is_empty() {
        let months: Vec<String> = session.months().as_slice().iter().map(|m| m.to_string()).collect();
        parts.push(format!("Months: {}", months.join(", ")));
    }
    if !parts.is_empty() {
        surface.put(1, 0, &parts.join("  "), Style::default().fg(Color::Cyan));
    }
}

/// Draw the whole frame for the current view.
pub fn draw_session<S: Surface>(surface: &mut S, session: &Session) {
    if let ViewMode::Detail(view) = session.mode() {
        draw_detail(surface, view, session.commits_on(view.day));
        return;
    }

    draw_header(surface, &session.title, EXIT_HINT);

    if !session.fits(surface.width()) {
        let message = GitheatError::TerminalTooNarrow {
            required: session.graph_width(),
            available: usize::from(surface.width()),
        }
        .to_string();
        surface.put(surface.height() / 2, 0, &message, Style::default().fg(Color::Red));
        return;
    }

    draw_filters(surface, session);
    draw_grid(surface, session);
    if let Some(bottom) = session.screen().bottom() {
        draw_legend(surface, session, bottom + LEGEND_GAP);
    }
    draw_footer(surface, session);
}
