use chrono::NaiveDate;
use ratatui::style::{Color, Modifier, Style};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::super::draw::{draw_header, Surface};
use crate::model::Commit;

/// First terminal row holding a commit line.
pub const FIRST_ROW: u16 = 2;

const RETURN_HINT: &str = "ESC, to return";

/// Scroll state of the commit list for one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetailView {
    pub day: NaiveDate,
    pub offset: usize,
}

impl DetailView {
    pub fn new(day: NaiveDate) -> Self {
        Self { day, offset: 0 }
    }

    pub fn scroll_up(&mut self) {
        self.offset = self.offset.saturating_sub(1);
    }

    /// Scroll one line while lines remain below a window of `visible` rows.
    pub fn scroll_down(&mut self, total: usize, visible: usize) {
        if total.saturating_sub(self.offset) > visible {
            self.offset += 1;
        }
    }
}

/// Cut `text` to at most `max` display columns.
pub fn truncate_to_width(text: &str, max: usize) -> String {
    let mut used = 0;
    let mut out = String::new();
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > max {
            break;
        }
        used += w;
        out.push(c);
    }
    out
}

/// One commit as `hash time subject author <email>`, fitted into `width` columns.
///
/// Overflow is taken from the email first, then the author, then the subject.
pub fn fit_commit_line(commit: &Commit, width: usize) -> String {
    let hash = commit.short_hash.clone();
    let time = commit.timestamp.format("%H:%M:%S %z").to_string();
    let mut subject = commit.subject.clone();
    let mut author = commit.author.clone();
    let mut email = format!("<{}>", commit.author_email);

    let line = |subject: &str, author: &str, email: &str| {
        [hash.as_str(), time.as_str(), subject, author, email]
            .into_iter()
            .filter(|p| !p.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    };

    let mut excess = line(&subject, &author, &email).width().saturating_sub(width);
    for step in 0..3 {
        if excess == 0 {
            break;
        }
        let field = match step {
            0 => &mut email,
            1 => &mut author,
            _ => &mut subject,
        };
        // an emptied field also loses its separating space
        let keep = field.width().saturating_sub(excess);
        *field = truncate_to_width(field, keep);
        excess = line(&subject, &author, &email).width().saturating_sub(width);
    }

    truncate_to_width(&line(&subject, &author, &email), width)
}

/// Header plus the visible slice of commit lines.
pub fn draw_detail<S: Surface>(surface: &mut S, view: &DetailView, commits: &[Commit]) {
    let title = view.day.format("%b %d, %Y").to_string();
    draw_header(surface, &title, RETURN_HINT);

    let width = usize::from(surface.width());
    let rows = surface.height().saturating_sub(FIRST_ROW);
    let hash_style = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);

    for (i, commit) in commits.iter().skip(view.offset).take(usize::from(rows)).enumerate() {
        let row = FIRST_ROW + i as u16;
        let text = fit_commit_line(commit, width);
        let hash_len = commit.short_hash.len().min(text.len());
        let (hash, rest) = text.split_at(hash_len);
        surface.put(row, 0, hash, hash_style);
        surface.put(row, hash.width() as u16, rest, Style::default());
    }
}
