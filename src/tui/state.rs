use chrono::{Datelike, NaiveDate};
use tracing::debug;

use super::events::{Command, DetailCommand};
use super::navigation::navigate;
use super::screen::{Pos, Screen};
use super::views::detail::DetailView;
use crate::config::Options;
use crate::heat::contrib::{ContributionMap, MonthSet};
use crate::heat::matrix::{build_matrix, Matrix, MatrixOptions};
use crate::heat::palette::{BlockWidth, ColorScale, PaletteCycle};
use crate::heat::parse::CommitIndex;
use crate::heat::rank::top_committers_normalized;
use crate::model::{Commit, DaySet, YearMonth};

/// Rows between the last graph row and the legend.
pub const LEGEND_GAP: u16 = 5;

pub const FOOTER_COMMITTERS: usize = 5;

pub const INITIAL_FOOTER: &str = "Please move cursor to navigate through map";
pub const EMPTY_DAY_FOOTER: &str = "Please choose a date with contributions";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Footer {
    Message(String),
    /// Top committers of the day with emphasis levels 1..=5.
    Committers(NaiveDate, Vec<(String, u8)>),
    NoCommits(NaiveDate),
    /// Selection attempted on a day without commits.
    EmptyDay(NaiveDate),
}

impl Footer {
    pub fn day(&self) -> Option<NaiveDate> {
        match self {
            Footer::Message(_) => None,
            Footer::Committers(day, _) | Footer::NoCommits(day) | Footer::EmptyDay(day) => {
                Some(*day)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewMode {
    Grid,
    Detail(DetailView),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Everything the interactive calendar needs between two key presses.
pub struct Session {
    pub title: String,
    index: CommitIndex,
    map: ContributionMap,
    matrix: Matrix,
    palette: PaletteCycle,
    width: BlockWidth,
    month_merge: bool,
    days: DaySet,
    months: MonthSet,
    screen: Screen,
    size: (u16, u16),
    cursor: Option<Pos>,
    footer: Footer,
    mode: ViewMode,
}

impl Session {
    pub fn new(index: CommitIndex, options: &Options, today: NaiveDate, title: String) -> Self {
        let months = MonthSet::new();
        let palette = options.palette();
        let mut map = ContributionMap::initialize(today);
        map.compute(&index, &options.days, &months);
        map.normalize();
        let matrix = build_matrix(
            &map,
            palette.current(),
            MatrixOptions {
                width: options.width,
                separate_months: true,
            },
        );

        Self {
            title,
            index,
            map,
            matrix,
            palette,
            width: options.width,
            month_merge: options.month_merge,
            days: options.days,
            months,
            screen: Screen::default(),
            size: (0, 0),
            cursor: None,
            footer: Footer::Message(INITIAL_FOOTER.to_string()),
            mode: ViewMode::Grid,
        }
    }

    /// Recount the map under the current filters and rebuild the matrix.
    pub fn recompute(&mut self) {
        self.map.recompute(&self.index, &self.days, &self.months);
        self.map.normalize();
        self.rebuild();
    }

    fn rebuild(&mut self) {
        self.matrix = build_matrix(
            &self.map,
            self.palette.current(),
            MatrixOptions {
                width: self.width,
                separate_months: true,
            },
        );
    }

    /// Terminal columns the graph needs.
    pub fn graph_width(&self) -> usize {
        self.matrix.display_width(self.month_merge)
    }

    pub fn fits(&self, width: u16) -> bool {
        self.graph_width() <= usize::from(width)
    }

    /// Lay the graph out for a `width` x `height` terminal.
    ///
    /// The screen maps are replaced wholesale and the cursor is kept only if
    /// it still sits on a populated cell.
    pub fn layout(&mut self, width: u16, height: u16) {
        self.size = (width, height);
        let graph_width = self.graph_width().min(usize::from(width)) as u16;
        let origin = Pos::new(
            (height / 2).saturating_sub(3),
            (width - graph_width) / 2,
        );
        self.screen = Screen::build(&self.matrix, origin, self.month_merge);

        let keep = self.cursor.filter(|pos| self.screen.is_populated(*pos));
        self.cursor = keep.or_else(|| self.screen.latest());
    }

    pub fn center(&self) -> Pos {
        Pos::new(self.size.1 / 2, self.size.0 / 2)
    }

    pub fn handle(&mut self, command: Command) -> Flow {
        match command {
            Command::Quit => return Flow::Quit,
            Command::Move(nav) => {
                let Some(cursor) = self.cursor else {
                    return Flow::Continue;
                };
                if let Some(next) = navigate(&self.screen, cursor, nav, self.center()) {
                    self.cursor = Some(next);
                    if let Some(day) = self.screen.date_at(next) {
                        self.footer = self.footer_for(day);
                    }
                }
            }
            Command::ToggleDay(row) => self.toggle_day(row),
            Command::ToggleMonth(n) => self.toggle_month(n),
            Command::SwitchPalette => self.switch_palette(),
            Command::Select => {
                if let Some(day) = self.selected_day() {
                    self.open_detail(day);
                }
            }
        }
        Flow::Continue
    }

    pub fn handle_detail(&mut self, command: DetailCommand) -> Flow {
        let visible = self.detail_rows();
        let total = match &self.mode {
            ViewMode::Detail(view) => self.commits_on(view.day).len(),
            ViewMode::Grid => return Flow::Continue,
        };
        match command {
            DetailCommand::Quit => return Flow::Quit,
            DetailCommand::Back => self.mode = ViewMode::Grid,
            DetailCommand::ScrollUp | DetailCommand::ScrollDown => {
                if let ViewMode::Detail(view) = &mut self.mode {
                    if command == DetailCommand::ScrollUp {
                        view.scroll_up();
                    } else {
                        view.scroll_down(total, visible);
                    }
                }
            }
        }
        Flow::Continue
    }

    pub fn toggle_day(&mut self, row: usize) {
        self.days.toggle(row);
        debug!(days = ?self.days.names(), "toggled weekday filter");
        self.recompute();
    }

    pub fn toggle_month(&mut self, n: usize) {
        let known: Vec<YearMonth> = self.map.months().to_vec();
        self.months.toggle(&known, n);
        debug!(months = ?self.months.as_slice(), "toggled month filter");
        self.recompute();
    }

    pub fn switch_palette(&mut self) {
        self.palette.advance();
        debug!(palette = self.palette.index(), "switched palette");
        self.rebuild();
        if let Some(day) = self.selected_day() {
            self.footer = self.footer_for(day);
        }
    }

    /// Open the commit list for `day`, or explain why there is none.
    pub fn open_detail(&mut self, day: NaiveDate) {
        if self.commits_on(day).is_empty() {
            self.footer = Footer::EmptyDay(day);
            return;
        }
        self.mode = ViewMode::Detail(DetailView::new(day));
    }

    /// Commits of `day` that pass the active weekday and month filters.
    pub fn commits_on(&self, day: NaiveDate) -> &[Commit] {
        if !self.days.allows(day.weekday()) || !self.months.allows(YearMonth::of(day)) {
            return &[];
        }
        self.index.get(day)
    }

    pub fn footer_for(&self, day: NaiveDate) -> Footer {
        match top_committers_normalized(self.commits_on(day), FOOTER_COMMITTERS) {
            Some(top) => Footer::Committers(day, top),
            None => Footer::NoCommits(day),
        }
    }

    pub fn selected_day(&self) -> Option<NaiveDate> {
        self.cursor.and_then(|pos| self.screen.date_at(pos))
    }

    /// Commit rows visible in the detail view below its header.
    pub fn detail_rows(&self) -> usize {
        usize::from(self.size.1.saturating_sub(super::views::detail::FIRST_ROW))
    }

    pub fn colors(&self) -> &ColorScale {
        self.palette.current()
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn matrix(&self) -> &Matrix {
        &self.matrix
    }

    pub fn map(&self) -> &ContributionMap {
        &self.map
    }

    pub fn cursor(&self) -> Option<Pos> {
        self.cursor
    }

    pub fn footer(&self) -> &Footer {
        &self.footer
    }

    pub fn mode(&self) -> &ViewMode {
        &self.mode
    }

    pub fn days(&self) -> &DaySet {
        &self.days
    }

    pub fn months(&self) -> &MonthSet {
        &self.months
    }

    pub fn size(&self) -> (u16, u16) {
        self.size
    }
}
