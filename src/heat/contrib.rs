use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use tracing::debug;

use super::normalize::normalize_map;
use super::parse::CommitIndex;
use crate::model::{DaySet, YearMonth};

/// Days looked back from the window end before anchoring on a Sunday.
pub const LOOKBACK_DAYS: i64 = 365 + 7;

/// Highest contribution level; levels index a six-entry palette.
pub const MAX_LEVEL: u8 = 5;

/// First Sunday on or after `window_end - LOOKBACK_DAYS`.
pub fn window_start(window_end: NaiveDate) -> NaiveDate {
    let mut day = window_end - Duration::days(LOOKBACK_DAYS);
    while day.weekday() != Weekday::Sun {
        day += Duration::days(1);
    }
    day
}

/// Months selected for display, kept in chronological order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonthSet {
    selected: Vec<YearMonth>,
}

impl MonthSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip membership of the `n`-th entry of `known`. Unknown indices are ignored.
    pub fn toggle(&mut self, known: &[YearMonth], n: usize) {
        let Some(month) = known.get(n).copied() else {
            return;
        };
        if let Some(pos) = self.selected.iter().position(|m| *m == month) {
            self.selected.remove(pos);
        } else {
            self.selected.push(month);
            self.selected.sort();
        }
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn allows(&self, month: YearMonth) -> bool {
        self.selected.is_empty() || self.selected.contains(&month)
    }

    pub fn as_slice(&self) -> &[YearMonth] {
        &self.selected
    }
}

/// Per-day contribution values over the trailing window.
///
/// Holds raw commit counts after [`compute`](Self::compute) and integer levels
/// `0..=MAX_LEVEL` after [`normalize`](Self::normalize).
#[derive(Debug, Clone, PartialEq)]
pub struct ContributionMap {
    values: BTreeMap<NaiveDate, f64>,
    months: Vec<YearMonth>,
}

impl ContributionMap {
    /// Zero entry for every day from the Sunday-anchored window start through `window_end`.
    pub fn initialize(window_end: NaiveDate) -> Self {
        Self::with_range(window_start(window_end), window_end)
    }

    /// Zero entry for every day in `start..=end`, without Sunday anchoring.
    pub fn with_range(start: NaiveDate, window_end: NaiveDate) -> Self {
        let mut values = BTreeMap::new();
        let mut months: Vec<YearMonth> = Vec::new();

        let mut day = start;
        while day <= window_end {
            let month = YearMonth::of(day);
            if months.last() != Some(&month) {
                months.push(month);
            }
            values.insert(day, 0.0);
            day += Duration::days(1);
        }

        debug!(%start, end = %window_end, days = values.len(), "initialized contribution map");
        Self { values, months }
    }

    /// Set every existing entry back to zero without touching the key set.
    pub fn reset(&mut self) {
        for value in self.values.values_mut() {
            *value = 0.0;
        }
    }

    /// Add each qualifying day's commit count. Days outside the window are ignored.
    pub fn compute(&mut self, index: &CommitIndex, days: &DaySet, months: &MonthSet) {
        for (day, commits) in index.days() {
            if !days.allows(day.weekday()) || !months.allows(YearMonth::of(day)) {
                continue;
            }
            if let Some(value) = self.values.get_mut(&day) {
                *value += commits.len() as f64;
            }
        }
        debug!(total = self.total(), "computed contributions");
    }

    pub fn recompute(&mut self, index: &CommitIndex, days: &DaySet, months: &MonthSet) {
        self.reset();
        self.compute(index, days, months);
    }

    /// Rescale values onto contribution levels `0..=MAX_LEVEL`.
    pub fn normalize(&mut self) {
        normalize_map(&mut self.values, 0.0, f64::from(MAX_LEVEL));
    }

    pub fn get(&self, day: NaiveDate) -> Option<f64> {
        self.values.get(&day).copied()
    }

    /// Level of `day` clamped onto the palette range.
    pub fn level(&self, day: NaiveDate) -> Option<u8> {
        self.get(day)
            .map(|v| v.clamp(0.0, f64::from(MAX_LEVEL)) as u8)
    }

    /// Days in ascending order with their current value.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.values.iter().map(|(day, value)| (*day, *value))
    }

    pub fn first_day(&self) -> Option<NaiveDate> {
        self.values.keys().next().copied()
    }

    pub fn last_day(&self) -> Option<NaiveDate> {
        self.values.keys().next_back().copied()
    }

    /// Distinct months of the window in chronological order.
    pub fn months(&self) -> &[YearMonth] {
        &self.months
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn total(&self) -> f64 {
        self.values.values().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heat::parse::tests::log_line;
    use crate::heat::parse::CommitFilter;
    use pretty_assertions::assert_eq;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn index_from(lines: &[String]) -> CommitIndex {
        CommitIndex::parse(&lines.join("\n"), &CommitFilter::default()).unwrap()
    }

    #[test]
    fn window_starts_on_first_sunday_and_ends_today() {
        let today = ymd(2024, 6, 12);
        let map = ContributionMap::initialize(today);
        let first = map.first_day().unwrap();
        assert_eq!(first.weekday(), Weekday::Sun);
        assert!(first >= today - Duration::days(LOOKBACK_DAYS));
        assert!(first - Duration::days(7) < today - Duration::days(LOOKBACK_DAYS));
        assert_eq!(map.last_day(), Some(today));
        assert_eq!(map.len() as i64, (today - first).num_days() + 1);
        assert!(map.iter().all(|(_, v)| v == 0.0));
    }

    #[test]
    fn months_are_distinct_and_chronological() {
        let map = ContributionMap::initialize(ymd(2024, 6, 12));
        let months = map.months();
        assert_eq!(months.first(), Some(&YearMonth { year: 2023, month: 6 }));
        assert_eq!(months.last(), Some(&YearMonth { year: 2024, month: 6 }));
        assert_eq!(months.len(), 13);
        assert!(months.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn compute_counts_commits_per_day() {
        let mut map = ContributionMap::initialize(ymd(2024, 6, 12));
        let index = index_from(&[
            log_line("a", "2024-06-02 10:00:00 +0000", "Ann", "x"),
            log_line("b", "2024-06-02 11:00:00 +0000", "Ann", "y"),
            log_line("c", "2024-06-03 11:00:00 +0000", "Bob", "z"),
            log_line("d", "2020-01-01 11:00:00 +0000", "Bob", "outside"),
        ]);
        map.compute(&index, &DaySet::new(), &MonthSet::new());
        assert_eq!(map.get(ymd(2024, 6, 2)), Some(2.0));
        assert_eq!(map.get(ymd(2024, 6, 3)), Some(1.0));
        assert_eq!(map.get(ymd(2020, 1, 1)), None);
    }

    #[test]
    fn day_and_month_filters_restrict_counts() {
        let index = index_from(&[
            log_line("a", "2024-06-02 10:00:00 +0000", "Ann", "sunday"),
            log_line("b", "2024-06-03 11:00:00 +0000", "Ann", "monday"),
            log_line("c", "2024-05-05 11:00:00 +0000", "Bob", "may sunday"),
        ]);
        let mut map = ContributionMap::initialize(ymd(2024, 6, 12));

        let sundays = DaySet::from_weekdays([Weekday::Sun]);
        map.recompute(&index, &sundays, &MonthSet::new());
        assert_eq!(map.get(ymd(2024, 6, 3)), Some(0.0));
        assert_eq!(map.get(ymd(2024, 5, 5)), Some(1.0));

        let mut months = MonthSet::new();
        let june = map.months().iter().position(|m| m.month == 6 && m.year == 2024).unwrap();
        months.toggle(&map.months().to_vec(), june);
        map.recompute(&index, &sundays, &months);
        assert_eq!(map.get(ymd(2024, 6, 2)), Some(1.0));
        assert_eq!(map.get(ymd(2024, 5, 5)), Some(0.0));
    }

    #[test]
    fn recompute_is_reproducible() {
        let index = index_from(&[log_line("a", "2024-06-02 10:00:00 +0000", "Ann", "x")]);
        let mut map = ContributionMap::initialize(ymd(2024, 6, 12));
        map.recompute(&index, &DaySet::new(), &MonthSet::new());
        let first = map.clone();
        map.recompute(&index, &DaySet::new(), &MonthSet::new());
        assert_eq!(map, first);
    }

    #[test]
    fn reset_keeps_keys() {
        let index = index_from(&[log_line("a", "2024-06-02 10:00:00 +0000", "Ann", "x")]);
        let mut map = ContributionMap::initialize(ymd(2024, 6, 12));
        let len = map.len();
        map.compute(&index, &DaySet::new(), &MonthSet::new());
        map.reset();
        assert_eq!(map.len(), len);
        assert!(map.iter().all(|(_, v)| v == 0.0));
    }

    #[test]
    fn single_sunday_commit_normalizes_to_one_top_cell() {
        let index = index_from(&[log_line("a", "2024-06-02 10:00:00 +0000", "Ann", "x")]);
        let mut map = ContributionMap::initialize(ymd(2024, 6, 12));
        map.compute(&index, &DaySet::new(), &MonthSet::new());
        map.normalize();
        let levels: Vec<u8> = map.iter().filter_map(|(d, _)| map.level(d)).collect();
        assert_eq!(levels.iter().filter(|l| **l == 5).count(), 1);
        assert_eq!(levels.iter().filter(|l| **l == 0).count(), levels.len() - 1);
        assert_eq!(map.level(ymd(2024, 6, 2)), Some(5));
    }

    #[test]
    fn month_toggle_round_trip() {
        let known = vec![YearMonth { year: 2024, month: 5 }, YearMonth { year: 2024, month: 6 }];
        let mut set = MonthSet::new();
        set.toggle(&known, 1);
        set.toggle(&known, 0);
        assert_eq!(set.as_slice(), known.as_slice());
        set.toggle(&known, 0);
        set.toggle(&known, 1);
        set.toggle(&known, 9);
        assert!(set.is_empty());
    }
}
