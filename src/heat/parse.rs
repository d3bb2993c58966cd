use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate};
use regex::Regex;
use tracing::debug;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::error::{GitheatError, Result};
use crate::model::{Commit, DaySet};

/// Field separator used in the `git log --pretty` format string.
pub const DELIMITER: &str = "<githeat_delimiter>";

/// Filters applied while records are placed in the index.
#[derive(Debug, Clone, Default)]
pub struct CommitFilter {
    pub days: DaySet,
    pub grep: Option<Regex>,
}

impl CommitFilter {
    pub fn accepts(&self, commit: &Commit) -> bool {
        if !self.days.allows(commit.timestamp.weekday()) {
            return false;
        }
        match &self.grep {
            Some(pattern) => pattern.is_match(&commit.subject),
            None => true,
        }
    }
}

/// Strip one pair of single quotes wrapping the whole record.
fn unquote(line: &str) -> &str {
    line.strip_prefix('\'')
        .and_then(|inner| inner.strip_suffix('\''))
        .unwrap_or(line)
}

/// Commits grouped by calendar day, in log order within a day.
#[derive(Debug, Clone, Default)]
pub struct CommitIndex {
    by_day: BTreeMap<NaiveDate, Vec<Commit>>,
}

impl CommitIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse raw `git log` output into an index.
    ///
    /// Returns `EmptyHistory` when the log holds no records at all. Records that
    /// exist but are all rejected by `filter` yield an empty, valid index.
    pub fn parse(raw: &str, filter: &CommitFilter) -> Result<Self> {
        let mut index = Self::new();
        let mut records = 0usize;

        for line in raw.lines() {
            let line = unquote(line.trim_end_matches('\r'));
            if line.trim().is_empty() {
                continue;
            }
            let commit = parse_record(line)?;
            records += 1;
            if filter.accepts(&commit) {
                index.insert(commit);
            }
        }

        if records == 0 {
            return Err(GitheatError::EmptyHistory);
        }

        debug!(
            records,
            days = index.by_day.len(),
            kept = index.total_commits(),
            "parsed commit log"
        );
        Ok(index)
    }

    pub fn insert(&mut self, commit: Commit) {
        self.by_day.entry(commit.day()).or_default().push(commit);
    }

    /// Commits on `day`, empty when there are none.
    pub fn get(&self, day: NaiveDate) -> &[Commit] {
        self.by_day.get(&day).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn days(&self) -> impl Iterator<Item = (NaiveDate, &[Commit])> + '_ {
        self.by_day.iter().map(|(day, commits)| (*day, commits.as_slice()))
    }

    pub fn commits(&self) -> impl Iterator<Item = &Commit> + '_ {
        self.by_day.values().flatten()
    }

    pub fn day_count(&self) -> usize {
        self.by_day.len()
    }

    pub fn total_commits(&self) -> usize {
        self.by_day.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_day.is_empty()
    }
}

fn parse_record(line: &str) -> Result<Commit> {
    let cleaned = strip_accents(line);
    let fields: Vec<&str> = cleaned.splitn(5, DELIMITER).collect();
    let [hash, timestamp, author, email, subject] = fields.as_slice() else {
        return Err(GitheatError::MalformedRecord(line.to_string()));
    };

    Ok(Commit {
        short_hash: hash.trim().to_string(),
        timestamp: parse_timestamp(timestamp)?,
        author: author.to_string(),
        author_email: email.to_string(),
        subject: subject.to_string(),
    })
}

/// Decompose accented characters and drop the combining marks ("José" -> "Jose").
pub fn strip_accents(input: &str) -> String {
    input.nfkd().filter(|c| !is_combining_mark(*c)).collect()
}

pub fn parse_timestamp(input: &str) -> Result<DateTime<FixedOffset>> {
    let input = input.trim();
    if let Ok(ts) = DateTime::parse_from_str(input, "%Y-%m-%d %H:%M:%S %z") {
        return Ok(ts);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(input) {
        return Ok(ts);
    }
    if let Ok(ts) = DateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S%z") {
        return Ok(ts);
    }
    Err(GitheatError::InvalidTimestamp(input.to_string()))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::Weekday;
    use pretty_assertions::assert_eq;

    pub(crate) fn log_line(hash: &str, ts: &str, author: &str, subject: &str) -> String {
        format!(
            "{hash}{d}{ts}{d}{author}{d}{email}{d}{subject}",
            d = DELIMITER,
            email = format!("{}@example.com", author.to_lowercase())
        )
    }

    #[test]
    fn groups_commits_by_day_in_log_order() {
        let raw = [
            log_line("a1", "2024-03-03 18:00:00 +0100", "Ann", "third"),
            log_line("a2", "2024-03-03 09:00:00 +0100", "Bob", "second"),
            log_line("a3", "2024-03-01 12:00:00 +0000", "Ann", "first"),
        ]
        .join("\n");

        let index = CommitIndex::parse(&raw, &CommitFilter::default()).unwrap();
        let day = NaiveDate::from_ymd_opt(2024, 3, 3).unwrap();
        let hashes: Vec<_> = index.get(day).iter().map(|c| c.short_hash.as_str()).collect();
        assert_eq!(hashes, vec!["a1", "a2"]);
        assert_eq!(index.day_count(), 2);
        assert_eq!(index.total_commits(), 3);
    }

    #[test]
    fn empty_log_is_empty_history() {
        let err = CommitIndex::parse("\n\n", &CommitFilter::default()).unwrap_err();
        assert!(matches!(err, GitheatError::EmptyHistory));
    }

    #[test]
    fn everything_filtered_out_is_valid_but_empty() {
        let raw = log_line("a1", "2024-03-04 10:00:00 +0000", "Ann", "monday work");
        let filter = CommitFilter {
            days: DaySet::from_weekdays([Weekday::Sun]),
            grep: None,
        };
        let index = CommitIndex::parse(&raw, &filter).unwrap();
        assert!(index.is_empty());
    }

    #[test]
    fn grep_matches_subject() {
        let raw = [
            log_line("a1", "2024-03-04 10:00:00 +0000", "Ann", "fix parser"),
            log_line("a2", "2024-03-04 11:00:00 +0000", "Ann", "add docs"),
        ]
        .join("\n");
        let filter = CommitFilter {
            days: DaySet::new(),
            grep: Some(Regex::new("^fix").unwrap()),
        };
        let index = CommitIndex::parse(&raw, &filter).unwrap();
        assert_eq!(index.total_commits(), 1);
    }

    #[test]
    fn accents_are_stripped_before_splitting() {
        let raw = log_line("a1", "2024-03-04 10:00:00 +0000", "José Müller", "résumé");
        let index = CommitIndex::parse(&raw, &CommitFilter::default()).unwrap();
        let commit = index.commits().next().unwrap();
        assert_eq!(commit.author, "Jose Muller");
        assert_eq!(commit.subject, "resume");
    }

    #[test]
    fn quoted_lines_and_delimiter_in_subject() {
        let raw = format!(
            "'{}'",
            log_line("a1", "2024-03-04 10:00:00 +0000", "Ann", "a <githeat_delimiter> b")
        );
        let index = CommitIndex::parse(&raw, &CommitFilter::default()).unwrap();
        assert_eq!(index.commits().next().unwrap().subject, "a <githeat_delimiter> b");
    }

    #[test]
    fn quotes_inside_subject_survive() {
        let raw = log_line("a1", "2024-03-04 10:00:00 +0000", "Ann", "Revert 'feature'");
        let index = CommitIndex::parse(&raw, &CommitFilter::default()).unwrap();
        assert_eq!(index.commits().next().unwrap().subject, "Revert 'feature'");

        let wrapped = format!("'{raw}'");
        let index = CommitIndex::parse(&wrapped, &CommitFilter::default()).unwrap();
        assert_eq!(index.commits().next().unwrap().subject, "Revert 'feature'");
    }

    #[test]
    fn day_uses_commit_local_offset() {
        let raw = log_line("a1", "2024-03-04 23:30:00 -0800", "Ann", "late");
        let index = CommitIndex::parse(&raw, &CommitFilter::default()).unwrap();
        let day = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        assert_eq!(index.get(day).len(), 1);
    }

    #[test]
    fn malformed_records_are_rejected() {
        let err = CommitIndex::parse("just some text", &CommitFilter::default()).unwrap_err();
        assert!(matches!(err, GitheatError::MalformedRecord(_)));

        let raw = log_line("a1", "yesterday", "Ann", "x");
        let err = CommitIndex::parse(&raw, &CommitFilter::default()).unwrap_err();
        assert!(matches!(err, GitheatError::InvalidTimestamp(_)));
    }

    #[test]
    fn accepts_rfc3339_timestamps() {
        let ts = parse_timestamp("2024-03-04T10:00:00+02:00").unwrap();
        assert_eq!(ts.date_naive(), NaiveDate::from_ymd_opt(2024, 3, 4).unwrap());
    }
}
