use std::collections::HashMap;

use super::normalize::normalize_pairs;
use crate::model::Commit;

/// Lowest and highest emphasis level used when highlighting committers.
pub const HIGHLIGHT_RANGE: (f64, f64) = (1.0, 5.0);

/// The `n` most frequent authors in `commits`, ties kept in first-seen order.
///
/// Returns `None` when `commits` is empty.
pub fn top_committers<'a, I>(commits: I, n: usize) -> Option<Vec<(String, u32)>>
where
    I: IntoIterator<Item = &'a Commit>,
{
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, u32> = HashMap::new();

    for commit in commits {
        let count = counts.entry(commit.author.as_str()).or_insert_with(|| {
            order.push(commit.author.as_str());
            0
        });
        *count += 1;
    }

    if order.is_empty() {
        return None;
    }

    let mut ranked: Vec<(String, u32)> = order
        .into_iter()
        .map(|author| (author.to_string(), counts[author]))
        .collect();
    // stable sort keeps first-seen order among equal counts
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(n);
    Some(ranked)
}

/// Like [`top_committers`] with counts rescaled onto emphasis levels 1..=5.
pub fn top_committers_normalized<'a, I>(commits: I, n: usize) -> Option<Vec<(String, u8)>>
where
    I: IntoIterator<Item = &'a Commit>,
{
    let ranked = top_committers(commits, n)?;
    let mut pairs: Vec<(String, f64)> = ranked
        .into_iter()
        .map(|(author, count)| (author, f64::from(count)))
        .collect();
    normalize_pairs(&mut pairs, HIGHLIGHT_RANGE.0, HIGHLIGHT_RANGE.1);
    Some(
        pairs
            .into_iter()
            .map(|(author, level)| (author, level.clamp(HIGHLIGHT_RANGE.0, HIGHLIGHT_RANGE.1) as u8))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use pretty_assertions::assert_eq;

    fn by(author: &str) -> Commit {
        Commit {
            short_hash: "abc1234".to_string(),
            timestamp: DateTime::parse_from_rfc3339("2024-05-01T10:00:00+00:00").unwrap(),
            author: author.to_string(),
            author_email: format!("{author}@example.com"),
            subject: "work".to_string(),
        }
    }

    fn commits(counts: &[(&str, usize)]) -> Vec<Commit> {
        counts.iter()
            .flat_map(|(name, times)| std::iter::repeat_with(|| by(name)).take(*times))
            .collect()
    }

    #[test]
    fn empty_commits_rank_to_none() {
        assert_eq!(top_committers(&Vec::<Commit>::new(), 5), None);
        assert_eq!(top_committers_normalized(&Vec::<Commit>::new(), 5), None);
    }

    #[test]
    fn ties_keep_first_seen_order() {
        let list = commits(&[("James", 3), ("John", 1), ("JJ", 1)]);
        assert_eq!(
            top_committers(&list, 5),
            Some(vec![
                ("James".to_string(), 3),
                ("John".to_string(), 1),
                ("JJ".to_string(), 1),
            ])
        );

        let interleaved = vec![by("Zed"), by("Amy"), by("Amy"), by("Zed"), by("Bo")];
        let ranked = top_committers(&interleaved, 5).unwrap();
        let names: Vec<&str> = ranked.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["Zed", "Amy", "Bo"]);
    }

    #[test]
    fn never_returns_more_than_n() {
        let list = commits(&[("a", 1), ("b", 2), ("c", 3), ("d", 4)]);
        let ranked = top_committers(&list, 2).unwrap();
        assert_eq!(ranked, vec![("d".to_string(), 4), ("c".to_string(), 3)]);
        assert_eq!(top_committers(&list, 0), Some(Vec::new()));
    }

    #[test]
    fn normalized_counts_land_on_highlight_scale() {
        let list = commits(&[("James", 30), ("John", 10), ("JJ", 5)]);
        assert_eq!(
            top_committers_normalized(&list, 5),
            Some(vec![
                ("James".to_string(), 5),
                ("John".to_string(), 2),
                ("JJ".to_string(), 1),
            ])
        );
    }
}
