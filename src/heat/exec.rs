use anyhow::Context;
use chrono::{Local, NaiveDate};
use console::Term;
use regex::Regex;
use std::path::PathBuf;
use tracing::{info, warn};

use super::contrib::{ContributionMap, MonthSet};
use super::matrix::{build_matrix, MatrixOptions};
use super::output::{output_json, render_block, render_inline, render_legend, render_stats, BlockLayout};
use super::parse::{CommitFilter, CommitIndex};
use crate::config::{GraphType, Options};
use crate::error::{GitheatError, Result};
use crate::git::GitLog;

/// Parsed history of one repository.
pub struct History {
    pub path: PathBuf,
    pub index: CommitIndex,
}

pub fn commit_filter(options: &Options) -> Result<CommitFilter> {
    let grep = options.grep.as_deref().map(Regex::new).transpose()?;
    Ok(CommitFilter {
        days: options.days,
        grep,
    })
}

/// Read and parse the trailing year of history for `options.repo`.
pub fn load_history(options: &Options) -> anyhow::Result<History> {
    let log = GitLog::open(options.repo.as_ref())?
        .with_author(options.author.clone())
        .with_progress(!options.json);
    let raw = log.read()?;
    let filter = commit_filter(options).context("Invalid --grep pattern")?;
    let index = CommitIndex::parse(&raw, &filter)?;
    info!(commits = index.total_commits(), days = index.day_count(), "loaded history");
    Ok(History {
        path: log.path().to_path_buf(),
        index,
    })
}

/// Everything the static modes print for `index`, ending at `today`.
///
/// `term_width` is checked against the block graph width when known.
pub fn render(
    options: &Options,
    history: &History,
    today: NaiveDate,
    term_width: Option<usize>,
) -> Result<String> {
    let mut map = ContributionMap::initialize(today);
    map.compute(&history.index, &options.days, &MonthSet::new());

    if options.json {
        let counts = map.clone();
        map.normalize();
        let stat_number = options.stat.then_some(options.stat_number);
        let path = history.path.display().to_string();
        let mut json = output_json(&counts, &map, &history.index, &path, stat_number)?;
        json.push('\n');
        return Ok(json);
    }

    map.normalize();
    let palette = options.palette();
    let colors = palette.current();
    let mut out = String::new();

    match options.gtype {
        GraphType::Inline => {
            out.push_str(&render_inline(&map, colors, options.width.columns(), today));
        }
        GraphType::Block => {
            let matrix = build_matrix(
                &map,
                colors,
                MatrixOptions {
                    width: options.width,
                    separate_months: true,
                },
            );
            let required = matrix.display_width(options.month_merge);
            if let Some(available) = term_width {
                if required > available {
                    warn!(required, available, "graph wider than terminal");
                    return Err(GitheatError::TerminalTooNarrow { required, available });
                }
            }
            let layout = BlockLayout {
                month_merge: options.month_merge,
                separate: options.separate,
            };
            out.push_str(&render_block(&matrix, layout));
            if !options.hide_legend {
                out.push('\n');
                out.push_str(&render_legend(colors, options.width.columns()));
            }
        }
    }

    if options.stat {
        out.push('\n');
        out.push_str(&render_stats(&history.index, options.stat_number));
    }
    Ok(out)
}

pub fn exec(options: &Options) -> anyhow::Result<()> {
    let history = load_history(options)?;
    let term = Term::stdout();
    let term_width = term.size_checked().map(|(_, cols)| cols as usize);
    let text = render(options, &history, Local::now().date_naive(), term_width)?;
    term.write_str(&text).context("Failed to write heatmap")?;
    Ok(())
}
