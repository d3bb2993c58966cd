use anyhow::Result;
use chrono::Weekday;
use clap::Parser;
use std::path::PathBuf;
use tracing::{debug, warn};

use crate::config::{load_config, GraphType, LoadedConfig, Options, Settings};
use crate::error::GitheatError;
use crate::heat::palette::{BlockWidth, PaletteName};
use crate::logging::{self, LogLevel};
use crate::model::parse_day_name;

#[derive(Parser, Debug)]
#[command(name = "githeat")]
#[command(about = "Heatmap of git commit activity over the last year, in your terminal")]
#[command(version)]
pub struct Cli {
    #[arg(long, help = "Path to git repository (defaults to the current directory)")]
    pub repo: Option<PathBuf>,

    #[arg(short, long, help = "Open the interactive calendar")]
    pub interactive: bool,

    #[arg(long, value_enum, help = "Graph type")]
    pub gtype: Option<GraphType>,

    #[arg(long, value_enum, help = "Block width")]
    pub width: Option<BlockWidth>,

    #[arg(
        long,
        num_args = 1..,
        value_parser = parse_day_arg,
        help = "Only count these weekdays (e.g. Sun Tues Thurs)"
    )]
    pub days: Vec<Weekday>,

    #[arg(long, value_enum, help = "Color palette")]
    pub color: Option<PaletteName>,

    #[arg(short, long, help = "Show top committers")]
    pub stat: bool,

    #[arg(long, help = "Number of top committers to show (default 5)")]
    pub stat_number: Option<usize>,

    #[arg(short = 'b', long, help = "Separate blocks with spaces and blank lines")]
    pub separate: bool,

    #[arg(long, help = "Pack weeks without blank columns between months")]
    pub month_merge: bool,

    #[arg(long, help = "Do not print the legend")]
    pub hide_legend: bool,

    #[arg(short, long, help = "Only count commits whose author matches this pattern")]
    pub author: Option<String>,

    #[arg(short, long, help = "Only count commits whose subject matches this regex")]
    pub grep: Option<String>,

    #[arg(short, long, help = "YAML config file; repeat to stack files")]
    pub config: Vec<PathBuf>,

    #[arg(long, value_enum, help = "Log level")]
    pub logging: Option<LogLevel>,

    #[arg(long, help = "Output as JSON")]
    pub json: bool,
}

fn parse_day_arg(input: &str) -> std::result::Result<Weekday, String> {
    parse_day_name(input).map_err(|e| e.to_string())
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Settings layer carrying only the flags given on the command line.
    pub fn overrides(&self) -> Settings {
        Settings {
            gtype: self.gtype,
            width: self.width,
            days: (!self.days.is_empty()).then(|| self.days.iter().map(|d| d.to_string()).collect()),
            color: self.color,
            colors: None,
            stat: self.stat.then_some(true),
            stat_number: self.stat_number,
            separate: self.separate.then_some(true),
            month_merge: self.month_merge.then_some(true),
            hide_legend: self.hide_legend.then_some(true),
            author: self.author.clone(),
            grep: self.grep.clone(),
            logging_level: self.logging,
        }
    }

    /// Defaults, then config files, then flags.
    pub fn options(&self) -> Result<(Options, LoadedConfig)> {
        let mut loaded = load_config(&self.config)?;
        let settings = std::mem::take(&mut loaded.settings).merge(self.overrides());
        let mut options = Options::from_settings(settings)?;
        options.repo = self.repo.clone();
        options.interactive = self.interactive;
        options.json = self.json;
        Ok((options, loaded))
    }

    pub fn execute(self) -> Result<()> {
        let (options, loaded) = self.options()?;
        logging::init(options.logging_level);
        for path in &loaded.sources {
            debug!(path = %path.display(), "loaded config file");
        }
        for path in &loaded.empty {
            warn!(path = %path.display(), "config file is empty");
        }
        debug!(?options, "resolved options");

        let result = if options.interactive {
            crate::tui::run(&options)
        } else {
            crate::heat::exec(&options)
        };

        let Err(err) = result else {
            return Ok(());
        };
        match err.downcast_ref::<GitheatError>() {
            Some(e) if e.is_graceful() => {
                println!("{e}");
                Ok(())
            }
            Some(e) if matches!(e, GitheatError::RepositoryUnavailable(_)) => {
                eprintln!("{e}");
                std::process::exit(1);
            }
            _ => Err(err),
        }
    }
}
