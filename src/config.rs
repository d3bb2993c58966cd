use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::Deserialize;
use tracing::debug;

use crate::error::{GitheatError, Result};
use crate::heat::palette::{BlockWidth, ColorScale, PaletteCycle, PaletteName};
use crate::logging::LogLevel;
use crate::model::{parse_day_name, DaySet};

/// Default config file name under the home directory.
pub const DEFAULT_CONFIG_FILE: &str = ".githeat";

pub const DEFAULT_STAT_NUMBER: usize = 5;

#[derive(ValueEnum, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum GraphType {
    #[default]
    Block,
    Inline,
}

/// One layer of settings. Every key is optional so layers can be stacked.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub gtype: Option<GraphType>,
    pub width: Option<BlockWidth>,
    pub days: Option<Vec<String>>,
    pub color: Option<PaletteName>,
    pub colors: Option<Vec<ColorScale>>,
    pub stat: Option<bool>,
    pub stat_number: Option<usize>,
    pub separate: Option<bool>,
    pub month_merge: Option<bool>,
    pub hide_legend: Option<bool>,
    pub author: Option<String>,
    pub grep: Option<String>,
    pub logging_level: Option<LogLevel>,
}

impl Settings {
    pub fn from_yaml(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    /// Keys set in `over` replace the ones in `self`.
    pub fn merge(self, over: Settings) -> Settings {
        Settings {
            gtype: over.gtype.or(self.gtype),
            width: over.width.or(self.width),
            days: over.days.or(self.days),
            color: over.color.or(self.color),
            colors: over.colors.or(self.colors),
            stat: over.stat.or(self.stat),
            stat_number: over.stat_number.or(self.stat_number),
            separate: over.separate.or(self.separate),
            month_merge: over.month_merge.or(self.month_merge),
            hide_legend: over.hide_legend.or(self.hide_legend),
            author: over.author.or(self.author),
            grep: over.grep.or(self.grep),
            logging_level: over.logging_level.or(self.logging_level),
        }
    }
}

#[derive(Debug, Default)]
pub struct LoadedConfig {
    pub settings: Settings,
    /// Files that were read, in load order.
    pub sources: Vec<PathBuf>,
    /// Files that were read but held nothing.
    pub empty: Vec<PathBuf>,
}

/// Load and stack `explicit` config files, or `~/.githeat` when none are named.
///
/// A named file that cannot be read is an error; a missing default file is not.
pub fn load_config(explicit: &[PathBuf]) -> Result<LoadedConfig> {
    let mut loaded = LoadedConfig::default();

    if explicit.is_empty() {
        match default_config_path() {
            Some(path) if path.is_file() => load_into(&mut loaded, &path)?,
            Some(path) => debug!(path = %path.display(), "no default config file"),
            None => debug!("home directory not found, skipping default config"),
        }
        return Ok(loaded);
    }

    for path in explicit {
        load_into(&mut loaded, path)?;
    }
    Ok(loaded)
}

fn load_into(loaded: &mut LoadedConfig, path: &Path) -> Result<()> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        GitheatError::Config(format!("failed to load config file {}: {e}", path.display()))
    })?;
    if text.trim().is_empty() {
        loaded.empty.push(path.to_path_buf());
    }
    let layer = Settings::from_yaml(&text)
        .map_err(|e| GitheatError::Config(format!("{}: {e}", path.display())))?;
    loaded.settings = std::mem::take(&mut loaded.settings).merge(layer);
    loaded.sources.push(path.to_path_buf());
    debug!(path = %path.display(), "loaded config file");
    Ok(())
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(DEFAULT_CONFIG_FILE))
}

/// Fully resolved run options, built once at startup.
#[derive(Debug, Clone)]
pub struct Options {
    pub repo: Option<PathBuf>,
    pub interactive: bool,
    pub json: bool,
    pub gtype: GraphType,
    pub width: BlockWidth,
    pub days: DaySet,
    pub color: PaletteName,
    pub colors: Vec<ColorScale>,
    pub stat: bool,
    pub stat_number: usize,
    pub separate: bool,
    pub month_merge: bool,
    pub hide_legend: bool,
    pub author: Option<String>,
    pub grep: Option<String>,
    pub logging_level: LogLevel,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            repo: None,
            interactive: false,
            json: false,
            gtype: GraphType::Block,
            width: BlockWidth::Reg,
            days: DaySet::new(),
            color: PaletteName::Grass,
            colors: Vec::new(),
            stat: false,
            stat_number: DEFAULT_STAT_NUMBER,
            separate: false,
            month_merge: false,
            hide_legend: false,
            author: None,
            grep: None,
            logging_level: LogLevel::Critical,
        }
    }
}

impl Options {
    /// Apply a merged settings stack on top of the built-in defaults.
    pub fn from_settings(settings: Settings) -> Result<Self> {
        let defaults = Self::default();
        let days = match settings.days {
            Some(names) => DaySet::from_weekdays(
                names
                    .iter()
                    .map(|name| parse_day_name(name))
                    .collect::<Result<Vec<_>>>()?,
            ),
            None => defaults.days,
        };

        Ok(Self {
            gtype: settings.gtype.unwrap_or(defaults.gtype),
            width: settings.width.unwrap_or(defaults.width),
            days,
            color: settings.color.unwrap_or(defaults.color),
            colors: settings.colors.unwrap_or_default(),
            stat: settings.stat.unwrap_or(defaults.stat),
            stat_number: settings
                .stat_number
                .filter(|n| *n > 0)
                .unwrap_or(defaults.stat_number),
            separate: settings.separate.unwrap_or(defaults.separate),
            month_merge: settings.month_merge.unwrap_or(defaults.month_merge),
            hide_legend: settings.hide_legend.unwrap_or(defaults.hide_legend),
            author: settings.author.filter(|a| !a.trim().is_empty()),
            grep: settings.grep.filter(|g| !g.trim().is_empty()),
            logging_level: settings.logging_level.unwrap_or(defaults.logging_level),
            ..defaults
        })
    }

    pub fn palette(&self) -> PaletteCycle {
        if self.colors.is_empty() {
            PaletteCycle::builtin(self.color)
        } else {
            PaletteCycle::custom(self.colors.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(text: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(text.as_bytes()).unwrap();
        file
    }

    #[test]
    fn yaml_keys_fill_settings() {
        let settings = Settings::from_yaml(
            "gtype: inline\nwidth: thick\ndays: [Mon, Tues]\ncolor: fire\nstat: true\nstat_number: 3\n",
        )
        .unwrap();
        assert_eq!(settings.gtype, Some(GraphType::Inline));
        assert_eq!(settings.width, Some(BlockWidth::Thick));
        assert_eq!(settings.color, Some(PaletteName::Fire));
        assert_eq!(settings.stat_number, Some(3));

        let options = Options::from_settings(settings).unwrap();
        assert!(options.days.contains(Weekday::Mon));
        assert!(options.days.contains(Weekday::Tue));
        assert!(!options.days.contains(Weekday::Wed));
        assert!(options.stat);
    }

    #[test]
    fn later_layers_win() {
        let file = Settings {
            width: Some(BlockWidth::Thin),
            color: Some(PaletteName::Sky),
            ..Settings::default()
        };
        let cli = Settings {
            width: Some(BlockWidth::Thick),
            ..Settings::default()
        };
        let merged = file.merge(cli);
        assert_eq!(merged.width, Some(BlockWidth::Thick));
        assert_eq!(merged.color, Some(PaletteName::Sky));
    }

    #[test]
    fn custom_palettes_replace_builtin_cycle() {
        let settings = Settings::from_yaml("colors:\n  - [0, 1, 2, 3, 4, 5]\n").unwrap();
        let options = Options::from_settings(settings).unwrap();
        assert_eq!(options.palette().current(), &[0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn bad_day_name_in_config_is_rejected() {
        let settings = Settings::from_yaml("days: [someday]\n").unwrap();
        assert!(matches!(
            Options::from_settings(settings),
            Err(GitheatError::InvalidFilter(_))
        ));
    }

    #[test]
    fn zero_stat_number_means_default() {
        let settings = Settings::from_yaml("stat_number: 0\n").unwrap();
        let options = Options::from_settings(settings).unwrap();
        assert_eq!(options.stat_number, DEFAULT_STAT_NUMBER);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(Settings::from_yaml("colour: grass\n").is_err());
    }

    #[test]
    fn explicit_files_stack_in_order() {
        let first = write_config("width: thin\ncolor: sky\n");
        let second = write_config("width: thick\n");
        let loaded = load_config(&[first.path().to_path_buf(), second.path().to_path_buf()]).unwrap();
        assert_eq!(loaded.settings.width, Some(BlockWidth::Thick));
        assert_eq!(loaded.settings.color, Some(PaletteName::Sky));
        assert_eq!(loaded.sources.len(), 2);
    }

    #[test]
    fn empty_file_is_recorded_and_ignored() {
        let file = write_config("   \n");
        let loaded = load_config(&[file.path().to_path_buf()]).unwrap();
        assert_eq!(loaded.settings, Settings::default());
        assert_eq!(loaded.empty, vec![file.path().to_path_buf()]);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let err = load_config(&[PathBuf::from("/no/such/githeat.yml")]).unwrap_err();
        assert!(matches!(err, GitheatError::Config(_)));
    }
}
