use thiserror::Error;

pub type Result<T> = std::result::Result<T, GitheatError>;

#[derive(Error, Debug)]
pub enum GitheatError {
    #[error("No contribution found")]
    EmptyHistory,
    #[error("Invalid day filter: {0}")]
    InvalidFilter(String),
    #[error(
        "Your terminal width ({available}) is smaller than the heatmap ({required}). \
         Please consider using --width thin, resizing your terminal, or merging months with --month-merge"
    )]
    TerminalTooNarrow { required: usize, available: usize },
    #[error("Are you sure you're in an initialized git directory? ({0})")]
    RepositoryUnavailable(String),
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),
    #[error("Malformed log record: {0}")]
    MalformedRecord(String),
    #[error("Config error: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid pattern: {0}")]
    Regex(#[from] regex::Error),
}

impl GitheatError {
    /// Conditions reported to the user that still end the process with status 0.
    pub fn is_graceful(&self) -> bool {
        matches!(
            self,
            GitheatError::EmptyHistory | GitheatError::TerminalTooNarrow { .. }
        )
    }
}
