use std::path::{Path, PathBuf};
use std::process::Command;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use crate::error::{GitheatError, Result};
use crate::heat::parse::DELIMITER;

/// Lookback handed to `git log --since`.
pub const SINCE: &str = "1 year 7 days";

/// Runs `git log` for the trailing window of a working tree.
pub struct GitLog {
    path: PathBuf,
    author: Option<String>,
    progress: bool,
}

impl GitLog {
    /// Log reader rooted at `path`, or the current directory if `None`.
    pub fn open<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        let path = match path {
            Some(p) => p.as_ref().to_path_buf(),
            None => std::env::current_dir()?,
        };
        if !path.is_dir() {
            return Err(GitheatError::RepositoryUnavailable(format!(
                "{} is not a directory",
                path.display()
            )));
        }
        Ok(Self {
            path,
            author: None,
            progress: false,
        })
    }

    pub fn with_author(mut self, author: Option<String>) -> Self {
        self.author = author;
        self
    }

    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn args(&self) -> Vec<String> {
        let mut args = vec![
            "log".to_string(),
            format!("--since={SINCE}"),
            format!("--pretty=format:%h{d}%ci{d}%an{d}%ae{d}%s", d = DELIMITER),
        ];
        if let Some(author) = &self.author {
            args.push(format!("--author={author}"));
        }
        args
    }

    /// Raw delimiter-separated log text, one commit per line.
    pub fn read(&self) -> Result<String> {
        let spinner = self.progress.then(|| {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.green} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            pb.set_message("Reading git log...");
            pb.enable_steady_tick(std::time::Duration::from_millis(80));
            pb
        });

        let args = self.args();
        debug!(path = %self.path.display(), ?args, "running git");
        let output = Command::new("git")
            .args(&args)
            .current_dir(&self.path)
            .output();

        if let Some(pb) = &spinner {
            pb.finish_and_clear();
        }

        let output = output.map_err(|e| {
            GitheatError::RepositoryUnavailable(format!("failed to run git: {e}"))
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            // git exits 128 on a fresh repository without any commit
            if stderr.contains("does not have any commits") {
                return Ok(String::new());
            }
            return Err(GitheatError::RepositoryUnavailable(
                stderr.trim().to_string(),
            ));
        }

        let text = String::from_utf8_lossy(&output.stdout).into_owned();
        info!(bytes = text.len(), "read git log");
        Ok(text)
    }
}
