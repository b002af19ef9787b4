//! Everything the prompt needs to know about the process it runs in.

pub mod cache;
pub mod mock;

pub use cache::*;
pub use mock::*;

use crate::terminal::Shell;
use regex::Regex;
use std::env;
use std::path::PathBuf;
use thiserror::Error;

/// Invocation flags, usually taken from the command line.
#[derive(Debug, Clone, Default)]
pub struct Flags {
    pub shell: String,
    pub pwd: Option<PathBuf>,
    pub error_code: i32,
    /// Duration of the last command, in milliseconds.
    pub execution_time: f64,
    /// Overrides the probed terminal width.
    pub terminal_width: Option<usize>,
    pub prompt_count: usize,
    pub cleared: bool,
    pub plain: bool,
    pub debug: bool,
}

#[derive(Debug, Error)]
pub enum WidthError {
    #[error("terminal width is unknown")]
    Unknown,
    #[error("unable to query the terminal size: {0}")]
    Probe(#[from] std::io::Error),
}

/// The capabilities the layout engine and segment writers consume.
pub trait Environment {
    fn flags(&self) -> &Flags;

    fn shell(&self) -> Shell {
        Shell::from_name(&self.flags().shell)
    }

    fn pwd(&self) -> String;

    fn home(&self) -> String;

    fn user(&self) -> String;

    fn host(&self) -> String;

    fn getenv(&self, key: &str) -> String;

    fn terminal_width(&self) -> Result<usize, WidthError>;

    fn cache(&self) -> &SessionCache;

    /// Whether `dir` matches one of the given folder patterns. Patterns are
    /// anchored regular expressions; a leading `~` stands for the home folder.
    fn dir_matches_one_of(&self, dir: &str, patterns: &[String]) -> bool {
        let home = self.home();
        patterns.iter().any(|pattern| {
            let pattern = match pattern.strip_prefix('~') {
                Some(rest) => format!("{}{rest}", regex::escape(&home)),
                None => pattern.clone(),
            };
            match Regex::new(&format!("^(?:{pattern})$")) {
                Ok(re) => re.is_match(dir),
                Err(err) => {
                    log::warn!("invalid folder pattern {pattern:?}: {err}");
                    false
                }
            }
        })
    }
}

/// The real process environment.
pub struct Terminal {
    flags: Flags,
    pwd: String,
    cache: SessionCache,
}

impl Terminal {
    pub fn new(flags: Flags) -> Self {
        let pwd = flags
            .pwd
            .clone()
            .or_else(|| env::current_dir().ok())
            .map(|path| path.to_string_lossy().to_string())
            .unwrap_or_default();

        Self {
            flags,
            pwd,
            cache: SessionCache::new(),
        }
    }

    /// Seed the toggle list for this invocation.
    pub fn with_toggles(self, toggles: &str) -> Self {
        if !toggles.is_empty() {
            self.cache.set(TOGGLE_CACHE, toggles);
        }
        self
    }

    /// Shift the terminal width, e.g. to keep the last column free.
    /// Does nothing when the width cannot be determined.
    pub fn rectify_terminal_width(&mut self, diff: isize) {
        let Ok(width) = self.terminal_width() else {
            return;
        };
        self.flags.terminal_width = Some(width.saturating_add_signed(diff));
    }
}

impl Environment for Terminal {
    fn flags(&self) -> &Flags {
        &self.flags
    }

    fn pwd(&self) -> String {
        self.pwd.clone()
    }

    fn home(&self) -> String {
        dirs::home_dir()
            .map(|path| path.to_string_lossy().to_string())
            .unwrap_or_default()
    }

    fn user(&self) -> String {
        env::var("USER")
            .or_else(|_| env::var("USERNAME"))
            .unwrap_or_default()
    }

    fn host(&self) -> String {
        gethostname::gethostname().to_string_lossy().to_string()
    }

    fn getenv(&self, key: &str) -> String {
        env::var(key).unwrap_or_default()
    }

    fn terminal_width(&self) -> Result<usize, WidthError> {
        if let Some(width) = self.flags.terminal_width.filter(|width| *width > 0) {
            return Ok(width);
        }
        let (columns, _) = crossterm::terminal::size()?;
        if columns == 0 {
            return Err(WidthError::Unknown);
        }
        Ok(columns as usize)
    }

    fn cache(&self) -> &SessionCache {
        &self.cache
    }
}
