use crate::config::Config;
use anyhow::{Context, Result};
use std::env as stdenv;
use std::fs;
use std::path::{Path, PathBuf};

/// Mutable state of one shell run: the loaded configuration and the
/// directory every file operation resolves against.
///
/// The session directory is the shell's own notion of "where am I". It is
/// only changed by a successful `cd`; the process-global working directory
/// is never touched, so operations stay predictable under tests.
#[derive(Debug, Clone)]
pub struct Session {
    /// Static data loaded once at startup.
    pub config: Config,
    /// The directory the tool currently operates on.
    pub current_dir: PathBuf,
    /// When set to true, the REPL loop terminates after the current command.
    pub should_exit: bool,
}

impl Session {
    /// Create a session rooted at the process working directory.
    pub fn new(config: Config) -> Self {
        let current_dir = stdenv::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self {
            config,
            current_dir,
            should_exit: false,
        }
    }

    /// Create a session rooted at an explicit directory.
    pub fn with_dir(config: Config, dir: impl Into<PathBuf>) -> Self {
        Self {
            config,
            current_dir: dir.into(),
            should_exit: false,
        }
    }

    /// Switch the session to `target`, which may be absolute or relative to
    /// the current directory. On error the session directory is unchanged.
    pub fn change_dir(&mut self, target: &str) -> Result<()> {
        let target = Path::new(target);
        let joined = if target.is_absolute() {
            target.to_path_buf()
        } else {
            self.current_dir.join(target)
        };

        let canonical = fs::canonicalize(&joined)
            .with_context(|| format!("can't resolve {}", joined.display()))?;
        if !canonical.is_dir() {
            anyhow::bail!("{} is not a directory", canonical.display());
        }

        self.current_dir = canonical;
        Ok(())
    }
}
