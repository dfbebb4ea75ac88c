//! Application context that holds resolved configuration
//!
//! The context is built following the precedence order:
//! 1. Default values
//! 2. Config file values
//! 3. Environment variables (`REGLS__SECTION__KEY`)
//! 4. CLI flags
//!
//! Once built, the context is passed as read-only throughout the application.

use crate::format::{self, ColorChoice, OutputFormatter};
use libregls::Config;
use std::path::{Path, PathBuf};

/// How chatty the CLI is, from the number of `-v` flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum VerbosityLevel {
    #[default]
    Normal,
    Verbose,
    VeryVerbose,
    Trace,
}

impl VerbosityLevel {
    pub fn from_count(count: u8) -> Self {
        match count {
            0 => VerbosityLevel::Normal,
            1 => VerbosityLevel::Verbose,
            2 => VerbosityLevel::VeryVerbose,
            _ => VerbosityLevel::Trace,
        }
    }

    /// `EnvFilter` directive for this level. Dependencies stay at `warn`.
    pub fn log_filter(&self) -> String {
        let level = match self {
            VerbosityLevel::Normal => return "warn".to_string(),
            VerbosityLevel::Verbose => "info",
            VerbosityLevel::VeryVerbose => "debug",
            VerbosityLevel::Trace => "trace",
        };
        format!("warn,libregls={level},regls={level}")
    }
}

/// Application context with resolved configuration and runtime state
#[derive(Debug, Clone)]
pub struct AppContext {
    /// Resolved configuration
    pub config: Config,
    /// Resolved verbosity
    pub verbosity: VerbosityLevel,
}

impl AppContext {
    /// Build context with precedence: defaults > config file > env vars > CLI flags
    ///
    /// An explicit `config_path` must exist. Without one, the default location
    /// is read only when a file is present there.
    pub fn build(
        cli_color: ColorChoice,
        verbosity: VerbosityLevel,
        config_path: Option<&Path>,
    ) -> libregls::Result<Self> {
        let path = match config_path {
            Some(path) => Some(path.to_path_buf()),
            None => default_config_path().filter(|p| p.exists()),
        };

        let config = Config::load(path.as_deref())?;
        Ok(Self::with_config(config, cli_color, verbosity))
    }

    /// Applies CLI flag overrides on top of an already loaded config.
    pub fn with_config(mut config: Config, cli_color: ColorChoice, verbosity: VerbosityLevel) -> Self {
        // Auto is clap's default, so it only overrides when set explicitly elsewhere
        if cli_color != ColorChoice::Auto {
            config.output.color = cli_color;
        }

        Self { config, verbosity }
    }

    /// Formatter matching the resolved color choice.
    pub fn formatter(&self) -> Box<dyn OutputFormatter> {
        format::create_formatter(self.config.output.color)
    }
}

/// Default config file location: `<config_dir>/regls/config.yaml`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("regls").join("config.yaml"))
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
