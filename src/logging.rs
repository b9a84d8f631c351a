//! Log sink setup.
//!
//! The tree logs through the `log` macros and never installs a logger on its own.
//! Binaries and tests that want to see the output call [`init`].

use std::error::Error;
use std::fmt;
use std::fs::File;
use std::io;
use std::path::PathBuf;

use log::{LevelFilter, SetLoggerError};
use simplelog::{
    ColorChoice, CombinedLogger, Config, SharedLogger, TermLogger, TerminalMode, WriteLogger,
};

/// Names the terminal log level, e.g. `RBTREE_LOG=trace`.
pub const LEVEL_VAR: &str = "RBTREE_LOG";
/// Path of an extra log file written at `Debug`.
pub const FILE_VAR: &str = "RBTREE_LOG_FILE";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub term_level: LevelFilter,
    pub file: Option<(PathBuf, LevelFilter)>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self { term_level: LevelFilter::Warn, file: None }
    }
}

impl LogConfig {
    /// Reads [`LEVEL_VAR`] and [`FILE_VAR`]. Unset or unparsable values keep the default.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(level) = lookup(LEVEL_VAR).and_then(|s| s.parse().ok()) {
            config.term_level = level;
        }
        if let Some(path) = lookup(FILE_VAR).filter(|s| !s.is_empty()) {
            config.file = Some((PathBuf::from(path), LevelFilter::Debug));
        }
        config
    }
}

#[non_exhaustive]
#[derive(Debug)]
pub enum LoggingError {
    /// A global logger was already installed.
    AlreadySet(SetLoggerError),
    /// The log file could not be created.
    File(io::Error),
}

impl fmt::Display for LoggingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadySet(err) => write!(f, "could not install logger: {err}"),
            Self::File(err) => write!(f, "could not create log file: {err}"),
        }
    }
}

impl Error for LoggingError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::AlreadySet(err) => Some(err),
            Self::File(err) => Some(err),
        }
    }
}

impl From<SetLoggerError> for LoggingError {
    fn from(err: SetLoggerError) -> Self {
        Self::AlreadySet(err)
    }
}

impl From<io::Error> for LoggingError {
    fn from(err: io::Error) -> Self {
        Self::File(err)
    }
}

/// Installs a terminal logger, plus a file logger if `config` names one.
///
/// Fails if a global logger is already installed.
pub fn init(config: LogConfig) -> Result<(), LoggingError> {
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        config.term_level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];
    if let Some((path, level)) = config.file {
        loggers.push(WriteLogger::new(level, Config::default(), File::create(path)?));
    }
    CombinedLogger::init(loggers)?;
    Ok(())
}

/// Like [`init`], but a logger that is already installed counts as success.
///
/// A log file that cannot be created is still an error.
pub fn init_or_keep(config: LogConfig) -> Result<(), LoggingError> {
    match init(config) {
        Err(LoggingError::AlreadySet(_)) => Ok(()),
        result => result,
    }
}

/// [`init_or_keep`] configured from the environment.
///
/// # Panics
/// If [`FILE_VAR`] names a file that cannot be created.
pub fn init_for_tests() {
    if let Err(err) = init_or_keep(LogConfig::from_env()) {
        panic!("{FILE_VAR}: {err}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |name| vars.iter().find(|(k, _)| *k == name).map(|(_, v)| v.to_string())
    }

    #[test]
    fn defaults_without_variables() {
        assert_eq!(LogConfig::from_lookup(lookup(&[])), LogConfig::default());
        assert_eq!(LogConfig::default().term_level, LevelFilter::Warn);
    }

    #[test]
    fn reads_level_and_file() {
        let vars = [(LEVEL_VAR, "trace"), (FILE_VAR, "tree.log")];
        let config = LogConfig::from_lookup(lookup(&vars));
        assert_eq!(config.term_level, LevelFilter::Trace);
        assert_eq!(config.file, Some((PathBuf::from("tree.log"), LevelFilter::Debug)));
    }

    #[test]
    fn ignores_garbage() {
        let config = LogConfig::from_lookup(lookup(&[(LEVEL_VAR, "loud"), (FILE_VAR, "")]));
        assert_eq!(config, LogConfig::default());
    }

    #[test]
    fn second_init_reports_the_existing_logger() {
        init_for_tests();
        let err = init(LogConfig::default()).unwrap_err();
        assert!(matches!(err, LoggingError::AlreadySet(_)));
        assert!(err.source().is_some());
        log::debug!("logger is live");
    }

    #[test]
    fn keeping_a_logger_still_reports_a_bad_file() {
        assert!(init_or_keep(LogConfig::default()).is_ok());
        assert!(init_or_keep(LogConfig::default()).is_ok());

        let missing = std::env::temp_dir().join("rbtree-facade-missing-dir").join("tree.log");
        let config =
            LogConfig { file: Some((missing, LevelFilter::Debug)), ..LogConfig::default() };
        let err = init_or_keep(config).unwrap_err();
        assert!(matches!(err, LoggingError::File(_)));
        assert!(err.to_string().starts_with("could not create log file"));
    }
}
