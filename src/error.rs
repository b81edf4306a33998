//! Error types for the temperature monitor

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for monitor operations
pub type Result<T> = std::result::Result<T, Error>;

/// Failure to obtain a temperature from the OS
#[derive(Error, Debug)]
pub enum ReadError {
    /// The GPU command could not be spawned
    #[error("failed to execute `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    /// The GPU command ran but reported failure
    #[error("`{command}` exited with {status}: {stderr}")]
    CommandFailed {
        command: String,
        status: std::process::ExitStatus,
        stderr: String,
    },

    /// Command output was not valid UTF-8
    #[error("`{0}` produced non UTF-8 output")]
    NonUtf8(String),

    /// The expected delimiter is absent from the output
    #[error("missing '{delimiter}' in {output:?}")]
    MissingDelimiter { delimiter: char, output: String },

    /// The extracted value is not a number
    #[error("not a number: {0:?}")]
    NotNumeric(String),

    /// The thermal zone file could not be read
    #[error("failed to read {}: {source}", path.display())]
    ThermalZone {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Invalid refresh interval input
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Interval text is not a floating-point number
    #[error("update interval {0:?} is not a number")]
    NotNumeric(String),

    /// Interval is zero, negative, or not finite
    #[error("update interval must be a positive number of seconds, got {0}")]
    NotPositive(f64),

    /// Interval does not fit in a `Duration`
    #[error("update interval of {0} seconds is too large")]
    TooLarge(f64),
}

/// Main error type
#[derive(Error, Debug)]
pub enum Error {
    /// Temperature read error
    #[error("Read error: {0}")]
    Read(#[from] ReadError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Scheduler thread could not be created
    #[error("Failed to spawn scheduler thread: {0}")]
    Spawn(#[source] io::Error),

    /// Monitoring was already started once
    #[error("Monitoring has already been started")]
    AlreadyStarted,

    /// Windowing backend error
    #[error("GUI error: {0}")]
    Gui(String),
}
