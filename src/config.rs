//! Runtime configuration for the temperature monitor
//!
//! Values come from the command line (or their environment variables).
//! Nothing is read from or written to disk.

use std::path::PathBuf;

use crate::error::ConfigError;
use crate::monitor::RefreshInterval;

/// Monitor configuration
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorConfig {
    /// Pre-filled update interval text for the GUI, or the period for `watch`
    pub interval: Option<f64>,
    /// GPU temperature program
    pub gpu_program: String,
    /// Arguments passed to the GPU temperature program
    pub gpu_args: Vec<String>,
    /// Thermal zone file holding the CPU temperature in millidegrees
    pub cpu_temp_path: PathBuf,
}

fn default_gpu_program() -> String {
    "vcgencmd".to_string()
}

fn default_gpu_args() -> Vec<String> {
    vec!["measure_temp".to_string()]
}

fn default_cpu_temp_path() -> PathBuf {
    PathBuf::from("/sys/class/thermal/thermal_zone0/temp")
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            interval: None,
            gpu_program: default_gpu_program(),
            gpu_args: default_gpu_args(),
            cpu_temp_path: default_cpu_temp_path(),
        }
    }
}

impl MonitorConfig {
    /// Set the GPU command from a whitespace separated command line
    ///
    /// An empty command line keeps the defaults.
    pub fn with_gpu_command(mut self, command_line: &str) -> Self {
        let mut parts = command_line.split_whitespace().map(str::to_string);
        if let Some(program) = parts.next() {
            self.gpu_program = program;
            self.gpu_args = parts.collect();
        }
        self
    }

    pub fn with_cpu_temp_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.cpu_temp_path = path.into();
        self
    }

    pub fn with_interval(mut self, seconds: Option<f64>) -> Self {
        self.interval = seconds;
        self
    }

    /// Text the GUI interval field starts with
    pub fn interval_text(&self) -> String {
        self.interval.map(|s| s.to_string()).unwrap_or_default()
    }

    /// Interval to use without user input, validated
    pub fn refresh_interval(&self) -> Result<RefreshInterval, ConfigError> {
        match self.interval {
            Some(seconds) => RefreshInterval::from_secs(seconds),
            None => Ok(RefreshInterval::default()),
        }
    }

    /// Full GPU command line, for logging and error messages
    pub fn gpu_command_line(&self) -> String {
        std::iter::once(self.gpu_program.as_str())
            .chain(self.gpu_args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}
