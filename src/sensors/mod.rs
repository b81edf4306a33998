//! Temperature sources
//!
//! A [`TemperatureSource`] yields the GPU and CPU core temperature in degrees
//! Celsius. [`PiSensors`] is the real implementation for Raspberry Pi OS; the
//! parsing helpers are public so the formats can be exercised without the
//! hardware.

mod raspberry_pi;

pub use raspberry_pi::PiSensors;

use std::fmt;

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::error::ReadError;

/// Label shown in front of the GPU value
pub const GPU_LABEL: &str = "GPU temperature";
/// Label shown in front of the CPU value
pub const CPU_LABEL: &str = "CPU temperature";
/// Degree Celsius sign (U+2103)
pub const CELSIUS: char = '\u{2103}';

/// Anything that can report the two core temperatures
pub trait TemperatureSource: Send + Sync {
    /// GPU temperature exactly as the firmware printed it, e.g. `45.6`
    fn read_gpu_text(&self) -> Result<String, ReadError>;

    /// CPU temperature in °C, rounded to one decimal
    fn read_cpu_temperature(&self) -> Result<f64, ReadError>;

    /// GPU temperature in °C
    fn read_gpu_temperature(&self) -> Result<f64, ReadError> {
        parse_gpu_value(&self.read_gpu_text()?)
    }

    /// Take both temperatures, GPU first
    fn read(&self) -> Result<Reading, ReadError> {
        let gpu_raw = self.read_gpu_text()?;
        let gpu_celsius = parse_gpu_value(&gpu_raw)?;
        let cpu_celsius = self.read_cpu_temperature()?;
        Ok(Reading {
            gpu_raw,
            gpu_celsius,
            cpu_celsius,
            taken_at: Local::now(),
        })
    }
}

/// One sample of both temperatures
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reading {
    /// GPU value as printed by the firmware; shown unaltered
    pub gpu_raw: String,
    pub gpu_celsius: f64,
    pub cpu_celsius: f64,
    pub taken_at: DateTime<Local>,
}

impl Reading {
    /// `GPU temperature: 45.6℃`
    pub fn gpu_text(&self) -> String {
        label_text(GPU_LABEL, &self.gpu_raw)
    }

    /// `CPU temperature: 45.6℃`
    pub fn cpu_text(&self) -> String {
        label_text(CPU_LABEL, format!("{:.1}", self.cpu_celsius))
    }
}

/// Format a temperature read-out as `<label>: <value>℃`
pub fn label_text(label: &str, value: impl fmt::Display) -> String {
    format!("{}: {}{}", label, value, CELSIUS)
}

/// Extract the temperature text from `vcgencmd measure_temp` output
///
/// The value is the text between the first `=` and the next `'`, e.g.
/// `temp=45.6'C` yields `"45.6"`. The text is returned as printed, after
/// checking that it is a number.
pub fn extract_gpu_value(output: &str) -> Result<String, ReadError> {
    let (_, rest) = output
        .split_once('=')
        .ok_or_else(|| ReadError::MissingDelimiter {
            delimiter: '=',
            output: output.to_string(),
        })?;
    let (value, _) = rest
        .split_once('\'')
        .ok_or_else(|| ReadError::MissingDelimiter {
            delimiter: '\'',
            output: output.to_string(),
        })?;
    let value = value.trim();
    parse_gpu_value(value)?;
    Ok(value.to_string())
}

/// Parse `vcgencmd measure_temp` output into °C
pub fn parse_gpu_output(output: &str) -> Result<f64, ReadError> {
    parse_gpu_value(&extract_gpu_value(output)?)
}

fn parse_gpu_value(value: &str) -> Result<f64, ReadError> {
    match value.parse::<f64>() {
        Ok(celsius) if celsius.is_finite() => Ok(celsius),
        _ => Err(ReadError::NotNumeric(value.to_string())),
    }
}

/// Convert thermal zone contents (millidegrees) to °C with one decimal
///
/// Rounds the binary value of `M / 1000` to the nearest tenth, exact ties to
/// even, so `45650` gives `45.6` and `45250` gives `45.2`.
pub fn parse_cpu_millidegrees(contents: &str) -> Result<f64, ReadError> {
    let contents = contents.trim();
    let millidegrees: i64 = contents
        .parse()
        .map_err(|_| ReadError::NotNumeric(contents.to_string()))?;
    let celsius = millidegrees as f64 / 1000.0;
    let rounded = format!("{:.1}", celsius);
    rounded
        .parse()
        .map_err(|_| ReadError::NotNumeric(contents.to_string()))
}
