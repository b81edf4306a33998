//! Raspberry Pi OS temperature sources
//!
//! GPU: `vcgencmd measure_temp`, which prints `temp=45.6'C`.
//! CPU: `/sys/class/thermal/thermal_zone0/temp`, in millidegrees Celsius.

use std::fs;
use std::path::PathBuf;
use std::process::Command;

use super::{extract_gpu_value, parse_cpu_millidegrees, TemperatureSource};
use crate::config::MonitorConfig;
use crate::error::ReadError;

/// Firmware command plus thermal zone file
#[derive(Debug, Clone)]
pub struct PiSensors {
    gpu_program: String,
    gpu_args: Vec<String>,
    cpu_temp_path: PathBuf,
    command_line: String,
}

impl PiSensors {
    pub fn new(config: &MonitorConfig) -> Self {
        Self {
            gpu_program: config.gpu_program.clone(),
            gpu_args: config.gpu_args.clone(),
            cpu_temp_path: config.cpu_temp_path.clone(),
            command_line: config.gpu_command_line(),
        }
    }
}

impl Default for PiSensors {
    fn default() -> Self {
        Self::new(&MonitorConfig::default())
    }
}

impl TemperatureSource for PiSensors {
    fn read_gpu_text(&self) -> Result<String, ReadError> {
        let output = Command::new(&self.gpu_program)
            .args(&self.gpu_args)
            .output()
            .map_err(|source| ReadError::Spawn {
                command: self.command_line.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(ReadError::CommandFailed {
                command: self.command_line.clone(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout = String::from_utf8(output.stdout)
            .map_err(|_| ReadError::NonUtf8(self.command_line.clone()))?;
        extract_gpu_value(&stdout)
    }

    fn read_cpu_temperature(&self) -> Result<f64, ReadError> {
        let contents =
            fs::read_to_string(&self.cpu_temp_path).map_err(|source| ReadError::ThermalZone {
                path: self.cpu_temp_path.clone(),
                source,
            })?;
        parse_cpu_millidegrees(&contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn scratch_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "temp-monitor-{}-{}",
            std::process::id(),
            name
        ));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_read_cpu_temperature_from_file() {
        let path = scratch_file("cpu-ok", "45620\n");
        let sensors = PiSensors::new(&MonitorConfig::default().with_cpu_temp_path(&path));
        assert_eq!(sensors.read_cpu_temperature().unwrap(), 45.6);
        fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_read_cpu_temperature_garbage() {
        let path = scratch_file("cpu-garbage", "warm\n");
        let sensors = PiSensors::new(&MonitorConfig::default().with_cpu_temp_path(&path));
        assert!(matches!(
            sensors.read_cpu_temperature(),
            Err(ReadError::NotNumeric(_))
        ));
        fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_read_cpu_temperature_missing_file() {
        let path = Path::new("/nonexistent/thermal_zone0/temp");
        let sensors = PiSensors::new(&MonitorConfig::default().with_cpu_temp_path(path));
        assert!(matches!(
            sensors.read_cpu_temperature(),
            Err(ReadError::ThermalZone { .. })
        ));
    }

    #[test]
    fn test_read_gpu_temperature_missing_command() {
        let config =
            MonitorConfig::default().with_gpu_command("temp-monitor-no-such-command measure_temp");
        let sensors = PiSensors::new(&config);
        assert!(matches!(
            sensors.read_gpu_temperature(),
            Err(ReadError::Spawn { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_read_gpu_temperature_from_command() {
        let config = MonitorConfig::default().with_gpu_command("echo temp=45.6'C");
        let sensors = PiSensors::new(&config);
        assert_eq!(sensors.read_gpu_temperature().unwrap(), 45.6);
    }

    #[cfg(unix)]
    #[test]
    fn test_read_gpu_text_unaltered() {
        let config = MonitorConfig::default().with_gpu_command("echo temp=47'C");
        let sensors = PiSensors::new(&config);
        assert_eq!(sensors.read_gpu_text().unwrap(), "47");
        assert_eq!(sensors.read_gpu_temperature().unwrap(), 47.0);
    }

    #[cfg(unix)]
    #[test]
    fn test_read_gpu_temperature_failing_command() {
        let config = MonitorConfig::default().with_gpu_command("false");
        let sensors = PiSensors::new(&config);
        assert!(matches!(
            sensors.read_gpu_temperature(),
            Err(ReadError::CommandFailed { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_read_both() {
        let path = scratch_file("cpu-both", "51234");
        let config = MonitorConfig::default()
            .with_gpu_command("echo temp=52.1'C")
            .with_cpu_temp_path(&path);
        let reading = PiSensors::new(&config).read().unwrap();
        assert_eq!(reading.gpu_celsius, 52.1);
        assert_eq!(reading.cpu_celsius, 51.2);
        assert_eq!(reading.gpu_raw, "52.1");
        assert_eq!(reading.gpu_text(), "GPU temperature: 52.1℃");
        fs::remove_file(path).unwrap();
    }
}
