//! # Pi Temperature Monitor
//!
//! A small desktop monitor for the GPU and CPU core temperature of a
//! Raspberry Pi. The GPU value comes from `vcgencmd measure_temp`, the CPU
//! value from the first thermal zone in sysfs.
//!
//! ## Quick Start
//!
//! ### One reading
//!
//! ```no_run
//! use pi_temp_monitor::{PiSensors, TemperatureSource};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let reading = PiSensors::default().read()?;
//! println!("{}", reading.gpu_text());
//! println!("{}", reading.cpu_text());
//! # Ok(())
//! # }
//! ```
//!
//! ### Periodic readings without a window
//!
//! ```no_run
//! use std::sync::Arc;
//! use pi_temp_monitor::{Monitor, PiSensors, RefreshInterval};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut monitor = Monitor::new(Arc::new(PiSensors::default()));
//! monitor.start_with(RefreshInterval::from_secs(2.0)?, || {})?;
//! while let Some(reading) = monitor.next_reading()? {
//!     println!("{} | {}", reading.gpu_text(), reading.cpu_text());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! - `gui` - the egui/eframe monitor window
//! - `cli` - the `pi-temp-monitor` binary

pub mod config;
pub mod error;
pub mod monitor;
pub mod scheduler;
pub mod sensors;

#[cfg(feature = "gui")]
pub mod gui;

pub use config::MonitorConfig;
pub use error::{ConfigError, Error, ReadError, Result};
pub use monitor::{
    Monitor, MonitorEvent, MonitorState, RefreshInterval, StopReason, DEFAULT_INTERVAL_SECS,
};
pub use scheduler::Scheduler;
pub use sensors::{
    extract_gpu_value, label_text, parse_cpu_millidegrees, parse_gpu_output, PiSensors, Reading,
    TemperatureSource,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
