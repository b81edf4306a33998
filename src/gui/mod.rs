//! Temperature monitor window
//!
//! A single small window: an interval field and a start button, which turn
//! into a close button and the GPU/CPU read-outs once monitoring starts.

use std::sync::{Arc, Mutex};

use eframe::egui;

mod app;
mod theme;
mod widgets;

pub use app::{FailureSlot, TemperatureMonitorApp};

use crate::config::MonitorConfig;
use crate::error::{Error, Result};
use crate::sensors::{PiSensors, TemperatureSource};

/// Window title
pub const APP_TITLE: &str = "Temperature Monitor";

/// Run the monitor window until it is closed
///
/// Returns [`Error::Read`] when the window closed because a temperature read
/// failed, so the caller can exit with a failure status.
pub fn run(config: MonitorConfig) -> Result<()> {
    let source: Arc<dyn TemperatureSource> = Arc::new(PiSensors::new(&config));
    run_with_source(config, source)
}

/// Run the monitor window against any temperature source
pub fn run_with_source(config: MonitorConfig, source: Arc<dyn TemperatureSource>) -> Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([320.0, 160.0])
            .with_min_inner_size([320.0, 160.0])
            .with_title(APP_TITLE),
        ..Default::default()
    };

    let failure: FailureSlot = Arc::new(Mutex::new(None));
    let app_failure = failure.clone();

    log::info!(
        "opening monitor window (gpu: `{}`, cpu: {})",
        config.gpu_command_line(),
        config.cpu_temp_path.display()
    );

    eframe::run_native(
        APP_TITLE,
        options,
        Box::new(move |cc| {
            Ok(Box::new(TemperatureMonitorApp::new(
                cc,
                source,
                &config,
                app_failure,
            )))
        }),
    )
    .map_err(|e| Error::Gui(e.to_string()))?;

    let failed = match failure.lock() {
        Ok(mut slot) => slot.take(),
        Err(poisoned) => poisoned.into_inner().take(),
    };
    match failed {
        Some(err) => Err(Error::Read(err)),
        None => Ok(()),
    }
}
