//! Application state and layout for the temperature monitor window

use std::sync::{Arc, Mutex};
use std::time::Duration;

use eframe::egui;
use egui::{RichText, TextEdit};

use super::theme::{self, MonitorColors};
use super::widgets::{ActionButton, Readout};

use crate::config::MonitorConfig;
use crate::error::ReadError;
use crate::monitor::{Monitor, MonitorState};
use crate::sensors::{TemperatureSource, CPU_LABEL, GPU_LABEL};

const INTERVAL_PROMPT: &str = "Enter update interval in seconds (\"5\" if left blank):";
const START_BUTTON: &str = "Start temperature monitoring of GPU and CPU";
const STOP_BUTTON: &str = "CLOSE MONITOR";
const INTERVAL_FIELD_WIDTH: f32 = 80.0;

// Readings arrive through the waker; this only bounds how stale a missed
// wake-up can leave the window.
const IDLE_REPAINT: Duration = Duration::from_secs(1);

/// Slot the window leaves a fatal read error in for [`super::run`]
pub type FailureSlot = Arc<Mutex<Option<ReadError>>>;

/// Main application state
pub struct TemperatureMonitorApp {
    monitor: Monitor,
    interval_text: String,
    config_error: Option<String>,
    gpu_text: String,
    cpu_text: String,
    focus_requested: bool,
    close_requested: bool,
    failure: FailureSlot,
}

impl TemperatureMonitorApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        source: Arc<dyn TemperatureSource>,
        config: &MonitorConfig,
        failure: FailureSlot,
    ) -> Self {
        theme::apply_monitor_theme(&cc.egui_ctx);
        Self::with_monitor(Monitor::new(source), config.interval_text(), failure)
    }

    fn with_monitor(monitor: Monitor, interval_text: String, failure: FailureSlot) -> Self {
        Self {
            monitor,
            interval_text,
            config_error: None,
            gpu_text: format!("{}: ", GPU_LABEL),
            cpu_text: format!("{}: ", CPU_LABEL),
            focus_requested: false,
            close_requested: false,
            failure,
        }
    }

    fn start_monitoring(&mut self, ctx: &egui::Context) {
        let waker_ctx = ctx.clone();
        match self
            .monitor
            .start(&self.interval_text, move || waker_ctx.request_repaint())
        {
            Ok(_) => self.config_error = None,
            Err(e) => self.config_error = Some(e.to_string()),
        }
    }

    /// Pull readings off the channel into the labels
    fn refresh_labels(&mut self) {
        if let Some(reading) = self.monitor.poll() {
            self.gpu_text = reading.gpu_text();
            self.cpu_text = reading.cpu_text();
        }
    }

    /// Close the window once monitoring has ended, keeping any read error
    fn close_if_terminated(&mut self, ctx: &egui::Context) {
        if self.close_requested || !self.monitor.is_terminated() {
            return;
        }
        if let Some(err) = self.monitor.take_failure() {
            match self.failure.lock() {
                Ok(mut slot) => *slot = Some(err),
                Err(poisoned) => *poisoned.into_inner() = Some(err),
            }
        }
        self.close_requested = true;
        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
    }

    fn show(&mut self, ctx: &egui::Context) {
        self.refresh_labels();
        self.close_if_terminated(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                // Prompt and field stay on screen while monitoring, greyed out.
                ui.label(INTERVAL_PROMPT);

                let configuring = *self.monitor.state() == MonitorState::Configuring;
                let field = ui.add_enabled(
                    configuring,
                    TextEdit::singleline(&mut self.interval_text)
                        .desired_width(INTERVAL_FIELD_WIDTH),
                );
                if !self.focus_requested {
                    field.request_focus();
                    self.focus_requested = true;
                }
                let submitted =
                    field.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

                if let Some(err) = &self.config_error {
                    ui.label(
                        RichText::new(err)
                            .color(MonitorColors::ERROR)
                            .text_style(egui::TextStyle::Small),
                    );
                }

                if configuring {
                    let clicked = ui.add(ActionButton::start(START_BUTTON)).clicked();
                    if clicked || submitted {
                        self.start_monitoring(ctx);
                    }
                } else {
                    if ui.add(ActionButton::stop(STOP_BUTTON)).clicked() {
                        self.monitor.stop();
                        ctx.request_repaint();
                    }

                    ui.separator();
                    ui.add(Readout::new(&self.gpu_text));
                    ui.add(Readout::new(&self.cpu_text));

                    if let Some(reading) = self.monitor.latest() {
                        ui.label(
                            RichText::new(format!(
                                "updated {}",
                                reading.taken_at.format("%H:%M:%S")
                            ))
                            .color(MonitorColors::TEXT_MUTED)
                            .text_style(egui::TextStyle::Small),
                        );
                    }
                }
            });
        });

        if self.monitor.is_monitoring() {
            ctx.request_repaint_after(IDLE_REPAINT);
        }
    }
}

impl eframe::App for TemperatureMonitorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.show(ctx);
    }
}
