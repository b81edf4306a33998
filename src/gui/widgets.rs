//! Small widgets for the monitor window

use super::theme::MonitorColors;
use egui::{Color32, Response, RichText, Ui, Widget};

/// Solid coloured button with a white bold label
pub struct ActionButton {
    text: String,
    fill: Color32,
}

impl ActionButton {
    pub fn new(text: impl Into<String>, fill: Color32) -> Self {
        Self {
            text: text.into(),
            fill,
        }
    }

    pub fn start(text: impl Into<String>) -> Self {
        Self::new(text, MonitorColors::BROWN)
    }

    pub fn stop(text: impl Into<String>) -> Self {
        Self::new(text, MonitorColors::RED)
    }
}

impl Widget for ActionButton {
    fn ui(self, ui: &mut Ui) -> Response {
        let label = RichText::new(self.text)
            .color(MonitorColors::BUTTON_TEXT)
            .strong();
        ui.add(egui::Button::new(label).fill(self.fill))
    }
}

/// One temperature read-out line
pub struct Readout<'a> {
    text: &'a str,
}

impl<'a> Readout<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text }
    }
}

impl Widget for Readout<'_> {
    fn ui(self, ui: &mut Ui) -> Response {
        ui.label(RichText::new(self.text).color(MonitorColors::TEXT_PRIMARY))
    }
}
